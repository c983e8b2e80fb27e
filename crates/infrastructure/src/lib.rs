//! Relay DNS Infrastructure Layer
//!
//! Concrete resolution machinery: the local zone store, the TTL-aware
//! response cache, the staggered-race upstream resolver and the engine that
//! orchestrates them, plus the hickory-server request handler and the
//! observability collaborators around them.

pub mod dns;
