use serde::{Deserialize, Serialize};

/// Textual record changes between two zone tables, reported on reload.
///
/// Two records are considered equal only if their full textual
/// representations, in original declaration order, match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl ZoneDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}
