pub mod debug;
pub mod health;
pub mod reload;

pub use debug::get_debug_snapshot;
pub use health::health_check;
pub use reload::reload_conf;
