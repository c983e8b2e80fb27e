pub mod get_server_stats;
pub mod reload_zones;

pub use get_server_stats::GetServerStatsUseCase;
pub use reload_zones::ReloadZonesUseCase;
