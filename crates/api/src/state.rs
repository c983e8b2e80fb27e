use relay_dns_application::use_cases::{GetServerStatsUseCase, ReloadZonesUseCase};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub get_stats: Arc<GetServerStatsUseCase>,
    pub reload_zones: Arc<ReloadZonesUseCase>,
}
