use crate::dto::DebugSnapshot;
use crate::state::AppState;
use axum::{extract::State, Json};
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_debug_snapshot")]
pub async fn get_debug_snapshot(State(state): State<AppState>) -> Json<DebugSnapshot> {
    let stats = state.get_stats.execute();
    let nameservers = state.get_stats.nameserver_health();

    debug!(
        zone_records = stats.zone_records,
        cache_entries = stats.cache_entries,
        qps = stats.qps,
        "Debug snapshot served"
    );

    Json(DebugSnapshot { stats, nameservers })
}
