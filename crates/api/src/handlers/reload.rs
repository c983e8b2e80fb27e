use crate::dto::{ErrorResponse, ReloadResponse};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, instrument};

/// Rebuilds the zone table from the conf dir and reports the record-level
/// changes. Queries keep being answered from the previous table until the
/// atomic swap.
#[instrument(skip(state), name = "api_reload_conf")]
pub async fn reload_conf(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.reload_zones.execute().await {
        Ok(diff) => Ok(Json(ReloadResponse {
            added: diff.added.len(),
            removed: diff.removed.len(),
            changed: diff.changed.len(),
            diff,
        })),
        Err(e) => {
            error!(error = %e, "Zone reload failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
