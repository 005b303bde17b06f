//! Handler for the public role listing.

use axum::extract::State;
use axum::Json;
use pdm_db::models::role::Role;
use pdm_db::repositories::RoleRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/roles
pub async fn list_roles(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Role>>>> {
    let roles = RoleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: roles }))
}
