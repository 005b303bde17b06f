//! Route definitions for the per-axis taxonomy endpoints.

use axum::routing::{get, post};
use axum::{Extension, Router};
use pdm_core::category::Axis;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Routes mounted at `/{axis}` for one built-in axis.
///
/// ```text
/// POST /             -> create
/// GET  /parents      -> list_parents
/// GET  /{parent_id}  -> list_children
/// ```
pub fn router(axis: Axis) -> Router<AppState> {
    Router::new()
        .route("/", post(taxonomy::create))
        .route("/parents", get(taxonomy::list_parents))
        .route("/{parent_id}", get(taxonomy::list_children))
        .layer(Extension(axis))
}
