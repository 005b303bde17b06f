//! Route definitions for categories, category types, and generic root
//! listings.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /?type=    -> list_categories
/// POST   /          -> create_category
/// POST   /reorder   -> reorder_categories
/// PUT    /{id}      -> rename_category
/// DELETE /{id}      -> delete_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/reorder", post(categories::reorder_categories))
        .route(
            "/{id}",
            put(categories::rename_category).delete(categories::delete_category),
        )
}

/// Routes mounted at `/types` (admin only).
///
/// ```text
/// GET    /       -> list_types
/// PUT    /{key}  -> rename_type (key = type name)
/// DELETE /{key}  -> delete_type (key = category id)
/// ```
pub fn types_router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list_types))
        .route(
            "/{key}",
            put(categories::rename_type).delete(categories::delete_type),
        )
}

/// Routes mounted at `/parents`.
///
/// ```text
/// GET /{type} -> list_roots_of_type
/// ```
pub fn parents_router() -> Router<AppState> {
    Router::new().route("/{category_type}", get(categories::list_roots_of_type))
}
