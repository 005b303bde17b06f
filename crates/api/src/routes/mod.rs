pub mod auth;
pub mod categories;
pub mod designs;
pub mod health;
pub mod roles;
pub mod taxonomy;
pub mod users;

use axum::Router;
use pdm_core::category::Axis;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                                  register (public, multipart)
/// /login                                     login (public)
/// /profile                                   caller's profile
///
/// /users                                     list (admin)
/// /users/{id}                                get, update, delete (admin)
/// /roles                                     list (public)
///
/// /categories                                nested list, create
/// /categories/reorder                        bulk reorder (POST)
/// /categories/{id}                           rename, delete
/// /types                                     distinct types (admin)
/// /types/{key}                               rename by name, delete by id (admin)
/// /parents/{type}                            roots of any type
///
/// /product_types, /collections,
/// /designtypes, /customers                   per-axis create
///   /parents                                 per-axis roots
///   /{parent_id}                             per-axis children
///
/// /designs                                   list, create (multipart)
/// /designs/{design_number}                   get, update (multipart), delete
/// /designs/{design_number}/files/{slot}      download cad_file / model_sheet
/// /designs/{design_number}/files/other/{id}  download one other file
/// ```
pub fn api_routes() -> Router<AppState> {
    let router = Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/categories", categories::router())
        .nest("/types", categories::types_router())
        .nest("/parents", categories::parents_router())
        .nest("/designs", designs::router());

    Axis::ALL.into_iter().fold(router, |router, axis| {
        router.nest(&format!("/{}", axis.path_segment()), taxonomy::router(axis))
    })
}
