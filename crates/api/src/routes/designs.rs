//! Route definitions for the `/designs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::designs;
use crate::state::AppState;

/// Routes mounted at `/designs`.
///
/// ```text
/// GET    /                                      -> list_designs
/// POST   /                                      -> create_design (multipart)
/// GET    /{design_number}                       -> get_design
/// PUT    /{design_number}                       -> update_design (multipart)
/// DELETE /{design_number}                       -> delete_design
/// GET    /{design_number}/files/{slot}          -> download_slot
/// GET    /{design_number}/files/other/{file_id} -> download_other_file
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(designs::list_designs).post(designs::create_design),
        )
        .route(
            "/{design_number}",
            get(designs::get_design)
                .put(designs::update_design)
                .delete(designs::delete_design),
        )
        .route("/{design_number}/files/{slot}", get(designs::download_slot))
        .route(
            "/{design_number}/files/other/{file_id}",
            get(designs::download_other_file),
        )
}
