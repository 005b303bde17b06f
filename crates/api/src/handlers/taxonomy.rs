//! Per-axis taxonomy handlers.
//!
//! The same three handlers serve `/product_types`, `/collections`,
//! `/designtypes` and `/customers`; the router attaches the [`Axis`] as a
//! request extension.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use pdm_core::category::Axis;
use pdm_core::types::DbId;
use pdm_db::models::category::Category;
use pdm_db::repositories::CategoryRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::handlers::categories::create_node;
use crate::middleware::rbac::{Authorized, TaxonomyCreate, TaxonomyRead};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /{axis}`.
#[derive(Debug, Deserialize)]
pub struct CreateAxisCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<DbId>,
}

/// GET /api/v1/{axis}/parents
pub async fn list_parents(
    State(state): State<AppState>,
    Extension(axis): Extension<Axis>,
    _user: Authorized<TaxonomyRead>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let roots = CategoryRepo::list_roots(&state.pool, axis.category_type()).await?;
    Ok(Json(DataResponse { data: roots }))
}

/// GET /api/v1/{axis}/{parent_id}
///
/// An unknown parent yields an empty list.
pub async fn list_children(
    State(state): State<AppState>,
    Extension(axis): Extension<Axis>,
    _user: Authorized<TaxonomyRead>,
    AppPath(parent_id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let children =
        CategoryRepo::list_children(&state.pool, axis.category_type(), parent_id).await?;
    Ok(Json(DataResponse { data: children }))
}

/// POST /api/v1/{axis}
pub async fn create(
    State(state): State<AppState>,
    Extension(axis): Extension<Axis>,
    Authorized(user, _): Authorized<TaxonomyCreate>,
    AppJson(input): AppJson<CreateAxisCategoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    create_node(
        &state,
        &user,
        &input.name,
        axis.category_type(),
        input.parent_id,
    )
    .await
}
