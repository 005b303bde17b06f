//! Handlers for the category taxonomy (`/categories`, `/types`, `/parents`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pdm_core::category::{
    validate_category_name, validate_parent, validate_reorder, validate_type_name, ParentRef,
};
use pdm_core::error::CoreError;
use pdm_core::types::DbId;
use pdm_db::models::category::{nest, Category, CategoryNode, CategoryPosition, CreateCategory};
use pdm_db::repositories::CategoryRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{
    Authorized, CategoryCreate, CategoryDelete, CategoryRead, CategoryUpdate, TaxonomyRead,
    TypeDelete, TypeRead, TypeUpdate,
};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /categories`.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// Request body for `POST /categories`.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    pub parent_id: Option<DbId>,
}

/// Request body for `PUT /categories/{id}`.
#[derive(Debug, Deserialize)]
pub struct RenameCategoryRequest {
    pub name: String,
}

/// Request body for `PUT /types/{type}`.
#[derive(Debug, Deserialize)]
pub struct RenameTypeRequest {
    #[serde(alias = "newType")]
    pub new_type: String,
}

/// Result of a bulk type rename.
#[derive(Debug, Serialize)]
pub struct RenameTypeResponse {
    pub old_type: String,
    pub new_type: String,
    pub updated: u64,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/categories?type=
///
/// Roots with their direct subcategories nested, optionally for one type.
pub async fn list_categories(
    State(state): State<AppState>,
    _user: Authorized<CategoryRead>,
    AppQuery(query): AppQuery<ListCategoriesQuery>,
) -> AppResult<Json<DataResponse<Vec<CategoryNode>>>> {
    let category_type = query
        .category_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let categories = CategoryRepo::list(&state.pool, category_type).await?;
    Ok(Json(DataResponse {
        data: nest(categories),
    }))
}

/// POST /api/v1/categories
///
/// Returns 201 for a new row, or 200 with the existing root when a root with
/// the same `(name, type)` already exists.
pub async fn create_category(
    State(state): State<AppState>,
    Authorized(user, _): Authorized<CategoryCreate>,
    AppJson(input): AppJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    create_node(
        &state,
        &user,
        &input.name,
        input.category_type.trim(),
        input.parent_id,
    )
    .await
}

/// PUT /api/v1/categories/{id}
pub async fn rename_category(
    State(state): State<AppState>,
    Authorized(user, _): Authorized<CategoryUpdate>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<RenameCategoryRequest>,
) -> AppResult<Json<DataResponse<Category>>> {
    let name = input.name.trim();
    validate_category_name(name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let category = CategoryRepo::rename(&state.pool, id, name)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Category", id)))?;

    tracing::info!(user_id = user.user_id, category_id = id, name, "Category renamed");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Removes the category and its direct subcategories.
pub async fn delete_category(
    State(state): State<AppState>,
    Authorized(user, _): Authorized<CategoryDelete>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let removed = CategoryRepo::delete(&state.pool, id).await?;
    if removed == 0 {
        return Err(AppError::Core(CoreError::not_found("Category", id)));
    }

    tracing::info!(user_id = user.user_id, category_id = id, removed, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/categories/reorder
///
/// Body: `[{ "id": 1, "position": 2 }, ...]`. All positions are applied in
/// one transaction; an unknown id rolls the whole batch back.
pub async fn reorder_categories(
    State(state): State<AppState>,
    Authorized(user, _): Authorized<CategoryUpdate>,
    AppJson(positions): AppJson<Vec<CategoryPosition>>,
) -> AppResult<StatusCode> {
    let pairs: Vec<(DbId, i32)> = positions.iter().map(|p| (p.id, p.position)).collect();
    validate_reorder(&pairs).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if let Some(missing) = CategoryRepo::reorder(&state.pool, &positions).await? {
        return Err(AppError::Core(CoreError::not_found("Category", missing)));
    }

    tracing::info!(user_id = user.user_id, count = positions.len(), "Categories reordered");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// GET /api/v1/types
pub async fn list_types(
    State(state): State<AppState>,
    _admin: Authorized<TypeRead>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let types = CategoryRepo::list_types(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// PUT /api/v1/types/{type}
///
/// Re-tags every category of the old type. Renaming onto an existing type
/// merges the two forests.
pub async fn rename_type(
    State(state): State<AppState>,
    Authorized(admin, _): Authorized<TypeUpdate>,
    AppPath(old_type): AppPath<String>,
    AppJson(input): AppJson<RenameTypeRequest>,
) -> AppResult<Json<DataResponse<RenameTypeResponse>>> {
    let new_type = input.new_type.trim().to_string();
    validate_type_name(&new_type).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated = CategoryRepo::rename_type(&state.pool, &old_type, &new_type).await?;
    if updated == 0 {
        return Err(AppError::Core(CoreError::not_found("Category type", &old_type)));
    }

    tracing::info!(
        user_id = admin.user_id,
        old_type = %old_type,
        new_type = %new_type,
        updated,
        "Category type renamed"
    );
    Ok(Json(DataResponse {
        data: RenameTypeResponse {
            old_type,
            new_type,
            updated,
        },
    }))
}

/// DELETE /api/v1/types/{id}
///
/// Deletes exactly the category row with this id; its subcategories follow
/// through the cascade.
pub async fn delete_type(
    State(state): State<AppState>,
    Authorized(admin, _): Authorized<TypeDelete>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !CategoryRepo::delete_type(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Category", id)));
    }

    tracing::info!(user_id = admin.user_id, category_id = id, "Category type row deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/parents/{type}
///
/// Root categories of any type, including admin-defined ones.
pub async fn list_roots_of_type(
    State(state): State<AppState>,
    _user: Authorized<TaxonomyRead>,
    AppPath(category_type): AppPath<String>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let roots = CategoryRepo::list_roots(&state.pool, &category_type).await?;
    Ok(Json(DataResponse { data: roots }))
}

// ---------------------------------------------------------------------------
// Shared create path
// ---------------------------------------------------------------------------

/// Validate and create a category node. Used by `/categories` and by the
/// per-axis create endpoints.
pub(crate) async fn create_node(
    state: &AppState,
    user: &AuthUser,
    name: &str,
    category_type: &str,
    parent_id: Option<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let name = name.trim();
    validate_category_name(name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_type_name(category_type)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if let Some(parent_id) = parent_id {
        let parent = CategoryRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Parent category {parent_id} does not exist"
                )))
            })?;
        validate_parent(
            &ParentRef {
                id: parent.id,
                category_type: &parent.category_type,
                parent_id: parent.parent_id,
            },
            category_type,
        )
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let outcome = CategoryRepo::create(
        &state.pool,
        &CreateCategory {
            name: name.to_string(),
            category_type: category_type.to_string(),
            parent_id,
        },
    )
    .await?;

    let status = if outcome.created {
        tracing::info!(
            user_id = user.user_id,
            category_id = outcome.category.id,
            category_type,
            parent_id,
            "Category created"
        );
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(DataResponse {
            data: outcome.category,
        }),
    ))
}
