//! Handlers for user administration.
//!
//! All handlers require the `admin` role through the policy table.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pdm_core::error::CoreError;
use pdm_core::types::DbId;
use pdm_db::models::user::{UpdateUser, UserResponse};
use pdm_db::repositories::{RoleRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppMultipart, AppPath};
use crate::middleware::rbac::{Authorized, UserDelete, UserRead, UserUpdate};
use crate::multipart::UserForm;
use crate::response::DataResponse;
use crate::state::AppState;

/// Editable fields after multipart parsing.
#[derive(Debug, Validate)]
struct UpdateUserInput {
    #[validate(length(min = 1, max = 100, message = "username must be 1-100 characters"))]
    username: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    email: Option<String>,
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: Authorized<UserRead>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list_with_roles(&state.pool).await?;
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _admin: Authorized<UserRead>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_with_role_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", id)))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/users/{id}
///
/// Multipart update of `username`, `email`, `role_id`, and `profile_pic`.
/// Omitted parts keep their stored values.
pub async fn update_user(
    State(state): State<AppState>,
    Authorized(admin, _): Authorized<UserUpdate>,
    AppPath(id): AppPath<DbId>,
    AppMultipart(multipart): AppMultipart,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let form = UserForm::from_multipart(multipart).await?;

    let input = UpdateUserInput {
        username: form.username,
        email: form.email,
    };
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if let Some(role_id) = form.role_id {
        if RoleRepo::find_by_id(&state.pool, role_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role_id {role_id}"
            ))));
        }
    }

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        role_id: form.role_id,
        profile_pic: form.profile_pic,
    };
    UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", id)))?;

    let user = UserRepo::find_with_role_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", id)))?;

    tracing::info!(user_id = admin.user_id, target_user_id = id, "User updated");

    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/users/{id}
///
/// Admins cannot delete their own account.
pub async fn delete_user(
    State(state): State<AppState>,
    Authorized(admin, _): Authorized<UserDelete>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot delete your own account".into(),
        )));
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("User", id)));
    }

    tracing::info!(user_id = admin.user_id, target_user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
