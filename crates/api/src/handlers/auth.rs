//! Handlers for registration, login, and the caller's own profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pdm_core::error::CoreError;
use pdm_core::roles;
use pdm_db::models::user::{CreateUser, UserResponse, UserWithRole};
use pdm_db::repositories::{RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_token;
use crate::auth::password::{
    dummy_hash, hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppMultipart};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::multipart::UserForm;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Registration fields after multipart parsing.
#[derive(Debug, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 100, message = "username must be 1-100 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/register
///
/// Create an account from a multipart form (`username`, `email`, `password`,
/// `role_id`, optional `profile_pic`). Privileged roles may only be assigned
/// by an admin, or to the very first account.
pub async fn register(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    AppMultipart(multipart): AppMultipart,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let form = UserForm::from_multipart(multipart).await?;

    let input = RegisterInput {
        username: require(form.username, "username")?,
        email: require(form.email, "email")?,
    };
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let password = require(form.password, "password")?;
    validate_password_strength(&password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role_id = require(form.role_id, "role_id")?;
    let role = RoleRepo::find_by_id(&state.pool, role_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown role_id {role_id}")))
        })?;

    let forbidden = || {
        AppError::Core(CoreError::Forbidden(format!(
            "Only an admin can register a user with the '{}' role",
            role.name
        )))
    };
    let caller_is_admin = caller.as_ref().is_some_and(AuthUser::is_admin);
    let bootstrap = roles::is_privileged(&role.name) && !caller_is_admin;
    if bootstrap && UserRepo::count(&state.pool).await? > 0 {
        return Err(forbidden());
    }

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let new_user = CreateUser {
        username: input.username,
        email: input.email,
        password_hash,
        role_id,
        profile_pic: form.profile_pic,
    };
    let user = if bootstrap {
        // Re-checked under the lock: another first registration may have won.
        UserRepo::create_first(&state.pool, &new_user)
            .await?
            .ok_or_else(forbidden)?
    } else {
        UserRepo::create(&state.pool, &new_user).await?
    };

    tracing::info!(
        user_id = user.id,
        role = %role.name,
        registered_by = ?caller.map(|c| c.user_id),
        "User registered"
    );

    let response = UserResponse::from(UserWithRole {
        user,
        role_name: role.name,
    });
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/login
///
/// Authenticate with email + password. Unknown email and wrong password
/// produce the same response.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = UserRepo::find_with_role_by_email(&state.pool, &input.email).await?;

    let Some(found) = found else {
        // Spend the same hashing time as a real check.
        let _ = verify_password(&input.password, dummy_hash());
        return Err(AppError::Core(CoreError::InvalidCredentials));
    };

    let password_valid = verify_password(&input.password, &found.user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::InvalidCredentials));
    }

    let token = generate_token(found.user.id, &found.role_name, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = found.user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: found.into(),
    }))
}

/// GET /api/v1/profile
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let found = UserRepo::find_with_role_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user.user_id)))?;
    Ok(Json(DataResponse { data: found.into() }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::Core(CoreError::Validation(format!("{field} is required"))))
}
