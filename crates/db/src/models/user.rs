//! User entity model and DTOs.

use pdm_core::media::image_data_uri;
use pdm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub profile_pic: Option<Vec<u8>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user row joined with its role name.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithRole {
    #[sqlx(flatten)]
    pub user: User,
    pub role_name: String,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    /// Resolved role name (e.g. `"admin"`, `"manager"`).
    pub role: String,
    pub role_id: DbId,
    /// Profile picture as a `data:` URI.
    pub profile_pic: Option<String>,
    pub created_at: Timestamp,
}

impl From<UserWithRole> for UserResponse {
    fn from(row: UserWithRole) -> Self {
        let UserWithRole { user, role_name } = row;
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            role: role_name,
            role_id: user.role_id,
            profile_pic: image_data_uri(user.profile_pic.as_deref()),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub profile_pic: Option<Vec<u8>>,
}

/// DTO for updating an existing user. All fields are optional; a missing
/// profile picture keeps the stored one.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<DbId>,
    pub profile_pic: Option<Vec<u8>>,
}
