//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but tolerates a missing header.
//! - [`rbac::Authorized`] -- Checks the caller's role against the policy table.

pub mod auth;
pub mod rbac;
