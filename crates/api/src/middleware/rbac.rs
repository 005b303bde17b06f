//! Role-based access control (RBAC) extractors.
//!
//! [`Authorized<P>`] wraps [`AuthUser`] and evaluates the shared policy table
//! in [`pdm_core::policy`] for the `(resource, action)` pair named by the
//! permission marker `P`. Handlers state their requirement in their signature:
//!
//! ```ignore
//! async fn delete_design(
//!     Authorized(user, _): Authorized<DesignDelete>,
//! ) -> AppResult<StatusCode> { ... }
//! ```

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pdm_core::policy::{authorize, Action, Resource};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// A `(resource, action)` pair checked against the policy table.
pub trait Permission {
    const RESOURCE: Resource;
    const ACTION: Action;
}

/// An authenticated caller whose role is allowed to perform `P`.
///
/// Rejects with 401 when there is no valid session and 403 when the role is
/// not listed for `P`.
pub struct Authorized<P>(pub AuthUser, pub PhantomData<fn() -> P>);

impl<P: Permission> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(&user.role, P::RESOURCE, P::ACTION)?;
        Ok(Authorized(user, PhantomData))
    }
}

macro_rules! permissions {
    ($($(#[$doc:meta])* $name:ident => $resource:ident, $action:ident;)*) => {
        $(
            $(#[$doc])*
            pub struct $name;

            impl Permission for $name {
                const RESOURCE: Resource = Resource::$resource;
                const ACTION: Action = Action::$action;
            }
        )*
    };
}

permissions! {
    /// Nested category listing.
    CategoryRead => Category, Read;
    CategoryCreate => Category, Create;
    /// Rename and reorder.
    CategoryUpdate => Category, Update;
    CategoryDelete => Category, Delete;
    /// Distinct type listing.
    TypeRead => CategoryType, Read;
    TypeUpdate => CategoryType, Update;
    TypeDelete => CategoryType, Delete;
    /// Per-axis parent and child listings.
    TaxonomyRead => Taxonomy, Read;
    TaxonomyCreate => Taxonomy, Create;
    /// Listing, detail, and file downloads.
    DesignRead => Design, Read;
    DesignCreate => Design, Create;
    DesignUpdate => Design, Update;
    DesignDelete => Design, Delete;
    UserRead => User, Read;
    UserUpdate => User, Update;
    UserDelete => User, Delete;
}
