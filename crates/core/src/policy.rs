//! Declarative authorization policy.
//!
//! Every protected operation is described by a `(Resource, Action)` pair. The
//! [`POLICY`] table maps each pair to the role names allowed to perform it.
//! Pairs missing from the table are denied for everyone.

use crate::error::CoreError;
use crate::roles::{normalize, ALL_ROLES, ROLE_ADMIN, ROLE_EMPLOYEE, ROLE_MANAGER};

/// Something a caller can act upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Individual taxonomy nodes (`/categories`).
    Category,
    /// Whole category types (`/types`).
    CategoryType,
    /// The per-axis taxonomy endpoints (`/product_types`, `/collections`, ...).
    Taxonomy,
    /// Designs and their attachments.
    Design,
    /// User administration.
    User,
}

/// What the caller wants to do with a [`Resource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

const ADMIN_ONLY: &[&str] = &[ROLE_ADMIN];
const ADMIN_OR_MANAGER: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];
/// Everyone except salespeople and customers.
const STAFF: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_EMPLOYEE];

/// The policy table: `(resource, action) -> allowed roles`.
pub const POLICY: &[(Resource, Action, &[&str])] = &[
    (Resource::Category, Action::Read, ALL_ROLES),
    (Resource::Category, Action::Create, ADMIN_OR_MANAGER),
    (Resource::Category, Action::Update, ADMIN_OR_MANAGER),
    (Resource::Category, Action::Delete, ADMIN_OR_MANAGER),
    (Resource::CategoryType, Action::Read, ADMIN_ONLY),
    (Resource::CategoryType, Action::Update, ADMIN_ONLY),
    (Resource::CategoryType, Action::Delete, ADMIN_ONLY),
    (Resource::Taxonomy, Action::Read, STAFF),
    (Resource::Taxonomy, Action::Create, ADMIN_OR_MANAGER),
    (Resource::Design, Action::Read, ALL_ROLES),
    (Resource::Design, Action::Create, STAFF),
    (Resource::Design, Action::Update, STAFF),
    (Resource::Design, Action::Delete, ADMIN_OR_MANAGER),
    (Resource::User, Action::Read, ADMIN_ONLY),
    (Resource::User, Action::Create, ADMIN_ONLY),
    (Resource::User, Action::Update, ADMIN_ONLY),
    (Resource::User, Action::Delete, ADMIN_ONLY),
];

/// Roles allowed to perform `action` on `resource`. Empty when unlisted.
pub fn allowed_roles(resource: Resource, action: Action) -> &'static [&'static str] {
    POLICY
        .iter()
        .find(|(r, a, _)| *r == resource && *a == action)
        .map(|(_, _, roles)| *roles)
        .unwrap_or(&[])
}

/// Whether `role` may perform `action` on `resource`.
pub fn is_allowed(role: &str, resource: Resource, action: Action) -> bool {
    let role = normalize(role);
    allowed_roles(resource, action).contains(&role.as_str())
}

/// Check the policy, returning [`CoreError::Forbidden`] on denial.
pub fn authorize(role: &str, resource: Resource, action: Action) -> Result<(), CoreError> {
    if is_allowed(role, resource, action) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{role}' may not {action:?} {resource:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::{ROLE_CUSTOMER, ROLE_SALESPERSON};

    #[test]
    fn category_mutations_limited_to_admin_and_manager() {
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(is_allowed(ROLE_ADMIN, Resource::Category, action));
            assert!(is_allowed(ROLE_MANAGER, Resource::Category, action));
            for role in [ROLE_EMPLOYEE, ROLE_SALESPERSON, ROLE_CUSTOMER] {
                assert!(
                    !is_allowed(role, Resource::Category, action),
                    "{role} must not {action:?} categories"
                );
            }
        }
    }

    #[test]
    fn taxonomy_reads_deny_salesperson_and_customer() {
        assert!(is_allowed(ROLE_EMPLOYEE, Resource::Taxonomy, Action::Read));
        assert!(!is_allowed(ROLE_SALESPERSON, Resource::Taxonomy, Action::Read));
        assert!(!is_allowed(ROLE_CUSTOMER, Resource::Taxonomy, Action::Read));
    }

    #[test]
    fn user_admin_is_admin_only() {
        assert!(is_allowed(ROLE_ADMIN, Resource::User, Action::Delete));
        assert!(!is_allowed(ROLE_MANAGER, Resource::User, Action::Read));
    }

    #[test]
    fn role_comparison_is_case_insensitive() {
        assert!(is_allowed("Admin", Resource::CategoryType, Action::Read));
    }

    #[test]
    fn unknown_role_is_denied_everywhere() {
        assert!(!is_allowed("intern", Resource::Design, Action::Read));
    }

    #[test]
    fn unlisted_pair_is_denied() {
        assert!(allowed_roles(Resource::CategoryType, Action::Create).is_empty());
        assert_matches!(
            authorize(ROLE_ADMIN, Resource::CategoryType, Action::Create),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn design_writes_exclude_salesperson_and_customer() {
        assert!(authorize(ROLE_EMPLOYEE, Resource::Design, Action::Create).is_ok());
        assert_matches!(
            authorize(ROLE_CUSTOMER, Resource::Design, Action::Update),
            Err(CoreError::Forbidden(_))
        );
    }
}
