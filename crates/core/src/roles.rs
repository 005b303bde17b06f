//! Well-known role name constants.
//!
//! These must match the seed data in `20250301000001_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_SALESPERSON: &str = "salesperson";
pub const ROLE_CUSTOMER: &str = "customer";

/// Every seeded role, in role-id order.
pub const ALL_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_MANAGER,
    ROLE_EMPLOYEE,
    ROLE_SALESPERSON,
    ROLE_CUSTOMER,
];

/// Roles that may only be granted by an existing admin (or to the very first
/// account during bootstrap).
pub const PRIVILEGED_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];

/// Normalize a role name as carried in a token. Comparisons are case-insensitive.
pub fn normalize(role: &str) -> String {
    role.trim().to_ascii_lowercase()
}

/// Whether the given role may only be assigned by an admin.
pub fn is_privileged(role: &str) -> bool {
    PRIVILEGED_ROLES.contains(&normalize(role).as_str())
}
