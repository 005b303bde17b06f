//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod design_repo;
pub mod role_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use design_repo::DesignRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
