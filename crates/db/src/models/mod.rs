//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Serialize` response shapes where the row holds binary columns
//! - `Deserialize` create/update DTOs

pub mod category;
pub mod design;
pub mod role;
pub mod user;
