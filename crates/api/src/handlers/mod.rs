pub mod auth;
pub mod categories;
pub mod designs;
pub mod roles;
pub mod taxonomy;
pub mod users;
