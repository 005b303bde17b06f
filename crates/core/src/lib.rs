//! Domain rules for the PDM backend: error taxonomy, roles and the
//! authorization policy, category tree rules, design validation, and media
//! encoding. Nothing in this crate performs I/O.

pub mod category;
pub mod design;
pub mod error;
pub mod media;
pub mod policy;
pub mod roles;
pub mod types;
