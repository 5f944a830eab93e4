//! CLI command implementations.

pub mod check;
pub mod export;
pub mod get;
pub mod schema;
pub mod show;
pub mod summary;
