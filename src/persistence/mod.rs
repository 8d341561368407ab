//! Persistence layer modules.

pub mod db;
pub mod schema;
pub mod status_repo;
