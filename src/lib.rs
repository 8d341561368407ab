#![forbid(unsafe_code)]

//! Slack webhook that records where each team member works today and keeps
//! the channel's daily board in sync.

pub mod aggregate;
pub mod config;
pub mod day;
pub mod errors;
pub mod http;
pub mod models;
pub mod persistence;
pub mod slack;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
