//! Slack bridge layer modules.

pub mod blocks;
pub mod client;
pub mod gateway;
pub mod handlers;
pub mod payload;
pub mod roster;
