//! Domain model module declarations.

pub mod roster;
pub mod status;
