//! Shared building blocks for the holiday directory workspace:
//! logging setup and small response types.

pub mod types;
pub mod utils;
