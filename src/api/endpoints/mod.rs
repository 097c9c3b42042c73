//! API endpoint handlers.

pub mod drugs;
pub mod health;
pub mod parse;
