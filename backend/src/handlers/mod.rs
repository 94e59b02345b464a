//! HTTP handlers

mod explorer;
mod health;

pub use explorer::*;
pub use health::*;
