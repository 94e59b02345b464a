//! Shared types and models for the activity explorer
//!
//! This crate holds the pure core used by the backend and by the browser
//! (via WASM): weather classification, the category preset, the
//! filter/sort/paginate pipeline and the session reducer.

pub mod models;
pub mod pipeline;
pub mod types;
pub mod validation;

pub use models::*;
pub use pipeline::*;
pub use types::*;
pub use validation::*;
