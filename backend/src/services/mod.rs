//! Business logic services for the activity explorer

pub mod explorer;

pub use explorer::{ExplorerService, SessionResponse};
