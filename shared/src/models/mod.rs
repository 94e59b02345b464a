//! Domain models for the activity explorer

mod activity;
mod category;
mod city;
mod session;
mod view;
mod weather;

pub use activity::*;
pub use category::*;
pub use city::*;
pub use session::*;
pub use view::*;
pub use weather::*;
