//! Session gate, visit-form state, and the application-state coordinator.

mod app;
mod session;
mod visits;

pub use app::*;
pub use session::*;
pub use visits::*;
