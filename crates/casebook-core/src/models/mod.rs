//! Wire models for the casebook client.

mod patient;
mod visit;

pub use patient::*;
pub use visit::*;
