//! Patient form logic: drafts, age derivation, validation, payload shaping.

mod age;
mod draft;
mod payload;
mod validate;

pub use age::*;
pub use draft::*;
pub use payload::*;
pub use validate::*;
