//! Capability traits

mod capabilities;
mod language_model;

pub use capabilities::*;
pub use language_model::*;
