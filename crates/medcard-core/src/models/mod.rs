//! Domain models for the medcard system.

mod emergency;
mod profile;

pub use emergency::*;
pub use profile::*;
