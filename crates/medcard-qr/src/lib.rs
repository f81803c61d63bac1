//! QR image rendering for emergency profile links.
//!
//! This crate wraps the `qrcode` symbol encoder and rasterizes the module
//! matrix into an embeddable SVG image with a configurable pixel width,
//! quiet-zone margin and two-color palette.

pub mod options;
pub mod render;

pub use options::*;
pub use render::*;
