//! Profile dashboard screen.
//!
//! Flow: Session check → Profile lookup → QR generation → Render
//!
//! The controller owns the display state and is the only writer; the render
//! model is derived from that state on demand.

mod controller;
mod lifetime;
mod state;
mod view;

pub use controller::*;
pub use lifetime::*;
pub use state::*;
pub use view::*;
