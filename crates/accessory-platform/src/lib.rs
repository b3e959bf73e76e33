//! Platform runners for the accessory input bar.
//!
//! [`CellGrid`] paints an [`accessory_ui::Scene`] into character cells and is
//! always available. The crossterm runner sits behind the `terminal` feature.

pub mod common;
pub mod grid;
#[cfg(feature = "terminal")]
pub mod terminal;

pub use grid::{Cell, CellGrid};
#[cfg(feature = "terminal")]
pub use terminal::run_terminal_app;
