//! # Fields, Routes, and Focus
//!
//! A form screen has a handful of persistent *source fields*. When one of
//! them is focused, a single *accessory field* floats above the keyboard and
//! edits on its behalf. This crate holds the platform-agnostic part of that
//! pattern:
//!
//! - [`FieldSet`] / [`SourceField`]: the persistent fields, ids `1..=N`.
//! - [`Route`]: `Unrouted` or `RoutedFrom(id)`, the accessory's current target.
//! - [`AccessorySynchronizer`]: copies values in on focus and back on submit.
//! - [`FocusHost`]: the capability a host implements so the synchronizer can
//!   read and move input focus.
//! - [`Signal`]: observable value, used for keyboard show/hide notifications.
//!
//! ## Keyboard notifications
//!
//! Instead of a global notification center, the host owns a
//! `Signal<KeyboardVisibility>` and binds the synchronizer to it:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use accessory_core::*;
//!
//! let fields = FieldSet::new().with_field("First Name", "First Name", true);
//! let sync = Rc::new(RefCell::new(AccessorySynchronizer::new(fields, FocusState::new())));
//! let keyboard = signal(KeyboardVisibility::Hidden);
//! AccessorySynchronizer::bind_keyboard(&sync, &keyboard);
//!
//! sync.borrow_mut().focus_mut().request_focus(ControlId::Source(FieldId(1)));
//! keyboard.set(KeyboardVisibility::Shown);
//!
//! assert_eq!(sync.borrow().route(), Route::RoutedFrom(FieldId(1)));
//! assert_eq!(sync.borrow().accessory().placeholder(), "First Name");
//! ```
//!
//! Everything here is single-threaded: events arrive one at a time from the
//! host's event loop, and shared state lives in `Rc<RefCell<_>>`.

pub mod config;
pub mod error;
pub mod field;
pub mod focus;
pub mod geometry;
pub mod input;
pub mod prelude;
pub mod route;
pub mod signal;
pub mod sync;

pub use config::*;
pub use error::*;
pub use field::*;
pub use focus::*;
pub use geometry::*;
pub use input::*;
pub use route::*;
pub use signal::*;
pub use sync::*;
