//! Form screen, accessory bar layout and the accessory text field.

pub mod error;
pub mod layout;
pub mod scene;
pub mod screen;
pub mod textfield;

pub use error::ScreenError;
pub use layout::{Hit, LayoutSpec, ScreenLayout, layout_screen};
pub use scene::{Scene, SceneNode, Tone};
pub use screen::AccessoryScreen;
pub use textfield::TextFieldState;
