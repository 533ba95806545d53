//! Immediate-mode UI kit for the parameter panel
//!
//! - No retained state: widgets are redrawn every frame and return
//!   whether the user changed them
//! - Rectangle-based layout
//! - Drawn with macroquad on top of the blitted 3D view

mod input;
mod panel;
mod rect;
mod theme;
mod widgets;

pub use input::*;
pub use panel::*;
pub use rect::*;
pub use theme::*;
pub use widgets::*;
