//! Discrete input events delivered to the controller
//!
//! Coordinates are window pixels with the origin at the top-left corner.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool, x: f32, y: f32 },
    CursorMoved { x: f32, y: f32 },
    Resized { width: u32, height: u32 },
    CloseRequested,
}

/// Arrow keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Record a press or release. Returns false for keys that aren't tracked.
    pub fn set(&mut self, key: Key, pressed: bool) -> bool {
        match key {
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Escape | Key::Other => return false,
        }
        true
    }
}

/// What a cursor drag currently does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragMode {
    #[default]
    None,
    /// Left button went down on empty space
    RotateObject,
}
