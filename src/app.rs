//! Window integration
//!
//! Translates macroquad's polled input into viewer events, presents the
//! software-rendered surface and runs the frame loop.

use macroquad::prelude::*;

use crate::panel::ParameterPanel;
use crate::rasterizer::Framebuffer;
use crate::ui::{MouseState, UiContext};
use crate::viewer::{FrameHooks, InputEvent, Key, MouseButton as ViewerButton, ViewerController};

const WATCHED_KEYS: [KeyCode; 5] = [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right, KeyCode::Escape];

const WATCHED_BUTTONS: [(MouseButton, ViewerButton); 3] = [
    (MouseButton::Left, ViewerButton::Left),
    (MouseButton::Right, ViewerButton::Right),
    (MouseButton::Middle, ViewerButton::Middle),
];

pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

/// Emit a cursor event only when the cursor actually moved
pub fn cursor_event(prev: (f32, f32), now: (f32, f32)) -> Option<InputEvent> {
    (prev != now).then_some(InputEvent::CursorMoved { x: now.0, y: now.1 })
}

/// Emit a resize event only for a changed, non-empty window
pub fn resize_event(prev: (u32, u32), now: (u32, u32)) -> Option<InputEvent> {
    (prev != now && now.0 > 0 && now.1 > 0).then_some(InputEvent::Resized {
        width: now.0,
        height: now.1,
    })
}

/// Polls macroquad once per frame and produces the frame's input events
pub struct EventPump {
    last_cursor: (f32, f32),
    last_size: (u32, u32),
}

impl EventPump {
    pub fn new(window_size: (u32, u32)) -> Self {
        Self {
            last_cursor: mouse_position(),
            last_size: window_size,
        }
    }

    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if is_quit_requested() {
            events.push(InputEvent::CloseRequested);
        }

        let size = (screen_width() as u32, screen_height() as u32);
        if let Some(ev) = resize_event(self.last_size, size) {
            events.push(ev);
            self.last_size = size;
        }

        for code in WATCHED_KEYS {
            if is_key_pressed(code) {
                events.push(InputEvent::Key { key: map_key(code), pressed: true });
            }
            if is_key_released(code) {
                events.push(InputEvent::Key { key: map_key(code), pressed: false });
            }
        }

        // Cursor motion before buttons, so a press lands at the current position
        let cursor = mouse_position();
        if let Some(ev) = cursor_event(self.last_cursor, cursor) {
            events.push(ev);
            self.last_cursor = cursor;
        }

        for (button, mapped) in WATCHED_BUTTONS {
            if is_mouse_button_pressed(button) {
                events.push(InputEvent::MouseButton { button: mapped, pressed: true, x: cursor.0, y: cursor.1 });
            }
            if is_mouse_button_released(button) {
                events.push(InputEvent::MouseButton { button: mapped, pressed: false, x: cursor.0, y: cursor.1 });
            }
        }

        events
    }
}

fn ui_mouse() -> MouseState {
    let (x, y) = mouse_position();
    MouseState {
        x,
        y,
        left_down: is_mouse_button_down(MouseButton::Left),
        left_pressed: is_mouse_button_pressed(MouseButton::Left),
        left_released: is_mouse_button_released(MouseButton::Left),
    }
}

/// Stretch the surface over the whole window
fn present(fb: &Framebuffer) {
    if fb.width == 0 || fb.height == 0 {
        return;
    }
    let pixels = fb.to_top_down_rgba();
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &pixels);
    texture.set_filter(FilterMode::Nearest);
    draw_texture_ex(
        &texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}

/// Run frames until the viewer asks to close
pub async fn run(viewer: &mut ViewerController) {
    prevent_quit();

    let size = (screen_width() as u32, screen_height() as u32);
    viewer.handle_event(InputEvent::Resized { width: size.0, height: size.1 });

    let mut pump = EventPump::new(size);
    let mut ui_ctx = UiContext::new();
    let mut panel = ParameterPanel::new();

    while !viewer.should_close() {
        ui_ctx.begin_frame(ui_mouse());
        panel.capture_pointer(&mut ui_ctx, viewer);

        for event in pump.poll() {
            viewer.handle_event(event);
        }
        viewer.update();
        viewer.render();

        clear_background(BLACK);
        present(viewer.surface());
        panel.draw(&mut ui_ctx, viewer, get_fps());

        next_frame().await;
    }

    log::info!("Frame loop finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(KeyCode::Up), Key::Up);
        assert_eq!(map_key(KeyCode::Escape), Key::Escape);
        assert_eq!(map_key(KeyCode::W), Key::Other);
    }

    #[test]
    fn test_cursor_event_only_on_motion() {
        assert!(cursor_event((1.0, 2.0), (1.0, 2.0)).is_none());
        assert!(matches!(
            cursor_event((1.0, 2.0), (3.0, 2.0)),
            Some(InputEvent::CursorMoved { x, y }) if x == 3.0 && y == 2.0
        ));
    }

    #[test]
    fn test_resize_event_skips_minimized() {
        assert!(resize_event((800, 600), (800, 600)).is_none());
        assert!(resize_event((800, 600), (0, 0)).is_none());
        assert!(matches!(
            resize_event((800, 600), (1024, 768)),
            Some(InputEvent::Resized { width: 1024, height: 768 })
        ));
    }
}
