//! Input state for UI interaction

use super::Rect;

/// Mouse button state
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
}

impl MouseState {
    /// Check if mouse is inside a rect
    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }
}

/// UI context passed through the frame
pub struct UiContext {
    pub mouse: MouseState,
    /// ID of the widget currently being dragged (if any)
    pub dragging: Option<u64>,
    /// ID of the widget that is "hot" (mouse hovering)
    pub hot: Option<u64>,
    /// Mouse x and widget value when the current drag started
    pub drag_anchor: (f32, f32),
    /// Cursor is over a UI surface this frame; the 3D view must not react
    pointer_claimed: bool,
    /// Counter for generating unique IDs
    id_counter: u64,
}

impl UiContext {
    pub fn new() -> Self {
        Self {
            mouse: MouseState::default(),
            dragging: None,
            hot: None,
            drag_anchor: (0.0, 0.0),
            pointer_claimed: false,
            id_counter: 0,
        }
    }

    /// Generate a unique ID for a widget (stable as long as draw order is)
    pub fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.hot = None;
        self.id_counter = 0;
        self.pointer_claimed = false;

        // Clear dragging if mouse released
        if self.mouse.left_released || !self.mouse.left_down {
            self.dragging = None;
        }
    }

    /// Mark `rect` as UI: while the cursor (or a widget drag) is on it the
    /// pointer belongs to the UI
    pub fn claim_pointer(&mut self, rect: &Rect) {
        if self.mouse.inside(rect) || self.dragging.is_some() {
            self.pointer_claimed = true;
        }
    }

    pub fn pointer_claimed(&self) -> bool {
        self.pointer_claimed
    }

    pub fn is_dragging(&self, id: u64) -> bool {
        self.dragging == Some(id)
    }

    pub fn start_drag(&mut self, id: u64) {
        self.dragging = Some(id);
    }

    /// Start a drag that edits `value` relative to the current mouse x
    pub fn start_drag_from(&mut self, id: u64, value: f32) {
        self.dragging = Some(id);
        self.drag_anchor = (self.mouse.x, value);
    }

    /// Set hot widget (hovering)
    pub fn set_hot(&mut self, id: u64) {
        // Only set hot if not dragging something else
        if self.dragging.is_none() || self.dragging == Some(id) {
            self.hot = Some(id);
        }
    }

    pub fn is_hot(&self, id: u64) -> bool {
        self.hot == Some(id)
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_only_when_over_rect_or_dragging() {
        let panel = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut ctx = UiContext::new();

        ctx.begin_frame(MouseState { x: 200.0, y: 50.0, ..Default::default() });
        ctx.claim_pointer(&panel);
        assert!(!ctx.pointer_claimed());

        ctx.begin_frame(MouseState { x: 50.0, y: 50.0, ..Default::default() });
        ctx.claim_pointer(&panel);
        assert!(ctx.pointer_claimed());

        // A slider drag that leaves the panel keeps the claim
        ctx.begin_frame(MouseState { x: 50.0, y: 50.0, left_down: true, ..Default::default() });
        ctx.start_drag(7);
        ctx.begin_frame(MouseState { x: 300.0, y: 50.0, left_down: true, ..Default::default() });
        ctx.claim_pointer(&panel);
        assert!(ctx.pointer_claimed());
    }

    #[test]
    fn test_release_ends_drag() {
        let mut ctx = UiContext::new();
        ctx.start_drag(3);
        ctx.begin_frame(MouseState::default());
        assert_eq!(ctx.dragging, None);

        // Press and release within one frame still reports the button down
        ctx.start_drag(3);
        ctx.begin_frame(MouseState { left_down: true, left_released: true, ..Default::default() });
        assert_eq!(ctx.dragging, None);
    }

    #[test]
    fn test_hot_is_blocked_by_another_drag() {
        let mut ctx = UiContext::new();
        ctx.begin_frame(MouseState { left_down: true, ..Default::default() });
        let a = ctx.next_id();
        let b = ctx.next_id();
        ctx.start_drag(a);
        ctx.set_hot(b);
        assert!(!ctx.is_hot(b));
        ctx.set_hot(a);
        assert!(ctx.is_hot(a));

        ctx.begin_frame(MouseState::default());
        assert!(!ctx.is_hot(a));
    }
}
