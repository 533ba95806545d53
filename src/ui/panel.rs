//! Panel chrome and a top-to-bottom row layout

use macroquad::prelude::*;

use super::theme::*;
use super::{label, Rect};

/// Height of the title/section header strip
pub const HEADER_HEIGHT: f32 = 20.0;

/// Draw a panel background with an optional title bar
pub fn draw_panel(rect: Rect, title: Option<&str>, bg_color: Color) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg_color);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, BORDER_COLOR);

    if let Some(title) = title {
        draw_rectangle(rect.x, rect.y, rect.w, HEADER_HEIGHT, HEADER_COLOR);
        draw_text(title, rect.x + 5.0, rect.y + 14.0, FONT_SIZE_HEADER, WHITE);
    }
}

/// Hands out fixed-height rows from the top of a rect
pub struct Column {
    rect: Rect,
    cursor_y: f32,
    row_height: f32,
    spacing: f32,
}

impl Column {
    pub fn new(rect: Rect, row_height: f32) -> Self {
        Self {
            rect,
            cursor_y: rect.y,
            row_height,
            spacing: 4.0,
        }
    }

    /// Next row of the standard height
    pub fn row(&mut self) -> Rect {
        self.row_of(self.row_height)
    }

    pub fn row_of(&mut self, height: f32) -> Rect {
        let r = Rect::new(self.rect.x, self.cursor_y, self.rect.w, height);
        self.cursor_y += height + self.spacing;
        r
    }

    /// Section header strip with its title
    pub fn header(&mut self, title: &str) {
        self.cursor_y += self.spacing;
        let r = self.row_of(HEADER_HEIGHT);
        draw_rectangle(r.x, r.y, r.w, r.h, HEADER_COLOR);
        label(Rect::new(r.x + 5.0, r.y, r.w - 5.0, r.h), title, TEXT_COLOR);
    }

    /// Space used so far, for sizing the panel to its contents
    pub fn used(&self) -> f32 {
        self.cursor_y - self.rect.y
    }
}
