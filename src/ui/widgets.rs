//! Basic UI widgets
//!
//! Immediate-mode: each call draws the widget and returns whether the user
//! changed it this frame.

use macroquad::prelude::*;

use super::theme::*;
use super::{Rect, UiContext};
use crate::rasterizer::Color as RgbColor;

/// Width reserved for the label on the left of value widgets
pub const LABEL_WIDTH: f32 = 110.0;

/// Map a mouse x inside `rect` to a value in `[min, max]`
pub fn slider_value(mouse_x: f32, rect: &Rect, min: f32, max: f32) -> f32 {
    if rect.w <= 0.0 {
        return min;
    }
    let t = ((mouse_x - rect.x) / rect.w).clamp(0.0, 1.0);
    min + t * (max - min)
}

/// Value of a drag field moved `dx` pixels away from where the drag began
pub fn drag_value(anchor: f32, dx: f32, speed: f32, min: f32, max: f32) -> f32 {
    (anchor + dx * speed).clamp(min, max)
}

pub fn to_mq(color: RgbColor) -> Color {
    Color::new(color.r, color.g, color.b, 1.0)
}

/// Draw text vertically centered in `rect`
pub fn label(rect: Rect, text: &str, color: Color) {
    let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
    let y = (rect.y + (rect.h + dims.height) * 0.5).round();
    draw_text(text, rect.x.round(), y, FONT_SIZE_CONTENT, color);
}

fn centered_text(rect: &Rect, text: &str, color: Color) {
    let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
    let x = (rect.x + (rect.w - dims.width) * 0.5).round();
    let y = (rect.y + (rect.h + dims.height) * 0.5).round();
    draw_text(text, x, y, FONT_SIZE_CONTENT, color);
}

fn draw_button(ctx: &mut UiContext, rect: Rect, text: &str, base: Color, hover: Color) -> bool {
    let id = ctx.next_id();
    if ctx.mouse.inside(&rect) && ctx.dragging.is_none() {
        ctx.set_hot(id);
    }
    let hovered = ctx.is_hot(id);

    let bg = if hovered && ctx.mouse.left_down {
        WIDGET_ACTIVE
    } else if hovered {
        hover
    } else {
        base
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, BORDER_COLOR);
    centered_text(&rect, text, TEXT_COLOR);

    hovered && ctx.mouse.left_pressed
}

/// Text button, returns true if clicked
pub fn button(ctx: &mut UiContext, rect: Rect, text: &str) -> bool {
    draw_button(ctx, rect, text, WIDGET_BG, WIDGET_HOVER)
}

/// Red button for destructive actions
pub fn danger_button(ctx: &mut UiContext, rect: Rect, text: &str) -> bool {
    draw_button(ctx, rect, text, DANGER_COLOR, DANGER_HOVER)
}

pub fn checkbox(ctx: &mut UiContext, rect: Rect, text: &str, value: &mut bool) -> bool {
    let id = ctx.next_id();
    let size = (rect.h - 6.0).max(8.0);
    let boxr = Rect::new(rect.x, rect.y + (rect.h - size) * 0.5, size, size);

    if ctx.mouse.inside(&rect) && ctx.dragging.is_none() {
        ctx.set_hot(id);
    }
    let hovered = ctx.is_hot(id);

    draw_rectangle(boxr.x, boxr.y, boxr.w, boxr.h, if hovered { WIDGET_HOVER } else { WIDGET_BG });
    draw_rectangle_lines(boxr.x, boxr.y, boxr.w, boxr.h, 1.0, BORDER_COLOR);
    if *value {
        let inner = boxr.pad(3.0);
        draw_rectangle(inner.x, inner.y, inner.w, inner.h, ACCENT_COLOR);
    }
    label(
        Rect::new(boxr.right() + 6.0, rect.y, rect.w - size - 6.0, rect.h),
        text,
        TEXT_COLOR,
    );

    if hovered && ctx.mouse.left_pressed {
        *value = !*value;
        return true;
    }
    false
}

/// Horizontal slider with the label on the left and the value printed on the track
pub fn slider(ctx: &mut UiContext, rect: Rect, text: &str, value: &mut f32, min: f32, max: f32) -> bool {
    let id = ctx.next_id();
    let (label_rect, track) = rect.split_h_px(LABEL_WIDTH);
    label(label_rect, text, TEXT_COLOR);

    if ctx.mouse.inside(&track) {
        ctx.set_hot(id);
        if ctx.mouse.left_pressed && ctx.dragging.is_none() {
            ctx.start_drag(id);
        }
    }

    let mut changed = false;
    if ctx.is_dragging(id) {
        let v = slider_value(ctx.mouse.x, &track, min, max);
        if v != *value {
            *value = v;
            changed = true;
        }
    }

    draw_rectangle(track.x, track.y, track.w, track.h, WIDGET_BG);
    let t = if max > min { ((*value - min) / (max - min)).clamp(0.0, 1.0) } else { 0.0 };
    draw_rectangle(track.x, track.y, track.w * t, track.h, Color::new(ACCENT_COLOR.r, ACCENT_COLOR.g, ACCENT_COLOR.b, 0.5));
    draw_rectangle_lines(track.x, track.y, track.w, track.h, 1.0, BORDER_COLOR);
    centered_text(&track, &format!("{:.3}", *value), TEXT_COLOR);

    changed
}

/// Numeric field edited by dragging left/right
pub fn drag_float(
    ctx: &mut UiContext,
    rect: Rect,
    text: &str,
    value: &mut f32,
    speed: f32,
    min: f32,
    max: f32,
) -> bool {
    let id = ctx.next_id();
    if ctx.mouse.inside(&rect) {
        ctx.set_hot(id);
        if ctx.mouse.left_pressed && ctx.dragging.is_none() {
            ctx.start_drag_from(id, *value);
        }
    }
    let hovered = ctx.is_hot(id);

    let mut changed = false;
    if ctx.is_dragging(id) {
        let (x0, anchor) = ctx.drag_anchor;
        let v = drag_value(anchor, ctx.mouse.x - x0, speed, min, max);
        if v != *value {
            *value = v;
            changed = true;
        }
    }

    let bg = if ctx.is_dragging(id) {
        WIDGET_ACTIVE
    } else if hovered {
        WIDGET_HOVER
    } else {
        WIDGET_BG
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, BORDER_COLOR);
    centered_text(&rect, &format!("{}{:.3}", text, *value), TEXT_COLOR);

    changed
}

/// Labelled row of X/Y/Z drag fields
pub fn drag_vec3(ctx: &mut UiContext, rect: Rect, text: &str, value: &mut [f32; 3], speed: f32, min: f32, max: f32) -> bool {
    let (label_rect, fields) = rect.split_h_px(LABEL_WIDTH);
    label(label_rect, text, TEXT_COLOR);

    let mut changed = false;
    for ((cell, axis), v) in fields.columns(3, 3.0).into_iter().zip(["X ", "Y ", "Z "]).zip(value.iter_mut()) {
        changed |= drag_float(ctx, cell, axis, v, speed, min, max);
    }
    changed
}

/// Swatch plus R/G/B drag fields in `[0, 1]`
pub fn color_edit(ctx: &mut UiContext, rect: Rect, text: &str, color: &mut RgbColor) -> bool {
    let (label_rect, rest) = rect.split_h_px(LABEL_WIDTH);
    label(label_rect, text, TEXT_COLOR);

    let (swatch, fields) = rest.split_h_px(rect.h + 3.0);
    draw_rectangle(swatch.x, swatch.y, rect.h, swatch.h, to_mq(*color));
    draw_rectangle_lines(swatch.x, swatch.y, rect.h, swatch.h, 1.0, BORDER_COLOR);

    let mut channels = color.to_array();
    let mut changed = false;
    for ((cell, name), c) in fields.columns(3, 3.0).into_iter().zip(["R ", "G ", "B "]).zip(channels.iter_mut()) {
        changed |= drag_float(ctx, cell, name, c, 0.005, 0.0, 1.0);
    }
    if changed {
        *color = RgbColor::new(channels[0], channels[1], channels[2]);
    }
    changed
}
