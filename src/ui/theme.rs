//! UI Theme - Shared colors and styling constants

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Panel background
pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 0.94);

/// Section header background
pub const HEADER_COLOR: Color = Color::new(0.15, 0.15, 0.18, 1.0);

/// Panel border
pub const BORDER_COLOR: Color = Color::new(0.314, 0.314, 0.314, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

/// Accent (slider fill, checked boxes)
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

// =============================================================================
// Widget Colors
// =============================================================================

pub const WIDGET_BG: Color = Color::new(0.196, 0.196, 0.216, 1.0);

pub const WIDGET_HOVER: Color = Color::new(0.235, 0.235, 0.275, 1.0);

pub const WIDGET_ACTIVE: Color = Color::new(0.235, 0.314, 0.392, 1.0);

/// Destructive action button
pub const DANGER_COLOR: Color = Color::new(0.6, 0.24, 0.24, 1.0);

pub const DANGER_HOVER: Color = Color::new(0.7, 0.21, 0.21, 1.0);

// =============================================================================
// Status Colors
// =============================================================================

pub const STATUS_OK: Color = Color::new(0.3, 0.9, 0.4, 1.0);

pub const STATUS_WARN: Color = Color::new(0.95, 0.85, 0.3, 1.0);

pub const STATUS_ERROR: Color = Color::new(0.95, 0.35, 0.35, 1.0);

// =============================================================================
// Font Sizes
// =============================================================================

/// Header/title text size
pub const FONT_SIZE_HEADER: f32 = 16.0;

/// Standard content text size
pub const FONT_SIZE_CONTENT: f32 = 14.0;
