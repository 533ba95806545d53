//! Core rendering functions
//! Framebuffer plus clip-space triangle, line and point rasterization

use super::math::Vec3;
use super::types::Color;

/// Near-plane clip threshold on `z + w` (keeps the perspective divide finite)
const CLIP_EPSILON: f32 = 1e-5;

/// Framebuffer for software rendering.
///
/// Row 0 is the bottom of the image, like a GL default framebuffer; readers
/// working in top-down window coordinates flip Y themselves.
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Window-space depth, 0.0 = near, 1.0 = far
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![1.0; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
            self.zbuffer = vec![1.0; width * height];
        }
    }

    /// Free both planes; a later `resize` brings the surface back
    pub fn release(&mut self) {
        self.pixels = Vec::new();
        self.zbuffer = Vec::new();
        self.width = 0;
        self.height = 0;
    }

    /// Width over height, what the projection needs
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Clear color and depth
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(1.0);
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Read back one RGBA pixel (bottom-up row numbering)
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Depth-tested write. Returns true if the fragment landed.
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color, depth_test: bool) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y * self.width + x;
        if depth_test {
            if z >= self.zbuffer[idx] {
                return false;
            }
        }
        self.zbuffer[idx] = z;
        let pixel_idx = idx * 4;
        self.pixels[pixel_idx..pixel_idx + 4].copy_from_slice(&color.to_bytes());
        true
    }

    /// Copy rows top-down, the layout texture uploads expect
    pub fn to_top_down_rgba(&self) -> Vec<u8> {
        let row = self.width * 4;
        let mut out = Vec::with_capacity(self.pixels.len());
        for y in (0..self.height).rev() {
            out.extend_from_slice(&self.pixels[y * row..(y + 1) * row]);
        }
        out
    }
}

// =============================================================================
// Raster state
// =============================================================================

/// Fixed-function state shared by every primitive of a draw call
#[derive(Debug, Clone, Copy)]
pub struct RasterState {
    pub depth_test: bool,
    /// Drop clockwise (back-facing) triangles
    pub cull_back: bool,
    /// Subtracted from window depth before the test (polygon-offset analogue)
    pub depth_offset: f32,
}

impl Default for RasterState {
    fn default() -> Self {
        Self {
            depth_test: true,
            cull_back: false,
            depth_offset: 0.0,
        }
    }
}

/// Vertex stage output: clip-space position plus one interpolated attribute
#[derive(Debug, Clone, Copy)]
pub struct ClipVertex {
    pub pos: [f32; 4],
    pub varying: Vec3,
}

impl ClipVertex {
    pub fn new(pos: [f32; 4], varying: Vec3) -> Self {
        Self { pos, varying }
    }

    /// Signed distance to the near plane (`z >= -w` is inside)
    fn near_distance(&self) -> f32 {
        self.pos[2] + self.pos[3]
    }

    fn lerp(&self, other: &ClipVertex, t: f32) -> ClipVertex {
        let mut pos = [0.0; 4];
        for (i, p) in pos.iter_mut().enumerate() {
            *p = self.pos[i] + (other.pos[i] - self.pos[i]) * t;
        }
        ClipVertex {
            pos,
            varying: self.varying + (other.varying - self.varying) * t,
        }
    }
}

/// Screen-space vertex after divide and viewport transform
#[derive(Debug, Clone, Copy)]
struct WindowVertex {
    x: f32,
    y: f32,
    z: f32,
    inv_w: f32,
    varying: Vec3,
}

fn to_window(fb: &Framebuffer, v: &ClipVertex) -> WindowVertex {
    let inv_w = 1.0 / v.pos[3];
    let ndc_x = v.pos[0] * inv_w;
    let ndc_y = v.pos[1] * inv_w;
    let ndc_z = v.pos[2] * inv_w;
    WindowVertex {
        x: (ndc_x + 1.0) * 0.5 * fb.width as f32,
        y: (ndc_y + 1.0) * 0.5 * fb.height as f32,
        z: (ndc_z + 1.0) * 0.5,
        inv_w,
        varying: v.varying,
    }
}

/// Clipping a triangle against one plane leaves at most four corners
const MAX_CLIPPED: usize = 4;

/// Fixed-capacity polygon so the per-triangle path stays off the heap
#[derive(Clone, Copy)]
struct Polygon<V: Copy> {
    verts: [V; MAX_CLIPPED],
    len: usize,
}

impl<V: Copy> Polygon<V> {
    /// Empty polygon; `fill` only initializes the unused slots
    fn new(fill: V) -> Self {
        Self {
            verts: [fill; MAX_CLIPPED],
            len: 0,
        }
    }

    fn push(&mut self, v: V) {
        debug_assert!(self.len < MAX_CLIPPED);
        if self.len < MAX_CLIPPED {
            self.verts[self.len] = v;
            self.len += 1;
        }
    }

    fn as_slice(&self) -> &[V] {
        &self.verts[..self.len]
    }
}

/// Sutherland-Hodgman against the near plane only; the viewport bounds and
/// far plane are handled per fragment.
fn clip_polygon_near(input: &[ClipVertex; 3]) -> Polygon<ClipVertex> {
    let mut out = Polygon::new(input[0]);
    for i in 0..input.len() {
        let cur = &input[i];
        let next = &input[(i + 1) % input.len()];
        let d_cur = cur.near_distance() - CLIP_EPSILON;
        let d_next = next.near_distance() - CLIP_EPSILON;

        if d_cur >= 0.0 {
            out.push(*cur);
        }
        if (d_cur >= 0.0) != (d_next >= 0.0) {
            let t = d_cur / (d_cur - d_next);
            out.push(cur.lerp(next, t));
        }
    }
    out
}

/// Twice the signed area in window space; positive means counter-clockwise
fn signed_area(poly: &[WindowVertex]) -> f32 {
    let mut area = 0.0;
    for i in 0..poly.len() {
        let a = &poly[i];
        let b = &poly[(i + 1) % poly.len()];
        area += a.x * b.y - b.x * a.y;
    }
    area
}

/// Clip, project and cull a triangle. `None` if nothing survives.
fn prepare_polygon(fb: &Framebuffer, tri: &[ClipVertex; 3], state: &RasterState) -> Option<Polygon<WindowVertex>> {
    let clipped = clip_polygon_near(tri);
    if clipped.len < 3 {
        return None;
    }
    let mut poly = Polygon::new(to_window(fb, &clipped.verts[0]));
    for v in clipped.as_slice() {
        poly.push(to_window(fb, v));
    }
    let area = signed_area(poly.as_slice());
    if area == 0.0 || (state.cull_back && area < 0.0) {
        return None;
    }
    Some(poly)
}

// =============================================================================
// Triangles
// =============================================================================

/// Rasterize one clip-space triangle. `shade` is the fragment stage: it gets
/// the perspective-correct interpolated varying and returns the color.
pub fn draw_triangle<F>(fb: &mut Framebuffer, tri: &[ClipVertex; 3], state: &RasterState, shade: F)
where
    F: Fn(Vec3) -> Color,
{
    let Some(poly) = prepare_polygon(fb, tri, state) else {
        return;
    };
    let poly = poly.as_slice();
    for i in 1..poly.len() - 1 {
        rasterize_triangle(fb, &poly[0], &poly[i], &poly[i + 1], state, &shade);
    }
}

fn rasterize_triangle<F>(
    fb: &mut Framebuffer,
    v1: &WindowVertex,
    v2: &WindowVertex,
    v3: &WindowVertex,
    state: &RasterState,
    shade: &F,
) where
    F: Fn(Vec3) -> Color,
{
    // Bounding box clamped to the framebuffer
    let min_x = v1.x.min(v2.x).min(v3.x).floor().max(0.0) as usize;
    let max_x = (v1.x.max(v2.x).max(v3.x).ceil()).min(fb.width as f32) as usize;
    let min_y = v1.y.min(v2.y).min(v3.y).floor().max(0.0) as usize;
    let max_y = (v1.y.max(v2.y).max(v3.y).ceil()).min(fb.height as f32) as usize;

    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Triangle area * 2 (used for normalization)
    let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if area.abs() < 1e-8 {
        return; // Degenerate triangle
    }
    let inv_area = 1.0 / area;

    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;

            // Barycentric weights for v1 and v2, v3 gets the rest
            let bc_x = ((v2.y - v3.y) * (px - v3.x) + (v3.x - v2.x) * (py - v3.y)) * inv_area;
            let bc_y = ((v3.y - v1.y) * (px - v3.x) + (v1.x - v3.x) * (py - v3.y)) * inv_area;
            let bc_z = 1.0 - bc_x - bc_y;

            const ERR: f32 = -1e-6;
            if bc_x < ERR || bc_y < ERR || bc_z < ERR {
                continue;
            }

            // Window depth is affine in screen space after the divide
            let z = bc_x * v1.z + bc_y * v2.z + bc_z * v3.z - state.depth_offset;
            if !(0.0..=1.0).contains(&z) {
                continue;
            }
            if state.depth_test && z >= fb.zbuffer[y * fb.width + x] {
                continue;
            }

            // Attributes interpolate linearly in 1/w
            let w1 = bc_x * v1.inv_w;
            let w2 = bc_y * v2.inv_w;
            let w3 = bc_z * v3.inv_w;
            let sum = w1 + w2 + w3;
            let varying = if sum.abs() > f32::EPSILON {
                (v1.varying * w1 + v2.varying * w2 + v3.varying * w3) * (1.0 / sum)
            } else {
                v1.varying
            };

            fb.set_pixel_with_depth(x, y, z, shade(varying), state.depth_test);
        }
    }
}

/// Outline a clip-space triangle (polygon-mode line). Culling follows `state`.
pub fn draw_triangle_edges(fb: &mut Framebuffer, tri: &[ClipVertex; 3], state: &RasterState, color: Color) {
    let Some(poly) = prepare_polygon(fb, tri, state) else {
        return;
    };
    let poly = poly.as_slice();
    for i in 0..poly.len() {
        let a = &poly[i];
        let b = &poly[(i + 1) % poly.len()];
        draw_window_line(fb, a, b, state, color);
    }
}

// =============================================================================
// Lines and points
// =============================================================================

/// Draw a clip-space line segment with near-plane clipping
pub fn draw_line(fb: &mut Framebuffer, a: [f32; 4], b: [f32; 4], state: &RasterState, color: Color) {
    let mut p0 = ClipVertex::new(a, Vec3::ZERO);
    let mut p1 = ClipVertex::new(b, Vec3::ZERO);
    let d0 = p0.near_distance() - CLIP_EPSILON;
    let d1 = p1.near_distance() - CLIP_EPSILON;

    // Both behind the near plane - skip entirely
    if d0 < 0.0 && d1 < 0.0 {
        return;
    }
    if d0 < 0.0 {
        p0 = p0.lerp(&p1, d0 / (d0 - d1));
    } else if d1 < 0.0 {
        p1 = p0.lerp(&p1, d0 / (d0 - d1));
    }

    let w0 = to_window(fb, &p0);
    let w1 = to_window(fb, &p1);
    draw_window_line(fb, &w0, &w1, state, color);
}

/// Liang-Barsky: the parameter interval of `a -> b` inside the rectangle
/// `min..max`, or `None` when the segment misses it
fn clip_segment_to_rect(a: (f32, f32), b: (f32, f32), min: (f32, f32), max: (f32, f32)) -> Option<(f32, f32)> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [(-dx, a.0 - min.0), (dx, max.0 - a.0), (-dy, a.1 - min.1), (dy, max.1 - a.1)] {
        if p == 0.0 {
            // Parallel to this edge: entirely outside or no constraint
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    Some((t0, t1))
}

/// Bresenham walk with depth interpolated along the major axis.
/// The segment is first trimmed to the surface (plus a pixel of slack).
fn draw_window_line(fb: &mut Framebuffer, a: &WindowVertex, b: &WindowVertex, state: &RasterState, color: Color) {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return;
    }
    let Some((t0, t1)) = clip_segment_to_rect(
        (a.x, a.y),
        (b.x, b.y),
        (-1.0, -1.0),
        (fb.width as f32 + 1.0, fb.height as f32 + 1.0),
    ) else {
        return;
    };
    let at = |t: f32| (a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t, a.z + (b.z - a.z) * t);
    let (ax, ay, az) = at(t0);
    let (bx, by, bz) = at(t1);

    let x0 = ax.floor() as i32;
    let y0 = ay.floor() as i32;
    let x1 = bx.floor() as i32;
    let y1 = by.floor() as i32;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = x0;
    let mut y = y0;

    let total_steps = dx.max(-dy).max(1) as f32;
    let mut step = 0.0f32;

    loop {
        if x >= 0 && x < fb.width as i32 && y >= 0 && y < fb.height as i32 {
            let t = (step / total_steps).min(1.0);
            let z = az + t * (bz - az);
            if (0.0..=1.0).contains(&z) {
                let biased = (z - state.depth_offset).max(0.0);
                fb.set_pixel_with_depth(x as usize, y as usize, biased, color, state.depth_test);
            }
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        let mut moved = false;
        if e2 >= dy {
            err += dy;
            x += sx;
            moved = true;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
            moved = true;
        }
        if moved {
            step += 1.0;
        }
    }
}

/// Draw a square point of `size` pixels centered on a clip-space position
pub fn draw_point(fb: &mut Framebuffer, p: [f32; 4], size: f32, state: &RasterState, color: Color) {
    // Points are clipped whole, like GL
    if p[2] + p[3] < CLIP_EPSILON || p[2] > p[3] {
        return;
    }
    let w = to_window(fb, &ClipVertex::new(p, Vec3::ZERO));
    let side = size.round().max(1.0) as i32;
    let x0 = (w.x - side as f32 * 0.5).round() as i32;
    let y0 = (w.y - side as f32 * 0.5).round() as i32;
    let z = (w.z - state.depth_offset).max(0.0);

    for y in y0..y0 + side {
        for x in x0..x0 + side {
            if x >= 0 && y >= 0 {
                fb.set_pixel_with_depth(x as usize, y as usize, z, color, state.depth_test);
            }
        }
    }
}
