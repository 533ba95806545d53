//! Software rasterizer
//!
//! A small GL-style pipeline on the CPU: clip-space triangles, lines and
//! points drawn into an RGBA framebuffer with a float depth buffer.
//!
//! # Module Organization
//!
//! - `types` - Color, Vertex, RasterSettings
//! - `math` - Vec3, Vec2, Quat, 4x4 matrices, projection and look-at
//! - `camera` - Yaw/pitch fly camera
//! - `render` - Framebuffer and primitive rasterization
//! - `program` - Vertex/fragment stages and uniforms
//! - `buffers` - Vertex, bounding-box and normal-line buffers
//! - `draw` - Renderer: the per-frame multi-mode draw pass

pub mod buffers;
pub mod camera;
pub mod draw;
pub mod math;
pub mod program;
pub mod render;
pub mod types;

pub use buffers::MeshBuffers;
pub use camera::Camera;
pub use draw::Renderer;
pub use math::{Mat4, Quat, Vec2, Vec3};
pub use program::{FragmentMode, Program, Uniforms};
pub use render::{Framebuffer, RasterState};
pub use types::{Color, RasterSettings, Vertex};
