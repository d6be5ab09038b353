//! Geometry and projection for the textured quad video frames are drawn on.
//!
//! The quad spans 32×18 world units centred on the origin (a 16:9 frame).
//! Texture coordinates put `v = 0` at the top edge because decoded frames
//! store their first row at the top.

use glam::Mat4;

/// Half extents of the quad in world units.
pub const QUAD_HALF_WIDTH: f32 = 16.0;
pub const QUAD_HALF_HEIGHT: f32 = 9.0;

/// Fraction of the framebuffer the quad occupies along its limiting axis.
pub const QUAD_FILL: f32 = 0.9;

/// Interleaved `[x, y, u, v]` for each corner: top right, bottom right,
/// bottom left, top left.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 16] = [
     QUAD_HALF_WIDTH,  QUAD_HALF_HEIGHT, 1.0, 0.0,
     QUAD_HALF_WIDTH, -QUAD_HALF_HEIGHT, 1.0, 1.0,
    -QUAD_HALF_WIDTH, -QUAD_HALF_HEIGHT, 0.0, 1.0,
    -QUAD_HALF_WIDTH,  QUAD_HALF_HEIGHT, 0.0, 0.0,
];

/// Two counter-clockwise triangles over [`QUAD_VERTICES`].
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Floats per vertex in [`QUAD_VERTICES`]; attribute 0 is the position at
/// offset 0 and attribute 1 the texture coordinate at offset 2.
pub const QUAD_VERTEX_FLOATS: usize = 4;

/// Orthographic transform that fits the quad inside a `width`×`height`
/// framebuffer, centred, keeping its aspect ratio.
///
/// Upload it as the vertex shader's `transform` uniform.
pub fn quad_projection(width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let quad_aspect = QUAD_HALF_WIDTH / QUAD_HALF_HEIGHT;

    let (half_w, half_h) = if aspect >= quad_aspect {
        let half_h = QUAD_HALF_HEIGHT / QUAD_FILL;
        (half_h * aspect, half_h)
    } else {
        let half_w = QUAD_HALF_WIDTH / QUAD_FILL;
        (half_w, half_w / aspect)
    };

    Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, -10.0, 10.0)
}
