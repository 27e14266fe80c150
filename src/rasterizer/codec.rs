//! Depth and color encoding between shading values and storable pixels
//!
//! Depth shares the 32-bit pixel layout of the color buffer: a depth in
//! [0, 1] is scaled by `i32::MAX` and stored as the raw pixel word.

use super::math::{Vec3, Vec4};
use super::types::Color;

const DEPTH_SCALE: f64 = i32::MAX as f64;

/// Encode a normalized depth into a pixel word.
///
/// Input is clamped to [0, 1]. Undefined for NaN.
pub fn encode_depth(depth: f32) -> u32 {
    let d = (depth as f64).clamp(0.0, 1.0);
    (d * DEPTH_SCALE) as u32
}

/// Decode a pixel word written by [`encode_depth`]
pub fn decode_depth(pixel: u32) -> f32 {
    (pixel as f64 / DEPTH_SCALE) as f32
}

/// Encode an RGBA shading vector (x=r, y=g, z=b, w=a) as a color.
///
/// Every channel is clamped to [0, 1] then truncated to 0-255.
pub fn encode_color(c: Vec4) -> Color {
    let channel = |v: f32| (255.0 * v.clamp(0.0, 1.0)) as u8;
    Color::with_alpha(channel(c.x), channel(c.y), channel(c.z), channel(c.w))
}

/// Map a unit normal to a color (`n * 0.5 + 0.5`), opaque
pub fn normal_to_color(normal: Vec3) -> Color {
    let n = normal * 0.5 + Vec3::splat(0.5);
    encode_color(n.extend(1.0))
}
