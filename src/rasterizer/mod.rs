//! Software rasterizer
//!
//! Features:
//! - Edge-function coverage over the triangle's bounding box
//! - Affine (screen-space) barycentric interpolation of arbitrary varyings
//! - Packed 32-bit depth buffer sharing the color pixel layout
//! - Programmable vertex and fragment stages
//! - Double-buffered surfaces with O(1) swap

mod codec;
mod framebuffer;
mod math;
mod render;
mod shader;
mod swapchain;
mod types;

pub use codec::*;
pub use framebuffer::*;
pub use math::*;
pub use render::*;
pub use shader::*;
pub use swapchain::*;
pub use types::*;
