//! Triangle rasterization
//!
//! Coverage is found by scanning the pixel centers of the triangle's screen
//! bounding box and evaluating the three edge functions. A pixel is covered
//! only when all three are strictly negative, which fixes one winding: the
//! signed area in y-down pixel coordinates must be negative, i.e. vertices
//! run counter-clockwise as seen on screen (and in NDC). The opposite winding
//! covers nothing, and pixel centers lying exactly on an edge belong to
//! neither neighbour, so shared edges are never shaded twice.
//!
//! Attributes are blended with screen-space barycentric weights (affine, no
//! perspective correction).

use super::math::{Vec2, Vec4};
use super::shader::{Barycentric, FragmentInput, FragmentStage, Interpolate, VertexOutput, VertexStage};
use super::types::Vertex;
use super::Framebuffer;

/// Maps clip space to pixel coordinates for a surface of a given size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn of(fb: &Framebuffer) -> Self {
        Self::new(fb.width(), fb.height())
    }

    /// Map normalized device coordinates to pixels (origin top-left, y down)
    pub fn ndc_to_screen(&self, ndc: Vec4) -> Vec2 {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        Vec2::new(half_w + ndc.x * half_w, half_h - ndc.y * half_h)
    }

    /// Perspective divide followed by [`Viewport::ndc_to_screen`]
    pub fn clip_to_screen(&self, clip: Vec4) -> Vec2 {
        self.ndc_to_screen(clip.perspective_divide())
    }
}

/// Signed edge function of `p` against the directed edge `start -> end`
#[inline]
pub fn edge_function(start: Vec2, end: Vec2, p: Vec2) -> f32 {
    (end - start).cross(p - start)
}

/// Area-ratio barycentric weights of `p` in triangle (p0, p1, p2).
///
/// Not guarded against degenerate triangles: a zero area gives non-finite
/// weights.
pub fn barycentric(p0: Vec2, p1: Vec2, p2: Vec2, p: Vec2) -> Barycentric {
    let d = (p1.y - p2.y) * (p0.x - p2.x) + (p2.x - p1.x) * (p0.y - p2.y);
    let w0 = ((p1.y - p2.y) * (p.x - p2.x) + (p2.x - p1.x) * (p.y - p2.y)) / d;
    let w1 = ((p2.y - p0.y) * (p.x - p2.x) + (p0.x - p2.x) * (p.y - p2.y)) / d;
    Barycentric::new(w0, w1, 1.0 - w0 - w1)
}

/// Integer pixel range covered by the bounding box, clamped to the surface
fn bounding_box(p0: Vec2, p1: Vec2, p2: Vec2, width: usize, height: usize) -> (usize, usize, usize, usize) {
    let min_x = p0.x.min(p1.x).min(p2.x).max(0.0);
    let min_y = p0.y.min(p1.y).min(p2.y).max(0.0);
    let max_x = p0.x.max(p1.x).max(p2.x).min(width as f32);
    let max_y = p0.y.max(p1.y).max(p2.y).min(height as f32);
    (
        min_x.floor() as usize,
        min_y.floor() as usize,
        max_x.ceil() as usize,
        max_y.ceil() as usize,
    )
}

/// Visit every covered pixel of the screen triangle with its center point
fn for_each_covered(
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    width: usize,
    height: usize,
    mut visit: impl FnMut(usize, usize, Vec2),
) {
    let (x0, y0, x1, y1) = bounding_box(p0, p1, p2, width, height);
    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if edge_function(p0, p1, p) < 0.0
                && edge_function(p1, p2, p) < 0.0
                && edge_function(p2, p0, p) < 0.0
            {
                visit(x, y, p);
            }
        }
    }
}

/// Rasterize one shaded triangle into `fb`.
///
/// `clip_to_screen` maps each clip-space position to pixel coordinates
/// (normally [`Viewport::clip_to_screen`]). For each covered pixel the
/// interpolated `z / w` goes through the depth test; only survivors reach the
/// fragment stage and get written.
pub fn draw_triangle<V, C, F>(
    fb: &mut Framebuffer,
    clip_to_screen: C,
    v0: &VertexOutput<V>,
    v1: &VertexOutput<V>,
    v2: &VertexOutput<V>,
    fragment: &F,
) where
    V: Interpolate,
    C: Fn(Vec4) -> Vec2,
    F: FragmentStage<V> + ?Sized,
{
    let p0 = clip_to_screen(v0.position);
    let p1 = clip_to_screen(v1.position);
    let p2 = clip_to_screen(v2.position);

    let (width, height) = (fb.width(), fb.height());
    for_each_covered(p0, p1, p2, width, height, |x, y, p| {
        let weights = barycentric(p0, p1, p2, p);
        let position = Vec4::interpolate(&v0.position, &v1.position, &v2.position, weights);
        if !fb.depth_test_and_write(x, y, position.z / position.w) {
            return;
        }
        let input = FragmentInput {
            screen_pos: p,
            position,
            weights,
            varyings: V::interpolate(&v0.varyings, &v1.varyings, &v2.varyings, weights),
        };
        let color = fragment.shade_fragment(&input);
        fb.write_pixel(x, y, color);
    });
}

/// Rasterize a triangle already in screen space.
///
/// No depth test and no varyings; the fragment stage only sees the pixel
/// center and weights. Meant for overlays and debug views.
pub fn draw_screen_triangle<F>(fb: &mut Framebuffer, p0: Vec2, p1: Vec2, p2: Vec2, fragment: &F)
where
    F: FragmentStage<()> + ?Sized,
{
    let (width, height) = (fb.width(), fb.height());
    for_each_covered(p0, p1, p2, width, height, |x, y, p| {
        let input = FragmentInput {
            screen_pos: p,
            position: Vec4::ZERO,
            weights: barycentric(p0, p1, p2, p),
            varyings: (),
        };
        let color = fragment.shade_fragment(&input);
        fb.write_pixel(x, y, color);
    });
}

/// Run the vertex stage over a triangle list and rasterize each triangle
pub fn render_triangles<V, VS, FS, I>(
    fb: &mut Framebuffer,
    triangles: I,
    vertex: &VS,
    fragment: &FS,
) -> usize
where
    V: Interpolate,
    VS: VertexStage<V> + ?Sized,
    FS: FragmentStage<V> + ?Sized,
    I: IntoIterator<Item = [Vertex; 3]>,
{
    let viewport = Viewport::of(fb);
    let mut count = 0;
    for [a, b, c] in triangles {
        let v0 = vertex.shade_vertex(&a);
        let v1 = vertex.shade_vertex(&b);
        let v2 = vertex.shade_vertex(&c);
        draw_triangle(fb, |clip| viewport.clip_to_screen(clip), &v0, &v1, &v2, fragment);
        count += 1;
    }
    count
}
