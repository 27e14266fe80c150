//! Programmable shading stages
//!
//! A mesh is drawn by a vertex stage, run once per vertex, and a fragment
//! stage, run at most once per covered pixel that survives the depth test.
//! Both take `&self`: stages may read uniforms they own but cannot reach the
//! surfaces being drawn into. The only thing a fragment stage writes is the
//! color it returns.
//!
//! Any `Fn` closure of the right shape is a stage.

use super::math::{Vec2, Vec3, Vec4};
use super::types::{Color, Vertex};

/// Barycentric weights of a pixel with respect to a triangle's three vertices
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Barycentric {
    pub w0: f32,
    pub w1: f32,
    pub w2: f32,
}

impl Barycentric {
    pub fn new(w0: f32, w1: f32, w2: f32) -> Self {
        Self { w0, w1, w2 }
    }
}

/// Attributes that can be blended linearly across a triangle
pub trait Interpolate: Copy {
    fn interpolate(a: &Self, b: &Self, c: &Self, w: Barycentric) -> Self;
}

impl Interpolate for () {
    fn interpolate(_: &(), _: &(), _: &(), _: Barycentric) {}
}

impl Interpolate for f32 {
    fn interpolate(a: &f32, b: &f32, c: &f32, w: Barycentric) -> f32 {
        w.w0 * a + w.w1 * b + w.w2 * c
    }
}

impl Interpolate for Vec2 {
    fn interpolate(a: &Vec2, b: &Vec2, c: &Vec2, w: Barycentric) -> Vec2 {
        *a * w.w0 + *b * w.w1 + *c * w.w2
    }
}

impl Interpolate for Vec3 {
    fn interpolate(a: &Vec3, b: &Vec3, c: &Vec3, w: Barycentric) -> Vec3 {
        *a * w.w0 + *b * w.w1 + *c * w.w2
    }
}

impl Interpolate for Vec4 {
    fn interpolate(a: &Vec4, b: &Vec4, c: &Vec4, w: Barycentric) -> Vec4 {
        *a * w.w0 + *b * w.w1 + *c * w.w2
    }
}

impl<A: Interpolate, B: Interpolate> Interpolate for (A, B) {
    fn interpolate(a: &Self, b: &Self, c: &Self, w: Barycentric) -> Self {
        (
            A::interpolate(&a.0, &b.0, &c.0, w),
            B::interpolate(&a.1, &b.1, &c.1, w),
        )
    }
}

impl<A: Interpolate, B: Interpolate, C: Interpolate> Interpolate for (A, B, C) {
    fn interpolate(a: &Self, b: &Self, c: &Self, w: Barycentric) -> Self {
        (
            A::interpolate(&a.0, &b.0, &c.0, w),
            B::interpolate(&a.1, &b.1, &c.1, w),
            C::interpolate(&a.2, &b.2, &c.2, w),
        )
    }
}

/// Output of the vertex stage: clip-space position plus varyings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput<V> {
    pub position: Vec4,
    pub varyings: V,
}

impl<V> VertexOutput<V> {
    pub fn new(position: Vec4, varyings: V) -> Self {
        Self { position, varyings }
    }
}

/// Input of the fragment stage.
///
/// Everything here is blended linearly in screen space (no perspective
/// correction), including `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInput<V> {
    /// Pixel center in screen coordinates
    pub screen_pos: Vec2,
    /// Interpolated clip-space position (zero for screen-space draws)
    pub position: Vec4,
    pub weights: Barycentric,
    pub varyings: V,
}

pub trait VertexStage<V> {
    fn shade_vertex(&self, vertex: &Vertex) -> VertexOutput<V>;
}

pub trait FragmentStage<V> {
    fn shade_fragment(&self, input: &FragmentInput<V>) -> Color;
}

impl<V, F> VertexStage<V> for F
where
    F: Fn(&Vertex) -> VertexOutput<V>,
{
    fn shade_vertex(&self, vertex: &Vertex) -> VertexOutput<V> {
        self(vertex)
    }
}

impl<V, F> FragmentStage<V> for F
where
    F: Fn(&FragmentInput<V>) -> Color,
{
    fn shade_fragment(&self, input: &FragmentInput<V>) -> Color {
        self(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_interpolation() {
        let w = Barycentric::new(0.5, 0.25, 0.25);
        let a = (1.0f32, Vec3::new(4.0, 0.0, 0.0));
        let b = (2.0f32, Vec3::new(0.0, 4.0, 0.0));
        let c = (3.0f32, Vec3::new(0.0, 0.0, 4.0));
        let (s, v) = Interpolate::interpolate(&a, &b, &c, w);
        assert!((s - 1.75).abs() < 1e-6);
        assert_eq!(v, Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_closures_are_stages() {
        let vs = |v: &Vertex| VertexOutput::new(v.pos.extend(1.0), v.normal);
        let out = vs.shade_vertex(&Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec2::ZERO));
        assert_eq!(out.position, Vec4::new(1.0, 2.0, 3.0, 1.0));

        let fs = |_: &FragmentInput<Vec3>| Color::GREEN;
        let input = FragmentInput {
            screen_pos: Vec2::ZERO,
            position: Vec4::ZERO,
            weights: Barycentric::default(),
            varyings: Vec3::ZERO,
        };
        assert_eq!(fs.shade_fragment(&input), Color::GREEN);
    }
}
