//! Scene: uniforms, shading programs and the per-frame render pass

use crate::config::{RenderConfig, ShadingMode};
use crate::mesh::Mesh;
use crate::rasterizer::{
    draw_screen_triangle, encode_color, normal_to_color, render_triangles, Barycentric, Color,
    FragmentInput, Interpolate, Mat4, Swapchain, Vec3, Vec4, Vertex, VertexOutput, VertexStage,
    Viewport,
};

/// Per-frame transform and lighting state read by the shaders
#[derive(Debug, Clone, Copy)]
pub struct Uniforms {
    pub model: Mat4,
    pub mvp: Mat4,
    pub light_pos: Vec3,
}

impl Uniforms {
    /// Build transforms for a model spun `angle` radians about the configured axis
    pub fn new(config: &RenderConfig, angle: f32, aspect: f32) -> Self {
        let cam = &config.camera;
        let model = Mat4::rotate(angle, Vec3::from(config.spin_axis)) * Mat4::scale(Vec3::splat(config.model_scale));
        let view = Mat4::look_at(Vec3::from(cam.eye), Vec3::from(cam.target), Vec3::from(cam.up));
        let projection = Mat4::perspective(cam.fov_degrees.to_radians(), aspect, cam.near, cam.far);
        Self {
            model,
            mvp: projection * view * model,
            light_pos: Vec3::from(config.light_position),
        }
    }
}

/// World-space attributes carried from vertex to fragment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitVaryings {
    pub world_pos: Vec4,
    pub world_normal: Vec3,
}

impl Interpolate for LitVaryings {
    fn interpolate(a: &Self, b: &Self, c: &Self, w: Barycentric) -> Self {
        Self {
            world_pos: Vec4::interpolate(&a.world_pos, &b.world_pos, &c.world_pos, w),
            world_normal: Vec3::interpolate(&a.world_normal, &b.world_normal, &c.world_normal, w),
        }
    }
}

/// Vertex stage shared by the lit programs
pub struct WorldSpaceVertex<'a> {
    pub uniforms: &'a Uniforms,
}

impl VertexStage<LitVaryings> for WorldSpaceVertex<'_> {
    fn shade_vertex(&self, vertex: &Vertex) -> VertexOutput<LitVaryings> {
        let u = self.uniforms;
        VertexOutput::new(
            u.mvp * vertex.pos.extend(1.0),
            LitVaryings {
                world_pos: u.model * vertex.pos.extend(1.0),
                world_normal: (u.model * vertex.normal.extend(0.0)).xyz().normalize(),
            },
        )
    }
}

/// Lambert term toward the point light, as an opaque grey
pub fn diffuse_fragment(uniforms: &Uniforms, input: &FragmentInput<LitVaryings>) -> Color {
    let light_dir = (uniforms.light_pos - input.varyings.world_pos.xyz()).normalize();
    let normal = input.varyings.world_normal.normalize();
    let diff = light_dir.dot(normal).max(0.0);
    encode_color(Vec3::ONE.scale(diff).extend(1.0))
}

pub fn normal_fragment(input: &FragmentInput<LitVaryings>) -> Color {
    normal_to_color(input.varyings.world_normal.normalize())
}

/// Screen position as red/green over full blue
pub fn gradient_fragment(viewport: Viewport, input: &FragmentInput<()>) -> Color {
    encode_color(Vec4::new(
        input.screen_pos.x / viewport.width,
        input.screen_pos.y / viewport.height,
        1.0,
        1.0,
    ))
}

/// Clear the back surface, draw `mesh`, then swap.
///
/// Returns the number of triangles submitted.
pub fn render_frame(swapchain: &mut Swapchain, mesh: &Mesh, config: &RenderConfig, angle: f32) -> usize {
    let viewport = Viewport::of(swapchain.back());
    let uniforms = Uniforms::new(config, angle, viewport.width / viewport.height);

    let fb = swapchain.back_mut();
    fb.clear(config.clear_color(), config.clear_depth);

    let submitted = match config.shading {
        ShadingMode::Diffuse => {
            let vertex = WorldSpaceVertex { uniforms: &uniforms };
            let fragment = |input: &FragmentInput<LitVaryings>| diffuse_fragment(&uniforms, input);
            render_triangles(fb, mesh.triangles(), &vertex, &fragment)
        }
        ShadingMode::Normals => {
            let vertex = WorldSpaceVertex { uniforms: &uniforms };
            render_triangles(fb, mesh.triangles(), &vertex, &normal_fragment)
        }
        ShadingMode::ScreenGradient => {
            let fragment = |input: &FragmentInput<()>| gradient_fragment(viewport, input);
            let mut count = 0;
            for [a, b, c] in mesh.triangles() {
                let project = |v: &Vertex| viewport.clip_to_screen(uniforms.mvp * v.pos.extend(1.0));
                draw_screen_triangle(fb, project(&a), project(&b), project(&c), &fragment);
                count += 1;
            }
            count
        }
    };

    swapchain.swap();
    log::trace!("frame: {} triangles, angle {:.2}", submitted, angle);
    submitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Vec2;

    /// Alpha 0 never comes out of the shaders, so it marks untouched pixels
    const MARKER: [u8; 4] = [1, 2, 3, 0];

    fn test_config(shading: ShadingMode) -> RenderConfig {
        RenderConfig {
            clear_color: MARKER,
            shading,
            ..RenderConfig::default()
        }
    }

    fn drawn_pixels(chain: &Swapchain) -> Vec<Color> {
        chain
            .front()
            .pixels()
            .iter()
            .map(|&p| Color::from_argb(p))
            .filter(|&c| c != Color::from(MARKER))
            .collect()
    }

    fn lit_input(world_pos: Vec3, normal: Vec3) -> FragmentInput<LitVaryings> {
        FragmentInput {
            screen_pos: Vec2::ZERO,
            position: Vec4::ZERO,
            weights: Barycentric::new(1.0, 0.0, 0.0),
            varyings: LitVaryings {
                world_pos: world_pos.extend(1.0),
                world_normal: normal,
            },
        }
    }

    #[test]
    fn test_diffuse_facing_light_is_bright() {
        let u = Uniforms::new(&RenderConfig::default(), 0.0, 4.0 / 3.0);
        let c = diffuse_fragment(&u, &lit_input(Vec3::ZERO, u.light_pos));
        assert!(c.r >= 254 && c.g == c.r && c.b == c.r);
        assert_eq!(c.a, 255);
    }

    #[test]
    fn test_diffuse_facing_away_is_black() {
        let u = Uniforms::new(&RenderConfig::default(), 0.0, 4.0 / 3.0);
        let c = diffuse_fragment(&u, &lit_input(Vec3::ZERO, -u.light_pos));
        assert_eq!(c, Color::BLACK);
    }

    #[test]
    fn test_vertex_stage_outputs_world_space() {
        let u = Uniforms::new(&RenderConfig::default(), 0.0, 1.0);
        let stage = WorldSpaceVertex { uniforms: &u };
        let out = stage.shade_vertex(&Vertex::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0), Vec2::ZERO));
        // Default model scale is 2
        assert!((out.varyings.world_pos.x - 2.0).abs() < 1e-5);
        assert!((out.varyings.world_pos.w - 1.0).abs() < 1e-5);
        assert!((out.varyings.world_normal.y - 1.0).abs() < 1e-5);
        assert_eq!(out.position, u.mvp * Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_cube_frame_is_drawn_and_presented() {
        let mut chain = Swapchain::new(80, 60);
        let config = test_config(ShadingMode::Diffuse);
        let n = render_frame(&mut chain, &Mesh::cube(), &config, 0.3);
        assert_eq!(n, 12);

        let drawn = drawn_pixels(&chain);
        assert!(drawn.len() > 200, "only {} pixels drawn", drawn.len());
        assert!(drawn.iter().all(|c| c.a == 255 && c.r == c.g && c.g == c.b));
        // Corners stay clear
        assert_eq!(chain.front().pixel(0, 0), Some(Color::from(MARKER)));
        assert_eq!(chain.front().pixel(79, 59), Some(Color::from(MARKER)));
    }

    #[test]
    fn test_normals_mode_colors_by_normal() {
        let mut chain = Swapchain::new(80, 60);
        render_frame(&mut chain, &Mesh::cube(), &test_config(ShadingMode::Normals), 0.0);
        let drawn = drawn_pixels(&chain);
        assert!(!drawn.is_empty());
        // Unrotated cube from (5,5,5): only +X, +Y, +Z faces are visible
        let expected = [
            normal_to_color(Vec3::new(1.0, 0.0, 0.0)),
            normal_to_color(Vec3::new(0.0, 1.0, 0.0)),
            normal_to_color(Vec3::new(0.0, 0.0, 1.0)),
        ];
        // Interpolated normals may land one step below a saturated channel
        let close = |a: &Color, b: &Color| {
            a.to_bytes().iter().zip(b.to_bytes()).all(|(&x, y)| x.abs_diff(y) <= 1)
        };
        assert!(drawn.iter().all(|c| expected.iter().any(|e| close(c, e))));
    }

    #[test]
    fn test_gradient_mode_uses_screen_path() {
        let mut chain = Swapchain::new(80, 60);
        render_frame(&mut chain, &Mesh::cube(), &test_config(ShadingMode::ScreenGradient), 0.0);
        let drawn = drawn_pixels(&chain);
        assert!(!drawn.is_empty());
        assert!(drawn.iter().all(|c| c.b == 255 && c.a == 255));
    }

    #[test]
    fn test_frames_alternate_surfaces() {
        let mut chain = Swapchain::new(40, 30);
        let mesh = Mesh::cube();
        render_frame(&mut chain, &mesh, &test_config(ShadingMode::Normals), 0.0);
        let first = chain.front().pixels().as_ptr();
        render_frame(&mut chain, &mesh, &test_config(ShadingMode::Normals), 0.0);
        assert_ne!(chain.front().pixels().as_ptr(), first);
        assert_eq!(chain.back().pixels().as_ptr(), first);
    }
}
