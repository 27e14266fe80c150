//! softraster: a software triangle rasterizer
//!
//! Draws a spinning mesh with no GPU involvement:
//! - Edge-function coverage, strict single-winding rule
//! - Screen-space (affine) attribute interpolation
//! - Packed 32-bit depth buffer
//! - Programmable vertex/fragment stages
//! - Double-buffered presentation through a macroquad texture

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod logging;
mod mesh;
mod rasterizer;
mod scene;

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::OnceLock;

use clap::Parser;
use config::{load_config, save_config, ConfigError, RenderConfig};
use macroquad::prelude::{
    clear_background, draw_text, draw_texture, get_frame_time, next_frame, screen_height,
    screen_width, Conf, FilterMode, Texture2D, BLACK, WHITE,
};
use mesh::{load_obj, Mesh};
use rasterizer::Swapchain;
use scene::render_frame;

#[derive(Parser, Debug)]
#[command(version, about = "Software triangle rasterizer")]
struct Args {
    /// RON config file (defaults are used when it does not exist)
    #[arg(default_value = "softraster.ron")]
    config: PathBuf,

    /// OBJ model to draw, overriding the config
    #[arg(long)]
    model: Option<PathBuf>,

    /// Render a single frame to this PNG file and exit
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write the effective config back to the config path
    #[arg(long, default_value_t = false)]
    write_config: bool,
}

struct Settings {
    args: Args,
    config: RenderConfig,
}

/// Parsed once, before the window opens (window_conf needs the size)
fn settings() -> &'static Settings {
    static SETTINGS: OnceLock<Settings> = OnceLock::new();
    SETTINGS.get_or_init(|| {
        let args = Args::parse();
        let loaded = load_config(&args.config);
        let mut config = loaded.as_ref().cloned().unwrap_or_default();
        logging::init_logging(config.log_filter.as_deref());

        match loaded {
            Ok(_) => log::info!("Loaded config {}", args.config.display()),
            Err(ConfigError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", args.config.display());
            }
            Err(e) => log::warn!("Failed to load {}: {}, using defaults", args.config.display(), e),
        }

        if let Some(model) = &args.model {
            config.model_path = Some(model.clone());
        }

        Settings { args, config }
    })
}

fn window_conf() -> Conf {
    let config = &settings().config;
    Conf {
        window_title: format!("{} v{}", config.title, VERSION),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// Load the configured OBJ, falling back to the built-in cube
fn load_mesh(config: &RenderConfig) -> Mesh {
    let Some(path) = &config.model_path else {
        let cube = Mesh::cube();
        log::info!("No model configured, drawing built-in {}", cube.name);
        return cube;
    };
    match load_obj(path) {
        Ok(mesh) => {
            log::info!(
                "Loaded '{}' from {} ({} vertices, {} triangles)",
                mesh.name,
                path.display(),
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            mesh
        }
        Err(e) => {
            log::error!("Failed to load {}: {}, drawing built-in cube", path.display(), e);
            Mesh::cube()
        }
    }
}

/// Blit the front surface to the window
fn present(swapchain: &Swapchain, rgba: &mut Vec<u8>) {
    let front = swapchain.front();
    front.write_rgba8(rgba);
    let texture = Texture2D::from_rgba8(front.width() as u16, front.height() as u16, rgba);
    texture.set_filter(FilterMode::Nearest);
    draw_texture(&texture, 0.0, 0.0, WHITE);
}

#[macroquad::main(window_conf)]
async fn main() {
    let Settings { args, config } = settings();

    if args.write_config {
        match save_config(config, &args.config) {
            Ok(()) => log::info!("Wrote config to {}", args.config.display()),
            Err(e) => log::error!("Failed to write config: {}", e),
        }
    }

    let mesh = load_mesh(config);
    let mut swapchain = Swapchain::new(config.width as usize, config.height as usize);
    let mut rgba = Vec::new();
    let mut angle = 0.0f32;

    if let Some(path) = &args.snapshot {
        render_frame(&mut swapchain, &mesh, config, angle);
        match swapchain.front().to_image().save(path) {
            Ok(()) => log::info!("Saved snapshot to {}", path.display()),
            Err(e) => log::error!("Failed to save snapshot {}: {}", path.display(), e),
        }
        return;
    }

    log::info!("=== softraster v{} ===", VERSION);

    loop {
        let (w, h) = (screen_width() as usize, screen_height() as usize);

        // Minimized windows report a zero-sized surface
        if w > 0 && h > 0 {
            let dt = get_frame_time();
            swapchain.resize(w, h);
            angle += dt * config.spin_speed;
            render_frame(&mut swapchain, &mesh, config, angle);

            clear_background(WHITE);
            present(&swapchain, &mut rgba);
            if config.show_fps && dt > 0.0 {
                draw_text(&format!("FPS: {:.1}", 1.0 / dt), 4.0, 18.0, 20.0, BLACK);
            }
        }

        next_frame().await;
    }
}
