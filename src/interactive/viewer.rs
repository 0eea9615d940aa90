//! Interactive field-of-view viewer - mouse controls the observer in real-time

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::fov::{FovConfig, ShadowCaster};
use crate::grid::{Grid, Lightmap, Point};
use crate::maze;
use crate::render::render_to_buffer;

/// Configuration for the interactive viewer
#[derive(Clone)]
pub struct ViewerConfig {
    /// Grid size (width x height in cells)
    pub grid_size: (usize, usize),
    /// Pixel scale factor (each cell = scale x scale pixels)
    pub scale: usize,
    /// Initial radius and passes
    pub fov: FovConfig,
    /// Seed for the first maze
    pub seed: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            grid_size: (200, 150),
            scale: 5,
            fov: FovConfig::with_radius(40),
            seed: 0,
        }
    }
}

/// Interactive viewer for the shadow caster
pub struct InteractiveViewer {
    config: ViewerConfig,
    grid: Grid,
    lightmap: Lightmap,
    rng: StdRng,
    window: Window,
    buffer: Vec<u32>,
}

impl InteractiveViewer {
    /// Create a new interactive viewer with the given configuration
    pub fn new(config: ViewerConfig) -> Result<Self, String> {
        let (grid_w, grid_h) = config.grid_size;
        let window_w = grid_w * config.scale;
        let window_h = grid_h * config.scale;

        let window = Window::new(
            "Grid Field of View (ESC to exit)",
            window_w,
            window_h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let grid = maze::generate(grid_w, grid_h, &mut rng);
        let lightmap = Lightmap::for_grid(&grid);
        let buffer = vec![0u32; window_w * window_h];

        Ok(Self {
            config,
            grid,
            lightmap,
            rng,
            window,
            buffer,
        })
    }

    /// Run the interactive viewer loop
    pub fn run(&mut self) -> Result<(), String> {
        let (grid_w, grid_h) = self.config.grid_size;
        let scale = self.config.scale;

        // ~30fps
        self.window.set_target_fps(30);

        let mut last_wall_pos: Option<(usize, usize)> = None;

        println!("=== Grid Field of View ===");
        println!("Controls:");
        println!("  Mouse      - Move observer");
        println!("  Left Click - Toggle wall");
        println!("  A          - Toggle attenuation");
        println!("  C          - Toggle radius clamp");
        println!("  D          - Toggle dark walls");
        println!("  +/-        - Adjust radius");
        println!("  N          - New maze");
        println!("  X          - Clear walls");
        println!("  ESC        - Exit");
        println!();

        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            self.handle_keys();

            if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Discard) {
                let grid_x = (mx as usize / scale).min(grid_w - 1);
                let grid_y = (my as usize / scale).min(grid_h - 1);

                // Only toggle once per cell while the button is held
                if self.window.get_mouse_down(MouseButton::Left) {
                    if last_wall_pos != Some((grid_x, grid_y)) {
                        self.grid.toggle(grid_x, grid_y);
                        last_wall_pos = Some((grid_x, grid_y));
                    }
                } else {
                    last_wall_pos = None;
                }

                self.render_fov(Point::new(grid_x as i32, grid_y as i32))?;
            }

            self.window
                .update_with_buffer(&self.buffer, grid_w * scale, grid_h * scale)
                .map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    fn handle_keys(&mut self) {
        let fov = &mut self.config.fov;

        if self.window.is_key_pressed(Key::A, KeyRepeat::No) {
            fov.skip_attenuation = !fov.skip_attenuation;
            println!("Attenuation: {}", on_off(!fov.skip_attenuation));
        }
        if self.window.is_key_pressed(Key::C, KeyRepeat::No) {
            fov.skip_radius_clamp = !fov.skip_radius_clamp;
            println!("Radius clamp: {}", on_off(!fov.skip_radius_clamp));
        }
        if self.window.is_key_pressed(Key::D, KeyRepeat::No) {
            fov.dark_walls = !fov.dark_walls;
            println!("Dark walls: {}", on_off(fov.dark_walls));
        }

        // Radius adjustment
        if self.window.is_key_pressed(Key::Equal, KeyRepeat::Yes)
            || self.window.is_key_pressed(Key::NumPadPlus, KeyRepeat::Yes)
        {
            fov.radius = (fov.radius + 2).min(400);
            println!("Radius: {}", fov.radius);
        }
        if self.window.is_key_pressed(Key::Minus, KeyRepeat::Yes)
            || self.window.is_key_pressed(Key::NumPadMinus, KeyRepeat::Yes)
        {
            fov.radius = (fov.radius - 2).max(0);
            println!("Radius: {}", fov.radius);
        }

        if self.window.is_key_pressed(Key::N, KeyRepeat::No) {
            let (grid_w, grid_h) = self.config.grid_size;
            self.grid = maze::generate(grid_w, grid_h, &mut self.rng);
            println!("New maze ({} walls)", self.grid.opaque_count());
        }
        if self.window.is_key_pressed(Key::X, KeyRepeat::No) {
            self.grid.clear();
            println!("Walls cleared");
        }
    }

    /// Recompute the field of view from `observer` and draw it
    fn render_fov(&mut self, observer: Point) -> Result<(), String> {
        let caster = ShadowCaster::new(self.config.fov);
        self.lightmap = caster.compute_parallel(&self.grid, observer).map_err(|e| e.to_string())?;
        render_to_buffer(&self.grid, &self.lightmap, self.config.scale, &mut self.buffer);
        Ok(())
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "ON" } else { "OFF" }
}
