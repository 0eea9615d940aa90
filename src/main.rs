mod error;
mod fov;
mod grid;
mod interactive;
mod maze;
mod render;


use std::path::PathBuf;

use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

// Re-export public API
pub use error::FovError;
pub use fov::{FieldOfView, FovConfig, Octant, ShadowCaster, rasterize_fov_octant};
pub use grid::{FULL_BRIGHT, Grid, Lightmap, Point, fov_to_ascii, lightmap_to_string};
pub use interactive::{InteractiveViewer, ViewerConfig};
pub use render::{render_to_buffer, save_ppm};

/// Grid field of view: symmetric shadow casting on an occupancy grid
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Open the minifb viewer
    #[arg(long)]
    interactive: bool,

    /// Time sequential vs. parallel octants
    #[arg(long)]
    benchmark: bool,

    /// View radius in cells [default: 12, 40 in the viewer]
    #[arg(long)]
    radius: Option<i32>,

    /// Maze seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 64)]
    width: usize,

    #[arg(long, default_value_t = 32)]
    height: usize,

    /// Hide occluding cells
    #[arg(long)]
    dark_walls: bool,

    /// Keep lit cells at full intensity
    #[arg(long)]
    no_attenuation: bool,

    /// Without attenuation, keep cells past the radius
    #[arg(long)]
    no_clamp: bool,

    /// Also write the preview to a PPM image
    #[arg(long)]
    ppm: Option<PathBuf>,
}

impl Cli {
    fn fov_config(&self, default_radius: i32) -> FovConfig {
        FovConfig {
            radius: self.radius.unwrap_or(default_radius),
            skip_attenuation: self.no_attenuation,
            skip_radius_clamp: self.no_clamp,
            dark_walls: self.dark_walls,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.interactive {
        run_interactive(&cli);
    } else if cli.benchmark {
        run_benchmark(&cli);
    } else if let Err(e) = run_preview(&cli) {
        eprintln!("Error: {}", e);
    }
}

/// Open transparent cell nearest to `target`, scanning outward ring by ring.
fn nearest_open_cell(grid: &Grid, target: Point) -> Option<Point> {
    let max_ring = grid.width().max(grid.height()) as i32;
    (0..=max_ring).find_map(|ring| {
        (-ring..=ring)
            .flat_map(|dy| (-ring..=ring).map(move |dx| Point::new(dx, dy)))
            .filter(|d| d.x.abs() == ring || d.y.abs() == ring)
            .map(|d| target + d)
            .find(|&p| grid.is_clear(p))
    })
}

fn run_preview(cli: &Cli) -> Result<(), String> {
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let grid = maze::generate(cli.width, cli.height, &mut rng);
    let center = Point::new(cli.width as i32 / 2, cli.height as i32 / 2);
    let observer = nearest_open_cell(&grid, center).ok_or("maze has no open cell")?;
    info!("observer at {observer}, {} walls", grid.opaque_count());

    let config = cli.fov_config(12);
    let caster = ShadowCaster::new(config);
    let mut lightmap = Lightmap::for_grid(&grid);
    caster.compute(&grid, observer, &mut lightmap).map_err(|e| e.to_string())?;

    println!("Grid Field of View ({}x{}, radius {})", cli.width, cli.height, config.radius);
    println!("{}", fov_to_ascii(&grid, &lightmap, Some(observer)));
    println!("{} cells visible", lightmap.lit_count());

    if let Some(path) = &cli.ppm {
        save_ppm(&grid, &lightmap, path, 8).map_err(|e| e.to_string())?;
        println!("Saved {}", path.display());
    }
    println!("Run with --interactive for minifb viewer");
    println!("Run with --benchmark to test performance");
    Ok(())
}

fn run_benchmark(cli: &Cli) {
    use std::time::Instant;

    println!("=== Shadow Casting Benchmark ===\n");

    // Test parameters
    let sizes = [(50, 50), (100, 100), (200, 150), (400, 300)];
    let iterations = 50;

    for (width, height) in sizes {
        println!("Grid size: {}x{}", width, height);
        println!("-----------------------");

        let mut rng = StdRng::seed_from_u64(cli.seed);
        let grid = maze::generate(width, height, &mut rng);
        let center = Point::new(width as i32 / 2, height as i32 / 2);
        let Some(observer) = nearest_open_cell(&grid, center) else {
            println!("  no open cell, skipped\n");
            continue;
        };

        let caster = ShadowCaster::new(cli.fov_config(width.max(height) as i32));

        // Sequential octants into one lightmap
        let mut lightmap = Lightmap::for_grid(&grid);
        let start = Instant::now();
        for _ in 0..iterations {
            if let Err(e) = caster.compute(&grid, observer, &mut lightmap) {
                eprintln!("Error: {}", e);
                return;
            }
        }
        let avg_sequential_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

        // Parallel octants with rayon + max merge
        let start = Instant::now();
        for _ in 0..iterations {
            if let Err(e) = caster.compute_parallel(&grid, observer) {
                eprintln!("Error: {}", e);
                return;
            }
        }
        let avg_parallel_ms = start.elapsed().as_secs_f64() * 1000.0 / iterations as f64;

        let speedup = avg_sequential_ms / avg_parallel_ms;

        println!("  Visible cells: {}", lightmap.lit_count());
        println!("  Sequential: {:.3} ms/iter", avg_sequential_ms);
        println!("  Parallel:   {:.3} ms/iter", avg_parallel_ms);
        println!("  Speedup: {:.2}x", speedup);
        println!();
    }
}

fn run_interactive(cli: &Cli) {
    let config = ViewerConfig {
        fov: cli.fov_config(40),
        seed: cli.seed,
        ..ViewerConfig::default()
    };

    match InteractiveViewer::new(config) {
        Ok(mut viewer) => {
            if let Err(e) = viewer.run() {
                eprintln!("Error: {}", e);
            }
        }
        Err(e) => {
            eprintln!("Failed to create viewer: {}", e);
        }
    }
}
