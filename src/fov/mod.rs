//! Field of view on an occupancy grid
//!
//! Symmetric shadow casting: each of the eight octants is swept outward
//! column by column, carrying frustums instead of tracing a line per cell.
//! Optional passes then attenuate by distance, clip to the radius and hide
//! walls.

pub mod octant;
pub mod passes;
pub mod rays;
pub mod sweep;

use log::debug;
use rayon::prelude::*;

use crate::error::FovError;
use crate::grid::{FULL_BRIGHT, Grid, Lightmap, Point};

pub use octant::{Footprint, Octant};

/// Radius and pass selection for one field-of-view computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FovConfig {
    /// Maximum distance in cells. Must be non-negative.
    pub radius: i32,
    /// Leave lit cells at full intensity instead of fading with distance.
    pub skip_attenuation: bool,
    /// Without attenuation, also keep lit cells past the radius circle.
    pub skip_radius_clamp: bool,
    /// Never show occluding cells as lit.
    pub dark_walls: bool,
}

impl Default for FovConfig {
    fn default() -> Self {
        FovConfig {
            radius: 16,
            skip_attenuation: false,
            skip_radius_clamp: false,
            dark_walls: false,
        }
    }
}

impl FovConfig {
    pub fn with_radius(radius: i32) -> Self {
        FovConfig {
            radius,
            ..Self::default()
        }
    }
}

/// Trait for field-of-view algorithms.
///
/// Implementations compute which cells of an occupancy grid are visible from
/// a single observer cell.
pub trait FieldOfView {
    /// Calculate the full 360° field of view from `origin`.
    ///
    /// # Arguments
    /// * `grid` - occupancy grid (opaque / transparent per cell)
    /// * `origin` - observer cell
    /// * `lightmap` - output buffer, same size as `grid`; overwritten
    ///
    /// # Returns
    /// An error if the configuration or the buffers are unusable.
    fn compute(&self, grid: &Grid, origin: Point, lightmap: &mut Lightmap) -> Result<(), FovError>;
}

/// Shadow-casting rasterizer.
#[derive(Debug, Clone, Default)]
pub struct ShadowCaster {
    pub config: FovConfig,
    /// Hard cap on rays per column. `None` lets the ray list grow.
    pub ray_capacity: Option<usize>,
}

impl ShadowCaster {
    pub fn new(config: FovConfig) -> Self {
        ShadowCaster {
            config,
            ray_capacity: None,
        }
    }

    /// Fail with `RayCapacityExceeded` instead of growing past `capacity`
    /// rays in a column.
    pub fn with_ray_capacity(mut self, capacity: usize) -> Self {
        self.ray_capacity = Some(capacity.max(rays::MIN_RAY_CAPACITY));
        self
    }

    fn validate(&self, grid: &Grid, lightmap: &Lightmap) -> Result<(), FovError> {
        if self.config.radius < 0 {
            return Err(FovError::DegenerateRadius(self.config.radius));
        }
        if grid.is_empty() {
            return Err(FovError::EmptyGrid);
        }
        let grid_dims = (grid.width(), grid.height());
        if lightmap.dimensions() != grid_dims {
            return Err(FovError::DimensionMismatch {
                grid: grid_dims,
                lightmap: lightmap.dimensions(),
            });
        }
        Ok(())
    }

    /// Rasterize one octant into `lightmap`.
    ///
    /// Only cells inside the octant's footprint are written; the lightmap is
    /// not cleared first. An origin off the grid is moved to the nearest cell.
    pub fn rasterize_octant(
        &self,
        grid: &Grid,
        origin: Point,
        octant: Octant,
        lightmap: &mut Lightmap,
    ) -> Result<(), FovError> {
        self.validate(grid, lightmap)?;

        let clamped = grid.clamp(origin);
        if clamped != origin {
            debug!("origin {origin} is off the grid, using {clamped}");
        }

        // observer inside a wall sees only the wall
        if grid.is_opaque(clamped) {
            debug!("origin {clamped} is opaque, octant {} lights only the origin", octant.index());
            lightmap.set(clamped, FULL_BRIGHT);
            return Ok(());
        }

        let footprint = Footprint::new(grid, clamped, octant.frame(), self.config.radius);
        sweep::sweep_columns(grid, &footprint, lightmap, self.ray_capacity)?;
        passes::apply(grid, lightmap, &footprint, &self.config);
        Ok(())
    }

    /// Full field of view with the eight octants spread over the rayon pool.
    ///
    /// Each octant renders into its own lightmap and the results are merged
    /// with a per-cell max, which gives the same lightmap as `compute`.
    pub fn compute_parallel(&self, grid: &Grid, origin: Point) -> Result<Lightmap, FovError> {
        let octants: Vec<Octant> = Octant::all().collect();
        let partials = octants
            .par_iter()
            .map(|&octant| {
                let mut lightmap = Lightmap::for_grid(grid);
                self.rasterize_octant(grid, origin, octant, &mut lightmap)?;
                Ok(lightmap)
            })
            .collect::<Result<Vec<_>, FovError>>()?;

        let mut lightmap = Lightmap::for_grid(grid);
        for partial in &partials {
            lightmap.merge_max(partial);
        }
        Ok(lightmap)
    }
}

impl FieldOfView for ShadowCaster {
    fn compute(&self, grid: &Grid, origin: Point, lightmap: &mut Lightmap) -> Result<(), FovError> {
        self.validate(grid, lightmap)?;
        lightmap.clear();
        for octant in Octant::all() {
            self.rasterize_octant(grid, origin, octant, lightmap)?;
        }
        Ok(())
    }
}

/// Rasterize a single octant (`0..=7`) of the field of view from `origin`.
///
/// Call once per octant on a cleared lightmap to build the full circle.
/// Cells on the boundary between two octants may be written by both; the
/// result does not depend on call order.
pub fn rasterize_fov_octant(
    grid: &Grid,
    origin: Point,
    octant: usize,
    config: &FovConfig,
    lightmap: &mut Lightmap,
) -> Result<(), FovError> {
    let octant = Octant::new(octant)?;
    ShadowCaster::new(*config).rasterize_octant(grid, origin, octant, lightmap)
}
