//! Column sweep with frustum propagation.
//!
//! Walks outward one column at a time. Every column carries a list of
//! frustums (pairs of rays from the origin); each frustum lights the cells
//! whose centers it covers, gets its bounding rays pinned against any opaque
//! cells on its edges, and is split wherever occupancy changes inside it.
//! The resulting rays seed the next column, so in the common case each cell
//! is visited once.
//!
//! All intersection math is done in half-pixel units (coordinates doubled)
//! so that crossings with cell centers and cell edges stay exact integers.
//! Column `c` spans `[2c - 1, 2c + 1]` in these units.

use log::trace;

use crate::error::FovError;
use crate::fov::octant::Footprint;
use crate::fov::rays::RayList;
use crate::grid::{FULL_BRIGHT, Grid, Lightmap, Point};

/// Half-pixel row where `ray` crosses the half-pixel column `x2`.
///
/// Rays always point into the octant (`ray.x > 0`), so truncating division
/// is well defined and symmetric across octants.
#[inline]
fn row_at(ray: Point, x2: i32) -> i32 {
    debug_assert!(ray.x > 0, "ray {ray} does not point into the octant");
    x2 * ray.y / ray.x
}

/// Run the sweep for one octant, lighting visible cells with `FULL_BRIGHT`.
///
/// The origin must be transparent and every cell the sweep reads or writes
/// lies inside `footprint`, which is clipped to the grid.
pub fn sweep_columns(
    grid: &Grid,
    footprint: &Footprint,
    lightmap: &mut Lightmap,
    ray_capacity: Option<usize>,
) -> Result<(), FovError> {
    let limit_y = footprint.limit_y;
    let mut current = RayList::seeded(ray_capacity);
    let mut next = RayList::new(ray_capacity);
    let mut peak_rays = current.len();

    for column in 0..=footprint.limit_x {
        let i2 = column << 1;
        let cell = |row: i32| footprint.cell(column, row);
        next.clear();

        for (top_ray, bottom_ray) in current.frustums() {
            let top_in = row_at(top_ray, i2 - 1);
            let mut top_out = row_at(top_ray, i2 + 1);
            let mut bottom_in = row_at(bottom_ray, i2 - 1);
            let bottom_out = row_at(bottom_ray, i2 + 1);

            // Cells whose centers sit inside the frustum for the whole column:
            // ceil of the top exit, floor of the bottom exit.
            let start = ((top_out + 1) >> 1).max(0);
            let end = ((bottom_out - 1) >> 1).min(limit_y);
            for row in start..=end {
                lightmap.set(cell(row), FULL_BRIGHT);
            }

            // Pin the top ray below any opaque cells it grazes. Cells that
            // force a correction are visible, so they get lit too.
            let top = if grid.is_clear(cell((top_in + 1) / 2)) && grid.is_clear(cell((top_out + 1) / 2)) {
                top_ray
            } else {
                let first = ((top_out + 1) / 2).max(0);
                let last = ((bottom_in + 1) / 2).min(limit_y);
                let mut row = first;
                while row <= last && grid.is_opaque(cell(row)) {
                    lightmap.set(cell(row), FULL_BRIGHT);
                    row += 1;
                }
                let pinned = Point::new(i2 - 1, 2 * row - 1);
                top_out = row_at(pinned, i2 + 1);
                pinned
            };

            // Same for the bottom ray, walking up toward the (pinned) top.
            let bottom = if grid.is_clear(cell((bottom_in + 1) / 2)) && grid.is_clear(cell((bottom_out + 1) / 2)) {
                bottom_ray
            } else {
                let first = ((top_out + 1) / 2).max(0);
                let last = ((bottom_in + 1) / 2).min(limit_y);
                let mut row = last;
                while row >= first && grid.is_opaque(cell(row)) {
                    lightmap.set(cell(row), FULL_BRIGHT);
                    row -= 1;
                }
                let pinned = Point::new(i2 + 1, 2 * row + 1);
                bottom_in = row_at(pinned, i2 - 1);
                pinned
            };

            // zero-area frustum, nothing left to carry
            if top.perp_dot(bottom) <= 0 {
                continue;
            }

            next.push(top)?;

            // Split at every occupancy change between the bounds. A ray into
            // an opaque run grazes the cell's near corner, a ray out of one
            // grazes its far corner.
            let first = ((top_out + 1) / 2).max(0);
            let last = ((bottom_in + 1) / 2).min(limit_y);
            if first <= last {
                let mut prev = grid.is_opaque(cell(first));
                for row in first + 1..=last {
                    let opaque = grid.is_opaque(cell(row));
                    if opaque != prev {
                        let x2 = if opaque { i2 + 1 } else { i2 - 1 };
                        next.push(Point::new(x2, 2 * row - 1))?;
                    }
                    prev = opaque;
                }
            }

            next.push(bottom)?;
        }

        peak_rays = peak_rays.max(next.len());
        std::mem::swap(&mut current, &mut next);
    }

    trace!(
        "sweep: origin {} limits {}x{}, {} frustums left, peak {} rays",
        footprint.origin,
        footprint.limit_x,
        footprint.limit_y,
        current.len() / 2,
        peak_rays
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fov::octant::Octant;

    fn sweep(grid: &Grid, origin: Point, octant: usize, radius: i32) -> Lightmap {
        let mut lightmap = Lightmap::for_grid(grid);
        let fp = Footprint::new(grid, origin, Octant::new(octant).unwrap().frame(), radius);
        sweep_columns(grid, &fp, &mut lightmap, None).unwrap();
        lightmap
    }

    #[test]
    fn test_row_at_truncates() {
        assert_eq!(row_at(Point::new(1, 1), 5), 5);
        assert_eq!(row_at(Point::new(3, 1), 5), 1);
        assert_eq!(row_at(Point::new(3, 1), -1), 0);
        assert_eq!(row_at(Point::new(1, 0), 9), 0);
    }

    #[test]
    fn test_open_octant_lights_full_wedge() {
        let grid = Grid::new(20, 20);
        let origin = Point::new(5, 5);
        let lightmap = sweep(&grid, origin, 0, 8);

        for column in 0..=8 {
            for row in 0..=8 {
                let p = origin + Point::new(column, row);
                let expected = row <= column;
                assert_eq!(
                    lightmap.value(p) == FULL_BRIGHT,
                    expected,
                    "column {column} row {row}"
                );
            }
        }
    }

    #[test]
    fn test_sweep_stays_inside_footprint() {
        let grid = Grid::new(12, 12);
        let origin = Point::new(6, 6);
        for octant in Octant::all() {
            let lightmap = sweep(&grid, origin, octant.index(), 4);
            let fp = Footprint::new(&grid, origin, octant.frame(), 4);
            let inside: Vec<Point> = fp.cells().collect();
            for y in 0..12 {
                for x in 0..12 {
                    let p = Point::new(x, y);
                    if lightmap.value(p) != 0 {
                        assert!(inside.contains(&p), "octant {} lit {p} outside its footprint", octant.index());
                    }
                }
            }
        }
    }

    #[test]
    fn test_wall_on_axis_casts_shadow() {
        let mut grid = Grid::new(15, 15);
        grid.set(7, 5, true);
        let lightmap = sweep(&grid, Point::new(5, 5), 0, 8);

        assert_eq!(lightmap.value(Point::new(6, 5)), FULL_BRIGHT);
        assert_eq!(lightmap.value(Point::new(7, 5)), FULL_BRIGHT, "occluder itself is seen");
        for x in 8..15 {
            assert_eq!(lightmap.value(Point::new(x, 5)), 0, "({x}, 5) should be in shadow");
        }
        assert_eq!(lightmap.value(Point::new(10, 8)), FULL_BRIGHT, "diagonal stays visible");
    }

    #[test]
    fn test_ray_cap_is_enforced() {
        // alternating wall column splits the wedge into several frustums
        let grid = Grid::from_fn(21, 21, |x, y| x == 6 && y % 2 == 0);
        let origin = Point::new(2, 10);
        let fp = Footprint::new(&grid, origin, Octant::new(0).unwrap().frame(), 20);

        let mut lightmap = Lightmap::for_grid(&grid);
        assert_eq!(
            sweep_columns(&grid, &fp, &mut lightmap, Some(2)),
            Err(FovError::RayCapacityExceeded { capacity: 2 })
        );

        let mut capped = Lightmap::for_grid(&grid);
        sweep_columns(&grid, &fp, &mut capped, Some(4)).unwrap();
        assert_eq!(capped, sweep(&grid, origin, 0, 20), "a sufficient cap must not change the result");
    }
}
