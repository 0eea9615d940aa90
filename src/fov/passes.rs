//! Post-processing passes over an octant's bounding rectangle.
//!
//! Every pass only looks at cell position, current intensity and occupancy,
//! so running it again (or from a neighbouring octant that shares the
//! rectangle) is harmless.

use crate::fov::FovConfig;
use crate::fov::octant::Footprint;
use crate::grid::{FULL_BRIGHT, Grid, Lightmap, Point};

#[inline]
fn distance_sq(a: Point, b: Point) -> i64 {
    let d = (a - b).as_i64vec2();
    d.length_squared()
}

/// Intensity of a lit cell at squared distance `dsq` from the origin.
///
/// Falls off quadratically from 255 at the origin to 0 at `radius`.
/// A zero radius only keeps the origin itself.
pub fn falloff(dsq: i64, radius: i32) -> u8 {
    let rsq = i64::from(radius) * i64::from(radius);
    if rsq == 0 {
        return if dsq == 0 { FULL_BRIGHT } else { 0 };
    }
    let full = i64::from(FULL_BRIGHT);
    (full - (dsq * full / rsq).min(full)) as u8
}

/// Replace every lit cell with its distance falloff.
pub fn attenuate(lightmap: &mut Lightmap, footprint: &Footprint, radius: i32) {
    for p in footprint.cells() {
        let value = if lightmap.value(p) != 0 {
            falloff(distance_sq(p, footprint.origin), radius)
        } else {
            0
        };
        lightmap.set(p, value);
    }
}

/// Darken everything strictly outside the radius.
pub fn clamp_to_radius(lightmap: &mut Lightmap, footprint: &Footprint, radius: i32) {
    let rsq = i64::from(radius) * i64::from(radius);
    for p in footprint.cells() {
        if distance_sq(p, footprint.origin) > rsq {
            lightmap.set(p, 0);
        }
    }
}

/// Darken every opaque cell.
pub fn darken_walls(grid: &Grid, lightmap: &mut Lightmap, footprint: &Footprint) {
    for p in footprint.cells() {
        if grid.is_opaque(p) {
            lightmap.set(p, 0);
        }
    }
}

/// Apply the passes selected by `config`. The radius clamp is implied by
/// attenuation, so it only runs when attenuation is skipped.
pub fn apply(grid: &Grid, lightmap: &mut Lightmap, footprint: &Footprint, config: &FovConfig) {
    if !config.skip_attenuation {
        attenuate(lightmap, footprint, config.radius);
    } else if !config.skip_radius_clamp {
        clamp_to_radius(lightmap, footprint, config.radius);
    }

    if config.dark_walls {
        darken_walls(grid, lightmap, footprint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fov::octant::Octant;

    fn lit_footprint(size: usize, origin: Point, radius: i32) -> (Grid, Lightmap, Footprint) {
        let grid = Grid::new(size, size);
        let mut lightmap = Lightmap::for_grid(&grid);
        let fp = Footprint::new(&grid, origin, Octant::new(0).unwrap().frame(), radius);
        for p in fp.cells() {
            lightmap.set(p, FULL_BRIGHT);
        }
        (grid, lightmap, fp)
    }

    #[test]
    fn test_falloff_curve() {
        assert_eq!(falloff(0, 6), 255);
        assert_eq!(falloff(1, 6), 248);
        assert_eq!(falloff(36, 6), 0);
        assert_eq!(falloff(50, 6), 0);
        assert_eq!(falloff(0, 0), 255);
        assert_eq!(falloff(1, 0), 0);
    }

    #[test]
    fn test_attenuate_keeps_dark_cells_dark() {
        let (_, mut lightmap, fp) = lit_footprint(10, Point::new(2, 2), 5);
        lightmap.set(Point::new(3, 2), 0);
        attenuate(&mut lightmap, &fp, 5);

        assert_eq!(lightmap.value(Point::new(2, 2)), 255);
        assert_eq!(lightmap.value(Point::new(3, 2)), 0);
        assert_eq!(lightmap.value(Point::new(4, 2)), 215);
    }

    #[test]
    fn test_attenuate_is_idempotent() {
        let (_, mut lightmap, fp) = lit_footprint(10, Point::new(1, 1), 6);
        attenuate(&mut lightmap, &fp, 6);
        let once = lightmap.clone();
        attenuate(&mut lightmap, &fp, 6);
        assert_eq!(lightmap, once);
    }

    #[test]
    fn test_clamp_to_radius() {
        let (_, mut lightmap, fp) = lit_footprint(10, Point::new(0, 0), 3);
        clamp_to_radius(&mut lightmap, &fp, 3);

        assert_eq!(lightmap.value(Point::new(3, 0)), 255, "on the radius stays lit");
        assert_eq!(lightmap.value(Point::new(2, 2)), 255);
        assert_eq!(lightmap.value(Point::new(3, 1)), 0);
        assert_eq!(lightmap.value(Point::new(3, 3)), 0);
    }

    #[test]
    fn test_darken_walls() {
        let (mut grid, mut lightmap, fp) = lit_footprint(6, Point::new(0, 0), 5);
        grid.set(2, 3, true);
        darken_walls(&grid, &mut lightmap, &fp);
        assert_eq!(lightmap.value(Point::new(2, 3)), 0);
        assert_eq!(lightmap.value(Point::new(2, 2)), 255);
    }

    #[test]
    fn test_apply_with_no_passes_selected() {
        let (grid, mut lightmap, fp) = lit_footprint(10, Point::new(0, 0), 2);
        let config = FovConfig {
            radius: 2,
            skip_attenuation: true,
            skip_radius_clamp: true,
            dark_walls: false,
        };
        apply(&grid, &mut lightmap, &fp, &config);
        assert_eq!(lightmap.lit_count(), 9, "no pass selected, nothing changes");
    }
}
