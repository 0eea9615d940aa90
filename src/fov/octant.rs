//! Octant frames and footprints.
//!
//! Each octant is handled by the same sweep through a change of basis: the
//! `column` axis steps outward from the origin and the `row` axis steps
//! across the wedge. Iterating all eight frames covers the full circle.

use crate::error::FovError;
use crate::grid::{Grid, Point};

/// `(column, row)` unit axes per octant. Pairs are coupled; do not reorder
/// one side without the other.
const BASES: [(Point, Point); 8] = [
    (Point::new(1, 0), Point::new(0, 1)),
    (Point::new(1, 0), Point::new(0, -1)),
    (Point::new(-1, 0), Point::new(0, -1)),
    (Point::new(-1, 0), Point::new(0, 1)),
    (Point::new(0, 1), Point::new(-1, 0)),
    (Point::new(0, 1), Point::new(1, 0)),
    (Point::new(0, -1), Point::new(1, 0)),
    (Point::new(0, -1), Point::new(-1, 0)),
];

/// One of the eight 45° wedges around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Octant(u8);

impl Octant {
    pub const COUNT: usize = 8;

    pub fn new(index: usize) -> Result<Self, FovError> {
        if index < Self::COUNT {
            Ok(Octant(index as u8))
        } else {
            Err(FovError::InvalidOctant(index))
        }
    }

    /// All eight octants in sweep order.
    pub fn all() -> impl Iterator<Item = Octant> {
        (0..Self::COUNT as u8).map(Octant)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn frame(self) -> Frame {
        let (column, row) = BASES[self.index()];
        Frame { column, row }
    }
}

impl TryFrom<usize> for Octant {
    type Error = FovError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Octant::new(index)
    }
}

/// Orthogonal unit axes of an octant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// e0: outward, one step per column.
    pub column: Point,
    /// e1: across the wedge, one step per row.
    pub row: Point,
}

/// The rectangle `[0, limit_x] × [0, limit_y]` (octant-local) that one
/// octant call may read and write, clipped to both the grid and the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub origin: Point,
    pub frame: Frame,
    pub limit_x: i32,
    pub limit_y: i32,
}

impl Footprint {
    /// `origin` must be inside the grid.
    pub fn new(grid: &Grid, origin: Point, frame: Frame, radius: i32) -> Self {
        let max = grid.max_cell();
        // distance from the origin to the map edge along a unit axis
        let reach = |axis: Point| {
            if axis.x + axis.y < 0 {
                (-origin).dot(axis)
            } else {
                (max - origin).dot(axis)
            }
        };
        Footprint {
            origin,
            frame,
            limit_x: radius.min(reach(frame.column)).max(0),
            limit_y: radius.min(reach(frame.row)).max(0),
        }
    }

    /// Grid coordinate of octant-local `(column, row)`.
    #[inline]
    pub fn cell(&self, column: i32, row: i32) -> Point {
        self.origin + self.frame.column * column + self.frame.row * row
    }

    /// Every cell of the bounding rectangle, column-major.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..=self.limit_x).flat_map(move |column| (0..=self.limit_y).map(move |row| self.cell(column, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octant_range() {
        assert!(Octant::new(0).is_ok());
        assert!(Octant::new(7).is_ok());
        assert_eq!(Octant::new(8), Err(FovError::InvalidOctant(8)));
        assert_eq!(Octant::try_from(15usize), Err(FovError::InvalidOctant(15)));
        assert_eq!(Octant::all().count(), 8);
    }

    #[test]
    fn test_frames_are_orthogonal_units() {
        for octant in Octant::all() {
            let f = octant.frame();
            assert_eq!(f.column.length_squared(), 1);
            assert_eq!(f.row.length_squared(), 1);
            assert_eq!(f.column.dot(f.row), 0, "octant {} axes not orthogonal", octant.index());
        }
    }

    #[test]
    fn test_frames_cover_every_wedge() {
        // The diagonal-ish direction column + row/2 lands in a distinct
        // eighth of the plane for each octant.
        let mut seen = Vec::new();
        for octant in Octant::all() {
            let f = octant.frame();
            let probe = f.column * 2 + f.row;
            assert!(!seen.contains(&probe), "octant {} duplicates a wedge", octant.index());
            seen.push(probe);
        }
    }

    #[test]
    fn test_footprint_limits_clip_to_grid_and_radius() {
        let grid = Grid::new(10, 8);
        let origin = Point::new(2, 5);

        let fp = Footprint::new(&grid, origin, Octant::new(0).unwrap().frame(), 100);
        assert_eq!((fp.limit_x, fp.limit_y), (7, 2));

        let fp = Footprint::new(&grid, origin, Octant::new(2).unwrap().frame(), 100);
        assert_eq!((fp.limit_x, fp.limit_y), (2, 5));

        let fp = Footprint::new(&grid, origin, Octant::new(0).unwrap().frame(), 3);
        assert_eq!((fp.limit_x, fp.limit_y), (3, 2));
    }

    #[test]
    fn test_footprint_on_grid_edge_is_non_negative() {
        let grid = Grid::new(5, 5);
        for octant in Octant::all() {
            let fp = Footprint::new(&grid, Point::ZERO, octant.frame(), 4);
            assert!(fp.limit_x >= 0 && fp.limit_y >= 0);
            assert!(fp.cells().all(|p| grid.contains(p)), "octant {} leaves the grid", octant.index());
        }
    }
}
