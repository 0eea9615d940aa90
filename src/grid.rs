//! Occupancy grid and lightmap buffers.
//!
//! Both buffers use a flat row-major layout (`index = y * width + x`) and
//! are addressed with integer `Point`s. Out-of-range coordinates are either
//! reported through `Option` (`get`) or treated as a caller bug (`is_opaque`,
//! `value`, `set`), which the sweep never triggers because every cell it
//! touches lies inside the octant footprint.

use glam::IVec2;

use crate::error::FovError;

/// Integer grid coordinate. Also used for ray directions in half-pixel units.
pub type Point = IVec2;

/// Full intensity of a lit cell.
pub const FULL_BRIGHT: u8 = 255;

/// Rectangular occupancy buffer: `true` = opaque, `false` = transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a fully transparent grid.
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Build a grid by asking `opaque(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut opaque: impl FnMut(usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(opaque(x, y));
            }
        }
        Grid { width, height, cells }
    }

    /// Build a grid from a byte buffer where any nonzero byte is opaque
    /// (the 0/255 convention used by bitmap-based callers).
    pub fn from_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, FovError> {
        if bytes.len() != width * height {
            return Err(FovError::BufferSize {
                expected: width * height,
                actual: bytes.len(),
            });
        }
        Ok(Grid {
            width,
            height,
            cells: bytes.iter().map(|&b| b != 0).collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Largest valid coordinate on both axes.
    pub fn max_cell(&self) -> Point {
        Point::new(self.width as i32 - 1, self.height as i32 - 1)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Nearest in-bounds cell to `p`. The grid must not be empty.
    pub fn clamp(&self, p: Point) -> Point {
        p.clamp(Point::ZERO, self.max_cell())
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        debug_assert!(self.contains(p), "cell {p} outside {}x{} grid", self.width, self.height);
        p.y as usize * self.width + p.x as usize
    }

    /// Occupancy of `p`, or `None` off the map.
    #[inline]
    pub fn get(&self, p: Point) -> Option<bool> {
        self.contains(p).then(|| self.cells[self.index(p)])
    }

    /// Occupancy of an in-bounds cell.
    #[inline]
    pub fn is_opaque(&self, p: Point) -> bool {
        self.cells[self.index(p)]
    }

    /// On the map and transparent.
    #[inline]
    pub fn is_clear(&self, p: Point) -> bool {
        self.get(p) == Some(false)
    }

    pub fn set(&mut self, x: usize, y: usize, opaque: bool) {
        let idx = y * self.width + x;
        self.cells[idx] = opaque;
    }

    pub fn toggle(&mut self, x: usize, y: usize) {
        let idx = y * self.width + x;
        self.cells[idx] = !self.cells[idx];
    }

    /// Make every cell transparent.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn opaque_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Per-cell lit intensity, same dimensions as the grid it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lightmap {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Lightmap {
    /// Create a dark lightmap.
    pub fn new(width: usize, height: usize) -> Self {
        Lightmap {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Dark lightmap sized to match `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    pub fn from_bytes(width: usize, height: usize, bytes: Vec<u8>) -> Result<Self, FovError> {
        if bytes.len() != width * height {
            return Err(FovError::BufferSize {
                expected: width * height,
                actual: bytes.len(),
            });
        }
        Ok(Lightmap {
            width,
            height,
            cells: bytes,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    #[inline]
    fn index(&self, p: Point) -> usize {
        debug_assert!(self.contains(p), "cell {p} outside {}x{} lightmap", self.width, self.height);
        p.y as usize * self.width + p.x as usize
    }

    pub fn get(&self, p: Point) -> Option<u8> {
        self.contains(p).then(|| self.cells[self.index(p)])
    }

    /// Intensity of an in-bounds cell.
    #[inline]
    pub fn value(&self, p: Point) -> u8 {
        self.cells[self.index(p)]
    }

    #[inline]
    pub fn set(&mut self, p: Point, value: u8) {
        let idx = self.index(p);
        self.cells[idx] = value;
    }

    /// Intensity at `(x, y)`; convenience for tests and rendering.
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.at(x, y) != 0
    }

    /// Darken every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Combine another lightmap into this one with a per-cell max.
    ///
    /// Order independent, so partial lightmaps from independent octants can
    /// be merged in any order.
    pub fn merge_max(&mut self, other: &Lightmap) {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        for (dst, &src) in self.cells.iter_mut().zip(other.cells.iter()) {
            *dst = (*dst).max(src);
        }
    }
}

/// Converts a lightmap to a formatted string for debugging
pub fn lightmap_to_string(lightmap: &Lightmap) -> String {
    let mut result = String::new();
    for y in 0..lightmap.height() {
        for x in 0..lightmap.width() {
            result.push_str(&format!("{:4}", lightmap.at(x, y)));
        }
        result.push('\n');
    }
    result
}

/// ASCII view of a grid and its lightmap: `#` lit wall, `%` dark wall,
/// `@` observer, `.` lit floor, ` ` dark floor.
pub fn fov_to_ascii(grid: &Grid, lightmap: &Lightmap, observer: Option<Point>) -> String {
    let mut result = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let p = Point::new(x as i32, y as i32);
            let lit = lightmap.is_lit(x, y);
            let ch = if observer == Some(p) {
                '@'
            } else {
                match (grid.is_opaque(p), lit) {
                    (true, true) => '#',
                    (true, false) => '%',
                    (false, true) => '.',
                    (false, false) => ' ',
                }
            };
            result.push(ch);
        }
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_accessors() {
        let mut grid = Grid::new(4, 3);
        grid.set(2, 1, true);

        assert_eq!(grid.get(Point::new(2, 1)), Some(true));
        assert_eq!(grid.get(Point::new(1, 1)), Some(false));
        assert_eq!(grid.get(Point::new(4, 0)), None);
        assert_eq!(grid.get(Point::new(0, -1)), None);
        assert!(!grid.is_clear(Point::new(2, 1)));
        assert!(!grid.is_clear(Point::new(-1, 0)), "off-map cells are never clear");

        grid.toggle(2, 1);
        assert_eq!(grid.opaque_count(), 0);
    }

    #[test]
    fn test_grid_from_bytes() {
        let grid = Grid::from_bytes(3, 2, &[0, 255, 0, 0, 0, 1]).unwrap();
        assert!(grid.is_opaque(Point::new(1, 0)));
        assert!(grid.is_opaque(Point::new(2, 1)));
        assert_eq!(grid.opaque_count(), 2);

        assert_eq!(
            Grid::from_bytes(3, 2, &[0; 5]),
            Err(FovError::BufferSize { expected: 6, actual: 5 })
        );
    }

    #[test]
    fn test_grid_clamp() {
        let grid = Grid::new(10, 6);
        assert_eq!(grid.clamp(Point::new(-3, 2)), Point::new(0, 2));
        assert_eq!(grid.clamp(Point::new(40, 40)), Point::new(9, 5));
    }

    #[test]
    fn test_lightmap_merge_max() {
        let mut a = Lightmap::from_bytes(2, 1, vec![10, 200]).unwrap();
        let b = Lightmap::from_bytes(2, 1, vec![50, 0]).unwrap();
        a.merge_max(&b);
        assert_eq!(a.as_slice(), &[50, 200]);
        assert_eq!(a.lit_count(), 2);
    }

    #[test]
    fn test_fov_to_ascii() {
        let mut grid = Grid::new(3, 1);
        grid.set(2, 0, true);
        let lightmap = Lightmap::from_bytes(3, 1, vec![255, 255, 255]).unwrap();
        assert_eq!(fov_to_ascii(&grid, &lightmap, Some(Point::new(0, 0))), "@.#\n");
    }
}
