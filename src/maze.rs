//! Random demo mazes built by stamping rectangles.
//!
//! Scatter single wall cells, stamp a batch of opaque rectangles, then carve
//! half as many transparent rectangles back out to open up passages.

use rand::Rng;

use crate::grid::Grid;

/// Set every cell of the rectangle `[rx, rx + rw] × [ry, ry + rh]` (inclusive,
/// clipped to the grid) to `opaque`.
pub fn fill_rect(grid: &mut Grid, rx: i32, ry: i32, rw: i32, rh: i32, opaque: bool) {
    if grid.is_empty() {
        return;
    }
    let max_x = grid.width() as i32 - 1;
    let max_y = grid.height() as i32 - 1;
    let (min_x, end_x) = (rx.clamp(0, max_x), (rx + rw).clamp(0, max_x));
    let (min_y, end_y) = (ry.clamp(0, max_y), (ry + rh).clamp(0, max_y));
    for y in min_y..=end_y {
        for x in min_x..=end_x {
            grid.set(x as usize, y as usize, opaque);
        }
    }
}

fn random_rect(rng: &mut impl Rng, width: usize, height: usize, min_side: i32, max_side: i32) -> (i32, i32, i32, i32) {
    (
        rng.random_range(0..width as i32),
        rng.random_range(0..height as i32),
        rng.random_range(min_side..max_side),
        rng.random_range(min_side..max_side),
    )
}

/// Generate a `width × height` maze.
pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::new(width, height);
    if grid.is_empty() {
        return grid;
    }

    let area = width * height;
    let num_pixels = area / 100;
    let num_rects = area / 50;
    let min_side = (width.min(height) / 64).max(1) as i32;
    let max_side = min_side * 8;

    for _ in 0..num_pixels {
        let x = rng.random_range(0..width);
        let y = rng.random_range(0..height);
        grid.set(x, y, true);
    }

    for _ in 0..num_rects {
        let (rx, ry, rw, rh) = random_rect(rng, width, height, min_side, max_side);
        fill_rect(&mut grid, rx, ry, rw, rh, true);
    }
    for _ in 0..num_rects / 2 {
        let (rx, ry, rw, rh) = random_rect(rng, width, height, min_side, max_side);
        fill_rect(&mut grid, rx, ry, rw, rh, false);
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fill_rect_clips_to_grid() {
        let mut grid = Grid::new(5, 4);
        fill_rect(&mut grid, 3, 2, 10, 10, true);
        // x 3..=4, y 2..=3
        assert_eq!(grid.opaque_count(), 4);

        fill_rect(&mut grid, -5, -5, 6, 6, true);
        // x 0..=1, y 0..=1
        assert_eq!(grid.opaque_count(), 8);
    }

    #[test]
    fn test_fill_rect_is_inclusive() {
        let mut grid = Grid::new(8, 8);
        fill_rect(&mut grid, 1, 1, 2, 1, true);
        assert_eq!(grid.opaque_count(), 3 * 2);
        fill_rect(&mut grid, 1, 1, 0, 0, false);
        assert_eq!(grid.opaque_count(), 5);
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let a = generate(60, 40, &mut StdRng::seed_from_u64(7));
        let b = generate(60, 40, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!((a.width(), a.height()), (60, 40));

        let walls = a.opaque_count();
        println!("60x40 maze has {walls} walls");
        assert!(walls > 0 && walls < 60 * 40, "maze should mix walls and floor");
    }

    #[test]
    fn test_generate_tiny_grids() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(0, 5, &mut rng).is_empty());
        let grid = generate(1, 1, &mut rng);
        assert_eq!((grid.width(), grid.height()), (1, 1));
    }
}
