//! Rendering functions for converting a grid and its lightmap to displayable formats

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::grid::{Grid, Lightmap, Point};

/// Unlit floor
pub const BACKGROUND: (u8, u8, u8) = (40, 45, 50);
/// Wall tint, scaled by how lit the wall is
pub const WALL: (u8, u8, u8) = (0x00, 0x90, 0x00);
/// Floor at full intensity
pub const LIT_FLOOR: (u8, u8, u8) = (0xff, 0xf0, 0xc8);
/// Walls stay faintly visible when dark
const WALL_AMBIENT: u8 = 48;

#[inline]
fn lerp(a: u8, b: u8, t: u8) -> u8 {
    let (a, b, t) = (a as u32, b as u32, t as u32);
    ((a * (255 - t) + b * t) / 255) as u8
}

/// RGB for one cell.
pub fn shade_rgb(opaque: bool, light: u8) -> (u8, u8, u8) {
    if opaque {
        let t = light.max(WALL_AMBIENT);
        (lerp(BACKGROUND.0, WALL.0, t), lerp(BACKGROUND.1, WALL.1, t), lerp(BACKGROUND.2, WALL.2, t))
    } else {
        (
            lerp(BACKGROUND.0, LIT_FLOOR.0, light),
            lerp(BACKGROUND.1, LIT_FLOOR.1, light),
            lerp(BACKGROUND.2, LIT_FLOOR.2, light),
        )
    }
}

/// Cell color as 0x00RRGGBB (minifb layout).
pub fn shade(opaque: bool, light: u8) -> u32 {
    let (r, g, b) = shade_rgb(opaque, light);
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Render a grid and its lightmap to a pixel buffer, each cell drawn as a
/// `scale × scale` block. `buffer` must hold `width * height * scale²` pixels.
pub fn render_to_buffer(grid: &Grid, lightmap: &Lightmap, scale: usize, buffer: &mut [u32]) {
    let row_pixels = grid.width() * scale;
    debug_assert_eq!(buffer.len(), row_pixels * grid.height() * scale);

    for gy in 0..grid.height() {
        for gx in 0..grid.width() {
            let opaque = grid.is_opaque(Point::new(gx as i32, gy as i32));
            let color = shade(opaque, lightmap.at(gx, gy));

            // Fill scaled pixels
            for sy in 0..scale {
                let start = (gy * scale + sy) * row_pixels + gx * scale;
                buffer[start..start + scale].fill(color);
            }
        }
    }
}

/// Save a grid and its lightmap to a plain PPM file
pub fn save_ppm(grid: &Grid, lightmap: &Lightmap, path: impl AsRef<Path>, scale: usize) -> io::Result<()> {
    let img_width = grid.width() * scale;
    let img_height = grid.height() * scale;

    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "P3")?;
    writeln!(file, "{} {}", img_width, img_height)?;
    writeln!(file, "255")?;

    for img_y in 0..img_height {
        for img_x in 0..img_width {
            let x = img_x / scale;
            let y = img_y / scale;
            let opaque = grid.is_opaque(Point::new(x as i32, y as i32));
            let (r, g, b) = shade_rgb(opaque, lightmap.at(x, y));
            write!(file, "{} {} {} ", r, g, b)?;
        }
        writeln!(file)?;
    }

    file.flush()
}
