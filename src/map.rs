use anyhow::{Context, Result};
use cgmath::*;
use std::ops::RangeInclusive;

pub const TILE_EMPTY: u8 = 0;
pub const TILE_SOLID: u8 = 1;

const ROW_CHAR_SOLID: char = '#';
const ROW_CHAR_EMPTY: char = '.';

/// Static tile grid the player collides against. Built once at level load and
/// read-only thereafter.
///
/// Tile (tx, ty) covers `[tx * tile_size, (tx + 1) * tile_size)` on both axes, with
/// row 0 at the top of the world. Any query outside the grid reports solid, which
/// closes the world so a body can never fall or walk out of the map.
#[derive(Clone, Debug)]
pub struct TileWorld {
    width: u32,  // tiles wide
    height: u32, // tiles tall
    tile_size: f32,
    tiles: Vec<u8>,
}

impl TileWorld {
    pub fn new(width: u32, height: u32, tile_size: f32, tiles: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("TileWorld must be at least 1x1, got {}x{}", width, height);
        }
        if !(tile_size > 0.0) {
            anyhow::bail!("TileWorld tile_size must be positive, got {}", tile_size);
        }
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            anyhow::bail!(
                "Expected {} tiles for a {}x{} world, got {}",
                expected,
                width,
                height,
                tiles.len()
            );
        }
        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
        })
    }

    /// A world which is empty except for one solid row.
    pub fn flat(width: u32, height: u32, tile_size: f32, ground_row: u32) -> Result<Self> {
        let mut tiles = vec![TILE_EMPTY; width as usize * height as usize];
        if ground_row < height {
            let start = (ground_row * width) as usize;
            for tile in &mut tiles[start..start + width as usize] {
                *tile = TILE_SOLID;
            }
        }
        Self::new(width, height, tile_size, tiles)
    }

    /// Parses a level from text rows, top row first. `#` is solid, `.` or space is empty.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self> {
        let height = rows.len();
        if height == 0 {
            anyhow::bail!("Level has no rows");
        }
        let width = rows[0].as_ref().chars().count();
        let mut tiles = Vec::with_capacity(width * height);

        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let row_width = row.chars().count();
            if row_width != width {
                anyhow::bail!(
                    "Level row {} is {} tiles wide, expected {}",
                    row_index,
                    row_width,
                    width
                );
            }
            for (column, c) in row.chars().enumerate() {
                let tile = match c {
                    ROW_CHAR_SOLID => TILE_SOLID,
                    ROW_CHAR_EMPTY | ' ' => TILE_EMPTY,
                    _ => anyhow::bail!(
                        "Unrecognized tile '{}' at column {} of row {}",
                        c,
                        column,
                        row_index
                    ),
                };
                tiles.push(tile);
            }
        }

        Self::new(width as u32, height as u32, tile_size, tiles)
            .with_context(|| format!("Unable to build {}x{} level", width, height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Size of the world in world units.
    pub fn world_extent(&self) -> Vector2<f32> {
        vec2(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    /// Returns the tile id at (tx, ty), or None if the coordinate is outside the grid.
    pub fn tile_at(&self, tx: i32, ty: i32) -> Option<u8> {
        if tx < 0 || ty < 0 || tx >= self.width as i32 || ty >= self.height as i32 {
            None
        } else {
            Some(self.tiles[(ty as u32 * self.width + tx as u32) as usize])
        }
    }

    pub fn solid_at(&self, tx: i32, ty: i32) -> bool {
        match self.tile_at(tx, ty) {
            Some(tile) => tile != TILE_EMPTY,
            None => true,
        }
    }

    /// Index of the tile containing world coordinate `v` along one axis.
    pub fn tile_index(&self, v: f32) -> i32 {
        (v / self.tile_size).floor() as i32
    }

    /// Inclusive range of tile indices covered by the span `[start, start + extent)`.
    /// An end lying exactly on a tile boundary doesn't cover the next tile.
    pub fn tile_range(&self, start: f32, extent: f32) -> RangeInclusive<i32> {
        let first = self.tile_index(start);
        let last = ((start + extent) / self.tile_size).ceil() as i32 - 1;
        first..=last.max(first)
    }
}
