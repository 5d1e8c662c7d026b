use cgmath::*;

use crate::map::TileWorld;

use super::state::HorizontalDir;

/// Result of resolving the vertical axis of a move against the tile grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalContact {
    /// Moved freely; `y` is the candidate position.
    None { y: f32 },
    /// Feet came to rest on a floor row; `y` snaps the bottom edge to the row's top.
    Floor { y: f32 },
    /// Head struck a ceiling row; `y` snaps the top edge to the row's bottom.
    Ceiling { y: f32 },
}

impl VerticalContact {
    pub fn y(&self) -> f32 {
        match self {
            VerticalContact::None { y }
            | VerticalContact::Floor { y }
            | VerticalContact::Ceiling { y } => *y,
        }
    }
}

/// Result of resolving the horizontal axis of a move against the tile grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalContact {
    None { x: f32 },
    Wall { x: f32, side: HorizontalDir },
}

impl HorizontalContact {
    pub fn x(&self) -> f32 {
        match self {
            HorizontalContact::None { x } | HorizontalContact::Wall { x, .. } => *x,
        }
    }
}

fn any_solid_in_row(world: &TileWorld, row: i32, x: f32, width: f32) -> bool {
    world.tile_range(x, width).any(|tx| world.solid_at(tx, row))
}

fn any_solid_in_column(world: &TileWorld, column: i32, y: f32, height: f32) -> bool {
    world.tile_range(y, height).any(|ty| world.solid_at(column, ty))
}

/// Resolves vertical motion at the candidate position, before horizontal motion is
/// resolved. Zero vertical velocity counts as moving down, so a resting body keeps
/// probing its floor.
///
/// Only the row holding the candidate leading edge is tested, so a single-tick move
/// longer than one tile can tunnel. Callers keep fall speed below a tile per tick.
pub fn resolve_vertical(
    world: &TileWorld,
    candidate_x: f32,
    candidate_y: f32,
    extent: Vector2<f32>,
    vy: f32,
) -> VerticalContact {
    if vy >= 0.0 {
        let row = world.tile_index(candidate_y + extent.y);
        if any_solid_in_row(world, row, candidate_x, extent.x) {
            return VerticalContact::Floor {
                y: row as f32 * world.tile_size() - extent.y,
            };
        }
    } else {
        let row = world.tile_index(candidate_y);
        if any_solid_in_row(world, row, candidate_x, extent.x) {
            return VerticalContact::Ceiling {
                y: (row + 1) as f32 * world.tile_size(),
            };
        }
    }
    VerticalContact::None { y: candidate_y }
}

/// Resolves horizontal motion at the already-resolved vertical position `y`.
pub fn resolve_horizontal(
    world: &TileWorld,
    candidate_x: f32,
    y: f32,
    extent: Vector2<f32>,
    vx: f32,
) -> HorizontalContact {
    if vx > 0.0 {
        let column = world.tile_index(candidate_x + extent.x);
        if any_solid_in_column(world, column, y, extent.y) {
            return HorizontalContact::Wall {
                x: column as f32 * world.tile_size() - extent.x,
                side: HorizontalDir::East,
            };
        }
    } else if vx < 0.0 {
        let column = world.tile_index(candidate_x);
        if any_solid_in_column(world, column, y, extent.y) {
            return HorizontalContact::Wall {
                x: (column + 1) as f32 * world.tile_size(),
                side: HorizontalDir::West,
            };
        }
    }
    HorizontalContact::None { x: candidate_x }
}
