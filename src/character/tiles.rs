//! Character domain: the tile grid the host world is built from.

use bevy::prelude::*;

pub const TILE_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileKind {
    #[default]
    Air,
    Solid,
    HorizontalBeam,
    VerticalBeam,
    /// Horizontal and vertical beam crossing
    CrossBeam,
}

impl TileKind {
    pub fn has_horizontal_beam(self) -> bool {
        matches!(self, TileKind::HorizontalBeam | TileKind::CrossBeam)
    }

    pub fn has_vertical_beam(self) -> bool {
        matches!(self, TileKind::VerticalBeam | TileKind::CrossBeam)
    }

    pub fn has_beam(self) -> bool {
        self.has_horizontal_beam() || self.has_vertical_beam()
    }

    fn from_char(c: char) -> Self {
        match c {
            '#' => TileKind::Solid,
            '-' => TileKind::HorizontalBeam,
            '|' => TileKind::VerticalBeam,
            '+' => TileKind::CrossBeam,
            _ => TileKind::Air,
        }
    }
}

/// Row-major tile grid. Tile (0, 0) is the bottom-left tile and its lower-left
/// corner sits at `origin`.
#[derive(Resource, Debug, Clone, Default)]
pub struct TileMap {
    width: i32,
    height: i32,
    origin: Vec2,
    tiles: Vec<TileKind>,
}

impl TileMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            origin: Vec2::ZERO,
            tiles: vec![TileKind::Air; (width.max(0) * height.max(0)) as usize],
        }
    }

    /// Build a map from ASCII rows, top row first.
    /// `#` solid, `-` horizontal beam, `|` vertical beam, `+` both, anything else air.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut map = Self::new(width, height);

        for (row_index, row) in rows.iter().enumerate() {
            let y = height - 1 - row_index as i32;
            for (x, c) in row.chars().enumerate() {
                map.set(IVec2::new(x as i32, y), TileKind::from_char(c));
            }
        }

        map
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set(&mut self, tile: IVec2, kind: TileKind) {
        if let Some(index) = self.index(tile) {
            self.tiles[index] = kind;
        }
    }

    pub fn get(&self, tile: IVec2) -> TileKind {
        self.index(tile)
            .map(|index| self.tiles[index])
            .unwrap_or_default()
    }

    pub fn tile_coord(&self, pos: Vec2) -> IVec2 {
        ((pos - self.origin) / TILE_SIZE).floor().as_ivec2()
    }

    pub fn tile_at(&self, pos: Vec2) -> TileKind {
        self.get(self.tile_coord(pos))
    }

    pub fn middle_of_tile(&self, pos: Vec2) -> Vec2 {
        self.tile_center(self.tile_coord(pos))
    }

    pub fn tile_center(&self, tile: IVec2) -> Vec2 {
        self.origin + (tile.as_vec2() + Vec2::splat(0.5)) * TILE_SIZE
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, TileKind)> + '_ {
        self.tiles.iter().enumerate().map(|(index, kind)| {
            let index = index as i32;
            (IVec2::new(index % self.width, index / self.width), *kind)
        })
    }

    /// Horizontal runs of solid tiles as (first tile, length), for building colliders.
    pub fn solid_runs(&self) -> Vec<(IVec2, i32)> {
        let mut runs = Vec::new();
        for y in 0..self.height {
            let mut x = 0;
            while x < self.width {
                if self.get(IVec2::new(x, y)) == TileKind::Solid {
                    let start = x;
                    while x < self.width && self.get(IVec2::new(x, y)) == TileKind::Solid {
                        x += 1;
                    }
                    runs.push((IVec2::new(start, y), x - start));
                } else {
                    x += 1;
                }
            }
        }
        runs
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            return None;
        }
        Some((tile.y * self.width + tile.x) as usize)
    }
}
