//! The tile grid actors move through.

use glam::{IVec2, Vec3};
use tf_core::Aabb3;

use crate::definition::{Definitions, MapDefinition, TileDefinition};
use crate::error::{SimError, SimResult};

/// Slack on the vertical bounds of a valid position.
const Z_TOLERANCE: f32 = 0.0001;

/// One grid cell: its box and its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// World-space bounds, one unit square by the tile type's height.
    pub bounds: Aabb3,
    /// Index into the map's tile definitions.
    pub definition: usize,
}

/// An immutable grid of tiles.
#[derive(Debug, Clone)]
pub struct TileMap {
    name: String,
    width: i32,
    height: i32,
    ceiling_height: f32,
    tiles: Vec<Tile>,
    definitions: Vec<TileDefinition>,
}

impl TileMap {
    /// Build the named map's grid.
    pub fn from_definition(defs: &Definitions, map: &MapDefinition) -> SimResult<Self> {
        Self::from_layout(&map.name, &map.layout, defs.tiles(), map.ceiling_height)
    }

    /// Build a grid from text rows, first row northernmost.
    pub fn from_layout<S: AsRef<str>>(
        name: &str,
        layout: &[S],
        definitions: &[TileDefinition],
        ceiling_height: f32,
    ) -> SimResult<Self> {
        let invalid = |reason: String| SimError::InvalidMap {
            map: name.to_string(),
            reason,
        };
        let rows: Vec<Vec<char>> = layout.iter().map(|r| r.as_ref().chars().collect()).collect();
        let width = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || width == 0 {
            return Err(invalid("layout is empty".into()));
        }
        if let Some(row) = rows.iter().position(|r| r.len() != width) {
            return Err(invalid(format!(
                "row {row} has {} tiles, expected {width}",
                rows[row].len()
            )));
        }

        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = &rows[height - 1 - y];
            for (x, &glyph) in row.iter().enumerate() {
                let definition = definitions
                    .iter()
                    .position(|d| d.glyph == glyph)
                    .ok_or_else(|| SimError::UnknownTileGlyph {
                        map: name.to_string(),
                        glyph,
                        column: x,
                        row: height - 1 - y,
                    })?;
                let min = Vec3::new(x as f32, y as f32, 0.0);
                let max = Vec3::new(x as f32 + 1.0, y as f32 + 1.0, definitions[definition].height);
                tiles.push(Tile {
                    bounds: Aabb3::new(min, max),
                    definition,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            width: width as i32,
            height: height as i32,
            ceiling_height,
            tiles,
            definitions: definitions.to_vec(),
        })
    }

    /// Map name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in tiles.
    pub fn dimensions(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Height of the ceiling plane.
    pub fn ceiling_height(&self) -> f32 {
        self.ceiling_height
    }

    /// Whether `coords` lies on the grid.
    pub fn contains_coords(&self, coords: IVec2) -> bool {
        coords.x >= 0 && coords.y >= 0 && coords.x < self.width && coords.y < self.height
    }

    /// The tile at `coords`, if on the grid.
    pub fn tile(&self, coords: IVec2) -> Option<&Tile> {
        if !self.contains_coords(coords) {
            return None;
        }
        self.tiles.get((coords.y * self.width + coords.x) as usize)
    }

    /// Definition of the tile's type.
    pub fn definition_of(&self, tile: &Tile) -> &TileDefinition {
        &self.definitions[tile.definition]
    }

    /// Whether the tile at `coords` is a wall. Off-map coordinates are open.
    pub fn is_solid(&self, coords: IVec2) -> bool {
        self.tile(coords).is_some_and(|t| self.definition_of(t).solid)
    }

    /// The tile coordinates containing a world position.
    pub fn coords_for(&self, position: Vec3) -> IVec2 {
        IVec2::new(position.x.floor() as i32, position.y.floor() as i32)
    }

    /// Inside the map's footprint and between floor and ceiling.
    pub fn is_valid_position(&self, position: Vec3) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x <= self.width as f32
            && position.y <= self.height as f32
            && position.z >= -Z_TOLERANCE
            && position.z <= self.ceiling_height + Z_TOLERANCE
    }

    /// The up to eight tiles around `coords`, not including it.
    pub fn surrounding(&self, coords: IVec2) -> impl Iterator<Item = &Tile> {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| IVec2::new(dx, dy)))
            .filter(|offset| *offset != IVec2::ZERO)
            .filter_map(move |offset| self.tile(coords + offset))
    }

    /// Render the grid back to layout rows, first row northernmost.
    pub fn to_layout(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .filter_map(|x| self.tile(IVec2::new(x, y)))
                    .map(|t| self.definition_of(t).glyph)
                    .collect()
            })
            .collect()
    }
}
