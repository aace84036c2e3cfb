//! Tile grid and level loading.
//!
//! Levels arrive as JSON in the external level format and are validated
//! here, once, before any simulation runs. Past this point the grid is
//! assumed rectangular and non-empty.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entities::{EnemyWeapon, PowerupKind, WeaponType};

/// Edge length of one grid cell in world units.
pub const CELL_SIZE: f32 = 64.0;

const BUILTIN_LEVELS: [&str; 3] = [
    include_str!("../levels/01_bunker.json"),
    include_str!("../levels/02_cellblock.json"),
    include_str!("../levels/03_armory.json"),
];

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Malformed level data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Level map is empty")]
    EmptyMap,

    #[error("Map row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid cell value {value} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, value: u8 },

    #[error("{what} at ({x}, {y}) is not on a passable cell")]
    BlockedSpawn { what: &'static str, x: f32, y: f32 },

    #[error("Weapon powerup #{index} has no weaponType")]
    MissingWeaponGrant { index: usize },

    #[error("No built-in level with index {0}")]
    UnknownLevel(usize),
}

// ── Tile grid ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
}

/// Rectangular, immutable wall/empty grid.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Build a grid from rows of `0` (empty) / `1` (wall).
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, LevelError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(LevelError::EmptyMap);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                cells.push(match value {
                    0 => Tile::Empty,
                    1 => Tile::Wall,
                    _ => return Err(LevelError::InvalidCell { row, col, value }),
                });
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at grid indices, `None` when outside the grid.
    pub fn tile(&self, col: i32, row: i32) -> Option<Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col])
    }

    /// Grid indices of the cell containing a world-space point.
    pub fn cell_of(x: f32, y: f32) -> (i32, i32) {
        ((x / CELL_SIZE).floor() as i32, (y / CELL_SIZE).floor() as i32)
    }

    /// Out-of-bounds counts as wall.
    pub fn is_wall_at(&self, x: f32, y: f32) -> bool {
        let (col, row) = Self::cell_of(x, y);
        !matches!(self.tile(col, row), Some(Tile::Empty))
    }

    pub fn is_passable_at(&self, x: f32, y: f32) -> bool {
        !self.is_wall_at(x, y)
    }
}

// ── External level format ─────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub name: String,
    pub map: Vec<Vec<u8>>,
    #[serde(default)]
    pub enemy_positions: Vec<EnemySpawnData>,
    #[serde(default)]
    pub powerup_positions: Vec<PowerupSpawnData>,
    pub player_start: PointData,
}

/// Positions are in cell units: `1.5` is the centre of column/row 1.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PointData {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemySpawnData {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub weapon: EnemyWeapon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupTypeData {
    Health,
    Ammo,
    Armor,
    Weapon,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerupSpawnData {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: PowerupTypeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon_type: Option<WeaponType>,
}

// ── Validated level ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub weapon: EnemyWeapon,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerupSpawn {
    pub x: f32,
    pub y: f32,
    pub kind: PowerupKind,
}

/// A level with every position already in world units.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub grid: Arc<TileGrid>,
    pub player_start: (f32, f32),
    pub enemy_spawns: Vec<EnemySpawn>,
    pub powerup_spawns: Vec<PowerupSpawn>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let data: LevelData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn from_data(data: LevelData) -> Result<Self, LevelError> {
        let grid = TileGrid::from_rows(&data.map)?;

        let player_start = to_world(&grid, "Player start", data.player_start.x, data.player_start.y)?;

        let enemy_spawns = data
            .enemy_positions
            .iter()
            .map(|e| {
                let (x, y) = to_world(&grid, "Enemy spawn", e.x, e.y)?;
                Ok(EnemySpawn {
                    x,
                    y,
                    weapon: e.weapon,
                })
            })
            .collect::<Result<Vec<_>, LevelError>>()?;

        let powerup_spawns = data
            .powerup_positions
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let (x, y) = to_world(&grid, "Powerup", p.x, p.y)?;
                let kind = match (p.kind, p.weapon_type) {
                    (PowerupTypeData::Health, _) => PowerupKind::Health,
                    (PowerupTypeData::Ammo, _) => PowerupKind::Ammo,
                    (PowerupTypeData::Armor, _) => PowerupKind::Armor,
                    (PowerupTypeData::Weapon, Some(weapon)) => PowerupKind::Weapon(weapon),
                    (PowerupTypeData::Weapon, None) => {
                        return Err(LevelError::MissingWeaponGrant { index })
                    }
                };
                Ok(PowerupSpawn { x, y, kind })
            })
            .collect::<Result<Vec<_>, LevelError>>()?;

        info!(
            level = %data.name,
            width = grid.width(),
            height = grid.height(),
            enemies = enemy_spawns.len(),
            powerups = powerup_spawns.len(),
            "Level loaded"
        );

        Ok(Self {
            name: data.name,
            grid: Arc::new(grid),
            player_start,
            enemy_spawns,
            powerup_spawns,
        })
    }

    /// One of the levels shipped with the game.
    pub fn builtin(index: usize) -> Result<Self, LevelError> {
        let json = BUILTIN_LEVELS
            .get(index)
            .ok_or(LevelError::UnknownLevel(index))?;
        Self::from_json(json)
    }
}

/// All built-in levels, in play order.
pub fn campaign() -> Result<Vec<Level>, LevelError> {
    (0..BUILTIN_LEVELS.len()).map(Level::builtin).collect()
}

fn to_world(grid: &TileGrid, what: &'static str, cx: f32, cy: f32) -> Result<(f32, f32), LevelError> {
    let (x, y) = (cx * CELL_SIZE, cy * CELL_SIZE);
    if !x.is_finite() || !y.is_finite() || grid.is_wall_at(x, y) {
        return Err(LevelError::BlockedSpawn { what, x: cx, y: cy });
    }
    Ok((x, y))
}
