//! All game entity types: pure data, no simulation logic.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::map::TileGrid;

// ── Weapons ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    Pistol,
    Shotgun,
    Rifle,
}

/// Static per-weapon reference data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponStats {
    /// Damage per bullet (or per hitscan hit).
    pub damage: u32,
    /// Minimum interval between two shots.
    pub fire_rate: Duration,
    pub ammo_per_shot: u32,
    /// Full angular width (radians) that pellet directions are drawn from.
    pub spread: f32,
    pub pellets: u32,
    /// Scales the viewmodel kick after a shot.
    pub recoil: f32,
}

impl WeaponType {
    pub const ALL: [WeaponType; 3] = [WeaponType::Pistol, WeaponType::Shotgun, WeaponType::Rifle];

    pub fn stats(self) -> WeaponStats {
        match self {
            WeaponType::Pistol => WeaponStats {
                damage: 30,
                fire_rate: Duration::from_millis(400),
                ammo_per_shot: 1,
                spread: 0.05,
                pellets: 1,
                recoil: 0.8,
            },
            WeaponType::Shotgun => WeaponStats {
                damage: 15,
                fire_rate: Duration::from_millis(800),
                ammo_per_shot: 1,
                spread: 0.15,
                pellets: 6,
                recoil: 1.5,
            },
            WeaponType::Rifle => WeaponStats {
                damage: 25,
                fire_rate: Duration::from_millis(150),
                ammo_per_shot: 1,
                spread: 0.03,
                pellets: 1,
                recoil: 0.5,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponType::Pistol => "PISTOL",
            WeaponType::Shotgun => "SHOTGUN",
            WeaponType::Rifle => "RIFLE",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyWeapon {
    #[default]
    Pistol,
    Rifle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyWeaponStats {
    pub damage: u32,
    /// Minimum interval between two ranged attacks.
    pub cooldown: Duration,
}

impl EnemyWeapon {
    pub fn stats(self) -> EnemyWeaponStats {
        match self {
            EnemyWeapon::Pistol => EnemyWeaponStats {
                damage: 8,
                cooldown: Duration::from_millis(1500),
            },
            EnemyWeapon::Rifle => EnemyWeaponStats {
                damage: 12,
                cooldown: Duration::from_millis(1000),
            },
        }
    }
}

// ── Game modes & status ───────────────────────────────────────────────────────

/// How a player's shot is resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FireMode {
    /// Instant single-target hit inside a narrow cone.
    Hitscan,
    /// Bullets are spawned and stepped through the world each tick.
    #[default]
    Projectile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    /// Terminal: player health reached zero.
    GameOver,
    /// Terminal: every enemy of the level is inactive.
    LevelComplete,
}

// ── Powerups ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerupKind {
    Health,
    Ammo,
    Armor,
    /// Adds the weapon to the arsenal and equips it.
    Weapon(WeaponType),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Powerup {
    pub x: f32,
    pub y: f32,
    pub kind: PowerupKind,
    /// Cleared on pickup, never set again.
    pub active: bool,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    /// Unit direction vector.
    pub dir_x: f32,
    pub dir_y: f32,
    pub damage: u32,
    pub from_enemy: bool,
    pub active: bool,
}

impl Bullet {
    /// A live bullet travelling along `angle`.
    pub fn new(x: f32, y: f32, angle: f32, damage: u32, from_enemy: bool) -> Self {
        Self {
            x,
            y,
            dir_x: angle.cos(),
            dir_y: angle.sin(),
            damage,
            from_enemy,
            active: true,
        }
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Facing angle in radians, kept in `[0, 2π)`.
    pub angle: f32,
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub kills: u32,
    /// Flat damage reduction applied to every incoming hit.
    pub armor: u32,
    pub weapon: WeaponType,
    /// Weapons the player may switch to. Always contains `weapon`.
    pub arsenal: Vec<WeaponType>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub max_health: i32,
    /// `false` once dead. Dead enemies stay in the list so indices are stable.
    pub active: bool,
    pub last_melee: Option<Duration>,
    pub last_ranged: Option<Duration>,
    pub weapon: EnemyWeapon,
    /// Advances while the enemy walks; drives the sprite's leg animation.
    pub anim_frame: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub level_name: String,
    /// Shared and immutable for the lifetime of the level.
    pub grid: Arc<TileGrid>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    pub bullets: Vec<Bullet>,
    pub score: u32,
    pub status: GameStatus,
    pub fire_mode: FireMode,
    /// Simulated time since the level started.
    pub clock: Duration,
    pub last_shot: Option<Duration>,
    /// Remaining muzzle-flash display time.
    pub muzzle_flash: Duration,
    /// Viewmodel kick, 1.0 right after a shot and decaying to 0.0.
    pub recoil: f32,
    /// Walk-cycle phase feeding the weapon bob.
    pub walk_cycle: f32,
    pub frame: u64,
}

impl GameState {
    pub fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    pub fn is_muzzle_flash(&self) -> bool {
        !self.muzzle_flash.is_zero()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, GameStatus::GameOver | GameStatus::LevelComplete)
    }
}
