//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, the tick's input or an RNG handle) and
//! returns a brand-new `GameState`. Side effects are limited to the
//! injected RNG. A tick never edits the previous snapshot: each phase reads
//! one snapshot and builds the next one.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::entities::{
    Bullet, Enemy, FireMode, GameState, GameStatus, Player, Powerup, PowerupKind, WeaponType,
};
use crate::input::{FrameInput, MoveIntents, WeaponSwitch};
use crate::map::{Level, CELL_SIZE};
use crate::raycast::{is_line_of_sight, relative_angle};

// ── Tuning tables ────────────────────────────────────────────────────────────

/// Player displacement per tick, in world units.
pub const MOVE_SPEED: f32 = 3.5;
/// Keyboard turn rate, radians per tick.
pub const TURN_SPEED: f32 = 0.05;
pub const WALK_CYCLE_STEP: f32 = 0.25;

pub const PLAYER_HEALTH: i32 = 100;
pub const PLAYER_AMMO: u32 = 50;
pub const PLAYER_MAX_AMMO: u32 = 100;
pub const MAX_ARMOR: u32 = 5;

pub const ENEMY_HEALTH: i32 = 100;
pub const ENEMY_SPEED: f32 = 1.0;
pub const MELEE_RADIUS: f32 = CELL_SIZE * 0.5;
pub const MELEE_DAMAGE: u32 = 10;
pub const MELEE_COOLDOWN: Duration = Duration::from_millis(1000);
pub const CHASE_RADIUS: f32 = CELL_SIZE * 4.0;
pub const RANGED_RANGE: f32 = CELL_SIZE * 10.0;

/// Bullet displacement per tick, in world units.
pub const BULLET_STEP: f32 = 12.0;
pub const BULLET_HIT_RADIUS: f32 = CELL_SIZE * 0.3;

/// Half-width of the hitscan cone, radians.
pub const HITSCAN_CONE: f32 = 0.1;
/// Hitscan reach. Walls block hitscan: the target must be in line of sight.
pub const HITSCAN_RANGE: f32 = CELL_SIZE * 10.0;

pub const PICKUP_RADIUS: f32 = CELL_SIZE * 0.4;
pub const HEALTH_PACK: i32 = 30;
pub const AMMO_PACK: u32 = 20;
pub const ARMOR_PACK: u32 = 2;

pub const KILL_BONUS: u32 = 100;

pub const MUZZLE_FLASH: Duration = Duration::from_millis(100);
pub const RECOIL_DECAY: Duration = Duration::from_millis(150);

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for a level.
///
/// `arsenal` lists the weapons the player starts with; the first one is
/// equipped. An empty arsenal falls back to the pistol.
pub fn init_state(level: &Level, arsenal: &[WeaponType], fire_mode: FireMode) -> GameState {
    let mut owned: Vec<WeaponType> = Vec::new();
    for &weapon in arsenal {
        if !owned.contains(&weapon) {
            owned.push(weapon);
        }
    }
    if owned.is_empty() {
        owned.push(WeaponType::Pistol);
    }

    let (x, y) = level.player_start;
    let player = Player {
        x,
        y,
        angle: 0.0,
        health: PLAYER_HEALTH,
        max_health: PLAYER_HEALTH,
        ammo: PLAYER_AMMO,
        max_ammo: PLAYER_MAX_AMMO,
        kills: 0,
        armor: 0,
        weapon: owned[0],
        arsenal: owned,
    };

    let enemies = level
        .enemy_spawns
        .iter()
        .map(|spawn| Enemy {
            x: spawn.x,
            y: spawn.y,
            health: ENEMY_HEALTH,
            max_health: ENEMY_HEALTH,
            active: true,
            last_melee: None,
            last_ranged: None,
            weapon: spawn.weapon,
            anim_frame: 0,
        })
        .collect();

    let powerups = level
        .powerup_spawns
        .iter()
        .map(|spawn| Powerup {
            x: spawn.x,
            y: spawn.y,
            kind: spawn.kind,
            active: true,
        })
        .collect();

    GameState {
        level_name: level.name.clone(),
        grid: level.grid.clone(),
        player,
        enemies,
        powerups,
        bullets: Vec::new(),
        score: 0,
        status: GameStatus::Playing,
        fire_mode,
        clock: Duration::ZERO,
        last_shot: None,
        muzzle_flash: Duration::ZERO,
        recoil: 0.0,
        walk_cycle: 0.0,
        frame: 0,
    }
}

// ── Rules ────────────────────────────────────────────────────────────────────

/// Armor soaks damage but every hit deals at least one point.
pub fn effective_damage(raw: u32, armor: u32) -> u32 {
    raw.saturating_sub(armor).max(1)
}

fn cooldown_elapsed(last: Option<Duration>, now: Duration, cooldown: Duration) -> bool {
    match last {
        None => true,
        Some(at) => now.saturating_sub(at) > cooldown,
    }
}

fn damage_player(player: &Player, raw: u32) -> Player {
    let damage = effective_damage(raw, player.armor) as i32;
    Player {
        health: (player.health - damage).max(0),
        ..player.clone()
    }
}

/// Returns the damaged enemy and whether this hit killed it. Only a hit
/// that takes an active enemy to zero counts as a kill.
fn damage_enemy(enemy: &Enemy, damage: u32) -> (Enemy, bool) {
    if !enemy.active {
        return (enemy.clone(), false);
    }
    let health = enemy.health - damage as i32;
    let killed = health <= 0;
    (
        Enemy {
            health: health.max(0),
            active: !killed,
            ..enemy.clone()
        },
        killed,
    )
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Per-tick displacement for the held intents, or `None` when they cancel
/// out. Always exactly `MOVE_SPEED` long, diagonals included.
pub fn movement_vector(angle: f32, intents: &MoveIntents) -> Option<(f32, f32)> {
    let mut dx = 0.0;
    let mut dy = 0.0;

    if intents.forward && !intents.backward {
        dx += angle.cos();
        dy += angle.sin();
    }
    if intents.backward && !intents.forward {
        dx -= angle.cos();
        dy -= angle.sin();
    }
    if intents.left && !intents.right {
        dx += (angle - FRAC_PI_2).cos();
        dy += (angle - FRAC_PI_2).sin();
    }
    if intents.right && !intents.left {
        dx += (angle + FRAC_PI_2).cos();
        dy += (angle + FRAC_PI_2).sin();
    }

    let length = dx.hypot(dy);
    if length <= f32::EPSILON {
        return None;
    }
    Some((dx / length * MOVE_SPEED, dy / length * MOVE_SPEED))
}

/// Move the player one tick. A destination inside a wall is rejected
/// outright; the walk cycle still advances while movement is requested.
pub fn move_player(state: &GameState, intents: &MoveIntents) -> GameState {
    let Some((dx, dy)) = movement_vector(state.player.angle, intents) else {
        return state.clone();
    };

    let new_x = state.player.x + dx;
    let new_y = state.player.y + dy;
    let player = if state.grid.is_passable_at(new_x, new_y) {
        Player {
            x: new_x,
            y: new_y,
            ..state.player.clone()
        }
    } else {
        state.player.clone()
    };

    GameState {
        player,
        walk_cycle: state.walk_cycle + WALK_CYCLE_STEP,
        ..state.clone()
    }
}

pub fn rotate_player(state: &GameState, delta: f32) -> GameState {
    if delta == 0.0 || !delta.is_finite() {
        return state.clone();
    }
    GameState {
        player: Player {
            angle: (state.player.angle + delta).rem_euclid(TAU),
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Equip another weapon from the arsenal. Weapons the player does not own
/// are ignored.
pub fn switch_weapon(state: &GameState, switch: WeaponSwitch) -> GameState {
    let arsenal = &state.player.arsenal;
    let weapon = match switch {
        WeaponSwitch::To(weapon) if arsenal.contains(&weapon) => weapon,
        WeaponSwitch::To(_) => return state.clone(),
        WeaponSwitch::Next => {
            let current = arsenal
                .iter()
                .position(|&w| w == state.player.weapon)
                .unwrap_or(0);
            match arsenal.get((current + 1) % arsenal.len().max(1)) {
                Some(&weapon) => weapon,
                None => return state.clone(),
            }
        }
    };

    GameState {
        player: Player {
            weapon,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Playing ⇄ Paused. Terminal states are left alone.
pub fn toggle_pause(state: &GameState) -> GameState {
    let status = match state.status {
        GameStatus::Playing => GameStatus::Paused,
        GameStatus::Paused => GameStatus::Playing,
        other => other,
    };
    GameState {
        status,
        ..state.clone()
    }
}

pub fn can_shoot(state: &GameState) -> bool {
    let stats = state.player.weapon.stats();
    state.status == GameStatus::Playing
        && state.player.ammo > 0
        && state.player.ammo >= stats.ammo_per_shot
        && state
            .last_shot
            .map_or(true, |at| state.clock.saturating_sub(at) >= stats.fire_rate)
}

/// Fire the equipped weapon. A shot that is not allowed (no ammo, paused,
/// cooldown running) leaves the state untouched.
pub fn player_shoot(state: &GameState, rng: &mut impl Rng) -> GameState {
    if !can_shoot(state) {
        return state.clone();
    }

    let stats = state.player.weapon.stats();
    let fired = GameState {
        player: Player {
            ammo: state.player.ammo - stats.ammo_per_shot,
            ..state.player.clone()
        },
        last_shot: Some(state.clock),
        muzzle_flash: MUZZLE_FLASH,
        recoil: 1.0,
        ..state.clone()
    };

    match state.fire_mode {
        FireMode::Hitscan => resolve_hitscan(&fired, stats.damage),
        FireMode::Projectile => {
            let p = &fired.player;
            let mut bullets = fired.bullets.clone();
            for _ in 0..stats.pellets {
                let offset = (rng.gen::<f32>() - 0.5) * stats.spread;
                bullets.push(Bullet::new(p.x, p.y, p.angle + offset, stats.damage, false));
            }
            GameState { bullets, ..fired }
        }
    }
}

/// Damage the first active enemy inside the aim cone that the player can see.
fn resolve_hitscan(state: &GameState, damage: u32) -> GameState {
    let p = &state.player;
    let target = state.enemies.iter().position(|e| {
        if !e.active {
            return false;
        }
        let dx = e.x - p.x;
        let dy = e.y - p.y;
        dx.hypot(dy) <= HITSCAN_RANGE
            && relative_angle(p.angle, dx, dy).abs() < HITSCAN_CONE
            && is_line_of_sight(&state.grid, p.x, p.y, e.x, e.y)
    });

    let Some(target) = target else {
        return state.clone();
    };

    let mut kills = 0;
    let enemies = state
        .enemies
        .iter()
        .enumerate()
        .map(|(i, e)| {
            if i != target {
                return e.clone();
            }
            let (hit, killed) = damage_enemy(e, damage);
            if killed {
                kills += 1;
            }
            hit
        })
        .collect();

    award_kills(
        GameState {
            enemies,
            ..state.clone()
        },
        kills,
    )
}

fn award_kills(state: GameState, kills: u32) -> GameState {
    if kills == 0 {
        return state;
    }
    debug!(kills, score = state.score + kills * KILL_BONUS, "Enemy killed");
    GameState {
        player: Player {
            kills: state.player.kills + kills,
            ..state.player.clone()
        },
        score: state.score + kills * KILL_BONUS,
        ..state
    }
}

// ── Per-tick phases ──────────────────────────────────────────────────────────

/// Step every live bullet once, resolving wall impacts and hits.
pub fn advance_bullets(state: &GameState) -> GameState {
    let mut player = state.player.clone();
    let mut enemies = state.enemies.clone();
    let mut kills = 0;
    let mut bullets = Vec::with_capacity(state.bullets.len());

    for bullet in state.bullets.iter().filter(|b| b.active) {
        let x = bullet.x + bullet.dir_x * BULLET_STEP;
        let y = bullet.y + bullet.dir_y * BULLET_STEP;

        if state.grid.is_wall_at(x, y) {
            continue;
        }

        if bullet.from_enemy {
            if (player.x - x).hypot(player.y - y) < BULLET_HIT_RADIUS {
                player = damage_player(&player, bullet.damage);
                continue;
            }
        } else {
            let nearest = enemies
                .iter()
                .enumerate()
                .filter(|(_, e)| e.active)
                .map(|(i, e)| (i, (e.x - x).hypot(e.y - y)))
                .filter(|&(_, d)| d < BULLET_HIT_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1));

            if let Some((i, _)) = nearest {
                let (hit, killed) = damage_enemy(&enemies[i], bullet.damage);
                enemies[i] = hit;
                if killed {
                    kills += 1;
                }
                continue;
            }
        }

        bullets.push(Bullet {
            x,
            y,
            ..bullet.clone()
        });
    }

    award_kills(
        GameState {
            player,
            enemies,
            bullets,
            ..state.clone()
        },
        kills,
    )
}

/// Run every active enemy's AI once: melee when adjacent, chase when
/// close, shoot when in range and in sight.
pub fn update_enemies(state: &GameState) -> GameState {
    let now = state.clock;
    let mut player = state.player.clone();
    let mut bullets = state.bullets.clone();

    let enemies = state
        .enemies
        .iter()
        .map(|enemy| {
            if !enemy.active {
                return enemy.clone();
            }

            let dx = player.x - enemy.x;
            let dy = player.y - enemy.y;
            let distance = dx.hypot(dy);

            if distance < MELEE_RADIUS {
                if cooldown_elapsed(enemy.last_melee, now, MELEE_COOLDOWN) {
                    player = damage_player(&player, MELEE_DAMAGE);
                    return Enemy {
                        last_melee: Some(now),
                        ..enemy.clone()
                    };
                }
            } else if distance < CHASE_RADIUS {
                if distance > f32::EPSILON {
                    let new_x = enemy.x + dx / distance * ENEMY_SPEED;
                    let new_y = enemy.y + dy / distance * ENEMY_SPEED;
                    if state.grid.is_passable_at(new_x, new_y) {
                        return Enemy {
                            x: new_x,
                            y: new_y,
                            anim_frame: enemy.anim_frame.wrapping_add(1),
                            ..enemy.clone()
                        };
                    }
                }
            } else if distance < RANGED_RANGE {
                let stats = enemy.weapon.stats();
                if cooldown_elapsed(enemy.last_ranged, now, stats.cooldown)
                    && is_line_of_sight(&state.grid, enemy.x, enemy.y, player.x, player.y)
                {
                    bullets.push(Bullet {
                        x: enemy.x,
                        y: enemy.y,
                        dir_x: dx / distance,
                        dir_y: dy / distance,
                        damage: stats.damage,
                        from_enemy: true,
                        active: true,
                    });
                    return Enemy {
                        last_ranged: Some(now),
                        ..enemy.clone()
                    };
                }
            }

            enemy.clone()
        })
        .collect();

    GameState {
        player,
        enemies,
        bullets,
        ..state.clone()
    }
}

/// Apply and deactivate every active powerup within reach of the player.
pub fn collect_powerups(state: &GameState) -> GameState {
    let mut player = state.player.clone();

    let powerups = state
        .powerups
        .iter()
        .map(|powerup| {
            if !powerup.active
                || (player.x - powerup.x).hypot(player.y - powerup.y) >= PICKUP_RADIUS
            {
                return powerup.clone();
            }

            player = apply_powerup(&player, powerup.kind);
            debug!(kind = ?powerup.kind, "Powerup collected");
            Powerup {
                active: false,
                ..powerup.clone()
            }
        })
        .collect();

    GameState {
        player,
        powerups,
        ..state.clone()
    }
}

fn apply_powerup(player: &Player, kind: PowerupKind) -> Player {
    match kind {
        PowerupKind::Health => Player {
            health: (player.health + HEALTH_PACK).min(player.max_health),
            ..player.clone()
        },
        PowerupKind::Ammo => Player {
            ammo: (player.ammo + AMMO_PACK).min(player.max_ammo),
            ..player.clone()
        },
        PowerupKind::Armor => Player {
            armor: (player.armor + ARMOR_PACK).min(MAX_ARMOR),
            ..player.clone()
        },
        PowerupKind::Weapon(weapon) => {
            let mut arsenal = player.arsenal.clone();
            if !arsenal.contains(&weapon) {
                arsenal.push(weapon);
            }
            Player {
                weapon,
                arsenal,
                ..player.clone()
            }
        }
    }
}

fn decay_effects(state: &GameState, dt: Duration) -> GameState {
    let recoil_step = dt.as_secs_f32() / RECOIL_DECAY.as_secs_f32();
    GameState {
        muzzle_flash: state.muzzle_flash.saturating_sub(dt),
        recoil: (state.recoil - recoil_step).max(0.0),
        ..state.clone()
    }
}

fn resolve_status(state: GameState) -> GameState {
    let status = if state.player.health <= 0 {
        info!(level = %state.level_name, score = state.score, "Game over");
        GameStatus::GameOver
    } else if state.enemies.iter().all(|e| !e.active) {
        info!(level = %state.level_name, score = state.score, "Level complete");
        GameStatus::LevelComplete
    } else {
        return state;
    };
    GameState { status, ..state }
}

// ── Per-frame tick (nearly pure, RNG is injected) ──────────────────────────

/// Advance the simulation by one fixed step of length `dt`.
///
/// Order within a tick: effects decay, rotation, weapon switch, shot,
/// movement, bullets, enemy AI, powerups, then the status check. A player
/// killed by bullets or enemy AI picks nothing up that tick. Anything
/// other than `Playing` freezes the state.
pub fn tick(state: &GameState, input: &FrameInput, dt: Duration, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let next = GameState {
        clock: state.clock + dt,
        frame: state.frame + 1,
        ..state.clone()
    };

    let next = decay_effects(&next, dt);
    let next = rotate_player(&next, input.turn * TURN_SPEED + input.look);
    let next = match input.switch_weapon {
        Some(switch) => switch_weapon(&next, switch),
        None => next,
    };
    let next = if input.shoot {
        player_shoot(&next, rng)
    } else {
        next
    };
    let next = move_player(&next, &input.movement);
    let next = advance_bullets(&next);
    let next = update_enemies(&next);
    if next.player.health <= 0 {
        return resolve_status(next);
    }
    let next = collect_powerups(&next);

    resolve_status(next)
}
