use std::f32::consts::{PI, TAU};
use std::time::Duration;

use raycast_shooter::compute::*;
use raycast_shooter::entities::*;
use raycast_shooter::input::{FrameInput, MoveIntents, WeaponSwitch};
use raycast_shooter::map::{
    EnemySpawnData, Level, LevelData, PointData, PowerupSpawnData, PowerupTypeData, CELL_SIZE,
};

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: Duration = Duration::from_millis(16);

/// Out of every enemy range from the player start; keeps a level running.
const FAR_AWAY: (f32, f32) = (14.5, 1.5);

/// 16 × 5 room: walls around a 14 × 3 open floor.
fn corridor() -> Vec<Vec<u8>> {
    let mut rows = vec![vec![1u8; 16]];
    for _ in 0..3 {
        let mut row = vec![0u8; 16];
        row[0] = 1;
        row[15] = 1;
        rows.push(row);
    }
    rows.push(vec![1u8; 16]);
    rows
}

fn level_with(map: Vec<Vec<u8>>, enemies: &[(f32, f32)], powerups: Vec<PowerupSpawnData>) -> Level {
    Level::from_data(LevelData {
        name: "Test".to_string(),
        map,
        enemy_positions: enemies
            .iter()
            .map(|&(x, y)| EnemySpawnData {
                x,
                y,
                weapon: EnemyWeapon::Pistol,
            })
            .collect(),
        powerup_positions: powerups,
        player_start: PointData { x: 1.5, y: 2.5 },
    })
    .unwrap()
}

/// Player at cell (1.5, 2.5) facing +x, pistol only.
fn make_state(enemies: &[(f32, f32)], fire_mode: FireMode) -> GameState {
    init_state(
        &level_with(corridor(), enemies, Vec::new()),
        &[WeaponType::Pistol],
        fire_mode,
    )
}

fn powerup(kind: PowerupTypeData, weapon_type: Option<WeaponType>) -> PowerupSpawnData {
    PowerupSpawnData {
        x: 1.5,
        y: 2.5,
        kind,
        weapon_type,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> FrameInput {
    FrameInput::default()
}

fn firing() -> FrameInput {
    FrameInput {
        shoot: true,
        ..FrameInput::default()
    }
}

fn run(state: &GameState, input: &FrameInput, ticks: usize, rng: &mut StdRng) -> GameState {
    let mut s = state.clone();
    for _ in 0..ticks {
        s = tick(&s, input, DT, rng);
    }
    s
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_defaults() {
    let s = make_state(&[], FireMode::Projectile);
    assert_eq!(s.player.x, 1.5 * CELL_SIZE);
    assert_eq!(s.player.y, 2.5 * CELL_SIZE);
    assert_eq!(s.player.angle, 0.0);
    assert_eq!(s.player.health, 100);
    assert_eq!(s.player.max_health, 100);
    assert_eq!(s.player.ammo, 50);
    assert_eq!(s.player.max_ammo, 100);
    assert_eq!(s.player.armor, 0);
    assert_eq!(s.player.kills, 0);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.bullets.is_empty());
}

#[test]
fn init_state_spawns_full_health_enemies() {
    let s = make_state(&[(6.5, 2.5), (10.5, 1.5)], FireMode::Projectile);
    assert_eq!(s.enemies.len(), 2);
    assert!(s.enemies.iter().all(|e| e.active && e.health == 100));
    assert_eq!(s.active_enemy_count(), 2);
}

#[test]
fn init_state_arsenal_dedupes_and_equips_first() {
    let level = level_with(corridor(), &[], Vec::new());
    let s = init_state(
        &level,
        &[WeaponType::Rifle, WeaponType::Rifle, WeaponType::Pistol],
        FireMode::Projectile,
    );
    assert_eq!(s.player.weapon, WeaponType::Rifle);
    assert_eq!(s.player.arsenal, vec![WeaponType::Rifle, WeaponType::Pistol]);

    let s = init_state(&level, &[], FireMode::Projectile);
    assert_eq!(s.player.weapon, WeaponType::Pistol);
    assert_eq!(s.player.arsenal, vec![WeaponType::Pistol]);
}

// ── Damage law ────────────────────────────────────────────────────────────────

#[test]
fn effective_damage_never_below_one() {
    assert_eq!(effective_damage(10, 15), 1);
    assert_eq!(effective_damage(10, 10), 1);
    assert_eq!(effective_damage(1, 0), 1);
    assert_eq!(effective_damage(30, 0), 30);
    assert_eq!(effective_damage(8, 3), 5);
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn diagonal_movement_is_normalized() {
    let combos = [
        MoveIntents { forward: true, right: true, ..MoveIntents::default() },
        MoveIntents { forward: true, left: true, ..MoveIntents::default() },
        MoveIntents { backward: true, right: true, ..MoveIntents::default() },
        MoveIntents { backward: true, left: true, ..MoveIntents::default() },
    ];
    for angle in [0.0, 0.7, 2.0, 4.5] {
        for intents in &combos {
            let (dx, dy) = movement_vector(angle, intents).unwrap();
            assert!((dx.hypot(dy) - MOVE_SPEED).abs() < 1e-4);
        }
    }
}

#[test]
fn single_axis_movement_has_full_speed() {
    let forward = MoveIntents { forward: true, ..MoveIntents::default() };
    let (dx, dy) = movement_vector(0.0, &forward).unwrap();
    assert!((dx - 3.5).abs() < 1e-6);
    assert!(dy.abs() < 1e-6);

    // Strafing right while facing +x moves along +y.
    let right = MoveIntents { right: true, ..MoveIntents::default() };
    let (dx, dy) = movement_vector(0.0, &right).unwrap();
    assert!(dx.abs() < 1e-5);
    assert!((dy - 3.5).abs() < 1e-5);
}

#[test]
fn opposing_intents_cancel() {
    let intents = MoveIntents {
        forward: true,
        backward: true,
        left: true,
        right: true,
    };
    assert_eq!(movement_vector(1.0, &intents), None);
    assert_eq!(movement_vector(1.0, &MoveIntents::default()), None);
}

#[test]
fn move_player_forward_advances_walk_cycle() {
    let s = make_state(&[], FireMode::Projectile);
    let forward = MoveIntents { forward: true, ..MoveIntents::default() };
    let moved = move_player(&s, &forward);
    assert!((moved.player.x - (s.player.x + 3.5)).abs() < 1e-4);
    assert_eq!(moved.player.y, s.player.y);
    assert_eq!(moved.walk_cycle, WALK_CYCLE_STEP);
}

#[test]
fn move_into_wall_leaves_position_unchanged() {
    let mut s = make_state(&[], FireMode::Projectile);
    s.player.x = CELL_SIZE + 1.0;
    s.player.angle = PI;
    let forward = MoveIntents { forward: true, ..MoveIntents::default() };

    let moved = move_player(&s, &forward);
    assert_eq!(moved.player.x.to_bits(), s.player.x.to_bits());
    assert_eq!(moved.player.y.to_bits(), s.player.y.to_bits());
    // The walk cycle still runs while the player pushes against the wall.
    assert_eq!(moved.walk_cycle, WALK_CYCLE_STEP);
}

#[test]
fn no_intents_is_a_no_op() {
    let s = make_state(&[], FireMode::Projectile);
    let moved = move_player(&s, &MoveIntents::default());
    assert_eq!(moved.player, s.player);
    assert_eq!(moved.walk_cycle, 0.0);
}

#[test]
fn rotate_wraps_into_full_turn() {
    let s = make_state(&[], FireMode::Projectile);
    let turned = rotate_player(&s, -0.1);
    assert!((turned.player.angle - (TAU - 0.1)).abs() < 1e-5);

    let turned = rotate_player(&turned, 0.2);
    assert!((turned.player.angle - 0.1).abs() < 1e-5);
}

#[test]
fn tick_turn_input_rotates_at_turn_speed() {
    let s = make_state(&[FAR_AWAY], FireMode::Projectile);
    let mut rng = seeded_rng();
    let input = FrameInput {
        turn: 1.0,
        look: 0.01,
        ..FrameInput::default()
    };
    let next = tick(&s, &input, DT, &mut rng);
    assert!((next.player.angle - (TURN_SPEED + 0.01)).abs() < 1e-6);
}

// ── Weapons ───────────────────────────────────────────────────────────────────

#[test]
fn switch_weapon_ignores_unowned() {
    let s = make_state(&[], FireMode::Projectile);
    let switched = switch_weapon(&s, WeaponSwitch::To(WeaponType::Rifle));
    assert_eq!(switched.player.weapon, WeaponType::Pistol);
}

#[test]
fn switch_weapon_next_cycles_arsenal() {
    let level = level_with(corridor(), &[], Vec::new());
    let s = init_state(&level, &WeaponType::ALL, FireMode::Projectile);

    let s = switch_weapon(&s, WeaponSwitch::Next);
    assert_eq!(s.player.weapon, WeaponType::Shotgun);
    let s = switch_weapon(&s, WeaponSwitch::Next);
    assert_eq!(s.player.weapon, WeaponType::Rifle);
    let s = switch_weapon(&s, WeaponSwitch::Next);
    assert_eq!(s.player.weapon, WeaponType::Pistol);

    let s = switch_weapon(&s, WeaponSwitch::To(WeaponType::Rifle));
    assert_eq!(s.player.weapon, WeaponType::Rifle);
}

#[test]
fn shoot_without_ammo_is_a_no_op() {
    let mut s = make_state(&[], FireMode::Projectile);
    s.player.ammo = 0;
    let mut rng = seeded_rng();

    let after = player_shoot(&s, &mut rng);
    assert!(after.bullets.is_empty());
    assert_eq!(after.last_shot, None);
    assert_eq!(after.player.ammo, 0);
    assert!(!after.is_muzzle_flash());
}

#[test]
fn shoot_while_paused_is_a_no_op() {
    let s = toggle_pause(&make_state(&[], FireMode::Projectile));
    let mut rng = seeded_rng();
    assert!(!can_shoot(&s));
    let after = player_shoot(&s, &mut rng);
    assert_eq!(after.player.ammo, 50);
}

#[test]
fn shotgun_spawns_one_bullet_per_pellet() {
    let level = level_with(corridor(), &[], Vec::new());
    let s = init_state(&level, &[WeaponType::Shotgun], FireMode::Projectile);
    let mut rng = seeded_rng();

    let after = player_shoot(&s, &mut rng);
    assert_eq!(after.bullets.len(), 6);
    assert_eq!(after.player.ammo, 49);

    let spread = WeaponType::Shotgun.stats().spread;
    for b in &after.bullets {
        assert!(!b.from_enemy);
        assert_eq!(b.damage, 15);
        assert!(b.dir_y.atan2(b.dir_x).abs() <= spread / 2.0 + 1e-6);
    }
}

#[test]
fn fire_rate_limits_held_trigger() {
    let s = make_state(&[FAR_AWAY], FireMode::Projectile);
    let mut rng = seeded_rng();

    // 400 ms pistol cooldown at 16 ms per tick: shots on ticks 1 and 26.
    let after = run(&s, &firing(), 25, &mut rng);
    assert_eq!(after.player.ammo, 49);
    let after = run(&after, &firing(), 1, &mut rng);
    assert_eq!(after.player.ammo, 48);
}

#[test]
fn muzzle_flash_and_recoil_decay() {
    let s = make_state(&[FAR_AWAY], FireMode::Projectile);
    let mut rng = seeded_rng();

    let shot = tick(&s, &firing(), DT, &mut rng);
    assert!(shot.is_muzzle_flash());
    assert_eq!(shot.recoil, 1.0);

    let later = run(&shot, &idle(), 7, &mut rng);
    assert!(!later.is_muzzle_flash());

    let later = run(&later, &idle(), 3, &mut rng);
    assert_eq!(later.recoil, 0.0);
}

// ── End-to-end shooting ───────────────────────────────────────────────────────

#[test]
fn hitscan_single_shot_damages_without_score() {
    let s = make_state(&[(6.5, 2.5)], FireMode::Hitscan);
    let mut rng = seeded_rng();

    let after = tick(&s, &firing(), DT, &mut rng);
    let enemy = &after.enemies[0];
    assert_eq!(enemy.health, 100 - WeaponType::Pistol.stats().damage as i32);
    assert!(enemy.active);
    assert_eq!(after.score, 0);
    assert_eq!(after.player.ammo, 49);
}

#[test]
fn projectile_single_shot_damages_without_score() {
    let s = make_state(&[(6.5, 2.5)], FireMode::Projectile);
    let mut rng = seeded_rng();

    let after = tick(&s, &firing(), DT, &mut rng);
    assert_eq!(after.bullets.iter().filter(|b| !b.from_enemy).count(), 1);

    // 320 units at 12 per tick.
    let after = run(&after, &idle(), 40, &mut rng);
    let enemy = &after.enemies[0];
    assert_eq!(enemy.health, 100 - WeaponType::Pistol.stats().damage as i32);
    assert!(enemy.active);
    assert_eq!(after.score, 0);
    assert!(after.bullets.iter().all(|b| b.from_enemy));
}

#[test]
fn repeated_hits_kill_exactly_once() {
    // The second enemy is out of every range and keeps the level running.
    let s = make_state(&[(6.5, 2.5), FAR_AWAY], FireMode::Hitscan);
    let mut rng = seeded_rng();

    // Shots on ticks 1, 26, 51 and 76: 30 damage each against 100 health.
    let after = run(&s, &firing(), 100, &mut rng);
    let target = &after.enemies[0];
    assert!(!target.active);
    assert_eq!(target.health, 0);
    assert_eq!(after.score, KILL_BONUS);
    assert_eq!(after.player.kills, 1);
    assert_eq!(after.player.ammo, 46);
    assert_eq!(after.status, GameStatus::Playing);

    // Further shooting finds no target and awards nothing.
    let after = run(&after, &firing(), 100, &mut rng);
    assert_eq!(after.score, KILL_BONUS);
    assert_eq!(after.player.kills, 1);
}

#[test]
fn pellets_hitting_a_dying_enemy_award_one_kill() {
    let level = level_with(corridor(), &[(3.0, 2.5), FAR_AWAY], Vec::new());
    let mut s = init_state(&level, &[WeaponType::Shotgun], FireMode::Projectile);
    s.enemies[0].health = 10;
    let mut rng = seeded_rng();

    let after = run(&s, &firing(), 1, &mut rng);
    let after = run(&after, &idle(), 20, &mut rng);
    assert!(!after.enemies[0].active);
    assert_eq!(after.score, KILL_BONUS);
    assert_eq!(after.player.kills, 1);
}

#[test]
fn hitscan_blocked_by_wall() {
    let mut map = corridor();
    for row in map.iter_mut().take(4).skip(1) {
        row[4] = 1;
    }
    let level = level_with(map, &[(6.5, 2.5)], Vec::new());
    let s = init_state(&level, &[WeaponType::Pistol], FireMode::Hitscan);
    let mut rng = seeded_rng();

    let after = player_shoot(&s, &mut rng);
    assert_eq!(after.enemies[0].health, 100);
    // The shot is still spent.
    assert_eq!(after.player.ammo, 49);
}

// ── Enemy AI ──────────────────────────────────────────────────────────────────

#[test]
fn melee_hits_once_per_cooldown() {
    let s = make_state(&[(1.5 + 20.0 / CELL_SIZE, 2.5)], FireMode::Projectile);
    let mut rng = seeded_rng();

    let after = run(&s, &idle(), 1, &mut rng);
    assert_eq!(after.player.health, 100 - MELEE_DAMAGE as i32);

    // Ticks 2..=63 fall inside the 1000 ms cooldown.
    let after = run(&after, &idle(), 62, &mut rng);
    assert_eq!(after.player.health, 100 - MELEE_DAMAGE as i32);

    let after = run(&after, &idle(), 1, &mut rng);
    assert_eq!(after.player.health, 100 - 2 * MELEE_DAMAGE as i32);
}

#[test]
fn melee_damage_is_reduced_by_armor() {
    let mut s = make_state(&[(1.5 + 20.0 / CELL_SIZE, 2.5)], FireMode::Projectile);
    s.player.armor = 4;
    let after = update_enemies(&s);
    assert_eq!(after.player.health, 100 - 6);
}

#[test]
fn enemy_chases_when_close() {
    let s = make_state(&[(4.5, 2.5)], FireMode::Projectile);
    let after = update_enemies(&s);
    let enemy = &after.enemies[0];
    assert!((enemy.x - (4.5 * CELL_SIZE - ENEMY_SPEED)).abs() < 1e-4);
    assert!((enemy.y - 2.5 * CELL_SIZE).abs() < 1e-4);
    assert_eq!(enemy.anim_frame, 1);
    assert!(after.bullets.is_empty());
}

#[test]
fn enemy_shoots_from_range_with_sight() {
    let s = make_state(&[(8.5, 2.5)], FireMode::Projectile);
    let after = update_enemies(&s);

    assert_eq!(after.bullets.len(), 1);
    let bullet = &after.bullets[0];
    assert!(bullet.from_enemy);
    assert_eq!(bullet.damage, EnemyWeapon::Pistol.stats().damage);
    assert!((bullet.dir_x + 1.0).abs() < 1e-5);
    assert_eq!(after.enemies[0].last_ranged, Some(Duration::ZERO));

    // Cooldown holds the next shot back.
    let again = update_enemies(&after);
    assert_eq!(again.bullets.len(), 1);
}

#[test]
fn enemy_needs_line_of_sight_to_shoot() {
    let mut map = corridor();
    for row in map.iter_mut().take(4).skip(1) {
        row[5] = 1;
    }
    let level = level_with(map, &[(8.5, 2.5)], Vec::new());
    let s = init_state(&level, &[WeaponType::Pistol], FireMode::Projectile);

    let after = update_enemies(&s);
    assert!(after.bullets.is_empty());
    assert_eq!(after.enemies[0].last_ranged, None);
}

#[test]
fn inactive_enemies_are_skipped() {
    let mut s = make_state(&[(1.5 + 20.0 / CELL_SIZE, 2.5)], FireMode::Projectile);
    s.enemies[0].active = false;
    let after = update_enemies(&s);
    assert_eq!(after.player.health, 100);
    assert_eq!(after.enemies[0], s.enemies[0]);
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn enemy_bullet_damage_reduced_by_armor() {
    let mut s = make_state(&[FAR_AWAY], FireMode::Projectile);
    s.player.armor = 3;
    s.bullets.push(Bullet::new(s.player.x + 15.0, s.player.y, PI, 8, true));

    let after = advance_bullets(&s);
    assert_eq!(after.player.health, 95);
    assert!(after.bullets.is_empty());
}

#[test]
fn bullet_entering_wall_is_removed() {
    let mut s = make_state(&[], FireMode::Projectile);
    s.bullets.push(Bullet::new(CELL_SIZE + 6.0, s.player.y, PI, 30, false));
    let after = advance_bullets(&s);
    assert!(after.bullets.is_empty());
}

#[test]
fn bullet_in_flight_moves_one_step() {
    let mut s = make_state(&[], FireMode::Projectile);
    s.bullets.push(Bullet::new(s.player.x, s.player.y, 0.0, 30, false));
    let after = advance_bullets(&s);
    assert_eq!(after.bullets.len(), 1);
    assert!((after.bullets[0].x - (s.player.x + BULLET_STEP)).abs() < 1e-4);
}

// ── Powerups ──────────────────────────────────────────────────────────────────

#[test]
fn health_powerup_clamps_to_max() {
    let level = level_with(corridor(), &[], vec![powerup(PowerupTypeData::Health, None)]);
    let mut s = init_state(&level, &[WeaponType::Pistol], FireMode::Projectile);
    s.player.health = s.player.max_health - 5;

    let after = collect_powerups(&s);
    assert_eq!(after.player.health, after.player.max_health);
    assert!(!after.powerups[0].active);

    // An inactive powerup is never applied twice.
    let mut again = after.clone();
    again.player.health = 50;
    assert_eq!(collect_powerups(&again).player.health, 50);
}

#[test]
fn ammo_and_armor_powerups_clamp() {
    let level = level_with(
        corridor(),
        &[],
        vec![
            powerup(PowerupTypeData::Ammo, None),
            powerup(PowerupTypeData::Armor, None),
        ],
    );
    let mut s = init_state(&level, &[WeaponType::Pistol], FireMode::Projectile);
    s.player.ammo = 90;
    s.player.armor = 4;

    // Both are in reach and apply in the same tick.
    let after = collect_powerups(&s);
    assert_eq!(after.player.ammo, 100);
    assert_eq!(after.player.armor, MAX_ARMOR);
    assert!(after.powerups.iter().all(|p| !p.active));
}

#[test]
fn weapon_powerup_unlocks_and_equips() {
    let level = level_with(
        corridor(),
        &[],
        vec![powerup(PowerupTypeData::Weapon, Some(WeaponType::Shotgun))],
    );
    let s = init_state(&level, &[WeaponType::Pistol], FireMode::Projectile);

    let after = collect_powerups(&s);
    assert_eq!(after.player.weapon, WeaponType::Shotgun);
    assert_eq!(after.player.arsenal, vec![WeaponType::Pistol, WeaponType::Shotgun]);
}

#[test]
fn powerup_out_of_reach_stays() {
    let level = level_with(
        corridor(),
        &[],
        vec![PowerupSpawnData {
            x: 5.5,
            y: 2.5,
            kind: PowerupTypeData::Health,
            weapon_type: None,
        }],
    );
    let mut s = init_state(&level, &[WeaponType::Pistol], FireMode::Projectile);
    s.player.health = 40;
    let after = collect_powerups(&s);
    assert_eq!(after.player.health, 40);
    assert!(after.powerups[0].active);
}

// ── Status transitions ────────────────────────────────────────────────────────

#[test]
fn killing_last_enemy_completes_level() {
    let mut s = make_state(&[(6.5, 2.5)], FireMode::Hitscan);
    s.enemies[0].health = 10;
    let mut rng = seeded_rng();

    let after = tick(&s, &firing(), DT, &mut rng);
    assert_eq!(after.status, GameStatus::LevelComplete);
    assert!(after.is_terminal());
    assert_eq!(after.score, KILL_BONUS);

    // Terminal states freeze the simulation.
    let frozen = run(&after, &firing(), 10, &mut rng);
    assert_eq!(frozen.clock, after.clock);
    assert_eq!(frozen.player.ammo, after.player.ammo);
}

#[test]
fn game_over_takes_precedence() {
    let mut s = make_state(&[(6.5, 2.5)], FireMode::Projectile);
    s.enemies[0].active = false;
    s.player.health = 0;
    let mut rng = seeded_rng();

    let after = tick(&s, &idle(), DT, &mut rng);
    assert_eq!(after.status, GameStatus::GameOver);
}

#[test]
fn lethal_damage_beats_same_tick_health_pickup() {
    let level = level_with(
        corridor(),
        &[(1.5 + 20.0 / CELL_SIZE, 2.5)],
        vec![powerup(PowerupTypeData::Health, None)],
    );
    let mut s = init_state(&level, &[WeaponType::Pistol], FireMode::Projectile);
    s.player.health = 5;
    let mut rng = seeded_rng();

    let after = tick(&s, &idle(), DT, &mut rng);
    assert_eq!(after.status, GameStatus::GameOver);
    assert!(after.player.health <= 0);
    // The pack under the player is left untouched.
    assert!(after.powerups[0].active);
}

#[test]
fn pause_freezes_simulation() {
    let s = make_state(&[(4.5, 2.5)], FireMode::Projectile);
    let paused = toggle_pause(&s);
    assert_eq!(paused.status, GameStatus::Paused);
    let mut rng = seeded_rng();

    let input = FrameInput {
        movement: MoveIntents { forward: true, ..MoveIntents::default() },
        shoot: true,
        ..FrameInput::default()
    };
    let after = run(&paused, &input, 5, &mut rng);
    assert_eq!(after.clock, Duration::ZERO);
    assert_eq!(after.player, s.player);
    assert_eq!(after.enemies, s.enemies);

    assert_eq!(toggle_pause(&after).status, GameStatus::Playing);
}

#[test]
fn toggle_pause_leaves_terminal_states() {
    let mut s = make_state(&[], FireMode::Projectile);
    s.status = GameStatus::GameOver;
    assert_eq!(toggle_pause(&s).status, GameStatus::GameOver);
}

#[test]
fn tick_advances_clock_and_frame() {
    let s = make_state(&[FAR_AWAY], FireMode::Projectile);
    let mut rng = seeded_rng();
    let after = run(&s, &idle(), 3, &mut rng);
    assert_eq!(after.clock, DT * 3);
    assert_eq!(after.frame, 3);
}
