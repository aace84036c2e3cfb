use raycast_shooter::entities::{EnemyWeapon, PowerupKind, WeaponType};
use raycast_shooter::map::*;

fn level_json(map: &str, enemies: &str, powerups: &str, start: (f32, f32)) -> String {
    format!(
        r#"{{
            "name": "Test",
            "map": {map},
            "enemyPositions": {enemies},
            "powerupPositions": {powerups},
            "playerStart": {{ "x": {}, "y": {} }}
        }}"#,
        start.0, start.1
    )
}

const ROOM: &str = "[[1,1,1,1],[1,0,0,1],[1,0,0,1],[1,1,1,1]]";

// ── TileGrid ──────────────────────────────────────────────────────────────────

#[test]
fn grid_dimensions_and_tiles() {
    let grid = TileGrid::from_rows(&[vec![1, 1, 1], vec![1, 0, 1]]).unwrap();
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.tile(1, 1), Some(Tile::Empty));
    assert_eq!(grid.tile(0, 0), Some(Tile::Wall));
    assert_eq!(grid.tile(3, 0), None);
    assert_eq!(grid.tile(-1, 0), None);
}

#[test]
fn out_of_bounds_is_wall() {
    let grid = TileGrid::from_rows(&[vec![0, 0], vec![0, 0]]).unwrap();
    assert!(grid.is_passable_at(10.0, 10.0));
    assert!(grid.is_wall_at(-0.5, 10.0));
    assert!(grid.is_wall_at(10.0, 2.0 * CELL_SIZE));
    assert!(grid.is_wall_at(1000.0, 1000.0));
}

#[test]
fn cell_of_floors_negative_coordinates() {
    assert_eq!(TileGrid::cell_of(0.0, 63.9), (0, 0));
    assert_eq!(TileGrid::cell_of(64.0, 128.0), (1, 2));
    assert_eq!(TileGrid::cell_of(-0.1, -64.1), (-1, -2));
}

#[test]
fn empty_map_rejected() {
    assert!(matches!(TileGrid::from_rows(&[]), Err(LevelError::EmptyMap)));
    assert!(matches!(TileGrid::from_rows(&[vec![]]), Err(LevelError::EmptyMap)));
}

#[test]
fn ragged_row_rejected() {
    let err = TileGrid::from_rows(&[vec![1, 1, 1], vec![1, 0]]).unwrap_err();
    assert!(matches!(
        err,
        LevelError::RaggedRow {
            row: 1,
            expected: 3,
            found: 2
        }
    ));
}

#[test]
fn unknown_cell_value_rejected() {
    let err = TileGrid::from_rows(&[vec![1, 2]]).unwrap_err();
    assert!(matches!(
        err,
        LevelError::InvalidCell {
            row: 0,
            col: 1,
            value: 2
        }
    ));
}

// ── Level loading ─────────────────────────────────────────────────────────────

#[test]
fn positions_convert_from_cells_to_world() {
    let json = level_json(
        ROOM,
        r#"[{ "x": 2.5, "y": 1.5, "weapon": "rifle" }]"#,
        r#"[{ "x": 1.5, "y": 2.5, "type": "weapon", "weaponType": "shotgun" }]"#,
        (1.5, 1.5),
    );
    let level = Level::from_json(&json).unwrap();

    assert_eq!(level.name, "Test");
    assert_eq!(level.player_start, (96.0, 96.0));
    assert_eq!(
        level.enemy_spawns,
        vec![EnemySpawn {
            x: 160.0,
            y: 96.0,
            weapon: EnemyWeapon::Rifle
        }]
    );
    assert_eq!(level.powerup_spawns[0].kind, PowerupKind::Weapon(WeaponType::Shotgun));
    assert_eq!((level.powerup_spawns[0].x, level.powerup_spawns[0].y), (96.0, 160.0));
}

#[test]
fn missing_lists_default_to_empty() {
    let json = format!(
        r#"{{ "name": "Bare", "map": {ROOM}, "playerStart": {{ "x": 1.5, "y": 1.5 }} }}"#
    );
    let level = Level::from_json(&json).unwrap();
    assert!(level.enemy_spawns.is_empty());
    assert!(level.powerup_spawns.is_empty());
}

#[test]
fn enemy_weapon_defaults_to_pistol() {
    let json = level_json(ROOM, r#"[{ "x": 2.5, "y": 2.5 }]"#, "[]", (1.5, 1.5));
    let level = Level::from_json(&json).unwrap();
    assert_eq!(level.enemy_spawns[0].weapon, EnemyWeapon::Pistol);
}

#[test]
fn spawn_inside_wall_rejected() {
    let json = level_json(ROOM, r#"[{ "x": 0.5, "y": 0.5 }]"#, "[]", (1.5, 1.5));
    assert!(matches!(
        Level::from_json(&json),
        Err(LevelError::BlockedSpawn { what: "Enemy spawn", .. })
    ));

    let json = level_json(ROOM, "[]", "[]", (9.0, 9.0));
    assert!(matches!(
        Level::from_json(&json),
        Err(LevelError::BlockedSpawn { what: "Player start", .. })
    ));
}

#[test]
fn weapon_powerup_needs_weapon_type() {
    let json = level_json(ROOM, "[]", r#"[{ "x": 1.5, "y": 1.5, "type": "weapon" }]"#, (1.5, 1.5));
    assert!(matches!(
        Level::from_json(&json),
        Err(LevelError::MissingWeaponGrant { index: 0 })
    ));
}

#[test]
fn malformed_json_rejected() {
    assert!(matches!(Level::from_json("{ \"name\": 3 }"), Err(LevelError::Parse(_))));
}

#[test]
fn ragged_level_rejected_before_play() {
    let json = level_json("[[1,1,1],[1,0]]", "[]", "[]", (1.5, 1.5));
    assert!(matches!(Level::from_json(&json), Err(LevelError::RaggedRow { .. })));
}

// ── Built-in campaign ─────────────────────────────────────────────────────────

#[test]
fn campaign_loads_every_builtin_level() {
    let levels = campaign().unwrap();
    let names: Vec<&str> = levels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Bunker", "Cellblock", "Armory"]);

    for level in &levels {
        assert!(!level.enemy_spawns.is_empty());
        let (x, y) = level.player_start;
        assert!(level.grid.is_passable_at(x, y));
    }
}

#[test]
fn unknown_builtin_index() {
    assert!(matches!(Level::builtin(9), Err(LevelError::UnknownLevel(9))));
}
