//! Rendering layer: turns a `GameState` into pixels.
//!
//! No game logic is performed here; the renderer only reads the state.
//! Per frame: flat ceiling and floor, one ray per horizontal slot for the
//! walls (recording a per-ray depth buffer), depth-sorted sprites tested
//! against that buffer, then the first-person weapon and the crosshair.

use std::collections::HashMap;

use crate::config::GraphicsPreset;
use crate::entities::{Enemy, GameState, PowerupKind, WeaponType};
use crate::framebuffer::{FrameBuffer, Rgb};
use crate::map::CELL_SIZE;
use crate::raycast::{cast_ray, is_line_of_sight, relative_angle, RayParams, FOV, STEP_SIZE};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_CEILING: Rgb = Rgb::hex(0x0a0505);
const C_FLOOR: Rgb = Rgb::hex(0x1a0f0a);
const C_CROSSHAIR: Rgb = Rgb::hex(0xff4444);

const C_ENEMY_BODY: Rgb = Rgb::hex(0x1a1a1a);
const C_ENEMY_HEAD: Rgb = Rgb::hex(0x8b0000);
const C_ENEMY_EYES: Rgb = Rgb::hex(0xff4444);
const C_ENEMY_LEGS: Rgb = Rgb::hex(0x2d2d2d);
const C_BAR_BACK: Rgb = Rgb::hex(0x333333);
const C_BAR_HEALTHY: Rgb = Rgb::hex(0x00ff00);
const C_BAR_WOUNDED: Rgb = Rgb::hex(0xffaa00);
const C_BAR_CRITICAL: Rgb = Rgb::hex(0xff4444);

const C_HEALTH: Rgb = Rgb::hex(0x00ff00);
const C_AMMO: Rgb = Rgb::hex(0xffff00);
const C_AMMO_INNER: Rgb = Rgb::hex(0xff8800);
const C_ARMOR: Rgb = Rgb::hex(0x0088ff);
const C_WEAPON_PICKUP: Rgb = Rgb::hex(0xff00ff);

const C_GUN_BODY: Rgb = Rgb::hex(0x2d2d2d);
const C_GUN_DARK: Rgb = Rgb::hex(0x1a1a1a);
const C_GUN_BARREL: Rgb = Rgb::hex(0x8b0000);
const C_GUN_GRIP: Rgb = Rgb::hex(0x4a4a4a);
const C_GUN_TRIM: Rgb = Rgb::hex(0x666666);
const C_GUN_SIGHT: Rgb = Rgb::hex(0x333333);
const C_FLASH_RED: Rgb = Rgb::hex(0xff4444);
const C_FLASH_ORANGE: Rgb = Rgb::hex(0xffa500);
const C_FLASH_YELLOW: Rgb = Rgb::hex(0xffff00);

// ── Projection constants ─────────────────────────────────────────────────────

/// Wall height per (cell size / distance), as a fraction of frame height.
const WALL_PROJECTION: f32 = 400.0 / 720.0;
const ENEMY_PROJECTION: f32 = 400.0 / 720.0;
const POWERUP_PROJECTION: f32 = 300.0 / 720.0;
/// Sprites slightly outside the FOV are still collected so they can
/// slide in from the screen edges.
const SPRITE_FOV_MARGIN: f32 = 0.2;
/// Frame height the viewmodel geometry is authored for.
const VIEWMODEL_HEIGHT: f32 = 600.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    pub num_rays: usize,
    /// View distance in cells.
    pub max_depth: f32,
    pub step_size: f32,
    pub fov: f32,
}

impl RenderSettings {
    pub fn from_preset(preset: GraphicsPreset) -> Self {
        Self {
            num_rays: preset.num_rays(),
            max_depth: preset.max_depth(),
            step_size: STEP_SIZE,
            fov: FOV,
        }
    }

    pub fn ray_params(&self) -> RayParams {
        RayParams {
            step_size: self.step_size,
            max_depth: self.max_depth * CELL_SIZE,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_preset(GraphicsPreset::default())
    }
}

// ── Wall shading ─────────────────────────────────────────────────────────────

/// Warm grey that darkens with distance. `brightness` in `[0, 1]`.
pub fn wall_color(brightness: f32) -> Rgb {
    let gray = (brightness.clamp(0.0, 1.0) * 100.0).floor() as u32 + 50;
    Rgb::new(gray as u8, (gray * 7 / 10) as u8, (gray / 2) as u8)
}

/// Memoised `wall_color`, keyed by brightness quantised to 0.01.
#[derive(Debug, Default)]
pub struct WallShades {
    cache: HashMap<u32, Rgb>,
}

impl WallShades {
    pub fn get(&mut self, brightness: f32) -> Rgb {
        let brightness = brightness.clamp(0.0, 1.0);
        let key = (brightness * 100.0).floor() as u32;
        *self
            .cache
            .entry(key)
            .or_insert_with(|| wall_color(brightness))
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Three-tier health bar colour.
pub fn health_color(fraction: f32) -> Rgb {
    if fraction > 0.5 {
        C_BAR_HEALTHY
    } else if fraction > 0.25 {
        C_BAR_WOUNDED
    } else {
        C_BAR_CRITICAL
    }
}

// ── Sprites ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteRef {
    Enemy(usize),
    Powerup(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub target: SpriteRef,
    /// Horizontal centre on screen, in pixels.
    pub screen_x: f32,
    pub distance: f32,
    /// Distance along the view direction, comparable with the z-buffer.
    pub depth: f32,
    /// On-screen size in pixels.
    pub size: f32,
}

/// What the last frame put on screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Sprites that passed the FOV, range and sight tests, farthest first.
    pub visible: Vec<Sprite>,
    /// Sprites that also passed the depth-buffer test, in draw order.
    pub drawn: Vec<SpriteRef>,
}

// ── Renderer ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Renderer {
    settings: RenderSettings,
    shades: WallShades,
    z_buffer: Vec<f32>,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            shades: WallShades::default(),
            z_buffer: Vec::new(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Corrected wall distance per ray from the last frame. Rays that hit
    /// nothing hold `f32::INFINITY`.
    pub fn z_buffer(&self) -> &[f32] {
        &self.z_buffer
    }

    pub fn shades(&self) -> &WallShades {
        &self.shades
    }

    /// Draw one complete frame.
    pub fn render(&mut self, fb: &mut FrameBuffer, state: &GameState) -> FrameReport {
        if fb.width() == 0 || fb.height() == 0 {
            return FrameReport::default();
        }
        let width = fb.width() as f32;
        let height = fb.height() as f32;

        fb.fill_rect(0.0, 0.0, width, height / 2.0, C_CEILING);
        fb.fill_rect(0.0, height / 2.0, width, height - height / 2.0, C_FLOOR);

        self.draw_walls(fb, state);

        let visible = self.collect_sprites(state, width, height);
        let num_rays = self.z_buffer.len();
        let mut drawn = Vec::new();

        for sprite in &visible {
            let ray = (sprite.screen_x / width * num_rays as f32).floor();
            if ray < 0.0 || ray >= num_rays as f32 {
                continue;
            }
            if sprite.depth >= self.z_buffer[ray as usize] {
                continue;
            }

            match sprite.target {
                SpriteRef::Enemy(i) => {
                    draw_enemy(fb, sprite.screen_x, height / 2.0, sprite.size, &state.enemies[i])
                }
                SpriteRef::Powerup(i) => {
                    draw_powerup(fb, sprite.screen_x, height / 2.0, sprite.size, state.powerups[i].kind)
                }
            }
            drawn.push(sprite.target);
        }

        draw_weapon(fb, state);
        draw_crosshair(fb);

        FrameReport { visible, drawn }
    }

    fn draw_walls(&mut self, fb: &mut FrameBuffer, state: &GameState) {
        let num_rays = self.settings.num_rays.max(1);
        self.z_buffer.clear();
        self.z_buffer.resize(num_rays, f32::INFINITY);

        let width = fb.width() as f32;
        let height = fb.height() as f32;
        let ray_width = width / num_rays as f32;
        let params = self.settings.ray_params();
        let projection = height * WALL_PROJECTION;
        let fov = self.settings.fov;
        let p = &state.player;

        for ray in 0..num_rays {
            let offset = -fov / 2.0 + (ray as f32 / num_rays as f32) * fov;
            let hit = cast_ray(&state.grid, p.x, p.y, p.angle + offset, &params);
            if !hit.hit {
                continue;
            }

            // Fish-eye correction.
            let perp = (hit.distance * offset.cos()).max(f32::EPSILON);
            self.z_buffer[ray] = perp;

            let wall_height = CELL_SIZE / perp * projection;
            let brightness = (1.0 - perp / params.max_depth).max(0.0);
            let color = self.shades.get(brightness);

            fb.fill_rect(
                ray as f32 * ray_width,
                (height - wall_height) / 2.0,
                ray_width.ceil(),
                wall_height,
                color,
            );
        }
    }

    /// Active enemies and powerups that are inside the FOV (plus margin),
    /// within view distance and in line of sight, sorted farthest first.
    pub fn collect_sprites(&self, state: &GameState, width: f32, height: f32) -> Vec<Sprite> {
        let powerups = state
            .powerups
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active)
            .filter_map(|(i, p)| {
                self.project(state, p.x, p.y, width, height * POWERUP_PROJECTION, SpriteRef::Powerup(i))
            });

        let enemies = state
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.active)
            .filter_map(|(i, e)| {
                self.project(state, e.x, e.y, width, height * ENEMY_PROJECTION, SpriteRef::Enemy(i))
            });

        let mut sprites: Vec<Sprite> = powerups.chain(enemies).collect();
        sprites.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        sprites
    }

    fn project(
        &self,
        state: &GameState,
        x: f32,
        y: f32,
        width: f32,
        projection: f32,
        target: SpriteRef,
    ) -> Option<Sprite> {
        let p = &state.player;
        let dx = x - p.x;
        let dy = y - p.y;
        let distance = dx.hypot(dy);
        if distance <= f32::EPSILON || distance >= self.settings.max_depth * CELL_SIZE {
            return None;
        }

        let angle = relative_angle(p.angle, dx, dy);
        if angle.abs() >= self.settings.fov / 2.0 + SPRITE_FOV_MARGIN {
            return None;
        }
        if !is_line_of_sight(&state.grid, p.x, p.y, x, y) {
            return None;
        }

        Some(Sprite {
            target,
            screen_x: (angle / self.settings.fov + 0.5) * width,
            distance,
            depth: distance * angle.cos(),
            size: CELL_SIZE / distance * projection,
        })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

// ── Sprite drawing ───────────────────────────────────────────────────────────

fn draw_enemy(fb: &mut FrameBuffer, x: f32, y: f32, size: f32, enemy: &Enemy) {
    let head = size * 0.35;
    let body_w = size * 0.5;
    let body_h = size * 0.4;
    let leg_h = size * 0.25;
    let top = y - size / 2.0;

    fb.fill_rect(x - body_w / 2.0, top + head, body_w, body_h, C_ENEMY_BODY);
    fb.fill_circle(x, top + head / 2.0, head / 2.0, C_ENEMY_HEAD);

    let eye = head * 0.15;
    fb.fill_rect(x - head * 0.2, top + head / 2.0 - eye / 2.0, eye, eye, C_ENEMY_EYES);
    fb.fill_rect(x + head * 0.05, top + head / 2.0 - eye / 2.0, eye, eye, C_ENEMY_EYES);

    // Alternate the legs while walking.
    let stride = if (enemy.anim_frame / 8) % 2 == 1 { leg_h * 0.15 } else { 0.0 };
    let legs_y = top + head + body_h;
    fb.fill_rect(x - body_w / 4.0, legs_y, body_w / 5.0, leg_h - stride, C_ENEMY_LEGS);
    fb.fill_rect(x + body_w / 20.0, legs_y, body_w / 5.0, leg_h - (leg_h * 0.15 - stride), C_ENEMY_LEGS);

    fb.fill_rect(x + body_w / 2.0, top + head + body_h * 0.3, size * 0.3, size * 0.08, C_ENEMY_BODY);

    let bar_w = size * 0.6;
    let bar_h = (size * 0.04).max(1.0);
    let bar_y = top - bar_h * 2.5;
    let fraction = if enemy.max_health > 0 {
        (enemy.health as f32 / enemy.max_health as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    fb.fill_rect(x - bar_w / 2.0, bar_y, bar_w, bar_h, C_BAR_BACK);
    fb.fill_rect(x - bar_w / 2.0, bar_y, bar_w * fraction, bar_h, health_color(fraction));
}

fn draw_powerup(fb: &mut FrameBuffer, x: f32, y: f32, size: f32, kind: PowerupKind) {
    let s = size * 0.5;
    match kind {
        PowerupKind::Health => {
            fb.fill_rect(x - s / 2.0, y - s * 0.2, s, s * 0.4, C_HEALTH);
            fb.fill_rect(x - s * 0.2, y - s / 2.0, s * 0.4, s, C_HEALTH);
        }
        PowerupKind::Ammo => {
            fb.fill_rect(x - s / 2.0, y - s / 2.0, s, s, C_AMMO);
            fb.fill_rect(x - s * 0.3, y - s * 0.3, s * 0.6, s * 0.6, C_AMMO_INNER);
        }
        PowerupKind::Armor => {
            let diamond = [
                (x, y - s / 2.0),
                (x + s / 2.0, y),
                (x, y + s / 2.0),
                (x - s / 2.0, y),
            ];
            fb.fill_polygon(&diamond, C_ARMOR);
        }
        PowerupKind::Weapon(_) => {
            fb.fill_rect(x - s / 2.0, y - s * 0.15, s, s * 0.3, C_WEAPON_PICKUP);
            fb.fill_rect(x - s * 0.3, y - s * 0.3, s * 0.6, s * 0.15, C_WEAPON_PICKUP);
        }
    }
}

// ── Viewmodel ────────────────────────────────────────────────────────────────

/// Weapon geometry is authored in reference pixels around an anchor
/// point and scaled to the frame.
struct Viewmodel<'a> {
    fb: &'a mut FrameBuffer,
    x: f32,
    y: f32,
    scale: f32,
}

impl Viewmodel<'_> {
    fn rect(&mut self, dx: f32, dy: f32, w: f32, h: f32, color: Rgb) {
        let s = self.scale;
        self.fb
            .fill_rect(self.x + dx * s, self.y + dy * s, w * s, h * s, color);
    }

    fn outline(&mut self, dx: f32, dy: f32, w: f32, h: f32) {
        let s = self.scale;
        self.fb.stroke_rect(
            self.x + dx * s,
            self.y + dy * s,
            w * s,
            h * s,
            (2.0 * s).max(1.0),
            Rgb::BLACK,
        );
    }
}

fn draw_weapon(fb: &mut FrameBuffer, state: &GameState) {
    let scale = fb.height() as f32 / VIEWMODEL_HEIGHT;
    let weapon = state.player.weapon;
    let kick = state.recoil * weapon.stats().recoil * 25.0;
    let bob = state.walk_cycle.sin() * 8.0;

    let mut vm = Viewmodel {
        x: fb.width() as f32 / 2.0,
        y: fb.height() as f32 - (100.0 - bob + kick) * scale,
        scale,
        fb,
    };
    let flash = state.is_muzzle_flash();

    match weapon {
        WeaponType::Pistol => draw_pistol(&mut vm, flash),
        WeaponType::Shotgun => draw_shotgun(&mut vm, flash),
        WeaponType::Rifle => draw_rifle(&mut vm, flash),
    }
}

fn draw_pistol(vm: &mut Viewmodel, flash: bool) {
    vm.rect(-40.0, 0.0, 80.0, 60.0, C_GUN_BODY);
    vm.rect(-35.0, 10.0, 70.0, 15.0, C_GUN_DARK);
    vm.rect(-8.0, -30.0, 16.0, 30.0, C_GUN_BARREL);
    vm.rect(-12.0, 25.0, 24.0, 8.0, C_GUN_GRIP);
    if flash {
        vm.rect(-6.0, -40.0, 12.0, 15.0, C_FLASH_RED);
        vm.rect(-4.0, -50.0, 8.0, 12.0, C_FLASH_ORANGE);
    }
    vm.outline(-40.0, 0.0, 80.0, 60.0);
}

fn draw_shotgun(vm: &mut Viewmodel, flash: bool) {
    vm.rect(-60.0, 0.0, 120.0, 70.0, C_GUN_BODY);
    vm.rect(-55.0, 15.0, 110.0, 20.0, C_GUN_DARK);
    vm.rect(-10.0, -35.0, 20.0, 35.0, C_GUN_BARREL);
    vm.rect(-55.0, 40.0, 40.0, 10.0, C_GUN_GRIP);
    vm.rect(15.0, 40.0, 40.0, 10.0, C_GUN_GRIP);
    vm.rect(-50.0, 5.0, 100.0, 8.0, C_GUN_TRIM);
    vm.rect(-50.0, 50.0, 100.0, 8.0, C_GUN_TRIM);
    if flash {
        vm.rect(-8.0, -45.0, 16.0, 20.0, C_FLASH_RED);
        vm.rect(-12.0, -60.0, 24.0, 18.0, C_FLASH_ORANGE);
        vm.rect(-6.0, -72.0, 12.0, 12.0, C_FLASH_YELLOW);
    }
    vm.outline(-60.0, 0.0, 120.0, 70.0);
}

fn draw_rifle(vm: &mut Viewmodel, flash: bool) {
    vm.rect(-70.0, 0.0, 140.0, 65.0, C_GUN_BODY);
    vm.rect(-65.0, 12.0, 130.0, 18.0, C_GUN_DARK);
    vm.rect(-10.0, -32.0, 20.0, 32.0, C_GUN_BARREL);
    vm.rect(-18.0, 28.0, 36.0, 10.0, C_GUN_GRIP);
    for i in 0..5 {
        vm.rect(-60.0 + i as f32 * 25.0, 42.0, 18.0, 6.0, C_GUN_TRIM);
    }
    vm.rect(-65.0, 5.0, 15.0, 8.0, C_GUN_SIGHT);
    if flash {
        vm.rect(-6.0, -42.0, 12.0, 15.0, C_FLASH_RED);
        vm.rect(-4.0, -52.0, 8.0, 12.0, C_FLASH_ORANGE);
    }
    vm.outline(-70.0, 0.0, 140.0, 65.0);
}

fn draw_crosshair(fb: &mut FrameBuffer) {
    let scale = fb.height() as f32 / VIEWMODEL_HEIGHT;
    let cx = fb.width() as f32 / 2.0;
    let cy = fb.height() as f32 / 2.0;
    let arm = (10.0 * scale).max(2.0);
    let width = (2.0 * scale).max(1.0);
    fb.line(cx - arm, cy, cx + arm, cy, width, C_CROSSHAIR);
    fb.line(cx, cy - arm, cx, cy + arm, width, C_CROSSHAIR);
}
