/// Presentation layer: all terminal I/O for the game screen lives here.
///
/// The 3D view arrives as a finished `FrameBuffer`; this module packs two
/// pixel rows into each terminal row with the upper-half-block glyph
/// (foreground = top pixel, background = bottom pixel) and adds the HUD,
/// the controls hint and the status overlays. No game logic is performed.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use raycast_shooter::entities::{GameState, GameStatus, WeaponType};
use raycast_shooter::framebuffer::{FrameBuffer, Rgb};
use raycast_shooter::render::health_color;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_BACK: Color = Color::Rgb { r: 0x14, g: 0x0a, b: 0x0a };
const C_HUD_LABEL: Color = Color::DarkGrey;
const C_HUD_ARMOR: Color = Color::Rgb { r: 0x00, g: 0x88, b: 0xff };
const C_HUD_AMMO: Color = Color::Yellow;
const C_HUD_WEAPON: Color = Color::White;
const C_HUD_WEAPON_OWNED: Color = Color::Grey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Rows taken by the HUD (top) and the controls hint (bottom).
pub const CHROME_ROWS: u16 = 2;

/// Frame-buffer size that fills a terminal of `cols` × `rows` cells.
pub fn viewport_size(cols: u16, rows: u16) -> (usize, usize) {
    (
        cols as usize,
        rows.saturating_sub(CHROME_ROWS) as usize * 2,
    )
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Present one complete frame. The whole screen is overwritten, so no
/// clear is needed between frames.
pub fn render<W: Write>(
    out: &mut W,
    fb: &FrameBuffer,
    state: &GameState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    draw_hud(out, state, cols)?;
    draw_view(out, fb)?;
    draw_controls_hint(out, state, cols, rows)?;

    match state.status {
        GameStatus::Playing => {}
        GameStatus::Paused => draw_paused(out, cols, rows)?,
        GameStatus::GameOver => draw_game_over(out, state, cols, rows)?,
        GameStatus::LevelComplete => draw_level_complete(out, state, cols, rows)?,
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── 3D view (rows 1 .. rows-1) ────────────────────────────────────────────────

fn draw_view<W: Write>(out: &mut W, fb: &FrameBuffer) -> std::io::Result<()> {
    let text_rows = fb.height() / 2;

    for row in 0..text_rows {
        out.queue(cursor::MoveTo(0, row as u16 + 1))?;
        let top = fb.row(row * 2);
        let bottom = fb.row(row * 2 + 1);

        // Only emit colour changes; a row of sky is a single escape pair.
        let mut current: Option<(Rgb, Rgb)> = None;
        let mut run = String::with_capacity(fb.width() * 3);

        for (&fg, &bg) in top.iter().zip(bottom) {
            if current != Some((fg, bg)) {
                if !run.is_empty() {
                    out.queue(Print(&run))?;
                    run.clear();
                }
                out.queue(style::SetColors(style::Colors::new(to_color(fg), to_color(bg))))?;
                current = Some((fg, bg));
            }
            run.push('▀');
        }
        if !run.is_empty() {
            out.queue(Print(&run))?;
        }
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, cols: u16) -> std::io::Result<()> {
    let p = &state.player;

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetBackgroundColor(C_HUD_BACK))?;
    out.queue(Print(" ".repeat(cols as usize)))?;
    out.queue(cursor::MoveTo(1, 0))?;

    let fraction = if p.max_health > 0 {
        p.health as f32 / p.max_health as f32
    } else {
        0.0
    };
    label(out, "HP ")?;
    out.queue(style::SetForegroundColor(to_color(health_color(fraction))))?;
    out.queue(Print(format!("{:>3}/{:<3}", p.health, p.max_health)))?;

    label(out, "  AR ")?;
    out.queue(style::SetForegroundColor(C_HUD_ARMOR))?;
    out.queue(Print(p.armor))?;

    label(out, "  AMMO ")?;
    out.queue(style::SetForegroundColor(C_HUD_AMMO))?;
    out.queue(Print(format!("{:>3}/{:<3}", p.ammo, p.max_ammo)))?;

    out.queue(Print("  "))?;
    for (i, weapon) in WeaponType::ALL.iter().enumerate() {
        let tag = format!("{}:{} ", i + 1, weapon.name());
        if *weapon == p.weapon {
            out.queue(style::SetForegroundColor(C_HUD_WEAPON))?;
            out.queue(Print(format!("[{}]", tag.trim_end())))?;
            out.queue(Print(" "))?;
        } else if p.arsenal.contains(weapon) {
            out.queue(style::SetForegroundColor(C_HUD_WEAPON_OWNED))?;
            out.queue(Print(tag))?;
        }
    }

    // Score, kills and level name, right-aligned.
    let right = format!(
        "Kills {}  Score {:>6}  {}",
        p.kills, state.score, state.level_name
    );
    let rx = cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Kills {}  Score {:>6}  ", p.kills, state.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&state.level_name))?;

    out.queue(style::ResetColor)?;
    Ok(())
}

fn label<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let hint = match state.status {
        GameStatus::Playing => {
            "W/S Move  A/D Strafe  ←/→ Turn  SPACE Fire  1-3/Tab Weapon  P Pause  Esc Menu  Q Quit"
        }
        GameStatus::Paused => "P Resume  Esc Menu  Q Quit",
        GameStatus::GameOver => "R Restart  Esc Menu  Q Quit",
        GameStatus::LevelComplete => "N Next Level  R Restart  Esc Menu  Q Quit",
    };
    let line: String = format!(" {}", hint).chars().take(cols as usize).collect();

    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.queue(style::ResetColor)?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(format!("{:<width$}", line, width = cols as usize)))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_box<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);

    out.queue(style::SetBackgroundColor(Color::Black))?;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_paused<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let lines = [
        ("╔══════════════════╗".to_string(), Color::Yellow),
        ("║      PAUSED      ║".to_string(), Color::Yellow),
        ("╚══════════════════╝".to_string(), Color::Yellow),
        (" P - Resume ".to_string(), Color::White),
    ];
    draw_box(out, &lines, cols, rows)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let lines = [
        ("╔══════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER    ║".to_string(), Color::Red),
        ("╚══════════════════╝".to_string(), Color::Red),
        (format!(" Final Score: {} ", state.score), Color::Yellow),
        (format!(" Kills: {} ", state.player.kills), Color::Yellow),
        (" R - Try Again  Esc - Menu ".to_string(), Color::White),
    ];
    draw_box(out, &lines, cols, rows)
}

fn draw_level_complete<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let lines = [
        ("╔══════════════════════╗".to_string(), Color::Green),
        ("║    LEVEL COMPLETE    ║".to_string(), Color::Green),
        ("╚══════════════════════╝".to_string(), Color::Green),
        (format!(" {} cleared ", state.level_name), Color::Cyan),
        (format!(" Score: {} ", state.score), Color::Yellow),
        (" N - Next Level  R - Replay ".to_string(), Color::White),
    ];
    draw_box(out, &lines, cols, rows)
}
