mod display;
mod progress;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use raycast_shooter::compute::{init_state, tick, toggle_pause};
use raycast_shooter::config::Config;
use raycast_shooter::entities::{GameState, GameStatus, WeaponType};
use raycast_shooter::framebuffer::FrameBuffer;
use raycast_shooter::game_loop::GameLoop;
use raycast_shooter::input::{Command, InputState, Intent, WeaponSwitch};
use raycast_shooter::map::{campaign, Level};
use raycast_shooter::render::{RenderSettings, Renderer};

use progress::Progress;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS presentation

/// Approximate pixel width of one terminal column, for mouse-drag look.
const PIXELS_PER_COLUMN: f32 = 8.0;

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is owned by the game, so logs go to a file.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("Failed to create log file {}", config.log_file.display()))?;

    let env_filter =
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

// ── Key bindings ──────────────────────────────────────────────────────────────

/// Continuous (held) bindings. One-shot keys are handled in `game_loop`.
fn intent_for(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Intent::Forward),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Intent::Backward),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Intent::StrafeLeft),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Intent::StrafeRight),
        KeyCode::Left | KeyCode::Char('j') | KeyCode::Char('J') => Some(Intent::TurnLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(Intent::TurnRight),
        KeyCode::Char(' ') => Some(Intent::Fire),
        _ => None,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(usize),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    levels: &[Level],
    progress: &Progress,
) -> std::io::Result<MenuResult> {
    out.queue(style::ResetColor)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;
    let left = cx.saturating_sub(16);

    let title = "▓▒░  RAYCAST  SHOOTER  ░▒▓";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(7),
    ))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(left, cy.saturating_sub(4)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select level:"))?;

    for (i, level) in levels.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(if progress.is_completed(i) {
            Color::Green
        } else {
            Color::Yellow
        }))?;
        out.queue(Print(format!("{:<12}", level.name)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        let best = progress.high_score(i);
        if best > 0 {
            out.queue(Print(format!(" best {:>6}", best)))?;
        }
        if progress.is_completed(i) {
            out.queue(Print("  ✓"))?;
        }
    }

    let arsenal: Vec<&str> = progress.arsenal().iter().map(|w| w.name()).collect();
    out.queue(cursor::MoveTo(left, cy + levels.len() as u16))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(format!("Arsenal: {}", arsenal.join(", "))))?;

    out.queue(cursor::MoveTo(left, cy + levels.len() as u16 + 2))?;
    out.queue(Print("ENTER : Continue campaign   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = event
        {
            match code {
                KeyCode::Char(c @ '1'..='9') => {
                    let index = (c as u8 - b'1') as usize;
                    if index < levels.len() {
                        return Ok(MenuResult::Start(index));
                    }
                }
                KeyCode::Enter => {
                    let next = (0..levels.len())
                        .find(|&i| !progress.is_completed(i))
                        .unwrap_or(0);
                    return Ok(MenuResult::Start(next));
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit);
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Outcome {
    Quit,
    Menu,
    Restart,
    NextLevel,
}

/// Play one level until the player leaves it.
///
/// Input events are drained once per presented frame and recorded in the
/// `InputState`; the fixed-timestep driver then runs as many simulation
/// ticks as the elapsed time allows, each reading a `FrameInput` snapshot.
/// Rendering happens once per presented frame, after the ticks.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
    state: &mut GameState,
) -> anyhow::Result<Outcome> {
    let mut rng = thread_rng();
    let mut input = InputState::default();
    let mut driver = GameLoop::new(config.tick_rate);
    let mut renderer = Renderer::new(RenderSettings::from_preset(config.graphics));

    let (mut cols, mut rows) = terminal::size()?;
    let (fb_width, fb_height) = display::viewport_size(cols, rows);
    let mut fb = FrameBuffer::new(fb_width, fb_height);

    let mut frame: u64 = 0;
    let mut drag_column: Option<u16> = None;

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        if let Some(intent) = intent_for(code) {
                            input.press(intent, frame);
                        }
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(Outcome::Quit),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(Outcome::Quit);
                            }
                            KeyCode::Esc => return Ok(Outcome::Menu),
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                *state = toggle_pause(state);
                                input.clear();
                                driver.reset();
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') if state.is_terminal() => {
                                return Ok(Outcome::Restart);
                            }
                            KeyCode::Char('n') | KeyCode::Char('N')
                                if state.status == GameStatus::LevelComplete =>
                            {
                                return Ok(Outcome::NextLevel);
                            }
                            KeyCode::Char(c @ '1'..='3') => {
                                let weapon = WeaponType::ALL[(c as u8 - b'1') as usize];
                                input.push(Command::SwitchWeapon(WeaponSwitch::To(weapon)));
                            }
                            KeyCode::Tab | KeyCode::Char('e') | KeyCode::Char('E') => {
                                input.push(Command::SwitchWeapon(WeaponSwitch::Next));
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so the intent stays held
                    KeyEventKind::Repeat => {
                        if let Some(intent) = intent_for(code) {
                            input.press(intent, frame);
                        }
                    }
                    // Release: keyboard-enhancement terminals only
                    KeyEventKind::Release => {
                        if let Some(intent) = intent_for(code) {
                            input.release(intent);
                        }
                    }
                },
                Event::Mouse(MouseEvent { kind, column, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        input.push(Command::Shoot);
                        drag_column = Some(column);
                    }
                    MouseEventKind::Drag(MouseButton::Left) => {
                        if let Some(last) = drag_column {
                            let dx = (column as f32 - last as f32) * PIXELS_PER_COLUMN;
                            input.push(Command::Look(dx * config.sensitivity));
                        }
                        drag_column = Some(column);
                    }
                    MouseEventKind::Up(_) => drag_column = None,
                    _ => {}
                },
                Event::Resize(c, r) => {
                    cols = c;
                    rows = r;
                    let (w, h) = display::viewport_size(cols, rows);
                    fb.resize(w, h);
                    out.queue(terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
        }

        // ── Simulation ────────────────────────────────────────────────────────
        if state.status == GameStatus::Playing {
            driver.tick(|dt| {
                let tick_input = input.next_tick(frame);
                *state = tick(state, &tick_input, dt, &mut rng);
            });
        } else {
            driver.reset();
        }

        // ── Presentation ──────────────────────────────────────────────────────
        renderer.render(&mut fb, state);
        display::render(out, &fb, state, cols, rows)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(&config)?;

    let levels = campaign().context("Built-in levels failed to load")?;
    info!(
        levels = levels.len(),
        graphics = ?config.graphics,
        fire_mode = ?config.fire_mode,
        tick_rate = config.tick_rate,
        "Starting raycast shooter"
    );

    let mut progress = Progress::load(&config.progress_file);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW expiry.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config, &levels, &mut progress);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("Shutting down");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
    levels: &[Level],
    progress: &mut Progress,
) -> anyhow::Result<()> {
    loop {
        let mut index = match show_menu(out, rx, levels, progress)? {
            MenuResult::Quit => return Ok(()),
            MenuResult::Start(index) => index,
        };

        // Play until the player returns to the menu or quits.
        loop {
            let Some(level) = levels.get(index) else {
                break;
            };
            info!(level = %level.name, index, "Starting level");

            let mut state = init_state(level, &progress.arsenal(), config.fire_mode);
            let outcome = game_loop(out, rx, config, &mut state)?;

            // Persist new records
            if progress.record(index, &state) {
                if let Err(err) = progress.save(&config.progress_file) {
                    warn!(error = %err, "Could not save progress");
                }
            }

            match outcome {
                Outcome::Quit => return Ok(()),
                Outcome::Menu => break,
                Outcome::Restart => {}
                Outcome::NextLevel if index + 1 < levels.len() => index += 1,
                Outcome::NextLevel => break,
            }
        }
    }
}
