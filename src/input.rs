//! Input model.
//!
//! Event sources (terminal reader thread, mouse) only record intents here;
//! the simulation reads a `FrameInput` once at the start of every tick.
//!
//! Continuous intents are kept in a `held` map that records the frame
//! number of the last press/repeat event for each intent. Terminals that
//! report key releases remove the intent immediately; classic terminals
//! only send repeated presses, so an intent also expires after
//! `hold_window` frames of silence.
//!
//! One-shot commands (click to shoot, weapon switch, pointer look) go into
//! a queue that is drained by the first tick that reads it, so a command
//! is applied exactly once even when a frame runs several ticks.

use std::collections::{HashMap, VecDeque};

use crate::entities::WeaponType;

/// Frames an intent stays held without a fresh press/repeat event.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Fire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponSwitch {
    To(WeaponType),
    /// Next weapon in the arsenal, wrapping around.
    Next,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Shoot,
    SwitchWeapon(WeaponSwitch),
    /// Pointer rotation, already scaled to radians.
    Look(f32),
}

/// Held movement directions. Opposing pairs cancel out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntents {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything one simulation tick consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub movement: MoveIntents,
    /// Keyboard turning: -1.0 left, 1.0 right, 0.0 none.
    pub turn: f32,
    /// Pointer rotation in radians, applied on top of `turn`.
    pub look: f32,
    pub shoot: bool,
    pub switch_weapon: Option<WeaponSwitch>,
}

#[derive(Debug)]
pub struct InputState {
    held: HashMap<Intent, u64>,
    hold_window: u64,
    queue: VecDeque<Command>,
}

impl InputState {
    pub fn new(hold_window: u64) -> Self {
        Self {
            held: HashMap::new(),
            hold_window,
            queue: VecDeque::new(),
        }
    }

    /// Press or repeat event.
    pub fn press(&mut self, intent: Intent, frame: u64) {
        self.held.insert(intent, frame);
    }

    pub fn release(&mut self, intent: Intent) {
        self.held.remove(&intent);
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Returns true if `intent` was seen within the last `hold_window` frames.
    pub fn is_held(&self, intent: Intent, frame: u64) -> bool {
        self.held
            .get(&intent)
            .map(|&last| frame.saturating_sub(last) <= self.hold_window)
            .unwrap_or(false)
    }

    /// Forget everything, e.g. when leaving the game screen.
    pub fn clear(&mut self) {
        self.held.clear();
        self.queue.clear();
    }

    /// Snapshot the held intents and drain queued commands.
    pub fn next_tick(&mut self, frame: u64) -> FrameInput {
        let movement = MoveIntents {
            forward: self.is_held(Intent::Forward, frame),
            backward: self.is_held(Intent::Backward, frame),
            left: self.is_held(Intent::StrafeLeft, frame),
            right: self.is_held(Intent::StrafeRight, frame),
        };

        let mut turn = 0.0;
        if self.is_held(Intent::TurnLeft, frame) {
            turn -= 1.0;
        }
        if self.is_held(Intent::TurnRight, frame) {
            turn += 1.0;
        }

        let mut input = FrameInput {
            movement,
            turn,
            look: 0.0,
            shoot: self.is_held(Intent::Fire, frame),
            switch_weapon: None,
        };

        while let Some(command) = self.queue.pop_front() {
            match command {
                Command::Shoot => input.shoot = true,
                Command::SwitchWeapon(switch) => input.switch_weapon = Some(switch),
                Command::Look(delta) => input.look += delta,
            }
        }

        input
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(HOLD_WINDOW)
    }
}
