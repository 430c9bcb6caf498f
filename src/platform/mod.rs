//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Frame timing (dt from host timestamps)
//! - Input (held keys mapped to game actions)
//! - The browser bridge (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use serde::{Deserialize, Serialize};

use crate::sanitize_dt;

/// Game actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Shoot,
    Reload,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Shoot,
        Action::Reload,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::Shoot => "shoot",
            Action::Reload => "reload",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Action::Left),
            "right" => Some(Action::Right),
            "up" => Some(Action::Up),
            "down" => Some(Action::Down),
            "shoot" | "fire" => Some(Action::Shoot),
            "reload" => Some(Action::Reload),
            _ => None,
        }
    }

    /// Default binding for a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Action::Left),
            "ArrowRight" | "d" | "D" => Some(Action::Right),
            "ArrowUp" | "w" | "W" => Some(Action::Up),
            "ArrowDown" | "s" | "S" => Some(Action::Down),
            " " => Some(Action::Shoot),
            "r" | "R" => Some(Action::Reload),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Source of held-key state, sampled once per frame
pub trait InputProvider {
    fn is_pressed(&self, action: Action) -> bool;
}

/// Held keys, fed by press/release events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    held: u8,
}

impl KeyState {
    pub fn press(&mut self, action: Action) {
        self.held |= action.bit();
    }

    pub fn release(&mut self, action: Action) {
        self.held &= !action.bit();
    }

    pub fn set(&mut self, action: Action, down: bool) {
        if down {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    /// Release everything (focus loss)
    pub fn clear(&mut self) {
        self.held = 0;
    }
}

impl InputProvider for KeyState {
    fn is_pressed(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }
}

/// Turns host frame timestamps (ms) into simulation dt (s)
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// dt since the previous timestamp; 0 on the first call
    ///
    /// Long gaps are clamped and a timestamp going backwards yields 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        sanitize_dt(dt)
    }

    /// Forget the last timestamp (resume after pause)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
