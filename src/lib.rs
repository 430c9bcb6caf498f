//! Space Runner - a 3D corridor arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (spawning, ballistics, collisions, session state)
//! - `platform`: Frame clock, input abstraction and the browser bridge
//! - `persistence`: High score stores (memory, JSON file, LocalStorage)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `autopilot`: Scripted pilot for headless runs

pub mod autopilot;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh rate the per-frame tuning was authored against
    pub const TARGET_FPS: f32 = 60.0;
    /// Nominal frame duration
    pub const FRAME_DT: f32 = 1.0 / TARGET_FPS;
    /// Longest frame the simulation will integrate (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Selectable levels
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 5;

    /// Score awarded per obstacle destroyed by a projectile
    pub const KILL_BONUS: u64 = 50;
    /// Score awarded per frame survived
    pub const SCORE_PER_FRAME: u64 = 1;
}

/// Sanitize a frame delta: non-finite or negative becomes 0, long frames are clamped
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}
