//! Browser bridge
//!
//! The page owns rendering, audio and the requestAnimationFrame loop; it
//! forwards key events and timestamps here and reads JSON back.

use wasm_bindgen::prelude::*;

use super::{Action, FrameClock, KeyState};
use crate::persistence::{LocalStorageStore, ScoreStore, load_high_score, record_result};
use crate::settings::Settings;
use crate::sim::{GameState, Level, TickInput};
use crate::tuning::Tuning;

fn js_err(e: crate::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Space Runner core loaded");
}

/// One game session driven from JavaScript
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    keys: KeyState,
    clock: FrameClock,
    settings: Settings,
    store: LocalStorageStore,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> WebGame {
        let settings = Settings::load();
        let store = LocalStorageStore::load();
        let mut state = GameState::new(Tuning::default(), u64::from(seed))
            .with_high_score(load_high_score(&store));
        state.set_particle_scale(settings.particle_scale());
        WebGame {
            state,
            keys: KeyState::default(),
            clock: FrameClock::new(),
            settings,
            store,
        }
    }

    /// Start at `level` (1-5); 0 uses the saved default
    pub fn start(&mut self, level: u8) -> Result<(), JsValue> {
        let level = if level == 0 {
            self.settings.default_level
        } else {
            Level::try_from(level).map_err(js_err)?
        };
        self.keys.clear();
        self.clock.reset();
        self.state.start_game(level);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.state.stop_game();
        self.clock.reset();
    }

    pub fn restart(&mut self) {
        self.keys.clear();
        self.clock.reset();
        self.state.restart_game();
    }

    /// Feed a `KeyboardEvent.key`; returns whether it is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        Action::from_key(key).map(|a| self.keys.press(a)).is_some()
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        Action::from_key(key).map(|a| self.keys.release(a)).is_some()
    }

    /// Window lost focus: drop held keys
    pub fn blur(&mut self) {
        self.keys.clear();
    }

    /// Advance to `now_ms` (requestAnimationFrame timestamp); returns the step outcome as JSON
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let dt = self.clock.tick(now_ms);
        let outcome = self.state.step(&TickInput::poll(&self.keys), dt);
        if let Some(report) = outcome.game_over.as_ref() {
            record_result(
                &mut self.store,
                &self.settings.player_name,
                report,
                js_sys::Date::now(),
            );
        }
        serde_json::to_string(&outcome).map_err(|e| js_err(e.into()))
    }

    /// Everything the renderer draws, as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.state.snapshot().to_json().map_err(js_err)
    }

    pub fn leaderboard(&self, limit: usize) -> Result<String, JsValue> {
        let entries = self.store.leaderboard(limit).map_err(js_err)?;
        serde_json::to_string(&entries).map_err(|e| js_err(e.into()))
    }

    /// Record holder's name, if any
    pub fn record_holder(&self) -> Option<String> {
        self.store.high_score().ok().flatten().map(|e| e.name)
    }

    pub fn high_score(&self) -> f64 {
        self.state.high_score as f64
    }

    /// Would `score` take the record (for the in-game "NEW BEST" banner)
    pub fn is_new_high_score(&self, score: f64) -> bool {
        self.store.is_new_high_score(score as u64).unwrap_or(false)
    }

    /// Leaderboard slot `score` would take, 1-indexed
    pub fn potential_rank(&self, score: f64) -> Option<u32> {
        match self.store.potential_rank(score as u64) {
            Ok(rank) => rank.map(|r| r as u32),
            Err(e) => {
                log::warn!("Rank lookup failed: {}", e);
                None
            }
        }
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.settings.set_player_name(name);
        if let Err(e) = self.settings.save() {
            log::warn!("Could not save settings: {}", e);
        }
    }

    pub fn set_quality(&mut self, preset: &str) -> bool {
        let Some(preset) = crate::settings::QualityPreset::from_str(preset) else {
            return false;
        };
        self.settings.apply_preset(preset);
        self.state.set_particle_scale(self.settings.particle_scale());
        if let Err(e) = self.settings.save() {
            log::warn!("Could not save settings: {}", e);
        }
        true
    }
}
