//! Space Runner entry point
//!
//! The browser build is a library loaded by the page (see `platform::web`).
//! Natively this runs a headless session flown by the autopilot and records
//! the result in a JSON leaderboard.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use space_runner::autopilot::{Autopilot, Pilot};
    use space_runner::consts::FRAME_DT;
    use space_runner::highscores::format_date;
    use space_runner::persistence::{
        FallbackStore, JsonFileStore, MemoryStore, ScoreStore, load_high_score, record_result,
    };
    use space_runner::sim::{GameEvent, GameOverReport, GameState, Level};
    use space_runner::{Result, Settings, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "space-runner")]
    #[command(about = "Fly a headless Space Runner session on autopilot")]
    struct Cli {
        /// Level 1-5 (defaults to the saved setting)
        #[arg(long)]
        level: Option<u8>,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Stop after this many frames (10 min at 60fps = 36000)
        #[arg(long, default_value_t = 36_000)]
        max_frames: u64,
        /// Balance overrides (JSON, partial allowed)
        #[arg(long)]
        tuning: Option<PathBuf>,
        #[arg(long, default_value = "space_runner_settings.json")]
        settings: PathBuf,
        #[arg(long, default_value = "space_runner_scores.json")]
        scores: PathBuf,
        /// Name to record the run under (saved to settings)
        #[arg(long)]
        name: Option<String>,
        /// Leaderboard rows to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    }

    #[derive(Debug, Default)]
    struct RunStats {
        shots: u32,
        kills: u32,
        reloads: u32,
    }

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    fn fly(state: &mut GameState, pilot: &mut impl Pilot, max_frames: u64) -> (GameOverReport, RunStats) {
        let mut stats = RunStats::default();
        for _ in 0..max_frames {
            let input = pilot.next_input(state);
            let outcome = state.step(&input, FRAME_DT);
            for event in &outcome.events {
                match event {
                    GameEvent::Shot { .. } => stats.shots += 1,
                    GameEvent::ObstacleDestroyed { .. } => stats.kills += 1,
                    GameEvent::ReloadStarted => stats.reloads += 1,
                    _ => {}
                }
            }
            if let Some(report) = outcome.game_over {
                return (report, stats);
            }
        }

        log::info!("Frame limit reached, ending the run");
        let report = state.game_over().unwrap_or(GameOverReport {
            final_score: state.score,
            is_new_record: false,
            level: state.level,
        });
        (report, stats)
    }

    fn session(cli: &Cli, tuning: Tuning, settings: &Settings, store: &mut impl ScoreStore) -> Result<()> {
        let level = match cli.level {
            Some(level) => Level::try_from(level)?,
            None => settings.default_level,
        };

        let mut state = GameState::new(tuning, cli.seed).with_high_score(load_high_score(&*store));
        state.set_particle_scale(settings.particle_scale());
        state.start_game(level);

        let mut pilot = Autopilot::new();
        let (report, stats) = fly(&mut state, &mut pilot, cli.max_frames);
        log::info!(
            "{} flew {} frames: score {}, {} kills from {} shots, {} reloads",
            pilot.id(),
            state.frame,
            report.final_score,
            stats.kills,
            stats.shots,
            stats.reloads
        );
        if report.is_new_record {
            log::info!("New record for {}!", settings.player_name);
        }

        match store.potential_rank(report.final_score) {
            Ok(Some(rank)) => log::info!("Score {} heads for #{}", report.final_score, rank),
            Ok(None) => log::info!("Score {} misses the leaderboard", report.final_score),
            Err(e) => log::warn!("Rank lookup failed: {}", e),
        }

        let now = now_ms();
        record_result(store, &settings.player_name, &report, now);

        match store.leaderboard(cli.top) {
            Ok(entries) => {
                for (i, e) in entries.iter().enumerate() {
                    log::info!(
                        "#{:<2} {:>8}  {:<16} L{}  {}",
                        i + 1,
                        e.score,
                        e.name,
                        e.level,
                        format_date(e.timestamp, now)
                    );
                }
            }
            Err(e) => log::warn!("Leaderboard unavailable: {}", e),
        }
        Ok(())
    }

    fn load_settings(path: &Path, name: Option<&str>) -> Settings {
        let mut settings = Settings::load(path);
        if let Some(name) = name {
            settings.set_player_name(name);
            if let Err(e) = settings.save(path) {
                log::warn!("Could not save settings: {}", e);
            }
        }
        settings
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        log::info!("Space Runner (headless) starting...");

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let settings = load_settings(&cli.settings, cli.name.as_deref());

        match JsonFileStore::open(&cli.scores) {
            Ok(file) => {
                let mut store = FallbackStore::new(file, MemoryStore::new());
                session(&cli, tuning, &settings, &mut store)
            }
            Err(e) => {
                log::warn!("Leaderboard {} unreadable ({}), scores kept in memory", cli.scores.display(), e);
                session(&cli, tuning, &settings, &mut MemoryStore::new())
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> space_runner::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
