//! Brickfall headless driver
//!
//! Usage:
//!   brickfall play <level.map> [--settings settings.json] [--ticks N] [--lives N]
//!   brickfall new <level.map>
//!
//! `play` runs the simulation at the fixed timestep, launching the ball
//! automatically, and logs every event. `new` writes a sample level.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match args.first().map(String::as_str) {
        Some("play") => native::play(&args[1..]),
        Some("new") => native::new_level(&args[1..]),
        _ => {
            eprintln!(
                "usage: brickfall play <level.map> [--settings FILE] [--ticks N] [--lives N]"
            );
            eprintln!("       brickfall new <level.map>");
            2
        }
    };
    std::process::exit(code);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use brickfall::consts::SIM_DT;
    use brickfall::level::{LevelGrid, LevelTuning};
    use brickfall::settings::Settings;
    use brickfall::sim::{GameEvent, GamePhase, GameState, TickInput, load_level, step};

    struct PlayArgs {
        level: String,
        settings: Option<String>,
        ticks: u64,
        lives: u32,
    }

    fn parse_play_args(args: &[String]) -> Option<PlayArgs> {
        let mut parsed = PlayArgs {
            level: args.first()?.clone(),
            settings: None,
            ticks: 60 * 60,
            lives: 3,
        };
        let mut rest = args[1..].iter();
        while let Some(flag) = rest.next() {
            let value = rest.next()?;
            match flag.as_str() {
                "--settings" => parsed.settings = Some(value.clone()),
                "--ticks" => parsed.ticks = value.parse().ok()?,
                "--lives" => parsed.lives = value.parse().ok()?,
                _ => return None,
            }
        }
        Some(parsed)
    }

    pub fn play(args: &[String]) -> i32 {
        let Some(args) = parse_play_args(args) else {
            eprintln!("invalid arguments for play");
            return 2;
        };

        let settings = args
            .settings
            .as_deref()
            .map(Settings::load_or_default)
            .unwrap_or_default();

        let level = load_level(&args.level, &settings);
        if !level.loaded {
            log::error!("Level {} could not be loaded", args.level);
            return 1;
        }

        let mut state = GameState::new(level.arena, settings);
        let mut lives = args.lives;
        let mut score = 0u64;

        while state.time_ticks < args.ticks {
            let input = TickInput {
                launch: state.phase == GamePhase::Serve,
            };
            for event in step(&mut state, &input, SIM_DT) {
                let tick = state.time_ticks;
                match event {
                    GameEvent::BlockHit { id } => log::debug!("tick {}: hit {:?}", tick, id),
                    GameEvent::BlockDestroyed { id } => {
                        score += 1;
                        log::info!("tick {}: destroyed {:?} (score {})", tick, id, score);
                    }
                    GameEvent::BallLost => {
                        lives = lives.saturating_sub(1);
                        log::info!("tick {}: ball lost, {} lives left", tick, lives);
                    }
                    GameEvent::LevelCleared => log::info!("tick {}: level cleared", tick),
                }
            }

            match state.phase {
                GamePhase::Cleared => break,
                GamePhase::BallLost if lives == 0 => break,
                GamePhase::BallLost => state.respawn_ball(),
                GamePhase::Serve | GamePhase::Playing => {}
            }
        }

        log::info!(
            "Finished after {} ticks: phase {:?}, score {}, {} scored blocks left",
            state.time_ticks,
            state.phase,
            score,
            state.arena.remaining_scored()
        );
        0
    }

    pub fn new_level(args: &[String]) -> i32 {
        let Some(path) = args.first() else {
            eprintln!("missing level path");
            return 2;
        };

        let grid = LevelGrid::new(path);
        for column in 0..5 {
            for row in 0..12 {
                // Permanent frame around two strips of scored blocks
                let code = match (column, row) {
                    (0, _) | (_, 0) | (_, 11) => 1,
                    (1 | 2, _) => -1,
                    _ => -2,
                };
                grid.set_cell(column, row, code);
            }
        }
        grid.set_tuning(LevelTuning {
            ball_velocity: 1.0,
            theme: 0,
            gravity: 0.0,
        });

        if grid.write() { 0 } else { 1 }
    }
}
