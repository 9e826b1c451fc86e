use std::fs;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use blockfall::core::{Game, GameConfig, GameEvent, GameSnapshot, Progress};
use blockfall::types::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimArgs {
    pub seed: Option<u64>,
    pub ticks: u64,
    pub tick_ms: u64,
    pub config: Option<String>,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            seed: None,
            ticks: 10_000,
            tick_ms: 16,
            config: None,
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T> {
    let v = value.ok_or_else(|| anyhow!("sim: missing value for {}", flag))?;
    v.parse::<T>()
        .map_err(|_| anyhow!("sim: invalid {} value: {}", flag, v))
}

pub fn parse_sim_args(args: &[String]) -> Result<SimArgs> {
    let mut out = SimArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                out.seed = Some(parse_value("--seed", args.get(i))?);
            }
            "--ticks" => {
                i += 1;
                out.ticks = parse_value("--ticks", args.get(i))?;
            }
            "--tick-ms" => {
                i += 1;
                out.tick_ms = parse_value("--tick-ms", args.get(i))?;
            }
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("sim: missing value for --config"))?;
                out.config = Some(v.clone());
            }
            other => {
                return Err(anyhow!("sim: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}

/// Defaults, then the JSON file, then `BLOCKFALL_*` overrides, then `--seed`
pub fn load_config(args: &SimArgs) -> Result<GameConfig> {
    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            GameConfig::from_json_str(&text).with_context(|| format!("parsing {}", path))?
        }
        None => GameConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(seed) = args.seed {
        config.selection = config.selection.reseeded(seed);
    }
    config.validate()?;
    Ok(config)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::RowsCleared { rows, .. } => log::info!("cleared rows {:?}", rows),
        GameEvent::LevelChanged { level } => log::info!("level {}", level),
        GameEvent::GameOver { score } => log::info!("game over, score {}", score),
        other => log::trace!("{:?}", other),
    }
}

/// Play until game over or the tick budget runs out
pub fn run(config: GameConfig, args: &SimArgs) -> Result<GameSnapshot> {
    let mut input = StdRng::seed_from_u64(args.seed.unwrap_or(0));
    let tick = Duration::from_millis(args.tick_ms);

    let mut game = Game::new(config)?;
    game.subscribe(log_event);
    game.start();

    for n in 0..args.ticks {
        match input.gen_range(0..12) {
            0 => {
                game.request_move(Direction::Left);
            }
            1 => {
                game.request_move(Direction::Right);
            }
            2 => {
                game.request_rotate();
            }
            3 => {
                game.request_move(Direction::Down);
            }
            _ => {}
        }

        let progress = game.request_tick(tick)?;
        game.drain_events();
        if let Progress::GameOver { .. } = progress {
            log::info!("finished after {} ticks", n + 1);
            break;
        }
    }

    log::info!(
        "score {} lines {} level {} pieces {}",
        game.score(),
        game.lines(),
        game.level(),
        game.pieces_spawned()
    );
    Ok(game.snapshot())
}
