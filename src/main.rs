//! Headless simulator (default binary).
//!
//! Drives the core with a seeded stream of move/rotate requests and fixed
//! ticks, logs game events to stderr, and prints the final snapshot as JSON.
//! `BLOCKFALL_LOG` sets the log level (default `info`).

mod sim;

use anyhow::{anyhow, Result};
use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging() -> Result<()> {
    let level = match std::env::var("BLOCKFALL_LOG") {
        Ok(v) => v
            .parse::<LevelFilter>()
            .map_err(|_| anyhow!("invalid BLOCKFALL_LOG value: {}", v))?,
        Err(_) => LevelFilter::Info,
    };
    log::set_boxed_logger(Box::new(StderrLogger { level }))
        .map_err(|e| anyhow!("logger already installed: {}", e))?;
    log::set_max_level(level);
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let sim_args = sim::parse_sim_args(&args)?;
    let config = sim::load_config(&sim_args)?;

    let snapshot = sim::run(config, &sim_args)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
