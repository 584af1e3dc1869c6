use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use env_logger::Target;
use log::{error, info};
use polars::prelude::{CsvReader, DataFrame, SerReader};
use serde::Deserialize;

use data_transfer_objects::FaultConditionConfig;
use fault_monitor::{FaultCondition, FaultConditionEngine, FaultError, HeatingCoilRise};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Fault condition configuration file
    #[clap(short, long, value_parser, default_value = "resources/config.toml")]
    config: PathBuf,

    /// Rolling window size, overrides the configuration
    #[clap(short, long, value_parser)]
    window: Option<usize>,

    /// Append mode, check and tolerance columns to the output
    #[clap(short, long)]
    troubleshoot: bool,

    /// Worker threads used when several frames are given
    #[clap(long, value_parser, default_value_t = 4)]
    workers: usize,

    /// CSV files, one AHU frame each
    #[clap(value_parser, required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Deserialize)]
struct Config {
    fault_condition: FaultConditionConfig,
}

fn main() {
    env_logger::builder().target(Target::Stderr).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let raw = fs::read_to_string(&args.config)
        .with_context(|| format!("Could not read config file {}", args.config.display()))?;
    let config = parse_config(&raw, args.window, args.troubleshoot)?;
    let engine = FaultConditionEngine::new(HeatingCoilRise::new(config)?);
    let flag_column = engine.condition().flag_column();
    let frames = args
        .inputs
        .iter()
        .map(|path| read_frame(path))
        .collect::<Result<Vec<DataFrame>>>()?;
    let results = evaluate(engine, frames, args.workers);

    let mut failures = 0;
    for (path, result) in args.inputs.iter().zip(results) {
        match result {
            Ok(frame) => {
                let flagged = flagged_samples(&frame, &flag_column)?;
                info!(
                    "{}: {} samples, {} flagged",
                    path.display(),
                    frame.height(),
                    flagged
                );
                println!("{}", frame);
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return Err(anyhow!("{} of {} frames failed", failures, args.inputs.len()));
    }
    Ok(())
}

fn parse_config(raw: &str, window: Option<usize>, troubleshoot: bool) -> Result<FaultConditionConfig> {
    let mut config = toml::from_str::<Config>(raw)
        .context("Could not parse config file")?
        .fault_condition;
    if let Some(window) = window {
        config.rolling_window_size = window;
    }
    config.troubleshoot_mode |= troubleshoot;
    Ok(config)
}

fn read_frame(path: &Path) -> Result<DataFrame> {
    CsvReader::from_path(path)
        .and_then(|reader| reader.has_header(true).finish())
        .with_context(|| format!("Could not read {} as a data frame", path.display()))
}

fn evaluate<C: FaultCondition + 'static>(
    engine: FaultConditionEngine<C>,
    mut frames: Vec<DataFrame>,
    workers: usize,
) -> Vec<Result<DataFrame, FaultError>> {
    if frames.len() == 1 {
        let frame = frames.remove(0);
        return vec![engine.apply(&frame)];
    }
    Arc::new(engine).apply_batch(frames, workers)
}

fn flagged_samples(frame: &DataFrame, flag_column: &str) -> Result<i32> {
    let flags = frame.column(flag_column)?.i32()?;
    Ok(flags.into_iter().flatten().sum())
}
