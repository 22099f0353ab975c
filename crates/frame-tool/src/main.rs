//! Host-side frame tool.
//!
//! Runs the photo-frame conversion pipeline on ordinary files and previews
//! wake scheduling, standing in for the on-device orchestration layer.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use tracing_subscriber::EnvFilter;

use frame_imaging::{DitherKernel, Palette, PalettePair, ProcessOptions, Processor};
use frame_scheduler::{SleepSchedule, next_wakeup_seconds};

const USAGE: &str = "\
Usage:
  frame-tool convert <input> <output.bmp> [--stock] [--no-cdr]
             [--kernel <floyd-steinberg|stucki|burkes|sierra>]
             [--palette <calibration.json>] [--width N] [--height N]
  frame-tool next-wake <HH:MM:SS> <interval-secs> [--aligned]
             [--schedule <start-min> <end-min>]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("convert") => convert(&args[1..]),
        Some("next-wake") => next_wake(&args[1..]),
        _ => {
            eprintln!("{USAGE}");
            bail!("missing or unknown subcommand");
        }
    }
}

fn convert(args: &[String]) -> Result<()> {
    let mut positional: Vec<&str> = Vec::new();
    let mut opts = ProcessOptions::default();
    let mut palettes = PalettePair::default();

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--stock" => opts.use_stock_mode = true,
            "--no-cdr" => opts.compress_range = false,
            "--kernel" => {
                let name = it.next().context("--kernel needs a value")?;
                opts.kernel = name
                    .parse::<DitherKernel>()
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
            "--palette" => {
                let path = it.next().context("--palette needs a file path")?;
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading calibration file {path}"))?;
                palettes.measured = serde_json::from_str::<Palette>(&json)
                    .with_context(|| format!("parsing calibration file {path}"))?;
            }
            "--width" => {
                opts.target_width = it.next().context("--width needs a value")?.parse()?;
            }
            "--height" => {
                opts.target_height = it.next().context("--height needs a value")?.parse()?;
            }
            other => positional.push(other),
        }
    }

    let &[input, output] = positional.as_slice() else {
        eprintln!("{USAGE}");
        bail!("convert takes exactly <input> and <output.bmp>");
    };

    let processor = Processor::new(palettes);
    processor
        .process_file(&PathBuf::from(input), &PathBuf::from(output), &opts)
        .with_context(|| format!("converting {input}"))?;

    println!("{input} -> {output} ({}x{})", opts.target_width, opts.target_height);
    Ok(())
}

fn next_wake(args: &[String]) -> Result<()> {
    let mut positional: Vec<&str> = Vec::new();
    let mut aligned = false;
    let mut schedule: Option<SleepSchedule> = None;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--aligned" => aligned = true,
            "--schedule" => {
                let start = it.next().context("--schedule needs <start-min> <end-min>")?;
                let end = it.next().context("--schedule needs <start-min> <end-min>")?;
                schedule = Some(SleepSchedule {
                    enabled: true,
                    start_minutes: start.parse()?,
                    end_minutes: end.parse()?,
                });
            }
            other => positional.push(other),
        }
    }

    let &[time, interval] = positional.as_slice() else {
        eprintln!("{USAGE}");
        bail!("next-wake takes exactly <HH:MM:SS> and <interval-secs>");
    };

    let now = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .with_context(|| format!("parsing time {time}"))?;
    let interval: u32 = interval.parse().context("parsing interval")?;
    if interval == 0 {
        bail!("interval must be positive");
    }

    let seconds = next_wakeup_seconds(now, interval, aligned, schedule.as_ref());
    println!("{seconds}");
    Ok(())
}
