/// sleepdet: run spindle, REM or peak detection on a recording stored as
/// safetensors and print a JSON report on stdout.
///
/// Input keys:
///   data    [T] | [C, T]  F32/F64  samples
///   sfreq   [1]           F32/F64  sampling rate (Hz)
///   hypno   [T]           I32/I64  optional per-sample sleep stages
///
/// Output keys (--output):
///   indices [N]     I64  samples covered by detected events
///   events  [E, 2]  I64  (start, stop) of each event
///   summary [3]     F64  count, density, valid length
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sleepdet::{
    detect_rems, detect_spindles,
    io::{Recording, StWriter},
    AnalyticMethod, DetectionParams, DetectionResult, PeakDetector,
};

#[derive(Parser)]
#[command(name = "sleepdet", version, about = "Sleep spindle / REM / peak detection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect sleep spindles on an EEG channel.
    Spindles(SpindleArgs),
    /// Detect rapid eye movements on an EOG channel.
    Rems(RemArgs),
    /// Find local maxima and minima.
    Peaks(PeakArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Recording in safetensors format.
    #[arg(long)]
    input: PathBuf,

    /// Channel (row of `data`) to analyse.
    #[arg(long, default_value_t = 0)]
    channel: usize,
}

#[derive(Args)]
struct SpindleArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Threshold in standard deviations above the mean envelope.
    #[arg(long, default_value_t = 3.0)]
    threshold: f64,

    /// Lower band edge (Hz).
    #[arg(long, default_value_t = 12.0)]
    min_freq: f64,

    /// Upper band edge (Hz).
    #[arg(long, default_value_t = 14.0)]
    max_freq: f64,

    /// Minimum spindle duration (ms, exclusive).
    #[arg(long, default_value_t = 500.0)]
    min_dur_ms: f64,

    /// Maximum spindle duration (ms, exclusive).
    #[arg(long, default_value_t = 1500.0)]
    max_dur_ms: f64,

    /// Complex decomposition: hilbert or wavelet.
    #[arg(long, default_value = "hilbert")]
    method: AnalyticMethod,

    /// Use the whole recording even if a hypnogram is present.
    #[arg(long)]
    no_stage_restrict: bool,

    /// Write indices / events / summary to this safetensors file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct RemArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Threshold in standard deviations above the mean derivative.
    #[arg(long, default_value_t = 2.0)]
    threshold: f64,

    /// Moving-average window (ms).
    #[arg(long, default_value_t = 100.0)]
    moving_ms: f64,

    /// Derivative step (ms).
    #[arg(long, default_value_t = 40.0)]
    deriv_ms: f64,

    /// Use the whole recording even if a hypnogram is present.
    #[arg(long)]
    no_stage_restrict: bool,

    /// Write indices / events / summary to this safetensors file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct PeakArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Samples to look ahead before confirming a peak.
    #[arg(long, default_value_t = 200)]
    lookahead: usize,

    /// Minimum drop (rise) after a maximum (minimum).
    #[arg(long, default_value_t = 0.0)]
    delta: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let report = match cli.command {
        Command::Spindles(args) => run_spindles(args)?,
        Command::Rems(args) => run_rems(args)?,
        Command::Peaks(args) => run_peaks(args)?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load(input: &InputArgs) -> Result<(Recording, Vec<f64>)> {
    let rec = Recording::load(&input.input)?;
    let samples = rec.channel(input.channel)?;
    tracing::info!(
        channels = rec.n_channels(),
        samples = samples.len(),
        sfreq = rec.sfreq,
        hypnogram = rec.hypno.is_some(),
        "loaded {}",
        input.input.display()
    );
    Ok((rec, samples))
}

fn run_spindles(args: SpindleArgs) -> Result<serde_json::Value> {
    let (rec, eeg) = load(&args.input)?;
    let params = DetectionParams {
        threshold: args.threshold,
        min_freq: args.min_freq,
        max_freq: args.max_freq,
        min_dur_ms: args.min_dur_ms,
        max_dur_ms: args.max_dur_ms,
        method: args.method,
        stage_restrict: !args.no_stage_restrict,
        ..DetectionParams::spindles()
    };
    let result = detect_spindles(&eeg, rec.sfreq, rec.hypno.as_deref(), &params)
        .context("spindle detection failed")?;
    tracing::info!(count = result.count, density = result.density, "spindles detected");

    if let Some(out) = &args.output {
        write_result(out, &result)?;
    }
    Ok(report("spindles", &result, rec.sfreq))
}

fn run_rems(args: RemArgs) -> Result<serde_json::Value> {
    let (rec, eog) = load(&args.input)?;
    let params = DetectionParams {
        threshold: args.threshold,
        moving_ms: args.moving_ms,
        deriv_ms: args.deriv_ms,
        stage_restrict: !args.no_stage_restrict,
        ..DetectionParams::rems()
    };
    let result = detect_rems(&eog, rec.sfreq, rec.hypno.as_deref(), &params)
        .context("REM detection failed")?;
    tracing::info!(count = result.count, density = result.density, "REMs detected");

    if let Some(out) = &args.output {
        write_result(out, &result)?;
    }
    Ok(report("rems", &result, rec.sfreq))
}

fn run_peaks(args: PeakArgs) -> Result<serde_json::Value> {
    let (_rec, y) = load(&args.input)?;
    let peaks = PeakDetector::new(args.lookahead, args.delta)?.detect(&y, None)?;
    tracing::info!(maxima = peaks.maxima.len(), minima = peaks.minima.len(), "peaks detected");

    let pairs = |v: &[sleepdet::Peak]| -> Vec<[f64; 2]> {
        v.iter().map(|p| [p.position, p.value]).collect()
    };
    Ok(serde_json::json!({
        "detector": "peaks",
        "lookahead": args.lookahead,
        "delta": args.delta,
        "max_peaks": pairs(&peaks.maxima),
        "min_peaks": pairs(&peaks.minima),
    }))
}

fn report(detector: &str, result: &DetectionResult, sf: f64) -> serde_json::Value {
    let events: Vec<serde_json::Value> = result
        .events
        .iter()
        .map(|e| serde_json::json!({
            "start": e.start,
            "stop": e.stop,
            "duration_ms": e.duration_ms(sf),
        }))
        .collect();
    serde_json::json!({
        "detector": detector,
        "count": result.count,
        "density_per_min": result.density,
        "threshold": result.threshold,
        "valid_samples": result.valid_len,
        "events": events,
    })
}

fn write_result(path: &std::path::Path, result: &DetectionResult) -> Result<()> {
    let mut w = StWriter::new();
    w.add_detection("", result);
    w.write(path)?;
    tracing::info!("written → {}", path.display());
    Ok(())
}
