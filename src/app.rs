//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, PlotArgs};
use crate::domain::AnalysisConfig;
use crate::error::AppError;
use crate::io::{AnalysisFile, ChannelRecord};

pub mod pipeline;

/// Entry point for the `bowtie` binary.
pub fn run() -> Result<(), AppError> {
    // We want `bowtie` and `bowtie --sigma 2` to behave like `bowtie analyze ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the short invocation.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    print!(
        "{}",
        crate::report::format_run_summary(&config, run.grid.step_count)
    );
    print!(
        "{}",
        crate::report::format_channel_table(&run.channels, &run.skipped, config.integral_mode)
    );

    if let Some(name) = &args.plot {
        let record = find_channel(&run.channels, Some(name))?;
        println!();
        print!("{}", render_record(record, args.width, args.height)?);
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_channels_csv(path, &run.channels)?;
    }
    if let Some(path) = &args.export_json {
        let analysis = AnalysisFile::assemble(&config, &run.grid, run.channels);
        crate::io::write_analysis_json(path, &analysis)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let analysis = crate::io::read_analysis_json(&args.analysis)?;
    let record = find_channel(&analysis.channels, args.channel.as_deref())?;
    print!("{}", render_record(record, args.width, args.height)?);
    Ok(())
}

/// Pick the channel to plot: by name when given, otherwise the first one
/// that carries a spread curve.
fn find_channel<'a>(
    channels: &'a [ChannelRecord],
    name: Option<&str>,
) -> Result<&'a ChannelRecord, AppError> {
    match name {
        Some(name) => channels
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AppError::config(format!("No channel named '{name}' in this analysis."))),
        None => channels
            .iter()
            .find(|c| c.result.spread_curve.is_some())
            .ok_or_else(|| AppError::config("No channel carries a spread curve to plot.")),
    }
}

fn render_record(record: &ChannelRecord, width: usize, height: usize) -> Result<String, AppError> {
    let curve = record.result.spread_curve.as_ref().ok_or_else(|| {
        AppError::config(format!(
            "Channel '{}' has no spread curve to plot.",
            record.name
        ))
    })?;
    Ok(crate::plot::render_spread_plot(
        &record.name,
        curve,
        &record.result,
        width,
        height,
    ))
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        channels_per_decade: args.channels_per_decade,
        min_energy: args.min_energy,
        max_energy: args.max_energy,
        spectrum_kind: args.spectrum,
        gamma_min: args.gamma_min,
        gamma_max: args.gamma_max,
        gamma_steps: args.gamma_steps,
        cutoff_energy: args.cutoff_energy,
        integral_mode: args.integral,
        sigma: args.sigma,
        channel_count: args.channels,
        channel_lo: args.channel_lo,
        channel_hi: args.channel_hi,
        noise: args.noise,
        seed: args.seed,
    }
}

/// Rewrite argv so `bowtie` defaults to `bowtie analyze`.
///
/// Rules:
/// - `bowtie`                      -> `bowtie analyze`
/// - `bowtie --sigma 2 ...`        -> `bowtie analyze --sigma 2 ...`
/// - `bowtie --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
