//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - validates them into run configs
//! - runs the belt or minimization pipeline
//! - prints reports/plots
//! - writes artifacts and optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{BeltArgs, Command, MinimizeArgs};
use crate::data::RandomSampler;
use crate::domain::{BeltConfig, ExperimentMode, MinimizeConfig, OutOfRangePolicy};
use crate::error::AppError;

pub mod pipeline;

/// Range of the seeded random starting point for `minimize --random-start`.
const RANDOM_START_RANGE: (f64, f64) = (-20.0, 20.0);

/// Entry point for the `neyman` binary.
pub fn run() -> Result<(), AppError> {
    // `neyman --gaus --meas 4` should behave like `neyman belt --gaus --meas 4`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let level = if cli.verbose { "info" } else { cli.log_level.as_str() };
    crate::logging::init_logging(level)?;

    match cli.command {
        Command::Belt(args) => handle_belt(args),
        Command::Minimize(args) => handle_minimize(args),
    }
}

fn handle_belt(args: BeltArgs) -> Result<(), AppError> {
    let config = belt_config_from_args(&args);
    let run = pipeline::run_belt(&config)?;

    println!("{}", crate::report::format_belt_summary(&run, &config));

    if config.plot {
        println!(
            "{}",
            crate::plot::render_belt_heatmap(&run.table, config.plot_width, config.plot_height)
        );
        if let Ok(slice) = &run.slice {
            println!(
                "{}",
                crate::plot::render_slice_histogram(slice, config.plot_width, config.plot_height)
            );
        }
    }

    if config.svg {
        std::fs::create_dir_all(&config.out_dir).map_err(|e| {
            AppError::new(4, format!("Failed to create output dir '{}': {e}", config.out_dir.display()))
        })?;
        let belt_path = config.out_dir.join(crate::plot::BELT_SVG);
        crate::plot::write_belt_svg(&belt_path, &run.table, &run.spec)?;
        info!(path = %belt_path.display(), "wrote belt chart");

        if let Ok(slice) = &run.slice {
            let slice_path = config.out_dir.join(crate::plot::SLICE_SVG);
            crate::plot::write_slice_svg(&slice_path, slice, &run.spec)?;
            info!(path = %slice_path.display(), "wrote slice chart");
        }
    }

    // Optional exports.
    if let Some(dir) = &config.export_csv {
        crate::io::write_belt_csv(&dir.join("belt.csv"), &run.table)?;
        if let Ok(slice) = &run.slice {
            crate::io::write_slice_csv(&dir.join("slice.csv"), slice)?;
        }
    }
    if let Some(path) = &config.export_json {
        crate::io::write_summary_json(path, &run, &config)?;
    }

    Ok(())
}

fn handle_minimize(args: MinimizeArgs) -> Result<(), AppError> {
    let config = minimize_config_from_args(&args);
    let run = pipeline::run_minimize(&config)?;
    println!("{}", crate::report::format_minimize_summary(&run));
    Ok(())
}

pub fn belt_config_from_args(args: &BeltArgs) -> BeltConfig {
    let mode = if args.exp {
        ExperimentMode::RateEstimation
    } else {
        ExperimentMode::MeanEstimation
    };
    let policy = if args.clip {
        OutOfRangePolicy::Clip
    } else {
        OutOfRangePolicy::Drop
    };

    BeltConfig {
        mode,
        n_measurements: args.meas,
        observed_value: args.slice,
        experiments_per_point: args.experiments,
        seed: args.seed,
        sequential: args.sequential,
        policy,
        confidence_level: args.cl,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        svg: !args.no_svg,
        out_dir: args.out_dir.clone(),
        export_csv: args.export_csv.clone(),
        export_json: args.export_json.clone(),
    }
}

pub fn minimize_config_from_args(args: &MinimizeArgs) -> MinimizeConfig {
    let initial_guess = match args.random_start {
        Some(seed) => {
            let (lo, hi) = RANDOM_START_RANGE;
            RandomSampler::from_seed(seed).uniform(lo, hi)
        }
        None => args.start,
    };

    MinimizeConfig {
        algorithm: args.algorithm,
        initial_guess,
        initial_step: args.step,
        max_iterations: args.max_iterations,
        max_function_calls: args.max_function_calls,
        tolerance: args.tolerance,
        threshold: args.threshold,
    }
}

/// Rewrite argv so `neyman` defaults to `neyman belt`.
///
/// Rules:
/// - `neyman`                          -> `neyman belt`
/// - `neyman --exp --meas 5 ...`       -> `neyman belt --exp --meas 5 ...`
/// - `neyman --help/--version/-h`      -> unchanged (show top-level help/version)
/// - `neyman [global opts] minimize`   -> unchanged
///
/// Only the first token after the global options decides; later tokens may be
/// option values that happen to look like subcommand names.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let mut idx = 1;
    while let Some(token) = argv.get(idx) {
        match token.as_str() {
            "-v" | "--verbose" => idx += 1,
            "--log-level" => idx += 2,
            t if t.starts_with("--log-level=") => idx += 1,
            _ => break,
        }
    }

    let route_to_belt = match argv.get(idx).map(String::as_str) {
        None => true,
        Some("-h" | "--help" | "-V" | "--version" | "help" | "belt" | "minimize") => false,
        // A belt flag in first position.
        Some(t) => t.starts_with('-'),
    };
    if route_to_belt {
        argv.insert(1, "belt".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_belt() {
        assert_eq!(rewrite_args(argv(&["neyman"])), argv(&["neyman", "belt"]));
    }

    #[test]
    fn bare_flags_are_routed_to_belt() {
        assert_eq!(
            rewrite_args(argv(&["neyman", "--exp", "--meas", "3"])),
            argv(&["neyman", "belt", "--exp", "--meas", "3"])
        );
        assert_eq!(
            rewrite_args(argv(&["neyman", "--log-level", "info", "minimize"])),
            argv(&["neyman", "--log-level", "info", "minimize"])
        );
        assert_eq!(rewrite_args(argv(&["neyman", "--help"])), argv(&["neyman", "--help"]));
        assert_eq!(rewrite_args(argv(&["neyman", "-v"])), argv(&["neyman", "belt", "-v"]));
    }

    #[test]
    fn option_values_named_like_subcommands_do_not_block_the_rewrite() {
        let rewritten = rewrite_args(argv(&["neyman", "--gaus", "--out-dir", "belt"]));
        assert_eq!(rewritten, argv(&["neyman", "belt", "--gaus", "--out-dir", "belt"]));

        let cli = Cli::parse_from(rewritten);
        let Command::Belt(args) = cli.command else {
            panic!("expected belt");
        };
        assert_eq!(args.out_dir, std::path::PathBuf::from("belt"));

        assert_eq!(
            rewrite_args(argv(&["neyman", "--exp", "--export-json", "minimize"])),
            argv(&["neyman", "belt", "--exp", "--export-json", "minimize"])
        );
    }

    #[test]
    fn belt_args_become_config() {
        let cli = Cli::parse_from(rewrite_args(argv(&["neyman", "--exp", "--meas", "4", "--clip", "--slice", "0.5"])));
        let Command::Belt(args) = cli.command else {
            panic!("expected belt");
        };
        let config = belt_config_from_args(&args);
        assert_eq!(config.mode, ExperimentMode::RateEstimation);
        assert_eq!(config.n_measurements, 4);
        assert_eq!(config.policy, OutOfRangePolicy::Clip);
        assert_eq!(config.observed_value, 0.5);
        assert!(config.plot && config.svg);
    }

    #[test]
    fn random_start_is_seeded_and_in_range() {
        let cli = Cli::parse_from(argv(&["neyman", "minimize", "--random-start", "7"]));
        let Command::Minimize(args) = cli.command else {
            panic!("expected minimize");
        };
        let a = minimize_config_from_args(&args);
        let b = minimize_config_from_args(&args);
        assert_eq!(a.initial_guess, b.initial_guess);
        assert!((-20.0..20.0).contains(&a.initial_guess));
    }
}
