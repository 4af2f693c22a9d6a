use crate::app::pipeline::{BeltRun, MinimizeRun};
use crate::domain::{BeltConfig, OutOfRangePolicy};
use crate::minimize::ConvergenceCheck;

/// Format the belt run summary (configuration, table totals, slice).
pub fn format_belt_summary(run: &BeltRun, config: &BeltConfig) -> String {
    let mut out = String::new();
    let domain = &run.spec.domain;
    let (lo, hi) = domain.value_range();

    out.push_str("=== neyman - Monte-Carlo Neyman belt ===\n");
    out.push_str(&format!(
        "Mode: {} | measurements/experiment: {}\n",
        config.mode.display_name(),
        config.n_measurements
    ));
    out.push_str(&format!(
        "Domain: [{lo}, {hi}] | {} bins of width {}\n",
        domain.bins(),
        1.0 / domain.scale()
    ));
    out.push_str(&format!(
        "Experiments/point: {} | seed: {} | {}\n",
        config.experiments_per_point,
        run.seed,
        if config.sequential { "sequential" } else { "parallel" }
    ));

    let policy = match run.table.policy() {
        OutOfRangePolicy::Drop => "drop",
        OutOfRangePolicy::Clip => "clip",
    };
    out.push_str(&format!(
        "Belt: in-range={} | out-of-range={} ({policy})\n",
        run.table.total_in_range(),
        run.table.total_dropped()
    ));

    out.push('\n');
    match &run.slice {
        Ok(slice) => {
            out.push_str(&format!(
                "Slice at {} = {} (estimate bin {}, {} experiments):\n",
                run.spec.measured_label,
                slice.observed_value(),
                slice.estimate_bin(),
                slice.source_total()
            ));
            out.push_str(&format!(
                "- mode : {:.4}\n",
                slice.bin_center(slice.mode_index())
            ));
            out.push_str(&format!("- mean : {:.4}\n", slice.mean()));
            out.push_str(&format!("- sigma: {:.4}\n", slice.std_dev()));
            if let Some(interval) = &run.interval {
                out.push_str(&format!(
                    "- {:.2}% central interval: [{:.4}, {:.4}] (coverage {:.4})\n",
                    interval.confidence_level * 100.0,
                    interval.lower,
                    interval.upper,
                    interval.coverage
                ));
            }
        }
        Err(e) => {
            out.push_str(&format!("Slice unavailable: {e}\n"));
        }
    }

    out
}

/// Format the minimization outcome the way the command-line tool reports it.
pub fn format_minimize_summary(run: &MinimizeRun) -> String {
    let mut out = String::new();
    let r = &run.result;

    out.push_str(&format!(
        "Algorithm: {} | start={} step={}\n",
        run.algorithm, run.settings.initial_guess, run.settings.initial_step
    ));
    out.push_str(&format!("Minimum: f({}): {}\n", r.parameter_value, r.function_value));
    out.push_str(&format!(
        "iterations={} calls={} edm={:.3e} stop={:?}\n",
        r.iterations, r.function_calls, r.edm, r.stop_reason
    ));

    match run.check {
        ConvergenceCheck::Passed => out.push_str("Minimizer converged to the right minimum\n"),
        ConvergenceCheck::NotConverged { .. } | ConvergenceCheck::Mismatch { .. } => {
            out.push_str("Minimizer failed to converge !!!\n")
        }
    }

    out
}
