//! Shared run logic used by the CLI front-end and by library callers.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! config -> sampler -> belt -> slice -> interval
//!
//! Simulation outcomes that are not configuration problems (a degenerate
//! slice, an exhausted minimizer) are returned inside the run value so batch
//! callers can inspect them.

use tracing::{info, warn};

use crate::belt::{BeltAccumulator, BeltTable, SliceDistribution, SliceInterval, extract_slice};
use crate::data::RandomSampler;
use crate::domain::{BeltConfig, MinimizeConfig, ModeSpec};
use crate::error::{AppError, BeltError};
use crate::minimize::{
    ConvergenceCheck, MinimizationResult, MinimizerSettings, create_minimizer, gaus_sin, validate_minimum,
};

/// All computed outputs of a single belt run.
#[derive(Debug, Clone)]
pub struct BeltRun {
    pub spec: ModeSpec,
    pub seed: u64,
    pub table: BeltTable,
    pub slice: Result<SliceDistribution, BeltError>,
    pub interval: Option<SliceInterval>,
}

/// Execute a belt run with the mode's default table row.
pub fn run_belt(config: &BeltConfig) -> Result<BeltRun, AppError> {
    run_belt_with_spec(config, config.mode.spec())
}

/// Execute a belt run over an explicit mode row (e.g. a custom domain).
pub fn run_belt_with_spec(config: &BeltConfig, spec: &ModeSpec) -> Result<BeltRun, AppError> {
    config.validate()?;
    spec.validate()?;

    let seed = config
        .seed
        .unwrap_or_else(|| RandomSampler::from_entropy().next_seed());
    info!(mode = config.mode.display_name(), seed, "starting belt run");

    let accumulator =
        BeltAccumulator::new(spec, config.experiments_per_point, config.n_measurements, config.policy)?;
    let mut master = RandomSampler::from_seed(seed);
    let table = if config.sequential {
        accumulator.build(&mut master)?
    } else {
        accumulator.build_parallel(&mut master)?
    };

    let slice = extract_slice(&table, config.observed_value);
    let interval = match &slice {
        Ok(s) => Some(s.central_interval(config.confidence_level)?),
        Err(e) => {
            warn!(error = %e, "no slice for the observed value");
            None
        }
    };

    Ok(BeltRun {
        spec: *spec,
        seed,
        table,
        slice,
        interval,
    })
}

/// All computed outputs of a single minimization run.
#[derive(Debug, Clone)]
pub struct MinimizeRun {
    pub algorithm: &'static str,
    pub settings: MinimizerSettings,
    pub result: MinimizationResult,
    pub check: ConvergenceCheck,
}

/// Minimize `exp(-x^2) sin(x)` and validate the result against the threshold.
pub fn run_minimize(config: &MinimizeConfig) -> Result<MinimizeRun, AppError> {
    config.validate()?;

    let settings = MinimizerSettings {
        initial_guess: config.initial_guess,
        initial_step: config.initial_step,
        max_iterations: config.max_iterations,
        max_function_calls: config.max_function_calls,
        tolerance: config.tolerance,
    };
    let minimizer = create_minimizer(config.algorithm);
    info!(algorithm = minimizer.name(), start = settings.initial_guess, "starting minimization");

    let result = minimizer.minimize(&gaus_sin, &settings);
    let check = validate_minimum(&result, &gaus_sin, config.threshold);

    Ok(MinimizeRun {
        algorithm: minimizer.name(),
        settings,
        result,
        check,
    })
}
