//! JSON summary of a belt run.
//!
//! The summary is the portable record of a run: configuration, table totals,
//! slice statistics and the inverted interval, stamped with the generation time.

use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::app::pipeline::BeltRun;
use crate::belt::SliceInterval;
use crate::domain::{BeltConfig, DistributionKind, ExperimentMode, OutOfRangePolicy, ParameterDomain};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: &'static str,
    pub generated: String,
    pub mode: ExperimentMode,
    pub domain: ParameterDomain,
    pub distribution: DistributionKind,
    pub n_measurements: usize,
    pub experiments_per_point: u64,
    pub seed: u64,
    pub policy: OutOfRangePolicy,
    pub total_in_range: u64,
    pub total_out_of_range: u64,
    pub slice: Option<SliceSummary>,
    /// Set when no slice could be read at the observed value.
    pub slice_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliceSummary {
    pub observed_value: f64,
    pub estimate_bin: usize,
    pub source_total: u64,
    pub mode: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub interval: Option<SliceInterval>,
}

impl RunSummary {
    pub fn from_run(run: &BeltRun, config: &BeltConfig) -> Self {
        let (slice, slice_error) = match &run.slice {
            Ok(s) => (
                Some(SliceSummary {
                    observed_value: s.observed_value(),
                    estimate_bin: s.estimate_bin(),
                    source_total: s.source_total(),
                    mode: s.bin_center(s.mode_index()),
                    mean: s.mean(),
                    std_dev: s.std_dev(),
                    interval: run.interval,
                }),
                None,
            ),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            tool: "neyman",
            generated: Local::now().to_rfc3339(),
            mode: run.spec.mode,
            domain: run.spec.domain,
            distribution: run.spec.distribution,
            n_measurements: config.n_measurements,
            experiments_per_point: run.table.experiments_per_point(),
            seed: run.seed,
            policy: run.table.policy(),
            total_in_range: run.table.total_in_range(),
            total_out_of_range: run.table.total_dropped(),
            slice,
            slice_error,
        }
    }
}

/// Write the run summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, run: &BeltRun, config: &BeltConfig) -> Result<(), AppError> {
    let file = super::create_output(path, "summary JSON")?;
    serde_json::to_writer_pretty(file, &RunSummary::from_run(run, config))
        .map_err(|e| AppError::new(4, format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}
