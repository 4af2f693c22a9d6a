//! SVG artifacts rendered with Plotters.
//!
//! The belt is drawn as filled bin rectangles shaded by count, with the true
//! value on x and the estimate on y. The slice is a bar histogram with its
//! outline. Axis descriptions come from the mode table.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::belt::{BeltTable, SliceDistribution};
use crate::domain::ModeSpec;
use crate::error::AppError;

/// File name of the 2-D belt chart.
pub const BELT_SVG: &str = "2DNeyman.svg";
/// File name of the 1-D slice chart.
pub const SLICE_SVG: &str = "1DNeyman.svg";

const CHART_SIZE: (u32, u32) = (800, 600);

pub fn write_belt_svg(path: &Path, table: &BeltTable, spec: &ModeSpec) -> Result<(), AppError> {
    draw_belt(path, table, spec)
        .map_err(|e| AppError::new(4, format!("Failed to write belt chart '{}': {e}", path.display())))
}

pub fn write_slice_svg(path: &Path, slice: &SliceDistribution, spec: &ModeSpec) -> Result<(), AppError> {
    draw_slice(path, slice, spec)
        .map_err(|e| AppError::new(4, format!("Failed to write slice chart '{}': {e}", path.display())))
}

fn draw_belt(path: &Path, table: &BeltTable, spec: &ModeSpec) -> Result<(), Box<dyn Error>> {
    let axis = table.axis();
    let range = axis.min()..axis.max();
    let width = axis.bin_width();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Neyman belt ({}, {} experiments/point)", spec.mode.display_name(), table.experiments_per_point()),
            ("sans-serif", 20),
        )
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(range.clone(), range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(spec.true_label)
        .y_desc(spec.measured_label)
        .draw()?;

    let max = table.max_count().max(1) as f64;
    chart.draw_series(table.nonzero_cells().map(|(i, j, count)| {
        let x0 = axis.bin_low_edge(i);
        let y0 = axis.bin_low_edge(j);
        Rectangle::new(
            [(x0, y0), (x0 + width, y0 + width)],
            heat_color(count as f64 / max).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn draw_slice(path: &Path, slice: &SliceDistribution, spec: &ModeSpec) -> Result<(), Box<dyn Error>> {
    let axis = slice.domain().axis();
    let width = axis.bin_width();
    let probs = slice.probabilities();
    let peak = probs.iter().copied().fold(0.0_f64, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} at {} = {}", spec.slice_label, spec.measured_label, slice.observed_value()),
            ("sans-serif", 20),
        )
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(axis.min()..axis.max(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(spec.true_label)
        .y_desc("probability")
        .draw()?;

    let bar_color = RGBColor(70, 130, 180);
    chart.draw_series(probs.iter().enumerate().filter(|(_, p)| **p > 0.0).map(|(i, &p)| {
        let x0 = axis.bin_low_edge(i);
        Rectangle::new([(x0, 0.0), (x0 + width, p)], bar_color.mix(0.6).filled())
    }))?;

    // Outline through the bin centers.
    chart.draw_series(LineSeries::new(
        probs.iter().enumerate().map(|(i, &p)| (axis.bin_center(i), p)),
        &bar_color,
    ))?;

    root.present()?;
    Ok(())
}

/// Pale yellow for sparse cells through to dark red for the busiest.
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    RGBColor(
        255 - (125.0 * t) as u8,
        (240.0 * (1.0 - t)) as u8,
        (150.0 * (1.0 - t)) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belt::{BeltAccumulator, extract_slice};
    use crate::data::RandomSampler;
    use crate::domain::{ExperimentMode, OutOfRangePolicy, ParameterDomain};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("neyman-svg-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn writes_both_charts() {
        let spec = ExperimentMode::MeanEstimation
            .spec()
            .with_domain(ParameterDomain::new(-10, 10, 1.0).unwrap())
            .unwrap();
        let table = BeltAccumulator::new(&spec, 200, 1, OutOfRangePolicy::Drop)
            .unwrap()
            .build(&mut RandomSampler::from_seed(3))
            .unwrap();
        let slice = extract_slice(&table, 0.0).unwrap();

        let dir = scratch_dir("both");
        let belt_path = dir.join(BELT_SVG);
        let slice_path = dir.join(SLICE_SVG);
        write_belt_svg(&belt_path, &table, &spec).unwrap();
        write_slice_svg(&slice_path, &slice, &spec).unwrap();

        let belt = std::fs::read_to_string(&belt_path).unwrap();
        assert!(belt.contains("<svg"));
        assert!(belt.contains("<rect"));
        assert!(belt.contains("mu true"));
        let slice_txt = std::fs::read_to_string(&slice_path).unwrap();
        assert!(slice_txt.contains("<polyline") || slice_txt.contains("<path"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn unwritable_path_maps_to_output_error() {
        let spec = ExperimentMode::MeanEstimation.spec();
        let table = BeltTable::empty(spec.domain, OutOfRangePolicy::Drop);
        let path = std::env::temp_dir().join("neyman-missing-dir").join("nested").join(BELT_SVG);
        let err = write_belt_svg(&path, &table, spec).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn heat_color_runs_light_to_dark() {
        let light = heat_color(0.0);
        let dark = heat_color(1.0);
        assert_eq!((light.0, light.1, light.2), (255, 240, 150));
        assert_eq!((dark.0, dark.1, dark.2), (130, 0, 0));
    }
}
