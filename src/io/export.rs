//! Export belt cells and slice probabilities to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::belt::{BeltTable, SliceDistribution};
use crate::error::AppError;

/// Write the non-zero cells of the belt, one row per (true, estimate) pair.
pub fn write_belt_csv(path: &Path, table: &BeltTable) -> Result<(), AppError> {
    let mut file = BufWriter::new(super::create_output(path, "belt CSV")?);
    let write_err = |e: std::io::Error| AppError::new(4, format!("Failed to write belt CSV row: {e}"));

    writeln!(file, "true_bin,true_value,estimate_bin,estimate_value,count").map_err(write_err)?;

    let domain = table.domain();
    for (i, j, count) in table.nonzero_cells() {
        writeln!(
            file,
            "{i},{:.6},{j},{:.6},{count}",
            domain.grid_value(i),
            domain.grid_value(j)
        )
        .map_err(write_err)?;
    }
    file.flush().map_err(write_err)?;
    Ok(())
}

/// Write the normalized slice, one row per true-parameter bin.
pub fn write_slice_csv(path: &Path, slice: &SliceDistribution) -> Result<(), AppError> {
    let mut file = BufWriter::new(super::create_output(path, "slice CSV")?);
    let write_err = |e: std::io::Error| AppError::new(4, format!("Failed to write slice CSV row: {e}"));

    writeln!(file, "bin,value,probability").map_err(write_err)?;
    for (i, p) in slice.probabilities().iter().enumerate() {
        writeln!(file, "{i},{:.6},{p:.10}", slice.bin_center(i)).map_err(write_err)?;
    }
    file.flush().map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belt::{RowCounts, extract_slice};
    use crate::domain::{OutOfRangePolicy, ParameterDomain};

    fn table() -> BeltTable {
        let domain = ParameterDomain::new(1, 3, 10.0).unwrap();
        let rows = [[2, 1, 0], [0, 3, 0], [0, 0, 3]]
            .into_iter()
            .map(|counts| RowCounts {
                counts: counts.to_vec(),
                underflow: 0,
                overflow: 0,
            })
            .collect();
        BeltTable::from_rows(domain, OutOfRangePolicy::Drop, 3, rows).unwrap()
    }

    #[test]
    fn belt_csv_lists_nonzero_cells() {
        let dir = std::env::temp_dir().join(format!("neyman-export-belt-{}", std::process::id()));
        let path = dir.join("belt.csv");
        write_belt_csv(&path, &table()).unwrap();

        let txt = std::fs::read_to_string(&path).unwrap();
        let expected = concat!(
            "true_bin,true_value,estimate_bin,estimate_value,count\n",
            "0,0.100000,0,0.100000,2\n",
            "0,0.100000,1,0.200000,1\n",
            "1,0.200000,1,0.200000,3\n",
            "2,0.300000,2,0.300000,3\n",
        );
        assert_eq!(txt, expected);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn slice_csv_has_one_row_per_bin() {
        let dir = std::env::temp_dir().join(format!("neyman-export-slice-{}", std::process::id()));
        let path = dir.join("slice.csv");
        let slice = extract_slice(&table(), 0.2).unwrap();
        write_slice_csv(&path, &slice).unwrap();

        let txt = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "bin,value,probability");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "0,0.100000,0.2500000000");
        assert_eq!(lines[2], "1,0.200000,0.7500000000");
        assert_eq!(lines[3], "2,0.300000,0.0000000000");
        std::fs::remove_dir_all(dir).ok();
    }
}
