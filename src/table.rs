// src/table.rs
//
// Reader/writer for the engine's scalar output table (table.txt layout):
// a '#'-prefixed header of tab-separated column names with units in
// parentheses, then one line of tab-separated floats per autosave tick.
// Units are stripped when matching names, so "t (s)" and "t" are the same
// column.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::diagnostics::{
    DiagnosticsRow, F_RF_COLUMN, F_RF_UNIT, MAX_ANGLE_COLUMN, PHI_COLUMN, PHI_UNIT,
};
use crate::error::{ExperimentError, Result};

/// Column name without its parenthesised unit.
fn strip_unit(name: &str) -> &str {
    match name.find('(') {
        Some(k) => name[..k].trim(),
        None => name.trim(),
    }
}

fn column_index(names: &[&str], want: &str) -> Result<usize> {
    names
        .iter()
        .position(|&n| n == want)
        .ok_or_else(|| ExperimentError::Resource(format!("solver table has no '{want}' column")))
}

/// Parse a table from any buffered reader.
///
/// Extra columns are ignored; a missing required column or a malformed row
/// is an error.
pub fn parse_table<R: BufRead>(reader: R) -> Result<Vec<DiagnosticsRow>> {
    let mut lines = reader.lines();
    let header = lines
        .next()
        .ok_or_else(|| ExperimentError::Resource("solver table is empty".into()))??;

    let names: Vec<&str> = header
        .trim_start_matches('#')
        .split('\t')
        .map(strip_unit)
        .collect();

    let col_t = column_index(&names, "t")?;
    let col_angle = column_index(&names, MAX_ANGLE_COLUMN)?;
    let col_phi = column_index(&names, PHI_COLUMN)?;
    let col_f = column_index(&names, F_RF_COLUMN)?;

    let mut rows = Vec::new();
    for (k, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<f64> = line
            .split('\t')
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| {
                ExperimentError::Resource(format!("malformed table row {}: {e}", k + 2))
            })?;
        let need = col_t.max(col_angle).max(col_phi).max(col_f);
        if fields.len() <= need {
            return Err(ExperimentError::Resource(format!(
                "table row {} has {} columns, expected at least {}",
                k + 2,
                fields.len(),
                need + 1
            )));
        }
        rows.push(DiagnosticsRow {
            t_s: fields[col_t],
            max_angle: fields[col_angle],
            phi_deg: fields[col_phi],
            f_ghz: fields[col_f],
        });
    }
    Ok(rows)
}

/// Read the table file produced by the engine.
pub fn read_table(path: &Path) -> Result<Vec<DiagnosticsRow>> {
    if !path.exists() {
        return Err(ExperimentError::Resource(format!(
            "solver table not found: {}",
            path.display()
        )));
    }
    let file = File::open(path)?;
    parse_table(BufReader::new(file))
}

/// Write rows back out in the same layout (used by fakes and analyses).
pub fn write_table(path: &Path, rows: &[DiagnosticsRow]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    writeln!(
        w,
        "# t (s)\t{MAX_ANGLE_COLUMN} ()\t{PHI_COLUMN} ({PHI_UNIT})\t{F_RF_COLUMN} ({F_RF_UNIT})"
    )?;
    for row in rows {
        writeln!(
            w,
            "{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}",
            row.t_s, row.max_angle, row.phi_deg, row.f_ghz
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# t (s)\tmaxAngle ()\tphi (degree)\tf_RF (GHz)
0\t0\t0\t3
5e-12\t1.25e-3\t0\t3
1e-11\t2.5e-3\t0\t3
";

    #[test]
    fn parses_header_with_units_stripped() {
        let rows = parse_table(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].t_s, 0.0);
        assert!((rows[1].max_angle - 1.25e-3).abs() < 1e-18);
        assert_eq!(rows[2].phi_deg, 0.0);
        assert_eq!(rows[2].f_ghz, 3.0);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let text = "\
# t (s)\tmx ()\tmaxAngle ()\tphi (degree)\tf_RF (GHz)
0\t0.99\t0\t5\t3.5
";
        let rows = parse_table(Cursor::new(text)).unwrap();
        assert_eq!(rows[0].phi_deg, 5.0);
        assert_eq!(rows[0].f_ghz, 3.5);
    }

    #[test]
    fn missing_column_is_an_error() {
        let text = "# t (s)\tmaxAngle ()\n0\t0\n";
        assert!(parse_table(Cursor::new(text)).is_err());
    }

    #[test]
    fn malformed_row_is_an_error() {
        let text = "\
# t (s)\tmaxAngle ()\tphi (degree)\tf_RF (GHz)
0\tnot-a-number\t0\t3
";
        assert!(parse_table(Cursor::new(text)).is_err());
    }

    #[test]
    fn written_tables_read_back() {
        let rows = vec![
            DiagnosticsRow {
                t_s: 5e-12,
                max_angle: 0.02,
                phi_deg: 15.0,
                f_ghz: 4.5,
            },
            DiagnosticsRow {
                t_s: 1e-11,
                max_angle: 0.04,
                phi_deg: 15.0,
                f_ghz: 4.5,
            },
        ];
        let path = std::env::temp_dir().join("fmr_sweep_table_roundtrip.txt");
        write_table(&path, &rows).unwrap();
        let back = read_table(&path).unwrap();
        assert_eq!(back, rows);
    }
}
