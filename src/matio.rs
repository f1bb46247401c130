//! CSV matrix exchange with external solver tooling.

use std::path::Path;

use anyhow::{bail, Context, Result};

/// A dense row-major float matrix as read from or written to CSV.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub n_rows: usize,
    pub n_cols: usize,
    pub data: Vec<f32>,
}

/// Reads a headerless CSV file as a dense matrix.
///
/// Every row must have the same number of fields.
pub fn read_matrix(path: &Path) -> Result<Matrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut data = Vec::new();
    let mut n_cols = 0usize;
    let mut n_rows = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad CSV record in {}", path.display()))?;
        if n_rows == 0 {
            n_cols = record.len();
        } else if record.len() != n_cols {
            bail!(
                "{}: row {} has {} fields, expected {}",
                path.display(),
                line + 1,
                record.len(),
                n_cols
            );
        }
        for field in record.iter() {
            let v: f32 = field.parse().with_context(|| {
                format!("{}: non-numeric field {field:?} in row {}", path.display(), line + 1)
            })?;
            data.push(v);
        }
        n_rows += 1;
    }
    if n_rows == 0 {
        bail!("{}: empty matrix", path.display());
    }

    Ok(Matrix {
        n_rows,
        n_cols,
        data,
    })
}

/// Writes a dense row-major matrix as headerless CSV.
pub fn write_matrix(path: &Path, n_rows: usize, n_cols: usize, data: &[f32]) -> Result<()> {
    debug_assert_eq!(data.len(), n_rows * n_cols);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for row in data.chunks(n_cols) {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writer.write_record(&fields)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");

        let data = vec![1.0, -2.5, 3.0, 0.0, 0.5, 100.0];
        write_matrix(&path, 2, 3, &data).unwrap();
        let m = read_matrix(&path).unwrap();
        assert_eq!(m.n_rows, 2);
        assert_eq!(m.n_cols, 3);
        assert_eq!(m.data, data);
    }

    #[test]
    fn ragged_rows_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        std::fs::write(&path, "1,2,3\n4,5\n").unwrap();
        assert!(read_matrix(&path).is_err());
    }

    #[test]
    fn non_numeric_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "1,two\n").unwrap();
        assert!(read_matrix(&path).is_err());
    }
}
