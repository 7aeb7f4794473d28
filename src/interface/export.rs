use std::path::Path;

use crate::engine::shape::CurvePoint;
use crate::error::Result;

/// Write sampled curve points to a CSV file, one row per sample.
pub fn write_curve_csv(points: &[CurvePoint], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["t", "minutes", "value", "fast", "slow", "hepatic"])?;
    for p in points {
        wtr.write_record([
            format!("{:.3}", p.t),
            format!("{:.1}", p.minutes),
            format!("{:.4}", p.value),
            format!("{:.4}", p.components.fast),
            format!("{:.4}", p.components.slow),
            format!("{:.4}", p.components.hepatic),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::shape::{ComponentSet, generate_curve};
    use crate::error::WaveError;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_curve_csv_rows() {
        let curve = generate_curve(&ComponentSet::default(), 180.0, 10, 0.05, true);
        let file = NamedTempFile::new().unwrap();
        write_curve_csv(&curve.points, file.path()).unwrap();

        let mut rdr = csv::Reader::from_path(file.path()).unwrap();
        assert_eq!(rdr.headers().unwrap().len(), 6);
        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 11);
        assert_eq!(&records[0][1], "0.0");
        assert_eq!(&records[10][1], "180.0");
    }

    #[test]
    fn test_missing_directory_is_csv_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("curve.csv");
        let err = write_curve_csv(&[], &path).unwrap_err();
        assert!(matches!(err, WaveError::Csv(_)));
    }
}
