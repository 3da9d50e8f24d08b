use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Raw samples of one benchmark, one entry per run.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchRunData {
    runs: Vec<i64>,
    elapsed: Vec<f64>,
    mean_dev: Vec<f64>,
}

impl BenchRunData {
    pub fn new(runs: Vec<i64>, elapsed: Vec<f64>, mean_dev: Vec<f64>) -> Result<Self> {
        if elapsed.is_empty() {
            bail!("benchmark holds no run");
        }
        if runs.len() != elapsed.len() || mean_dev.len() != elapsed.len() {
            bail!(
                "columns have different lengths: {} runs, {} elapsed, {} mean deviations",
                runs.len(),
                elapsed.len(),
                mean_dev.len()
            );
        }
        Ok(Self {
            runs,
            elapsed,
            mean_dev,
        })
    }

    /// Reads a result file whose first line is a header, followed by rows of
    /// `run index, elapsed (ms), mean deviation`. Extra columns are ignored.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        let mut runs = vec![];
        let mut elapsed = vec![];
        let mut mean_dev = vec![];

        for record in reader.records() {
            let record =
                record.with_context(|| format!("could not read {}", path.display()))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            runs.push(parse_field(&record, 0, path, line)?);
            elapsed.push(parse_field(&record, 1, path, line)?);
            mean_dev.push(parse_field(&record, 2, path, line)?);
        }

        debug!("Read {} runs from {}", elapsed.len(), path.display());

        Self::new(runs, elapsed, mean_dev).with_context(|| format!("invalid {}", path.display()))
    }

    pub fn runs(&self) -> &[i64] {
        &self.runs
    }

    pub fn elapsed(&self) -> &[f64] {
        &self.elapsed
    }

    pub fn mean_dev(&self) -> &[f64] {
        &self.mean_dev
    }

    pub fn len(&self) -> usize {
        self.elapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed.is_empty()
    }
}

fn parse_field<T>(record: &StringRecord, i: usize, path: &Path, line: u64) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = record
        .get(i)
        .with_context(|| format!("{}:{}: missing field {}", path.display(), line, i))?;
    value.parse().with_context(|| {
        format!(
            "{}:{}: field {} '{}' is not a number",
            path.display(),
            line,
            i,
            value
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("bench.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "run,elapsed,mean_dev\n1,10.0,0.1\n2,20.0,0.2\n3,30.0,0.3\n",
        );
        let data = BenchRunData::read_csv(&path).unwrap();
        assert_eq!(data.runs(), &[1, 2, 3]);
        assert_eq!(data.elapsed(), &[10.0, 20.0, 30.0]);
        assert_eq!(data.mean_dev(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_read_csv_ignores_extra_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "run,elapsed,mean_dev,note\n1, 12.5 ,0.5,warm\n2,13,0.25\n");
        let data = BenchRunData::read_csv(&path).unwrap();
        assert_eq!(data.elapsed(), &[12.5, 13.0]);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_read_csv_rejects_non_numeric() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "run,elapsed,mean_dev\n1,fast,0.1\n");
        let err = BenchRunData::read_csv(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("fast"));
    }

    #[test]
    fn test_read_csv_rejects_missing_field() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "run,elapsed,mean_dev\n1,10.0\n");
        let err = BenchRunData::read_csv(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing field 2"));
    }

    #[test]
    fn test_read_csv_rejects_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "run,elapsed,mean_dev\n");
        assert!(BenchRunData::read_csv(&path).is_err());
    }

    #[test]
    fn test_read_csv_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(BenchRunData::read_csv(&dir.path().join("nothing.csv")).is_err());
    }

    #[test]
    fn test_new_rejects_uneven_columns() {
        assert!(BenchRunData::new(vec![1, 2], vec![1.0], vec![0.0]).is_err());
    }
}
