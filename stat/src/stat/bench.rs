use crate::stat::run::BenchRunData;
use anyhow::{bail, Result};
use tracing::warn;

/// Summary of the elapsed times of one benchmark.
///
/// All statistics are computed when the aggregate is built. The relative
/// speedup is only known once [`BenchStat::speedup_over`] has been called
/// with the matching baseline.
#[derive(Clone, Debug)]
pub struct BenchStat {
    data: BenchRunData,
    pub elapsed_avg: f64,
    pub elapsed_min: f64,
    pub elapsed_max: f64,
    pub std: f64,
    relative_speedup: Option<f64>,
}

impl From<BenchRunData> for BenchStat {
    fn from(data: BenchRunData) -> Self {
        let elapsed = data.elapsed();
        let n = elapsed.len() as f64;
        let elapsed_avg = elapsed.iter().sum::<f64>() / n;
        let elapsed_min = elapsed.iter().copied().fold(f64::INFINITY, f64::min);
        let elapsed_max = elapsed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = elapsed
            .iter()
            .map(|x| (x - elapsed_avg).powi(2))
            .sum::<f64>()
            / n;

        Self {
            elapsed_avg,
            elapsed_min,
            elapsed_max,
            std: variance.sqrt(),
            relative_speedup: None,
            data,
        }
    }
}

impl BenchStat {
    pub fn data(&self) -> &BenchRunData {
        &self.data
    }

    pub fn number_of_runs(&self) -> usize {
        self.data.len()
    }

    /// Computes `baseline.avg / self.avg - 1` and keeps it as the relative
    /// speedup of this benchmark. Can only be done once.
    pub fn speedup_over(&mut self, baseline: &BenchStat) -> Result<f64> {
        if let Some(speedup) = self.relative_speedup {
            bail!("speedup already computed ({})", speedup);
        }
        if baseline.number_of_runs() != self.number_of_runs() {
            warn!(
                "Comparing benchmarks with {} and {} runs",
                self.number_of_runs(),
                baseline.number_of_runs()
            );
        }
        let speedup = (baseline.elapsed_avg / self.elapsed_avg) - 1.0;
        self.relative_speedup = Some(speedup);
        Ok(speedup)
    }

    pub fn relative_speedup(&self) -> Option<f64> {
        self.relative_speedup
    }
}
