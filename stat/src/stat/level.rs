use crate::collection::VariantFiles;
use crate::config::OptLevel;
use crate::stat::bench::BenchStat;
use crate::stat::run::BenchRunData;
use crate::stat::{Decoding, Encoding, Variant};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Statistics of every variant benchmarked at one optimization level.
///
/// The union variants carry their speedup over the bitmask variant with the
/// same encoding.
#[derive(Clone, Debug)]
pub struct LevelStat {
    pub level: OptLevel,
    pub bitmask_register: BenchStat,
    pub bitmask_stack: BenchStat,
    pub union_register: BenchStat,
    pub union_stack: BenchStat,
}

impl LevelStat {
    pub fn load(level: OptLevel, dir: &Path) -> Result<Self> {
        let files = VariantFiles::discover(dir)
            .with_context(|| format!("could not find the results of {}", level))?;
        let load = |variant: Variant| -> Result<BenchStat> {
            let data = BenchRunData::read_csv(files.get(variant))
                .with_context(|| format!("could not load {} {}", level, variant))?;
            Ok(data.into())
        };

        let stat = Self::new(
            level,
            load(Variant::BITMASK_REGISTER)?,
            load(Variant::BITMASK_STACK)?,
            load(Variant::UNION_REGISTER)?,
            load(Variant::UNION_STACK)?,
        )?;

        info!(
            "{}: union speedup {:+.4} (register), {:+.4} (stack)",
            level,
            stat.union_register.relative_speedup().unwrap_or_default(),
            stat.union_stack.relative_speedup().unwrap_or_default(),
        );
        Ok(stat)
    }

    /// Groups the four aggregates of a level and computes the union speedups.
    pub fn new(
        level: OptLevel,
        bitmask_register: BenchStat,
        bitmask_stack: BenchStat,
        mut union_register: BenchStat,
        mut union_stack: BenchStat,
    ) -> Result<Self> {
        union_register.speedup_over(&bitmask_register)?;
        union_stack.speedup_over(&bitmask_stack)?;
        Ok(Self {
            level,
            bitmask_register,
            bitmask_stack,
            union_register,
            union_stack,
        })
    }

    pub fn get(&self, variant: Variant) -> &BenchStat {
        match (variant.decoding, variant.encoding) {
            (Decoding::Bitmask, Encoding::Register) => &self.bitmask_register,
            (Decoding::Bitmask, Encoding::Stack) => &self.bitmask_stack,
            (Decoding::Union, Encoding::Register) => &self.union_register,
            (Decoding::Union, Encoding::Stack) => &self.union_stack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_variant(dir: &Path, variant: Variant, elapsed: &[f64]) {
        let sub = dir.join(variant.dir_name());
        fs::create_dir_all(&sub).unwrap();
        let mut content = "run,elapsed,mean_dev\n".to_string();
        for (i, e) in elapsed.iter().enumerate() {
            content.push_str(&format!("{},{},0.0\n", i + 1, e));
        }
        fs::write(sub.join("result.csv"), content).unwrap();
    }

    #[test]
    fn test_load() {
        let dir = TempDir::new().unwrap();
        write_variant(dir.path(), Variant::BITMASK_REGISTER, &[100.0, 100.0]);
        write_variant(dir.path(), Variant::BITMASK_STACK, &[120.0, 120.0]);
        write_variant(dir.path(), Variant::UNION_REGISTER, &[80.0, 80.0]);
        write_variant(dir.path(), Variant::UNION_STACK, &[240.0, 240.0]);

        let stat = LevelStat::load(OptLevel::O1, dir.path()).unwrap();
        assert_eq!(stat.level, OptLevel::O1);
        assert_eq!(stat.get(Variant::BITMASK_STACK).elapsed_avg, 120.0);
        assert_eq!(stat.union_register.relative_speedup(), Some(0.25));
        assert_eq!(stat.union_stack.relative_speedup(), Some(-0.5));
        assert_eq!(stat.bitmask_register.relative_speedup(), None);
    }

    #[test]
    fn test_load_reports_bad_variant() {
        let dir = TempDir::new().unwrap();
        write_variant(dir.path(), Variant::BITMASK_REGISTER, &[100.0]);
        write_variant(dir.path(), Variant::BITMASK_STACK, &[120.0]);
        write_variant(dir.path(), Variant::UNION_REGISTER, &[]);
        write_variant(dir.path(), Variant::UNION_STACK, &[150.0]);

        let err = LevelStat::load(OptLevel::O3, dir.path()).unwrap_err();
        assert!(err.to_string().contains("union-register"));
    }
}
