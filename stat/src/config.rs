use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub const JSON_FORMAT: &str = "json";

/// Compiler optimization level a benchmark was built with.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptLevel {
    O0,
    O1,
    O2,
    O3,
    Os,
    Ofast,
}

impl OptLevel {
    /// Name of the directory holding the results of this level.
    pub fn dir_name(&self) -> String {
        format!("{:?}", self)
    }

    /// Compiler flag, used as the chart category.
    pub fn flag(&self) -> String {
        format!("-{:?}", self)
    }
}

impl Display for OptLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.flag())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GenfigConfig {
    pub data_dir: PathBuf,
    pub toolchain: String,
    /// Levels in chart order. The elapsed chart anchors its y axis on the
    /// first and last level.
    pub levels: Vec<OptLevel>,
    /// TrueType font used for chart text. System fonts are searched if unset.
    pub font: Option<PathBuf>,
    pub output: OutputConfig,
    pub elapsed_chart: ElapsedChartConfig,
    pub speedup_chart: SpeedupChartConfig,
}

impl Default for GenfigConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            toolchain: "GCC".to_string(),
            levels: vec![OptLevel::O0, OptLevel::O1, OptLevel::O3],
            font: None,
            output: Default::default(),
            elapsed_chart: Default::default(),
            speedup_chart: Default::default(),
        }
    }
}

impl GenfigConfig {
    /// Loads a configuration file, as json if its extension says so and as
    /// yaml otherwise. Missing fields take their default value.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some(JSON_FORMAT) => serde_json::from_str(&content)
                .with_context(|| format!("could not deserialize {}", path.display()))?,
            _ => serde_yaml::from_str(&content)
                .with_context(|| format!("could not deserialize {}", path.display()))?,
        };
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> Result<()> {
        if self.levels.is_empty() {
            bail!("no optimization level configured");
        }
        self.elapsed_chart
            .check()
            .context("invalid elapsed_chart configuration")?;
        self.speedup_chart
            .check()
            .context("invalid speedup_chart configuration")?;
        Ok(())
    }

    /// Directory of the results of `level`, e.g. `./data/GCC/O3`.
    pub fn level_dir(&self, level: OptLevel) -> PathBuf {
        self.data_dir.join(&self.toolchain).join(level.dir_name())
    }
}

fn check_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("empty image size {}x{}", width, height);
    }
    Ok(())
}

fn check_steps(major: f64, minor: f64) -> Result<()> {
    for (name, step) in [("major_step", major), ("minor_step", minor)] {
        if !step.is_finite() || step <= 0.0 {
            bail!("{} must be a positive number, got {}", name, step);
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub register_elapsed: PathBuf,
    pub stack_elapsed: PathBuf,
    pub union_speedup: PathBuf,
    pub summary_csv: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            register_elapsed: PathBuf::from("out/register_elapsed.png"),
            stack_elapsed: PathBuf::from("out/stack_elapsed.png"),
            union_speedup: PathBuf::from("out/union_speedup.png"),
            summary_csv: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ElapsedChartConfig {
    pub width: u32,
    pub height: u32,
    /// Space kept above and below the anchoring averages, in ms.
    pub margin: f64,
    pub major_step: f64,
    pub minor_step: f64,
}

impl Default for ElapsedChartConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 500,
            margin: 50.0,
            major_step: 50.0,
            minor_step: 12.5,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedupChartConfig {
    pub width: u32,
    pub height: u32,
    pub y_min: f64,
    pub y_max: f64,
    pub major_step: f64,
    pub minor_step: f64,
}

impl ElapsedChartConfig {
    pub fn check(&self) -> Result<()> {
        check_size(self.width, self.height)?;
        if !self.margin.is_finite() || self.margin < 0.0 {
            bail!("margin must be a non negative number, got {}", self.margin);
        }
        check_steps(self.major_step, self.minor_step)
    }
}

impl SpeedupChartConfig {
    pub fn check(&self) -> Result<()> {
        check_size(self.width, self.height)?;
        if !(self.y_min.is_finite() && self.y_max.is_finite() && self.y_min < self.y_max) {
            bail!("empty speedup range [{}, {}]", self.y_min, self.y_max);
        }
        check_steps(self.major_step, self.minor_step)
    }
}

impl Default for SpeedupChartConfig {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
            y_min: -0.04,
            y_max: 0.04,
            major_step: 0.01,
            minor_step: 0.005,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout() {
        let config = GenfigConfig::default();
        assert_eq!(
            config.level_dir(OptLevel::O3),
            PathBuf::from("./data").join("GCC").join("O3")
        );
        assert_eq!(config.levels.len(), 3);
        assert_eq!(OptLevel::O1.flag(), "-O1");
    }

    #[test]
    fn test_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genfig.yaml");
        fs::write(
            &path,
            "toolchain: Clang\nlevels: [O0, O2]\noutput:\n  summary_csv: out/summary.csv\n",
        )
        .unwrap();
        let config = GenfigConfig::from_file(&path).unwrap();
        assert_eq!(config.toolchain, "Clang");
        assert_eq!(config.levels, vec![OptLevel::O0, OptLevel::O2]);
        assert_eq!(config.output.summary_csv, Some(PathBuf::from("out/summary.csv")));
        assert_eq!(config.output.union_speedup, PathBuf::from("out/union_speedup.png"));
        assert_eq!(config.elapsed_chart.minor_step, 12.5);
    }

    #[test]
    fn test_from_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genfig.json");
        fs::write(&path, r#"{"data_dir": "results", "speedup_chart": {"y_max": 0.1}}"#).unwrap();
        let config = GenfigConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("results"));
        assert_eq!(config.speedup_chart.y_max, 0.1);
        assert_eq!(config.speedup_chart.y_min, -0.04);
    }

    #[test]
    fn test_reject_no_level() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genfig.yaml");
        fs::write(&path, "levels: []\n").unwrap();
        assert!(GenfigConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_reject_chart_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("genfig.yaml");
        for content in [
            "speedup_chart: {minor_step: 0.0}\n",
            "speedup_chart: {major_step: -0.01}\n",
            "speedup_chart: {y_min: 0.1, y_max: 0.1}\n",
            "elapsed_chart: {major_step: .nan}\n",
            "elapsed_chart: {margin: -1.0}\n",
            "elapsed_chart: {width: 0}\n",
        ] {
            fs::write(&path, content).unwrap();
            assert!(GenfigConfig::from_file(&path).is_err(), "{}", content);
        }
    }

    #[test]
    fn test_default_charts_are_valid() {
        assert!(GenfigConfig::default().check().is_ok());
    }
}
