use crate::config::GenfigConfig;
use crate::output::bar::ElapsedChart;
use crate::output::speedup::SpeedupChart;
use crate::output::ChartStyle;
use crate::stat::formatter::SummaryFormatter;
use crate::stat::level::LevelStat;
use crate::stat::Encoding;
use anyhow::{Context, Result};
use std::fs;
use std::time::Instant;
use tracing::info;

pub mod collection;
pub mod config;
pub mod output;
pub mod stat;

/// Loads the results of every configured optimization level.
pub fn load_levels(config: &GenfigConfig) -> Result<Vec<LevelStat>> {
    let now = Instant::now();
    let levels = config
        .levels
        .iter()
        .map(|level| LevelStat::load(*level, &config.level_dir(*level)))
        .collect::<Result<Vec<_>>>()?;
    info!(
        "Loaded {} benchmarks in {:.3} ms",
        levels.len() * 4,
        now.elapsed().as_secs_f64() * 1000.0
    );
    Ok(levels)
}

/// Renders the register and stack elapsed time charts and the union speedup
/// chart from already loaded levels.
pub fn render_all(config: &GenfigConfig, levels: &[LevelStat], style: &ChartStyle) -> Result<()> {
    let output = &config.output;

    ElapsedChart::new(levels, Encoding::Register, config.elapsed_chart.clone())
        .render(&output.register_elapsed, style)
        .with_context(|| format!("could not render {}", output.register_elapsed.display()))?;

    ElapsedChart::new(levels, Encoding::Stack, config.elapsed_chart.clone())
        .render(&output.stack_elapsed, style)
        .with_context(|| format!("could not render {}", output.stack_elapsed.display()))?;

    SpeedupChart::new(levels, config.speedup_chart.clone())?
        .render(&output.union_speedup, style)
        .with_context(|| format!("could not render {}", output.union_speedup.display()))?;

    Ok(())
}

/// Runs the whole pipeline: load every level, render the three charts and
/// write the optional summary.
pub fn generate_all(config: &GenfigConfig) -> Result<Vec<LevelStat>> {
    config.check()?;
    let levels = load_levels(config)?;

    let style = ChartStyle::with_font(config.font.as_deref())?;
    render_all(config, &levels, &style)?;

    let summary = SummaryFormatter::from(levels.as_slice());
    info!("Summary:\n{}", summary);
    if let Some(path) = &config.output.summary_csv {
        fs::write(path, summary.to_csv())
            .with_context(|| format!("could not write {}", path.display()))?;
        info!("Saved {}", path.display());
    }

    Ok(levels)
}
