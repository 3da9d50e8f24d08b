use crate::config::SpeedupChartConfig;
use crate::output::{
    category_label, clipped_bar, draw_axes, draw_grid, legend_box, ChartStyle, BAR_WIDTH,
    DARK_GRAY, DESC_FONT_SIZE, FONT_FAMILY, GRAY, LABEL_FONT_SIZE,
};
use crate::stat::bench::BenchStat;
use crate::stat::level::LevelStat;
use anyhow::{bail, Context, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

pub struct SpeedupGroup {
    pub label: String,
    pub register: f64,
    pub stack: f64,
}

/// Speedup of union decoding over bitmask decoding, for register and stack
/// encoding, at each optimization level.
pub struct SpeedupChart {
    pub groups: Vec<SpeedupGroup>,
    pub config: SpeedupChartConfig,
}

fn speedup(stat: &BenchStat, level: &LevelStat, encoding: &str) -> Result<f64> {
    stat.relative_speedup()
        .with_context(|| format!("no {} speedup computed for {}", encoding, level.level))
}

impl SpeedupChart {
    pub fn new(levels: &[LevelStat], config: SpeedupChartConfig) -> Result<Self> {
        let groups = levels
            .iter()
            .map(|level| -> Result<SpeedupGroup> {
                Ok(SpeedupGroup {
                    label: level.level.flag(),
                    register: speedup(&level.union_register, level, "register")?,
                    stack: speedup(&level.union_stack, level, "stack")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { groups, config })
    }

    pub fn render(&self, path: &Path, style: &ChartStyle) -> Result<()> {
        if self.groups.is_empty() {
            bail!("no speedup to plot");
        }
        self.config.check()?;
        let (y_min, y_max) = (self.config.y_min, self.config.y_max);
        let x_range = (-0.5, self.groups.len() as f64 - 0.5);
        let labels: Vec<String> = self.groups.iter().map(|g| g.label.clone()).collect();

        let root =
            BitMapBackend::new(path, (self.config.width, self.config.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if style.labels {
            builder.x_label_area_size(40).y_label_area_size(70);
        }
        let mut chart = builder.build_cartesian_2d(x_range.0..x_range.1, y_min..y_max)?;

        if style.labels {
            let x_formatter = |x: &f64| category_label(&labels, *x);
            let y_formatter = |y: &f64| format!("{:.2}", y);
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(labels.len())
                .x_label_formatter(&x_formatter)
                .y_labels(((y_max - y_min) / self.config.major_step).round() as usize + 1)
                .y_label_formatter(&y_formatter)
                .y_desc("Speedup")
                .label_style((FONT_FAMILY, LABEL_FONT_SIZE))
                .axis_desc_style((FONT_FAMILY, DESC_FONT_SIZE))
                .draw()?;
        }

        draw_grid(
            &mut chart,
            x_range,
            (y_min, y_max),
            self.config.major_step,
            self.config.minor_step,
        )?;
        if !style.labels {
            draw_axes(&mut chart, x_range, (y_min, y_max))?;
        }

        chart
            .draw_series(self.groups.iter().enumerate().map(|(i, g)| {
                clipped_bar(i as f64 - BAR_WIDTH, g.register, (y_min, y_max), GRAY)
            }))?
            .label("Register")
            .legend(legend_box(GRAY));
        chart
            .draw_series(
                self.groups.iter().enumerate().map(|(i, g)| {
                    clipped_bar(i as f64, g.stack, (y_min, y_max), DARK_GRAY)
                }),
            )?
            .label("Stack")
            .legend(legend_box(DARK_GRAY));

        if style.labels {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((FONT_FAMILY, LABEL_FONT_SIZE))
                .draw()?;
        }

        root.present()?;
        info!("Saved {}", path.display());
        Ok(())
    }
}
