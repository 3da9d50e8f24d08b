use crate::config::ElapsedChartConfig;
use crate::output::{
    category_label, clipped_bar, draw_axes, draw_grid, legend_box, ChartStyle, BAR_WIDTH,
    DARK_GRAY, DESC_FONT_SIZE, FONT_FAMILY, GRAY, LABEL_FONT_SIZE, LIGHTER_GRAY, LIGHT_GRAY,
};
use crate::stat::bench::BenchStat;
use crate::stat::level::LevelStat;
use crate::stat::{Decoding, Encoding, Variant};
use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Bitmask and union results of one optimization level.
pub struct ElapsedGroup<'a> {
    pub label: String,
    pub bitmask: &'a BenchStat,
    pub union: &'a BenchStat,
}

/// Elapsed time of bitmask and union decoding for each optimization level,
/// with a fixed encoding strategy.
///
/// Every group draws the average as a light bar and the minimum as a darker
/// bar on top of it, bitmask left of the tick and union right of it.
pub struct ElapsedChart<'a> {
    pub groups: Vec<ElapsedGroup<'a>>,
    pub config: ElapsedChartConfig,
}

impl<'a> ElapsedChart<'a> {
    pub fn new(levels: &'a [LevelStat], encoding: Encoding, config: ElapsedChartConfig) -> Self {
        let groups = levels
            .iter()
            .map(|level| ElapsedGroup {
                label: level.level.flag(),
                bitmask: level.get(Variant::new(Decoding::Bitmask, encoding)),
                union: level.get(Variant::new(Decoding::Union, encoding)),
            })
            .collect();
        Self { groups, config }
    }

    /// Y axis bounds, anchored on the union average of the last group at the
    /// bottom and of the first group at the top.
    pub fn y_range(&self) -> Result<(f64, f64)> {
        let (first, last) = match (self.groups.first(), self.groups.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => bail!("no benchmark to plot"),
        };
        let margin = self.config.margin;
        let bottom = last.union.elapsed_avg - margin;
        let top = first.union.elapsed_avg + margin;
        if bottom < top {
            return Ok((bottom, top));
        }

        let (low, high) = self
            .groups
            .iter()
            .flat_map(|g| [g.bitmask, g.union])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), s| {
                (low.min(s.elapsed_min), high.max(s.elapsed_avg))
            });
        Ok((low - margin, high + margin))
    }

    pub fn render(&self, path: &Path, style: &ChartStyle) -> Result<()> {
        self.config.check()?;
        let (y_min, y_max) = self.y_range()?;
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
            let y_formatter = |y: &f64| format!("{:.0}", y);
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(labels.len())
                .x_label_formatter(&x_formatter)
                .y_labels(((y_max - y_min) / self.config.major_step) as usize + 1)
                .y_label_formatter(&y_formatter)
                .y_desc("Elapsed Time (ms)")
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

        let series: [(Option<&str>, RGBColor, f64, fn(&ElapsedGroup) -> f64); 4] = [
            (None, LIGHTER_GRAY, -BAR_WIDTH, |g| g.bitmask.elapsed_avg),
            (Some("Bitmasking"), GRAY, -BAR_WIDTH, |g| g.bitmask.elapsed_min),
            (None, LIGHT_GRAY, 0.0, |g| g.union.elapsed_avg),
            (Some("Union"), DARK_GRAY, 0.0, |g| g.union.elapsed_min),
        ];

        for (label, color, offset, value) in series {
            let anno = chart.draw_series(self.groups.iter().enumerate().map(|(i, g)| {
                clipped_bar(i as f64 + offset, value(g), (y_min, y_max), color)
            }))?;
            if let Some(label) = label {
                anno.label(label).legend(legend_box(color));
            }
        }

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
