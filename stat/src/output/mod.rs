use anyhow::{bail, Context, Result};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

pub mod bar;
pub mod speedup;

pub type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub const FONT_FAMILY: &str = "sans-serif";
pub const LABEL_FONT_SIZE: i32 = 14;
pub const DESC_FONT_SIZE: i32 = 16;

pub const BAR_WIDTH: f64 = 0.2;

pub const LIGHTER_GRAY: RGBColor = RGBColor(204, 204, 204);
pub const LIGHT_GRAY: RGBColor = RGBColor(179, 179, 179);
pub const GRAY: RGBColor = RGBColor(128, 128, 128);
pub const DARK_GRAY: RGBColor = RGBColor(77, 77, 77);

const MAJOR_GRID: RGBColor = RGBColor(176, 176, 176);
const MINOR_GRID: RGBColor = RGBColor(230, 230, 230);

const MAX_GRID_LINES: i64 = 1000;

/// Font file registered under `FONT_FAMILY`, if any.
static REGISTERED_FONT: Mutex<Option<PathBuf>> = Mutex::new(None);

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// How charts are drawn. Text needs a registered font: without one, charts
/// only hold bars, gridlines and axes.
#[derive(Copy, Clone, Debug, Default)]
pub struct ChartStyle {
    pub labels: bool,
}

impl ChartStyle {
    pub fn plain() -> Self {
        Self { labels: false }
    }

    /// Registers `font`, or the first system font found, as the chart font.
    /// A font file is only loaded once per process.
    pub fn with_font(font: Option<&Path>) -> Result<Self> {
        let path = match font {
            Some(path) => Some(path.to_path_buf()),
            None => SYSTEM_FONTS
                .iter()
                .map(PathBuf::from)
                .find(|path| path.is_file()),
        };

        match path {
            Some(path) => {
                register_font_file(&path)?;
                debug!("Chart font: {}", path.display());
                Ok(Self { labels: true })
            }
            None => {
                warn!("No font found, charts are drawn without text");
                Ok(Self::plain())
            }
        }
    }
}

fn register_font_file(path: &Path) -> Result<()> {
    let mut registered = REGISTERED_FONT
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registered.as_deref() == Some(path) {
        return Ok(());
    }

    let bytes = fs::read(path).with_context(|| format!("could not read font {}", path.display()))?;
    // The font registry keeps a reference for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| anyhow::anyhow!("{} is not a valid font", path.display()))?;
    *registered = Some(path.to_path_buf());
    Ok(())
}

/// Multiples of `step` within `[min, max]`.
pub fn grid_lines(min: f64, max: f64, step: f64) -> Result<Vec<f64>> {
    const EPSILON: f64 = 1e-9;
    if !step.is_finite() || step <= 0.0 {
        bail!("invalid grid step {}", step);
    }
    let first = (min / step - EPSILON).ceil();
    let last = (max / step + EPSILON).floor();
    if !(first.is_finite() && last.is_finite()) || last - first >= MAX_GRID_LINES as f64 {
        bail!("too many gridlines between {} and {} every {}", min, max, step);
    }
    Ok((first as i64..=last as i64).map(|i| i as f64 * step).collect())
}

/// Draws horizontal gridlines every `minor` and every `major` over the whole
/// plotting area.
pub fn draw_grid(
    chart: &mut Chart<'_, '_>,
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
    major: f64,
    minor: f64,
) -> Result<()> {
    for (step, color) in [(minor, MINOR_GRID), (major, MAJOR_GRID)] {
        chart.draw_series(
            grid_lines(y_min, y_max, step)?
                .into_iter()
                .map(|y| PathElement::new(vec![(x_min, y), (x_max, y)], color.stroke_width(1))),
        )?;
    }
    Ok(())
}

/// Left and bottom axis lines, for charts drawn without a mesh.
pub fn draw_axes(
    chart: &mut Chart<'_, '_>,
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) -> Result<()> {
    chart.draw_series([
        PathElement::new(vec![(x_min, y_min), (x_max, y_min)], BLACK.stroke_width(1)),
        PathElement::new(vec![(x_min, y_min), (x_min, y_max)], BLACK.stroke_width(1)),
    ])?;
    Ok(())
}

/// Bar spanning `[x, x + width]` from 0 to `value`, clipped to `[y_min, y_max]`.
pub fn clipped_bar(
    x: f64,
    value: f64,
    (y_min, y_max): (f64, f64),
    color: RGBColor,
) -> Rectangle<(f64, f64)> {
    let base = 0f64.clamp(y_min, y_max);
    let top = value.clamp(y_min, y_max);
    Rectangle::new([(x, base), (x + BAR_WIDTH, top)], color.filled())
}

/// Label of the category at `x`, if `x` is the position of a category.
pub fn category_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

pub fn legend_box(color: RGBColor) -> impl Fn((i32, i32)) -> Rectangle<(i32, i32)> {
    move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
}
