use crate::stat::level::LevelStat;
use crate::stat::Variant;
use std::fmt::{Display, Formatter, Write};

#[derive(Clone)]
pub struct Cell {
    pre_sep: Option<char>,
    post_sep: Option<char>,
    info: String,
}

impl Cell {
    pub fn start(info: String) -> Self {
        Self {
            pre_sep: Some('|'),
            post_sep: None,
            info,
        }
    }

    pub fn double(info: String) -> Self {
        Self {
            pre_sep: Some('|'),
            post_sep: Some('|'),
            info,
        }
    }

    pub fn format(&self, cell_size: usize) -> String {
        let mut string = "".to_string();
        if let Some(pre) = self.pre_sep {
            string.push(pre)
        }

        write!(string, "{:^cell_size$}", self.info).unwrap();

        if let Some(post) = self.post_sep {
            string.push(post)
        }

        string
    }
}

const HEADER: [&str; 8] = [
    "Level", "Variant", "Runs", "Average", "Min", "Max", "Std", "Speedup",
];

/// Table with one line per benchmarked variant and optimization level.
pub struct SummaryFormatter {
    lines: Vec<Vec<Cell>>,
}

impl SummaryFormatter {
    pub fn to_csv(&self) -> String {
        let mut string = String::new();
        for cells in &self.lines {
            for (i, cell) in cells.iter().enumerate() {
                if i != 0 {
                    string.push(';');
                }
                write!(string, "{}", cell.info).unwrap();
            }
            string.push('\n');
        }

        string
    }

    fn line(cells: Vec<String>) -> Vec<Cell> {
        let last = cells.len() - 1;
        cells
            .into_iter()
            .enumerate()
            .map(|(i, info)| {
                if i == last {
                    Cell::double(info)
                } else {
                    Cell::start(info)
                }
            })
            .collect()
    }
}

impl From<&[LevelStat]> for SummaryFormatter {
    fn from(levels: &[LevelStat]) -> Self {
        let mut lines = vec![Self::line(HEADER.iter().map(|s| s.to_string()).collect())];

        for level in levels {
            for variant in Variant::ALL {
                let stat = level.get(variant);
                lines.push(Self::line(vec![
                    level.level.to_string(),
                    variant.to_string(),
                    stat.number_of_runs().to_string(),
                    format!("{:.3}", stat.elapsed_avg),
                    format!("{:.3}", stat.elapsed_min),
                    format!("{:.3}", stat.elapsed_max),
                    format!("{:.3}", stat.std),
                    stat.relative_speedup()
                        .map(|s| format!("{:.4}", s))
                        .unwrap_or_default(),
                ]));
            }
        }

        Self { lines }
    }
}

impl Display for SummaryFormatter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let cell_size = self
            .lines
            .iter()
            .flatten()
            .fold(0, |size, cell| size.max(cell.info.len()))
            + 2;

        let mut width = 0;
        let mut body = String::new();
        for cells in &self.lines {
            let line: String = cells.iter().map(|c| c.format(cell_size)).collect();
            width = width.max(line.len());
            writeln!(body, "{}", line)?;
        }
        let rule = "-".repeat(width);
        writeln!(f, "{}", rule)?;
        write!(f, "{}", body)?;
        write!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptLevel;
    use crate::stat::bench::BenchStat;
    use crate::stat::run::BenchRunData;

    fn stat(elapsed: f64) -> BenchStat {
        BenchRunData::new(vec![1], vec![elapsed], vec![0.0])
            .unwrap()
            .into()
    }

    fn level() -> LevelStat {
        LevelStat::new(OptLevel::O0, stat(100.0), stat(120.0), stat(80.0), stat(240.0)).unwrap()
    }

    #[test]
    fn test_to_csv() {
        let levels = vec![level()];
        let csv = SummaryFormatter::from(levels.as_slice()).to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Level;Variant;Runs;Average;Min;Max;Std;Speedup");
        assert_eq!(
            lines[1],
            "-O0;bitmask-register;1;100.000;100.000;100.000;0.000;"
        );
        assert_eq!(
            lines[3],
            "-O0;union-register;1;80.000;80.000;80.000;0.000;0.2500"
        );
    }

    #[test]
    fn test_display() {
        let levels = vec![level()];
        let table = SummaryFormatter::from(levels.as_slice()).to_string();
        assert_eq!(table.lines().count(), 7);
        assert!(table.contains("union-stack"));
        assert!(table.contains("-0.5000"));
    }
}
