//! Plain-text table and chart surfaces for stdout.

use formgate_tabular::{ChartConfig, ChartHandle, ChartKind, ChartRenderer, TableRenderer, TableView};

const BAR_WIDTH: f64 = 40.0;

/// Prints tables as padded text
#[derive(Debug, Default)]
pub(crate) struct TextTable;

impl TableRenderer for TextTable {
    fn render(&mut self, view: &TableView) {
        println!("{}", view.to_text());
    }

    fn clear(&mut self) {}
}

/// Prints charts as horizontal bars, or percentages for pies
#[derive(Debug, Default)]
pub(crate) struct TextChart {
    next: u64,
}

pub(crate) fn chart_text(config: &ChartConfig) -> String {
    let width = config.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = config.values.iter().copied().fold(0.0_f64, f64::max);
    let mut out = format!("{} ({})\n", config.title, config.kind);

    for (i, (label, value)) in config.labels.iter().zip(&config.values).enumerate() {
        let line = match config.kind {
            ChartKind::Pie => {
                format!("{label:<width$}  {:>5.1}%", config.share(i).unwrap_or(0.0))
            }
            ChartKind::Bar | ChartKind::Line => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let len = if max > 0.0 {
                    (value.max(0.0) / max * BAR_WIDTH).round() as usize
                } else {
                    0
                };
                let mark = if config.kind == ChartKind::Line { "·" } else { "#" };
                format!("{label:<width$}  {} {value}", mark.repeat(len))
            }
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

impl ChartRenderer for TextChart {
    fn draw(&mut self, config: &ChartConfig) -> ChartHandle {
        self.next += 1;
        print!("{}", chart_text(config));
        ChartHandle(self.next)
    }

    fn destroy(&mut self, _handle: ChartHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgate_tabular::{prepare_chart, Row};
    use serde_json::json;

    fn rows() -> Vec<Row> {
        serde_json::from_value(json!([
            {"k": "a", "v": 1},
            {"k": "bb", "v": 3},
        ]))
        .unwrap()
    }

    #[test]
    fn bar_lengths_scale_to_max() {
        let text = chart_text(&prepare_chart(&rows(), ChartKind::Bar).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "v by k (bar)");
        assert_eq!(lines[2].matches('#').count(), 40);
        assert_eq!(lines[1].matches('#').count(), 13);
    }

    #[test]
    fn pie_shows_shares() {
        let text = chart_text(&prepare_chart(&rows(), ChartKind::Pie).unwrap());
        assert!(text.contains("bb   75.0%"));
    }
}
