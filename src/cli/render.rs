use ansi_term::{Colour, Style};
use anyhow::Result;

use crate::{
    analytics::{calendar::ReferenceZone, Report},
    utils::time::format_date_time,
};

const BAR_WIDTH: usize = 30;

struct Palette {
    title: Style,
    value: Style,
    bar: Style,
    warning: Style,
}

impl Palette {
    fn new(color: bool) -> Self {
        if color {
            Self {
                title: Style::new().bold(),
                value: Colour::Yellow.bold(),
                bar: Colour::Blue.normal(),
                warning: Colour::Red.normal(),
            }
        } else {
            Self {
                title: Style::new(),
                value: Style::new(),
                bar: Style::new(),
                warning: Style::new(),
            }
        }
    }
}

/// Renders the three stat cards and the weekday chart for a terminal.
pub fn render_text(report: &Report, zone: ReferenceZone, color: bool) -> String {
    let palette = Palette::new(color);
    let metrics = &report.metrics;

    let day_word = if metrics.streak == 1 { "day" } else { "days" };
    let mut lines = vec![
        format!(
            "Current streak  {} {day_word}",
            palette.value.paint(metrics.streak.to_string())
        ),
        format!(
            "Total pushes    {}",
            palette.value.paint(metrics.total.to_string())
        ),
        format!(
            "Last 7 days     {}",
            palette.value.paint(metrics.this_week.to_string())
        ),
    ];
    if let Some(last) = report.last_activity {
        lines.push(format!("Last push       {}", format_date_time(last, zone)));
    }

    lines.push(String::new());
    lines.push(palette.title.paint("Pushes per weekday").to_string());
    let max = metrics.weekday_histogram.max();
    for entry in metrics.weekday_histogram.entries() {
        let width = if max == 0 {
            0
        } else {
            (entry.count * BAR_WIDTH).div_ceil(max)
        };
        let bar = format!("{:<BAR_WIDTH$}", "#".repeat(width));
        lines.push(format!("{} {} {}", entry.day, palette.bar.paint(bar), entry.count));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push(
            palette
                .warning
                .paint(format!(
                    "Skipped {} push(es) with an unusable timestamp",
                    report.skipped.len()
                ))
                .to_string(),
        );
        lines.extend(
            report
                .skipped
                .iter()
                .map(|v| format!("  {}: {} ({})", v.id, v.value, v.reason)),
        );
    }

    lines.join("\n")
}

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
