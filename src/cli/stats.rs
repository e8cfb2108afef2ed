use std::{fmt::Display, io::IsTerminal, path::PathBuf};

use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::{info, instrument};

use crate::{
    analytics::{build_report, calendar::ReferenceZone, EvaluationContext, Report},
    events::{
        normalize::{normalize_records, TimestampPolicy},
        source::{EventSource, JsonFileSource, DEFAULT_SNAPSHOT_LIMIT},
    },
    utils::clock::{Clock, FixedClock},
};

use super::{
    render::{render_json, render_text},
    Args,
};

pub const DEFAULT_EVENTS_FILE: &str = "pushes.json";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct StatsCommand {
    #[arg(
        long,
        short,
        help = "File with pushes, either a json array or json lines. By default pushes.json in the application directory"
    )]
    file: Option<PathBuf>,
    #[arg(long, short, default_value_t = DEFAULT_SNAPSHOT_LIMIT, help = "Only the most recent pushes are analyzed")]
    limit: usize,
    #[arg(
        long,
        default_value = "utc",
        allow_hyphen_values = true,
        help = "Timezone that decides where a day starts. utc, local or an offset like +02:00"
    )]
    tz: ReferenceZone,
    #[arg(
        long,
        help = "Compute the stats as if it was this moment, on the clock of --tz. Examples are \"yesterday\", \"1 hour ago\", \"15/03/2025\", \"16/03/2025 12:00\""
    )]
    now: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(
        long = "invalid",
        default_value_t = TimestampPolicy::Skip,
        help = "What to do with pushes that have an unusable timestamp. skip reports them, reject fails"
    )]
    on_invalid: TimestampPolicy,
    #[arg(long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Command to process `stats` command. Reads the most recent pushes and prints the streak,
/// the last 7 days count and the weekday histogram.
pub async fn process_stats_command(
    command: StatsCommand,
    application_dir: PathBuf,
    clock: &dyn Clock,
) -> Result<()> {
    let path = command
        .file
        .clone()
        .unwrap_or_else(|| application_dir.join(DEFAULT_EVENTS_FILE));
    let source = JsonFileSource::new(path);
    let zone = command.tz;
    let format = command.format;

    let report = compute_report(&command, &source, clock).await?;

    let output = match format {
        OutputFormat::Text => render_text(&report, zone, std::io::stdout().is_terminal()),
        OutputFormat::Json => render_json(&report)?,
    };
    println!("{output}");
    Ok(())
}

#[instrument(skip(source, clock))]
async fn compute_report(
    command: &StatsCommand,
    source: &dyn EventSource,
    clock: &dyn Clock,
) -> Result<Report> {
    let context = evaluation_context(command, clock)?;

    let records = source.recent(command.limit).await?;
    info!(
        "Analyzing {} records at {} in {}",
        records.len(),
        context.now,
        context.zone
    );

    let normalized = normalize_records(records, command.on_invalid)?;
    Ok(build_report(normalized, &context))
}

fn evaluation_context(command: &StatsCommand, clock: &dyn Clock) -> Result<EvaluationContext> {
    let now = match &command.now {
        Some(expression) => parse_now(expression, command.date_style, command.tz, clock)?,
        None => clock.time(),
    };
    Ok(EvaluationContext::from_clock(&FixedClock::new(now), command.tz))
}

/// Resolves `expression` on the wall clock of `zone`.
fn parse_now(
    expression: &str,
    date_style: DateStyle,
    zone: ReferenceZone,
    clock: &dyn Clock,
) -> Result<DateTime<Utc>> {
    let base = zone.at(clock.time());
    let resolved = resolve_date(expression, base, date_style)?;

    // chrono_english drops the date of "15:00 22/03/2025" and keeps the base one. An explicit
    // date resolves the same from any base.
    if mentions_date(expression) {
        let shifted = resolve_date(expression, base - Duration::days(1), date_style)?;
        if shifted != resolved {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!(
                        "The date in now {expression:?} was ignored. Put the date first, like \"22/03/2025 15:00\""
                    ),
                )
                .into());
        }
    }
    Ok(resolved.to_utc())
}

fn resolve_date(
    expression: &str,
    base: DateTime<FixedOffset>,
    date_style: DateStyle,
) -> Result<DateTime<FixedOffset>> {
    parse_date_string(expression, base, date_style.into()).map_err(|e| {
        Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate now {e}"),
            )
            .into()
    })
}

fn mentions_date(expression: &str) -> bool {
    expression.split_whitespace().any(|word| {
        word.contains('/')
            || (word.contains('-') && word.starts_with(|c: char| c.is_ascii_digit()))
    })
}
