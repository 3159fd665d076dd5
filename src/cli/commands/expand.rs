//! `padel-scheduler expand`: preview the dates of a recurring series.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{list_table, output, render_list, CommandOutput};
use crate::domain::models::{
    format_calendar_date, parse_calendar_date, Frequency, RecurrencePattern, SchedulingConfig,
};
use crate::services::expand_series;

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// First date of the series (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Repeat frequency (weekly, monthly)
    #[arg(long, short, default_value = "weekly")]
    pub frequency: String,

    /// Every N weeks or months
    #[arg(long, short, default_value_t = 1)]
    pub interval: u32,

    /// Last date a class may fall on (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Number of classes in the series
    #[arg(long, short)]
    pub occurrences: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ExpandOutput {
    pub frequency: Frequency,
    pub interval: u32,
    pub dates: Vec<String>,
    #[serde(skip)]
    parsed: Vec<NaiveDate>,
}

impl CommandOutput for ExpandOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["#", "date", "weekday"]);
        for (i, date) in self.parsed.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                format_calendar_date(*date),
                date.weekday().to_string(),
            ]);
        }
        render_list("date", &table, self.parsed.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: &ExpandArgs, config: &SchedulingConfig, json_mode: bool) -> Result<()> {
    let result = run(args, config)?;
    output(&result, json_mode);
    Ok(())
}

fn run(args: &ExpandArgs, config: &SchedulingConfig) -> Result<ExpandOutput> {
    let start = parse_calendar_date(&args.start).context("Invalid --start")?;
    let end_date = args
        .end_date
        .as_deref()
        .map(parse_calendar_date)
        .transpose()
        .context("Invalid --end-date")?;

    let pattern = RecurrencePattern {
        frequency: Frequency::from_str(&args.frequency),
        interval: args.interval,
        end_date,
        occurrences: args.occurrences,
    };

    let dates = expand_series(&pattern, start, config)?;

    Ok(ExpandOutput {
        frequency: pattern.frequency,
        interval: pattern.interval,
        dates: dates.iter().copied().map(format_calendar_date).collect(),
        parsed: dates,
    })
}
