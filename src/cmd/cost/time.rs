//! Time range flags for cost queries

use chrono::{Datelike, Duration, NaiveDate};
use clap::{Args, ValueEnum};

use crate::aws::TimePeriod;
use crate::cmd::validation::{self, DATE_RANGE};
use crate::error::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum TimeRange {
    /// Last month
    #[value(name = "LM")]
    LastMonth,
    /// Month to date
    #[default]
    #[value(name = "MTD")]
    MonthToDate,
    /// Year to date
    #[value(name = "YTD")]
    YearToDate,
    /// Last 3 months
    #[value(name = "3M")]
    ThreeMonths,
    /// Last 6 months
    #[value(name = "6M")]
    SixMonths,
    /// Last year
    #[value(name = "1Y")]
    OneYear,
}

/// First day of the month `months_back` months before `date`'s month.
fn first_of_month(date: NaiveDate, months_back: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 - months_back;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1).unwrap_or(date)
}

fn format(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl TimeRange {
    /// Query period relative to `today`. Ends are exclusive; ranges that include
    /// the current month end tomorrow.
    pub fn period(self, today: NaiveDate) -> TimePeriod {
        let this_month = first_of_month(today, 0);
        let tomorrow = today + Duration::days(1);

        let (start, end) = match self {
            Self::LastMonth => (first_of_month(today, 1), this_month),
            Self::MonthToDate => (this_month, tomorrow),
            Self::YearToDate => (first_of_month(today, today.month0() as i32), tomorrow),
            Self::ThreeMonths => (first_of_month(today, 3), this_month),
            Self::SixMonths => (first_of_month(today, 6), this_month),
            Self::OneYear => (first_of_month(today, 12), this_month),
        };

        TimePeriod {
            start: format(start),
            end: format(end),
        }
    }
}

/// Time selection shared by `cost get` and `cost list`
#[derive(Args, Debug, Clone)]
pub struct TimeOptions {
    /// Set time range
    #[arg(
        short = 't',
        long = "time",
        value_enum,
        ignore_case = true,
        default_value_t = TimeRange::MonthToDate,
        conflicts_with_all = ["start", "end"]
    )]
    pub time: TimeRange,

    /// Set start date (YYYY-MM-DD)
    #[arg(long, default_value = "", hide_default_value = true)]
    pub start: String,

    /// Set end date (YYYY-MM-DD), exclusive
    #[arg(long, default_value = "", hide_default_value = true)]
    pub end: String,
}

impl TimeOptions {
    /// Resolve the flags to a query period.
    pub fn resolve(&self, command_path: &str, today: NaiveDate) -> Result<TimePeriod, Error> {
        validation::evaluate(
            [(&DATE_RANGE, [self.start.as_str(), self.end.as_str()])],
            command_path,
        )?;

        if self.start.is_empty() {
            return Ok(self.time.period(today));
        }

        let parse = |flag: &str, value: &str| {
            NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
                Error::usage(
                    command_path,
                    format!("invalid --{} {:?}, expected YYYY-MM-DD", flag, value),
                )
            })
        };
        let start = parse("start", &self.start)?;
        let end = parse("end", &self.end)?;
        if end <= start {
            return Err(Error::usage(command_path, "--end must be after --start"));
        }

        Ok(TimePeriod {
            start: format(start),
            end: format(end),
        })
    }
}
