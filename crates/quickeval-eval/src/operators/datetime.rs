//! Date calculator
//!
//! Queries are matched against an ordered table of shapes; the first shape
//! whose pattern matches handles the query:
//!
//! | Shape | Example |
//! |-------|---------|
//! | arithmetic | `2024-01-01 + 5 days`, `today - 2 weeks` |
//! | difference | `days between 2024-01-01 and 2024-01-31`, `business days between ...` |
//! | relative weekday | `next monday`, `last friday` |
//! | relative offset | `3 days ago`, `2 hours from now` |
//! | age | `age of 1990-05-20` |
//! | weekday | `what day is 2024-07-04` |
//!
//! Anything else is parsed as a bare date.

use crate::context::{Clock, SystemClock};
use crate::error::{EvalError, EvalResult};
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use once_cell::sync::Lazy;
use quickeval_types::{CalculationResult, CalculationType, EngineConfig};
use regex::{Captures, Regex};
use std::sync::Arc;
use tracing::debug;

const RESULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DAY_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Date keywords resolved against the clock
pub const DATE_KEYWORDS: [&str; 4] = ["today", "now", "yesterday", "tomorrow"];

const SHIFT_UNITS: &str = "seconds?|minutes?|hours?|days?|weeks?|months?|years?";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static DATE_SHAPES: Lazy<Vec<(Regex, DateShape)>> = Lazy::new(|| {
    [
        (
            format!(r"^(.+?)\s*([+-])\s*(\d+)\s+({SHIFT_UNITS})$"),
            DateShape::Arithmetic,
        ),
        (
            format!(r"\b(business days?|workdays?|{SHIFT_UNITS})\s+between\s+(.+?)\s+and\s+(.+)$"),
            DateShape::Difference,
        ),
        (
            r"^(next|last)\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)$".to_string(),
            DateShape::RelativeWeekday,
        ),
        (
            format!(r"^(\d+)\s+({SHIFT_UNITS})\s+(ago|from now)$"),
            DateShape::RelativeOffset,
        ),
        (r"^age\s+of\s+(.+)$".to_string(), DateShape::Age),
        (r"^(?:what|which)\s+day\s+is\s+(.+)$".to_string(), DateShape::Weekday),
    ]
    .into_iter()
    .map(|(pattern, shape)| (Regex::new(&pattern).expect("valid date shape pattern"), shape))
    .collect()
});

/// Recognized date query shapes, in matching order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    Arithmetic,
    Difference,
    RelativeWeekday,
    RelativeOffset,
    Age,
    Weekday,
}

impl DateShape {
    /// Shape of a lower-cased, whitespace-collapsed query, if any
    pub fn detect(text: &str) -> Option<Self> {
        DATE_SHAPES
            .iter()
            .find(|(pattern, _)| pattern.is_match(text))
            .map(|(_, shape)| *shape)
    }
}

/// Calendar unit accepted by arithmetic, offsets and differences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
    BusinessDay,
}

impl DateUnit {
    /// Parse a singular or plural unit name
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().trim_end_matches('s') {
            "second" => Some(Self::Second),
            "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            "business day" | "workday" => Some(Self::BusinessDay),
            _ => None,
        }
    }

    /// Length in seconds of the fixed-size units
    const fn seconds(self) -> Option<i64> {
        match self {
            Self::Second => Some(1),
            Self::Minute => Some(60),
            Self::Hour => Some(3_600),
            Self::Day => Some(86_400),
            Self::Week => Some(604_800),
            Self::Month | Self::Year | Self::BusinessDay => None,
        }
    }

    /// Whether offsets in this unit start from the current instant rather than midnight
    const fn is_clock_time(self) -> bool {
        matches!(self, Self::Second | Self::Minute | Self::Hour)
    }
}

/// Move `at` by `amount` units; months and years clamp to the end of the month
pub fn shift(at: NaiveDateTime, unit: DateUnit, amount: i64) -> EvalResult<NaiveDateTime> {
    let out_of_range = || EvalError::date_out_of_range(format!("cannot move {} by {amount} {unit:?}", at.format(DAY_FORMAT)));

    let shifted = match (unit, unit.seconds()) {
        (_, Some(length)) => amount
            .checked_mul(length)
            .and_then(TimeDelta::try_seconds)
            .and_then(|delta| at.checked_add_signed(delta)),
        (DateUnit::Month | DateUnit::Year, None) => {
            let months = if unit == DateUnit::Year {
                amount.checked_mul(12)
            } else {
                Some(amount)
            };
            let months = months.ok_or_else(out_of_range)?;
            let magnitude = Months::new(u32::try_from(months.unsigned_abs()).map_err(|_| out_of_range())?);
            if months >= 0 {
                at.checked_add_months(magnitude)
            } else {
                at.checked_sub_months(magnitude)
            }
        }
        (_, None) => return Err(EvalError::InvalidDateExpression),
    };
    shifted.ok_or_else(out_of_range)
}

/// Non-negative distance between two instants in `unit`
pub fn difference(unit: DateUnit, first: NaiveDateTime, second: NaiveDateTime) -> i64 {
    let (start, end) = if first <= second { (first, second) } else { (second, first) };
    let span = end - start;
    let years = i64::from(end.year() - start.year());

    match unit {
        DateUnit::Second => span.num_seconds(),
        DateUnit::Minute => span.num_minutes(),
        DateUnit::Hour => span.num_hours(),
        DateUnit::Day => span.num_days(),
        DateUnit::Week => span.num_days() / 7,
        DateUnit::Month => (years * 12 + i64::from(end.month()) - i64::from(start.month())).abs(),
        DateUnit::Year => years.abs(),
        DateUnit::BusinessDay => business_days(start.date(), end.date()),
    }
}

/// Weekdays from `start` to `end`, both ends included
pub fn business_days(start: NaiveDate, end: NaiveDate) -> i64 {
    let count = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count();
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Whole years between `birth` and `today`
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> EvalResult<i32> {
    if birth > today {
        return Err(EvalError::date_out_of_range(format!("birth date {birth} is in the future")));
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    Ok(years)
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Date calculator reading keyword dates from an injectable clock
#[derive(Debug, Clone)]
pub struct DateCalculator {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl Default for DateCalculator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DateCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn calculate(&self, expression: &str) -> CalculationResult {
        let input = expression.trim();
        match self.try_calculate(input) {
            Ok(result) => result,
            Err(err) => {
                debug!(input, error = %err, "date calculation failed");
                err.into_result(input)
            }
        }
    }

    fn try_calculate(&self, input: &str) -> EvalResult<CalculationResult> {
        if input.is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        let text = WHITESPACE.replace_all(input, " ").to_lowercase();

        for (pattern, shape) in DATE_SHAPES.iter() {
            if let Some(caps) = pattern.captures(&text) {
                debug!(?shape, "date shape matched");
                return match shape {
                    DateShape::Arithmetic => self.arithmetic(input, &caps),
                    DateShape::Difference => self.difference(input, &caps),
                    DateShape::RelativeWeekday => self.relative_weekday(input, &caps),
                    DateShape::RelativeOffset => self.relative_offset(input, &caps),
                    DateShape::Age => self.age(input, &caps[1]),
                    DateShape::Weekday => self.weekday(input, &caps[1]),
                };
            }
        }

        let at = self
            .parse_date(&text)
            .map_err(|_| EvalError::InvalidDateExpression)?;
        Ok(instant_result(input, at, format!("Date: {}", at.format(RESULT_FORMAT))))
    }

    /// Parse a keyword or one of the accepted date formats
    pub fn parse_date(&self, text: &str) -> EvalResult<NaiveDateTime> {
        let text = text.trim().to_lowercase();
        match text.as_str() {
            "now" => return Ok(self.clock.now()),
            "today" => return Ok(self.clock.today()),
            "yesterday" => return shift(self.clock.today(), DateUnit::Day, -1),
            "tomorrow" => return shift(self.clock.today(), DateUnit::Day, 1),
            _ => {}
        }

        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .or_else(|| DateTime::parse_from_rfc3339(&text).ok().map(|dt| dt.naive_local()))
            .ok_or_else(|| EvalError::unparseable_date(text.as_str()))
    }

    fn arithmetic(&self, input: &str, caps: &Captures<'_>) -> EvalResult<CalculationResult> {
        let date_text = caps[1].trim();
        let operation = &caps[2];
        let unit_text = &caps[4];
        let base = self.parse_date(date_text)?;
        let unit = DateUnit::parse(unit_text).ok_or(EvalError::InvalidDateExpression)?;
        let amount: i64 = caps[3].parse().map_err(|_| EvalError::invalid_number(&caps[3]))?;
        let signed = if operation == "-" { -amount } else { amount };
        let shifted = shift(base, unit, signed)?;

        let base_label = if DATE_KEYWORDS.contains(&date_text) {
            date_text.to_string()
        } else {
            base.format(DAY_FORMAT).to_string()
        };
        Ok(instant_result(
            input,
            shifted,
            format!("{base_label} {operation} {amount} {unit_text} = {}", shifted.format(DAY_FORMAT)),
        ))
    }

    fn difference(&self, input: &str, caps: &Captures<'_>) -> EvalResult<CalculationResult> {
        let unit_text = &caps[1];
        let unit = DateUnit::parse(unit_text).ok_or(EvalError::InvalidDateExpression)?;
        let first = self.parse_date(&caps[2])?;
        let second = self.parse_date(&caps[3])?;
        let count = difference(unit, first, second);

        let label = if count == 1 {
            unit_text.trim_end_matches('s')
        } else {
            unit_text
        };
        Ok(date_result(input, count.to_string())
            .with_subtitle(format!(
                "{count} {label} between {} and {}",
                first.format(DAY_FORMAT),
                second.format(DAY_FORMAT)
            ))
            .with_numeric_value(count as f64))
    }

    fn relative_weekday(&self, input: &str, caps: &Captures<'_>) -> EvalResult<CalculationResult> {
        let target: Weekday = caps[2]
            .parse()
            .map_err(|_| EvalError::unparseable_date(&caps[2]))?;
        let today = self.clock.today();
        let ahead = (i64::from(target.num_days_from_monday()) - i64::from(today.weekday().num_days_from_monday()) + 7) % 7;
        let days = match (&caps[1], ahead) {
            ("last", 0) => -7,
            ("last", n) => n - 7,
            (_, 0) => 7,
            (_, n) => n,
        };
        let at = shift(today, DateUnit::Day, days)?;
        Ok(instant_result(input, at, format!("Date: {}", at.format(DAY_FORMAT))))
    }

    fn relative_offset(&self, input: &str, caps: &Captures<'_>) -> EvalResult<CalculationResult> {
        let amount: i64 = caps[1].parse().map_err(|_| EvalError::invalid_number(&caps[1]))?;
        let unit = DateUnit::parse(&caps[2]).ok_or(EvalError::InvalidDateExpression)?;
        let base = if unit.is_clock_time() {
            self.clock.now()
        } else {
            self.clock.today()
        };
        let signed = if &caps[3] == "ago" { -amount } else { amount };
        let at = shift(base, unit, signed)?;
        Ok(instant_result(input, at, format!("Date: {}", at.format(DAY_FORMAT))))
    }

    fn age(&self, input: &str, date_text: &str) -> EvalResult<CalculationResult> {
        let birth = self.parse_date(date_text)?.date();
        let years = age_in_years(birth, self.clock.today().date())?;
        Ok(date_result(input, format!("{years} years"))
            .with_subtitle(format!("Age: {years} years"))
            .with_numeric_value(f64::from(years)))
    }

    fn weekday(&self, input: &str, date_text: &str) -> EvalResult<CalculationResult> {
        let date = self.parse_date(date_text)?;
        let name = weekday_name(date.weekday());
        Ok(date_result(input, name.to_string())
            .with_subtitle(format!("{} is a {name}", date.format(DAY_FORMAT))))
    }
}

fn date_result(input: &str, result: String) -> CalculationResult {
    CalculationResult::success(input, result, CalculationType::DateCalculation).with_raw_expression(input)
}

/// Result for a single instant; the numeric value is its unix timestamp
fn instant_result(input: &str, at: NaiveDateTime, subtitle: String) -> CalculationResult {
    date_result(input, at.format(RESULT_FORMAT).to_string())
        .with_subtitle(subtitle)
        .with_numeric_value(at.and_utc().timestamp() as f64)
}
