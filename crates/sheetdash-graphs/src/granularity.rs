//! Period granularity and calendar buckets

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bucket size for period aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

/// Returned when a granularity name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown period '{0}', expected daily, weekly or monthly")]
pub struct ParseGranularityError(pub String);

impl Granularity {
    /// Choices in the order the dashboard offers them.
    pub const CHOICES: [Granularity; 3] = [Self::Monthly, Self::Weekly, Self::Daily];

    /// Selector label shown next to a chart, e.g. "Month on Month".
    pub fn selector_label(self) -> &'static str {
        match self {
            Self::Daily => "Day on Day",
            Self::Weekly => "Week on Week",
            Self::Monthly => "Month on Month",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// First day of the period containing `date`.
    ///
    /// Weeks start on Monday (ISO 8601); months on the 1st.
    pub fn truncate(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Weekly => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(offset)).unwrap_or(date)
            }
            Self::Monthly => date.with_day(1).unwrap_or(date),
        }
    }

    /// Bucket holding a timestamp.
    pub fn bucket(self, timestamp: NaiveDateTime) -> Bucket {
        Bucket {
            start: self.truncate(timestamp.date()),
            granularity: self,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "daily" | "day on day" => Ok(Self::Daily),
            "w" | "week" | "weekly" | "week on week" => Ok(Self::Weekly),
            "m" | "month" | "monthly" | "month on month" => Ok(Self::Monthly),
            _ => Err(ParseGranularityError(s.to_string())),
        }
    }
}

/// A calendar period of fixed granularity, identified by its first day.
///
/// Ordering follows the boundary instant. Buckets of different
/// granularities never share a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bucket {
    start: NaiveDate,
    granularity: Granularity,
}

impl Bucket {
    /// Bucket containing `date`.
    pub fn containing(granularity: Granularity, date: NaiveDate) -> Self {
        Self {
            start: granularity.truncate(date),
            granularity,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// First day of the period.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.next()
            .and_then(|next| next.start.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// The period right after this one; `None` at the end of the calendar.
    pub fn next(&self) -> Option<Bucket> {
        let start = match self.granularity {
            Granularity::Daily => self.start.succ_opt(),
            Granularity::Weekly => self.start.checked_add_days(Days::new(7)),
            Granularity::Monthly => self.start.checked_add_months(Months::new(1)),
        }?;
        Some(Self {
            start,
            granularity: self.granularity,
        })
    }

    /// Human readable label: `2024-03-15`, `2024-03-11/2024-03-17` or `2024-03`.
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Daily => self.start.format("%Y-%m-%d").to_string(),
            Granularity::Weekly => format!(
                "{}/{}",
                self.start.format("%Y-%m-%d"),
                self.end().format("%Y-%m-%d")
            ),
            Granularity::Monthly => self.start.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
