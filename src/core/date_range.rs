use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Last representable millisecond of a day.
const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_milli_opt(23, 59, 59, 999) {
    Some(time) => time,
    None => panic!("invalid end-of-day time"),
};

/// Local midnight of the date.
///
/// Falls back to interpreting the naive time as UTC when it does not exist locally.
pub fn start_of_day(date: NaiveDate) -> DateTime<Local> {
    at_local(date.and_time(NaiveTime::MIN))
}

/// Last millisecond of the date in local time.
pub fn end_of_day(date: NaiveDate) -> DateTime<Local> {
    at_local(date.and_time(END_OF_DAY))
}

fn at_local(naive: NaiveDateTime) -> DateTime<Local> {
    Local.from_local_datetime(&naive).earliest().unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

/// Format of the timestamps sent to the history service.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimestampFormat {
    /// `yyyy-MM-dd'T'HH:mm`, used by the sub-day resolution endpoints.
    Minutes,

    /// `yyyy-MM-dd`, used by the daily, monthly, and yearly endpoints.
    Date,
}

impl TimestampFormat {
    const fn pattern(self) -> &'static str {
        match self {
            Self::Minutes => "%Y-%m-%dT%H:%M",
            Self::Date => "%Y-%m-%d",
        }
    }

    pub fn format(self, timestamp: DateTime<Local>) -> String {
        timestamp.format(self.pattern()).to_string()
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct DateRange {
    /// Inclusive.
    pub start: DateTime<Local>,

    /// Inclusive.
    pub end: DateTime<Local>,
}

impl Debug for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.start, self.end)
    }
}

impl DateRange {
    pub const fn new(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self { start, end }
    }

    /// The whole day, from its first to its last millisecond.
    pub fn day_of(date: NaiveDate) -> Self {
        Self::new(start_of_day(date), end_of_day(date))
    }

    /// From the start of the first date till the end of the last date.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self::new(start_of_day(first), end_of_day(last))
    }

    #[must_use]
    pub fn with_start_of(self, date: NaiveDate) -> Self {
        Self { start: start_of_day(date), ..self }
    }

    #[must_use]
    pub fn with_end_of(self, date: NaiveDate) -> Self {
        Self { end: end_of_day(date), ..self }
    }

    /// Selector view of the range.
    pub const fn bounds(&self) -> (DateTime<Local>, DateTime<Local>) {
        (self.start, self.end)
    }

    /// Format the range for a request, or [`None`] when the request must not be sent.
    pub fn format(&self, format: TimestampFormat) -> Option<FormattedRange> {
        FormattedRange::try_new(format.format(self.start), format.format(self.end))
    }
}

/// Request-ready pair of formatted timestamps with `start <= end`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormattedRange {
    pub start: String,
    pub end: String,
}

impl FormattedRange {
    /// Validate the pair.
    ///
    /// The comparison is lexicographic on the formatted strings, which agrees with
    /// the chronological order for both [`TimestampFormat`]s.
    pub fn try_new(start: String, end: String) -> Option<Self> {
        if start.is_empty() || end.is_empty() || end < start {
            None
        } else {
            Some(Self { start, end })
        }
    }
}
