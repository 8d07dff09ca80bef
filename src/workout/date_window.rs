//! Which calendar days a workout query covers.

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use chrono_tz::Tz;
use log::warn;

use crate::workout::error::DateWindowError;

/// Format expected by the workout API's `dates` parameter.
const FILTER_FORMAT: &str = "%Y%m%d";
/// Prefix format of a record's `scheduled_date`.
const PREFIX_FORMAT: &str = "%Y-%m-%d";

/// A primary day and, optionally, the day after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub primary: NaiveDate,
    pub include_tomorrow: bool,
}

impl DateWindow {
    pub fn new(primary: NaiveDate, include_tomorrow: bool) -> Self {
        Self {
            primary,
            include_tomorrow,
        }
    }

    /// Parses `YYYY-MM-DD` or `YYYYMMDD`.
    pub fn parse(input: &str, include_tomorrow: bool) -> Result<Self, DateWindowError> {
        let input = input.trim();
        let primary = NaiveDate::parse_from_str(input, PREFIX_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(input, FILTER_FORMAT))
            .map_err(|_| DateWindowError::InvalidDate {
                input: input.to_string(),
            })?;
        Ok(Self::new(primary, include_tomorrow))
    }

    /// The day after the primary day, whether or not the window includes it.
    pub fn tomorrow(&self) -> Option<NaiveDate> {
        self.primary.succ_opt()
    }

    /// The days covered, in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = vec![self.primary];
        if self.include_tomorrow
            && let Some(tomorrow) = self.tomorrow()
        {
            dates.push(tomorrow);
        }
        dates
    }

    /// The `dates` query value, e.g. `20240320` or `20240320,20240321`.
    pub fn filter(&self) -> String {
        self.dates()
            .iter()
            .map(|d| d.format(FILTER_FORMAT).to_string())
            .collect::<Vec<String>>()
            .join(",")
    }
}

/// Formats a day the way records spell it in `scheduled_date`.
pub fn day_prefix(date: NaiveDate) -> String {
    date.format(PREFIX_FORMAT).to_string()
}

/// Resolves "today" in a fixed reference zone.
#[derive(Clone, Debug)]
pub struct DateWindowResolver {
    zone: Tz,
}

impl DateWindowResolver {
    /// Falls back to UTC when `zone_name` is not a known IANA zone.
    pub fn new(zone_name: &str) -> Self {
        let zone = match zone_name.parse::<Tz>() {
            Ok(zone) => zone,
            Err(e) => {
                warn!("Unknown time zone `{zone_name}` ({e}). Using UTC dates as fallback.");
                Tz::UTC
            }
        };
        Self { zone }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn today(&self) -> NaiveDate {
        self.today_at(Utc::now())
    }

    /// The local date in the reference zone at the given instant.
    pub fn today_at(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.zone).date_naive()
    }

    /// An explicit date wins over the current day.
    pub fn resolve(
        &self,
        explicit: Option<&str>,
        include_tomorrow: bool,
    ) -> Result<DateWindow, DateWindowError> {
        match explicit {
            Some(input) => DateWindow::parse(input, include_tomorrow),
            None => Ok(DateWindow::new(self.today(), include_tomorrow)),
        }
    }
}

impl Default for DateWindowResolver {
    fn default() -> Self {
        Self::new("Asia/Jerusalem")
    }
}
