//! Calendar-aligned period arithmetic.
//!
//! Pure calendar math, no I/O. A period is a named calendar window kind
//! (daily / weekly / monthly / yearly) addressed by a non-positive `offset`
//! from the period containing `now`: 0 is the current period, -1 the one
//! before it, and so on. Positive offsets are rejected.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use std::fmt;
use std::str::FromStr;

use crate::common::Millis;
use crate::error::{MurmrError, Result};

/// Supported period kinds. Weeks start on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Start/end instants of one period window, milliseconds since epoch.
///
/// `end` is the aligned start of the next period, except for the current
/// period (`offset == 0`) where `end` is `now`: the still-elapsing window is
/// bounded by the present so partial-period totals read correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: Millis,
    pub end: Millis,
}

/// Local midnight of `date`. Falls back to the earliest valid instant for
/// timezones where midnight does not exist on a DST transition day.
fn local_midnight(date: NaiveDate) -> Result<DateTime<Local>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| MurmrError::timestamp(format!("no midnight for {}", date)))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| MurmrError::timestamp(format!("no local midnight for {}", date)))
}

/// First day of the month `offset` whole months from `date`'s month.
fn shifted_month_start(date: NaiveDate, offset: i32) -> Result<NaiveDate> {
    let index = date.year() * 12 + date.month() as i32 - 1 + offset;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| MurmrError::timestamp(format!("month {}-{} out of range", year, month)))
}

impl Period {
    /// Calendar-aligned start of the period `offset` whole periods from the
    /// one containing `now`. Internal: callers validate the offset sign.
    fn aligned_start(self, now: DateTime<Local>, offset: i32) -> Result<DateTime<Local>> {
        let today = now.date_naive();
        let date = match self {
            Period::Daily => today + Duration::days(offset as i64),
            Period::Weekly => {
                let monday =
                    today - Duration::days(today.weekday().num_days_from_monday() as i64);
                monday + Duration::days(7 * offset as i64)
            }
            Period::Monthly => shifted_month_start(today, offset)?,
            Period::Yearly => NaiveDate::from_ymd_opt(today.year() + offset, 1, 1)
                .ok_or_else(|| MurmrError::timestamp("year out of range"))?,
        };
        local_midnight(date)
    }

    /// Boundaries of the period at `offset` from `now`.
    pub fn bounds(self, now: DateTime<Local>, offset: i32) -> Result<PeriodWindow> {
        if offset > 0 {
            return Err(MurmrError::InvalidOffset(offset));
        }

        let start = self.aligned_start(now, offset)?;
        let end = if offset == 0 {
            now
        } else {
            self.aligned_start(now, offset + 1)?
        };

        Ok(PeriodWindow {
            start: start.timestamp_millis(),
            end: end.timestamp_millis(),
        })
    }

    /// Human-readable label for the period at `offset`.
    ///
    /// The current and immediately previous daily/weekly windows get relative
    /// names; everything else falls through to a formatted date or range.
    pub fn label(self, now: DateTime<Local>, offset: i32) -> Result<String> {
        if offset > 0 {
            return Err(MurmrError::InvalidOffset(offset));
        }

        match (self, offset) {
            (Period::Daily, 0) => return Ok("Today".to_string()),
            (Period::Weekly, 0) => return Ok("This Week".to_string()),
            (Period::Monthly, 0) => return Ok("This Month".to_string()),
            (Period::Yearly, 0) => return Ok("This Year".to_string()),
            (Period::Daily, -1) => return Ok("Yesterday".to_string()),
            (Period::Weekly, -1) => return Ok("Last Week".to_string()),
            _ => {}
        }

        let start = self.aligned_start(now, offset)?;
        let label = match self {
            Period::Daily => start.format("%b %-d, %Y").to_string(),
            Period::Weekly => {
                let last_day = start + Duration::days(6);
                format!("{} - {}", start.format("%b %-d"), last_day.format("%b %-d"))
            }
            Period::Monthly => start.format("%B %Y").to_string(),
            Period::Yearly => start.format("%Y").to_string(),
        };
        Ok(label)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Period {
    type Err = MurmrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Period::Daily),
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            "yearly" | "year" => Ok(Period::Yearly),
            other => Err(MurmrError::other(format!("unknown period: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_daily_bounds_current_ends_at_now() {
        let now = local(2025, 6, 15, 14, 30, 0);
        let window = Period::Daily.bounds(now, 0).unwrap();
        assert_eq!(window.start, local(2025, 6, 15, 0, 0, 0).timestamp_millis());
        assert_eq!(window.end, now.timestamp_millis());
    }

    #[test]
    fn test_daily_bounds_past_ends_at_next_midnight() {
        let now = local(2025, 6, 15, 14, 30, 0);
        let window = Period::Daily.bounds(now, -1).unwrap();
        assert_eq!(window.start, local(2025, 6, 14, 0, 0, 0).timestamp_millis());
        assert_eq!(window.end, local(2025, 6, 15, 0, 0, 0).timestamp_millis());
    }

    #[test]
    fn test_weekly_bounds_monday_start() {
        // 2025-06-15 is a Sunday; its week began Monday 2025-06-09
        let now = local(2025, 6, 15, 10, 0, 0);
        let window = Period::Weekly.bounds(now, 0).unwrap();
        assert_eq!(window.start, local(2025, 6, 9, 0, 0, 0).timestamp_millis());

        let previous = Period::Weekly.bounds(now, -1).unwrap();
        assert_eq!(previous.start, local(2025, 6, 2, 0, 0, 0).timestamp_millis());
        assert_eq!(previous.end, window.start);
    }

    #[test]
    fn test_monthly_bounds_cross_year() {
        let now = local(2025, 1, 15, 9, 0, 0);
        let window = Period::Monthly.bounds(now, -1).unwrap();
        assert_eq!(window.start, local(2024, 12, 1, 0, 0, 0).timestamp_millis());
        assert_eq!(window.end, local(2025, 1, 1, 0, 0, 0).timestamp_millis());
    }

    #[test]
    fn test_yearly_bounds() {
        let now = local(2025, 6, 15, 12, 0, 0);
        let window = Period::Yearly.bounds(now, -2).unwrap();
        assert_eq!(window.start, local(2023, 1, 1, 0, 0, 0).timestamp_millis());
        assert_eq!(window.end, local(2024, 1, 1, 0, 0, 0).timestamp_millis());
    }

    #[test]
    fn test_adjacent_windows_share_boundary() {
        let now = local(2025, 6, 15, 14, 30, 0);
        for period in [Period::Daily, Period::Weekly, Period::Monthly, Period::Yearly] {
            let cur = period.bounds(now, 0).unwrap();
            let prev = period.bounds(now, -1).unwrap();
            assert_eq!(prev.end, cur.start, "{} windows must be adjacent", period);
        }
    }

    #[test]
    fn test_positive_offset_rejected() {
        let now = local(2025, 6, 15, 14, 30, 0);
        assert!(matches!(
            Period::Daily.bounds(now, 1),
            Err(MurmrError::InvalidOffset(1))
        ));
        assert!(Period::Weekly.label(now, 3).is_err());
    }

    #[test]
    fn test_relative_labels() {
        let now = local(2025, 6, 15, 14, 30, 0);
        assert_eq!(Period::Daily.label(now, 0).unwrap(), "Today");
        assert_eq!(Period::Daily.label(now, -1).unwrap(), "Yesterday");
        assert_eq!(Period::Weekly.label(now, 0).unwrap(), "This Week");
        assert_eq!(Period::Weekly.label(now, -1).unwrap(), "Last Week");
        assert_eq!(Period::Monthly.label(now, 0).unwrap(), "This Month");
        assert_eq!(Period::Yearly.label(now, 0).unwrap(), "This Year");
    }

    #[test]
    fn test_formatted_labels() {
        let now = local(2025, 6, 15, 14, 30, 0);
        assert_eq!(Period::Daily.label(now, -3).unwrap(), "Jun 12, 2025");
        // Monthly falls through to a formatted label even at -1
        assert_eq!(Period::Monthly.label(now, -1).unwrap(), "May 2025");
        assert_eq!(Period::Yearly.label(now, -1).unwrap(), "2024");
        assert_eq!(Period::Weekly.label(now, -2).unwrap(), "May 26 - Jun 1");
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("daily".parse::<Period>().unwrap(), Period::Daily);
        assert_eq!("WEEK".parse::<Period>().unwrap(), Period::Weekly);
        assert!("fortnightly".parse::<Period>().is_err());
    }
}
