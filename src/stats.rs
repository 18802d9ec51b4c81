//! Statistics aggregation.
//!
//! Composes one statistics payload per (period, offset) request: current vs
//! previous window counts and sums, the fixed-window spending card, streak
//! figures, and histogram chart data. The display surface re-requests the
//! payload whenever the user changes period tab or navigates offsets.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::common::{ms_to_local, Millis};
use crate::error::{MurmrError, Result};
use crate::period::Period;
use crate::store::EventStore;

/// Parallel arrays backing the activity chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub session_counts: Vec<u64>,
    pub spending_amounts: Vec<f64>,
}

/// Full statistics payload for one (period, offset) request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub period: Period,
    pub offset: i32,
    pub period_label: String,
    pub sessions: usize,
    pub session_change: i64,
    pub spending: f64,
    pub spending_change: f64,
    pub spending_card_amount: f64,
    pub spending_card_change: f64,
    pub spending_card_label: String,
    pub longest_streak: Millis,
    /// Mean gap between sessions over the whole log, ms. `None` with fewer
    /// than two sessions ever.
    pub avg_time_between: Option<f64>,
    pub chart_data: ChartData,
}

/// Computes the statistics payload for the period at `offset` from `now`.
pub fn compute_stats(
    store: &EventStore,
    period: Period,
    offset: i32,
    now: DateTime<Local>,
) -> Result<StatsReport> {
    let cur = period.bounds(now, offset)?;
    let prev = period.bounds(now, offset.saturating_sub(1))?;

    let sessions = store.sessions_in_range(cur.start, cur.end).len();
    let sessions_prev = store.sessions_in_range(prev.start, prev.end).len();

    let spending = store.spending_in_range(cur.start, cur.end);
    let spending_prev = store.spending_in_range(prev.start, prev.end);

    // The spending card answers a different question than the period stats:
    // it always compares this calendar month against last month (this year
    // against last year on the yearly tab), whatever window is being viewed.
    let card_period = match period {
        Period::Yearly => Period::Yearly,
        _ => Period::Monthly,
    };
    let card_cur = card_period.bounds(now, 0)?;
    let card_prev = card_period.bounds(now, -1)?;
    let spending_card_amount = store.spending_in_range(card_cur.start, card_cur.end);
    let spending_card_change =
        spending_card_amount - store.spending_in_range(card_prev.start, card_prev.end);

    let now_ms = now.timestamp_millis();

    Ok(StatsReport {
        period,
        offset,
        period_label: period.label(now, offset)?,
        sessions,
        session_change: sessions as i64 - sessions_prev as i64,
        spending,
        spending_change: spending - spending_prev,
        spending_card_amount,
        spending_card_change,
        spending_card_label: card_period.label(now, 0)?,
        longest_streak: store.longest_streak(now_ms),
        avg_time_between: store.average_gap(),
        chart_data: histogram(store, period, cur.start)?,
    })
}

/// Builds the histogram for the aligned period starting at `window_start`.
///
/// Buckets are half-open `[start, end)`, unlike the inclusive range queries:
/// a session sitting exactly on a bucket boundary lands in exactly one
/// bucket. Bucket count and width depend on the period kind alone, so the
/// current (partial) period still charts its full span.
pub fn histogram(store: &EventStore, period: Period, window_start: Millis) -> Result<ChartData> {
    let start = ms_to_local(window_start)?;
    let edges = bucket_edges(period, start)?;

    let mut labels = Vec::with_capacity(edges.len());
    let mut session_counts = Vec::with_capacity(edges.len());
    let mut spending_amounts = Vec::with_capacity(edges.len());

    for (bucket_start, bucket_end, label) in edges {
        let count = store
            .sessions()
            .iter()
            .filter(|s| s.timestamp >= bucket_start && s.timestamp < bucket_end)
            .count() as u64;
        let spending: f64 = store
            .expenses()
            .iter()
            .filter(|e| e.timestamp >= bucket_start && e.timestamp < bucket_end)
            .map(|e| e.amount)
            .sum();

        labels.push(label);
        session_counts.push(count);
        spending_amounts.push(spending);
    }

    Ok(ChartData {
        labels,
        session_counts,
        spending_amounts,
    })
}

/// Bucket boundaries (ms, half-open) and labels for one aligned period.
fn bucket_edges(
    period: Period,
    start: DateTime<Local>,
) -> Result<Vec<(Millis, Millis, String)>> {
    let mut edges = Vec::new();

    match period {
        // 24 one-hour buckets labelled by hour of day
        Period::Daily => {
            for hour in 0..24 {
                let bucket_start = start + Duration::hours(hour);
                let bucket_end = start + Duration::hours(hour + 1);
                edges.push((
                    bucket_start.timestamp_millis(),
                    bucket_end.timestamp_millis(),
                    bucket_start.format("%H").to_string(),
                ));
            }
        }
        // 7 one-day buckets labelled by weekday abbreviation
        Period::Weekly => {
            for day in 0..7 {
                let bucket_start = start + Duration::days(day);
                let bucket_end = start + Duration::days(day + 1);
                edges.push((
                    bucket_start.timestamp_millis(),
                    bucket_end.timestamp_millis(),
                    bucket_start.format("%a").to_string(),
                ));
            }
        }
        // One bucket per real day of the target month (28-31)
        Period::Monthly => {
            let days = days_in_month(start.date_naive())?;
            for day in 0..days {
                let bucket_start = start + Duration::days(day);
                let bucket_end = start + Duration::days(day + 1);
                edges.push((
                    bucket_start.timestamp_millis(),
                    bucket_end.timestamp_millis(),
                    format!("{}", day + 1),
                ));
            }
        }
        // 12 buckets spanning each month's real start/end, not fixed chunks
        Period::Yearly => {
            let year = start.year();
            for month in 1..=12u32 {
                let first = month_first(year, month)?;
                let next = if month == 12 {
                    month_first(year + 1, 1)?
                } else {
                    month_first(year, month + 1)?
                };
                edges.push((
                    first.timestamp_millis(),
                    next.timestamp_millis(),
                    first.format("%b").to_string(),
                ));
            }
        }
    }

    Ok(edges)
}

fn month_first(year: i32, month: u32) -> Result<DateTime<Local>> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| MurmrError::timestamp(format!("bad month {}-{}", year, month)))?;
    Local
        .from_local_datetime(&date)
        .earliest()
        .ok_or_else(|| MurmrError::timestamp(format!("no local midnight for {}-{}", year, month)))
}

fn days_in_month(first: NaiveDate) -> Result<i64> {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .ok_or_else(|| MurmrError::timestamp("month out of range"))?;
    Ok((next - first).num_days())
}

/// Navigation state for the stats screen: which period tab is active and how
/// far back the user has paged. The offset can never go positive.
#[derive(Debug, Clone, Copy)]
pub struct PeriodCursor {
    period: Period,
    offset: i32,
}

impl PeriodCursor {
    pub fn new(period: Period) -> Self {
        PeriodCursor { period, offset: 0 }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Switching tabs lands back on the current period.
    pub fn set_period(&mut self, period: Period) {
        self.period = period;
        self.offset = 0;
    }

    /// Pages one period back.
    pub fn prev(&mut self) {
        self.offset -= 1;
    }

    /// Pages one period forward. A no-op once back at the current period;
    /// returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.offset < 0 {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    pub fn stats(&self, store: &EventStore, now: DateTime<Local>) -> Result<StatsReport> {
        compute_stats(store, self.period, self.offset, now)
    }
}
