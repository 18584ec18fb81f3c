//! Calendar time scale over expiration dates

use super::linear::tick_step;
use chrono::{Datelike, Duration, NaiveDate};

/// Approximate interval lengths in days, used to pick a tick interval
const DAYS_PER_WEEK: f64 = 7.0;
const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Candidate tick intervals ordered by duration
const TICK_INTERVALS: [(TimeInterval, f64); 6] = [
    (TimeInterval::Day(1), 1.0),
    (TimeInterval::Day(2), 2.0),
    (TimeInterval::Week, DAYS_PER_WEEK),
    (TimeInterval::Month(1), DAYS_PER_MONTH),
    (TimeInterval::Month(3), 3.0 * DAYS_PER_MONTH),
    (TimeInterval::Year(1), DAYS_PER_YEAR),
];

/// Calendar interval used for nicing and ticks
///
/// `Day(n)` aligns on days of the month 1, 1+n, 1+2n, ...; `Week` on
/// Sundays; `Month(n)` on month starts whose zero-based month is a multiple
/// of n; `Year(n)` on January 1st of years that are multiples of n.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    Day(u32),
    Week,
    Month(u32),
    Year(i32),
}

impl TimeInterval {
    /// Choose the interval that yields roughly `count` ticks over the span
    pub fn for_span(start: NaiveDate, stop: NaiveDate, count: usize) -> Self {
        let span = (stop - start).num_days().unsigned_abs() as f64;
        let target = span / count.max(1) as f64;

        let i = TICK_INTERVALS
            .iter()
            .take_while(|(_, days)| *days <= target)
            .count();

        if i == TICK_INTERVALS.len() {
            let step = tick_step(
                start.num_days_from_ce() as f64 / DAYS_PER_YEAR,
                stop.num_days_from_ce() as f64 / DAYS_PER_YEAR,
                count,
            );
            return TimeInterval::Year((step.abs().floor() as i32).max(1));
        }
        if i == 0 {
            return TimeInterval::Day(1);
        }

        let (lower, lower_days) = TICK_INTERVALS[i - 1];
        let (upper, upper_days) = TICK_INTERVALS[i];
        if target / lower_days < upper_days / target {
            lower
        } else {
            upper
        }
    }

    fn is_aligned(&self, date: NaiveDate) -> bool {
        match *self {
            TimeInterval::Day(n) => (date.day() - 1) % n.max(1) == 0,
            TimeInterval::Week => date.weekday().num_days_from_sunday() == 0,
            TimeInterval::Month(n) => date.day() == 1 && date.month0() % n.max(1) == 0,
            TimeInterval::Year(n) => {
                date.ordinal() == 1 && date.year().rem_euclid(n.max(1)) == 0
            }
        }
    }

    /// Latest aligned date at or before `date`
    pub fn floor(&self, date: NaiveDate) -> NaiveDate {
        match *self {
            TimeInterval::Day(n) => {
                let offset = (date.day() - 1) % n.max(1);
                date - Duration::days(offset as i64)
            }
            TimeInterval::Week => {
                date - Duration::days(date.weekday().num_days_from_sunday() as i64)
            }
            TimeInterval::Month(n) => {
                let month0 = date.month0() - date.month0() % n.max(1);
                NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1).unwrap_or(date)
            }
            TimeInterval::Year(n) => {
                let year = date.year() - date.year().rem_euclid(n.max(1));
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(date)
            }
        }
    }

    /// Earliest aligned date at or after `date`
    pub fn ceil(&self, date: NaiveDate) -> NaiveDate {
        if self.is_aligned(date) {
            return date;
        }
        match *self {
            TimeInterval::Day(_) | TimeInterval::Week => {
                let mut next = date;
                while !self.is_aligned(next) {
                    match next.succ_opt() {
                        Some(d) => next = d,
                        None => return date,
                    }
                }
                next
            }
            TimeInterval::Month(n) => {
                let floored = self.floor(date);
                add_months(floored, n.max(1)).unwrap_or(date)
            }
            TimeInterval::Year(n) => {
                let floored = self.floor(date);
                NaiveDate::from_ymd_opt(floored.year() + n.max(1), 1, 1).unwrap_or(date)
            }
        }
    }

    /// Aligned dates in `[start, stop]`
    pub fn range(&self, start: NaiveDate, stop: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = self.ceil(start);
        while current <= stop {
            dates.push(current);
            let next = match current.succ_opt() {
                Some(d) => self.ceil(d),
                None => break,
            };
            if next <= current {
                break;
            }
            current = next;
        }
        dates
    }
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    NaiveDate::from_ymd_opt(year, total % 12 + 1, 1)
}

/// Time map from a date domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: [NaiveDate; 2],
    range: [f64; 2],
}

impl TimeScale {
    pub fn new(domain: [NaiveDate; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [NaiveDate; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn is_degenerate(&self) -> bool {
        self.domain[0] == self.domain[1]
    }

    /// Map a date to the range; a single-date domain maps to the middle
    pub fn map(&self, date: NaiveDate) -> f64 {
        let [r0, r1] = self.range;
        if self.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        let span = (self.domain[1] - self.domain[0]).num_days() as f64;
        let offset = (date - self.domain[0]).num_days() as f64;
        r0 + offset / span * (r1 - r0)
    }

    /// Extend the domain outward to the boundaries of the tick interval
    pub fn nice(mut self, count: usize) -> Self {
        let [start, stop] = self.domain;
        let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
        let interval = TimeInterval::for_span(lo, hi, count);
        let (lo, hi) = (interval.floor(lo), interval.ceil(hi));
        self.domain = if stop < start { [hi, lo] } else { [lo, hi] };
        self
    }

    /// Aligned tick dates covering the domain
    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let [start, stop] = self.domain;
        let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
        TimeInterval::for_span(lo, hi, count).range(lo, hi)
    }
}
