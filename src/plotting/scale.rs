//! Scales mapping data values onto chart coordinates and colours.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use plotters::style::RGBColor;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::styles::TABLEAU10;

/// Normalize `value` within `[d0, d1]`; a degenerate domain maps to the middle.
fn normalize(value: f64, d0: f64, d1: f64) -> f64 {
    let span = d1 - d0;
    if span == 0.0 || !span.is_finite() {
        0.5
    } else {
        (value - d0) / span
    }
}

fn interpolate(t: f64, r0: f64, r1: f64) -> f64 {
    r0 + (r1 - r0) * t
}

/// Continuous linear scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        interpolate(normalize(value, self.domain.0, self.domain.1), self.range.0, self.range.1)
    }

    /// Domain value drawn at `position`.
    pub fn invert(&self, position: f64) -> f64 {
        interpolate(normalize(position, self.range.0, self.range.1), self.domain.0, self.domain.1)
    }

    /// Round tick values across the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let step = tick_step(lo, hi, count);
        if step <= 0.0 || !step.is_finite() {
            return vec![lo];
        }
        let start = (lo / step).ceil() as i64;
        let end = (hi / step).floor() as i64;
        (start..=end).map(|i| i as f64 * step).collect()
    }
}

/// Step of 1, 2 or 5 times a power of ten giving about `count` ticks.
pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count.max(1) as f64;
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * 10f64.powf(power)
}

/// Square-root scale, used for circle radii so area tracks the value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let t = normalize(
            signed_sqrt(value),
            signed_sqrt(self.domain.0),
            signed_sqrt(self.domain.1),
        );
        interpolate(t, self.range.0, self.range.1)
    }
}

fn signed_sqrt(x: f64) -> f64 {
    x.signum() * x.abs().sqrt()
}

/// Calendar-aware tick interval of a time scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    Seconds(i64),
    Months(i32),
    Years(i32),
}

const SECOND: i64 = 1;
const MINUTE: i64 = 60;
const HOUR: i64 = 3600;
const DAY: i64 = 86_400;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

const LADDER: [(TimeInterval, i64); 17] = [
    (TimeInterval::Seconds(SECOND), SECOND),
    (TimeInterval::Seconds(5 * SECOND), 5 * SECOND),
    (TimeInterval::Seconds(15 * SECOND), 15 * SECOND),
    (TimeInterval::Seconds(30 * SECOND), 30 * SECOND),
    (TimeInterval::Seconds(MINUTE), MINUTE),
    (TimeInterval::Seconds(5 * MINUTE), 5 * MINUTE),
    (TimeInterval::Seconds(15 * MINUTE), 15 * MINUTE),
    (TimeInterval::Seconds(30 * MINUTE), 30 * MINUTE),
    (TimeInterval::Seconds(HOUR), HOUR),
    (TimeInterval::Seconds(3 * HOUR), 3 * HOUR),
    (TimeInterval::Seconds(6 * HOUR), 6 * HOUR),
    (TimeInterval::Seconds(12 * HOUR), 12 * HOUR),
    (TimeInterval::Seconds(DAY), DAY),
    (TimeInterval::Seconds(2 * DAY), 2 * DAY),
    (TimeInterval::Seconds(WEEK), WEEK),
    (TimeInterval::Months(1), MONTH),
    (TimeInterval::Months(3), 3 * MONTH),
];

impl TimeInterval {
    /// Interval giving about `count` ticks over `span` seconds.
    pub fn for_span(span: i64, count: usize) -> Self {
        let target = span / count.max(1) as i64;
        if let Some((interval, _)) = LADDER.iter().find(|(_, secs)| *secs >= target) {
            return *interval;
        }
        let years = (target as f64 / YEAR as f64).max(1.0);
        let step = tick_step(0.0, years * count.max(1) as f64, count).max(1.0);
        TimeInterval::Years(step as i32)
    }

    /// Approximate length in seconds, for label formatting.
    pub fn approx_secs(&self) -> i64 {
        match self {
            TimeInterval::Seconds(s) => *s,
            TimeInterval::Months(m) => *m as i64 * MONTH,
            TimeInterval::Years(y) => *y as i64 * YEAR,
        }
    }

    /// Largest interval boundary at or before `t` (local epoch seconds).
    fn floor(&self, t: i64) -> i64 {
        match self {
            TimeInterval::Seconds(s) => t - t.rem_euclid(*s),
            TimeInterval::Months(n) => {
                let (year, month0) = year_month(t);
                let total = year * 12 + month0;
                month_start(total - total.rem_euclid(*n))
            }
            TimeInterval::Years(n) => {
                let (year, _) = year_month(t);
                month_start((year - year.rem_euclid(*n)) * 12)
            }
        }
    }

    /// Next boundary after `boundary`.
    fn offset(&self, boundary: i64) -> i64 {
        match self {
            TimeInterval::Seconds(s) => boundary + s,
            TimeInterval::Months(n) => {
                let (year, month0) = year_month(boundary);
                month_start(year * 12 + month0 + n)
            }
            TimeInterval::Years(n) => {
                let (year, month0) = year_month(boundary);
                month_start((year + n) * 12 + month0)
            }
        }
    }

    fn ceil(&self, t: i64) -> i64 {
        let floor = self.floor(t);
        if floor == t {
            t
        } else {
            self.offset(floor)
        }
    }
}

fn year_month(local_secs: i64) -> (i32, i32) {
    DateTime::<Utc>::from_timestamp(local_secs, 0)
        .map(|dt| (dt.year(), dt.month0() as i32))
        .unwrap_or((1970, 0))
}

fn month_start(total_months: i32) -> i64 {
    let year = total_months.div_euclid(12);
    let month = total_months.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

/// Time scale over epoch seconds.
///
/// Boundaries and ticks are computed in the UTC offset of the data so they
/// fall on local midnights and month starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    /// Domain in epoch seconds
    pub domain: (i64, i64),
    pub range: (f64, f64),
    pub offset: FixedOffset,
    pub interval: TimeInterval,
}

impl TimeScale {
    /// Scale over the extent of `times`, extended to round boundaries.
    pub fn nice<'a, I>(times: I, range: (f64, f64), ticks: usize) -> Self
    where
        I: IntoIterator<Item = &'a DateTime<FixedOffset>>,
    {
        let mut min: Option<&DateTime<FixedOffset>> = None;
        let mut max: Option<&DateTime<FixedOffset>> = None;
        for t in times {
            if min.map_or(true, |m| t < m) {
                min = Some(t);
            }
            if max.map_or(true, |m| t > m) {
                max = Some(t);
            }
        }

        let offset = min
            .map(|t| *t.offset())
            .unwrap_or_else(|| Utc.fix());
        let (lo, hi) = match (min, max) {
            (Some(lo), Some(hi)) => (lo.timestamp(), hi.timestamp()),
            _ => (0, 0),
        };

        let interval = TimeInterval::for_span(hi - lo, ticks);
        let domain = if hi > lo {
            let shift = offset.local_minus_utc() as i64;
            (
                interval.floor(lo + shift) - shift,
                interval.ceil(hi + shift) - shift,
            )
        } else {
            (lo, hi)
        };

        Self {
            domain,
            range,
            offset,
            interval,
        }
    }

    pub fn scale(&self, datetime: &DateTime<FixedOffset>) -> f64 {
        self.scale_secs(datetime.timestamp())
    }

    pub fn scale_secs(&self, secs: i64) -> f64 {
        interpolate(
            normalize(secs as f64, self.domain.0 as f64, self.domain.1 as f64),
            self.range.0,
            self.range.1,
        )
    }

    /// Time drawn at `position`, in the offset of the data.
    pub fn invert(&self, position: f64) -> Option<DateTime<FixedOffset>> {
        let secs = interpolate(
            normalize(position, self.range.0, self.range.1),
            self.domain.0 as f64,
            self.domain.1 as f64,
        );
        self.offset.timestamp_opt(secs.round() as i64, 0).single()
    }

    /// Domain bounds as times, in the offset of the data.
    pub fn bounds(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let start = self.offset.timestamp_opt(self.domain.0, 0).single()?;
        let end = self.offset.timestamp_opt(self.domain.1, 0).single()?;
        Some((start, end))
    }

    /// Tick positions inside the domain.
    pub fn ticks(&self) -> Vec<DateTime<FixedOffset>> {
        let shift = self.offset.local_minus_utc() as i64;
        let (lo, hi) = (self.domain.0 + shift, self.domain.1 + shift);
        let mut ticks = Vec::new();
        let mut t = self.interval.ceil(lo);
        while t <= hi && ticks.len() < 1000 {
            if let Some(dt) = self.offset.timestamp_opt(t - shift, 0).single() {
                ticks.push(dt);
            }
            let next = self.interval.offset(t);
            if next <= t {
                break;
            }
            t = next;
        }
        ticks
    }
}

/// Categorical colour scale with a fixed domain.
///
/// The domain is the full category set of the dataset, so a category keeps
/// its colour whichever subset is on screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryColors {
    domain: Vec<String>,
}

impl CategoryColors {
    pub fn new(domain: Vec<String>) -> Self {
        Self { domain }
    }

    pub fn color(&self, category: &str) -> RGBColor {
        let idx = match self.domain.iter().position(|c| c == category) {
            Some(idx) => idx,
            None => {
                let mut hasher = DefaultHasher::new();
                category.hash(&mut hasher);
                hasher.finish() as usize
            }
        };
        TABLEAU10[idx % TABLEAU10.len()]
    }
}
