//! Continuous scales used to size and place bubbles.
//!
//! [`RadiusScale`] maps retweet counts onto circle radii with a square-root
//! curve. [`TimeScale`] maps timestamps onto canvas x coordinates and can be
//! "niced" so its domain starts and ends on round calendar boundaries, using
//! the same interval ladder as d3's `scaleTime().nice()`.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;
const MS_PER_MONTH: i64 = 30 * MS_PER_DAY;
const MS_PER_YEAR: i64 = 365 * MS_PER_DAY;

/// How many ticks `nice` aims for when picking an interval.
const NICE_TICK_COUNT: f64 = 10.0;

/// Power scale with a fixed exponent, mapping `domain` onto `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
	domain: (f64, f64),
	range: (f64, f64),
	exponent: f64,
}

impl RadiusScale {
	pub fn sqrt(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self {
			domain,
			range,
			exponent: 0.5,
		}
	}

	/// `r0 + (r1 - r0) * ((v - d0) / (d1 - d0))^exponent`, with the
	/// normalized value clamped to `[0, 1]` so radii never leave the range.
	pub fn apply(&self, value: f64) -> f64 {
		let ((d0, d1), (r0, r1)) = (self.domain, self.range);
		if d1 <= d0 {
			return r1;
		}
		let t = ((value - d0) / (d1 - d0)).clamp(0.0, 1.0);
		r0 + (r1 - r0) * t.powf(self.exponent)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
	Millisecond,
	Second,
	Minute,
	Hour,
	Day,
	Week,
	Month,
	Year,
}

/// A calendar interval such as "every 15 minutes" or "every 3 months".
///
/// Stepped intervals align on the unit's calendar field (minute of the hour,
/// day of the month, month of the year), so day steps restart on the first of
/// every month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeInterval {
	pub unit: TimeUnit,
	pub step: i64,
}

/// Candidate intervals, ordered by duration.
const TICK_INTERVALS: &[(TimeUnit, i64, i64)] = &[
	(TimeUnit::Second, 1, MS_PER_SECOND),
	(TimeUnit::Second, 5, 5 * MS_PER_SECOND),
	(TimeUnit::Second, 15, 15 * MS_PER_SECOND),
	(TimeUnit::Second, 30, 30 * MS_PER_SECOND),
	(TimeUnit::Minute, 1, MS_PER_MINUTE),
	(TimeUnit::Minute, 5, 5 * MS_PER_MINUTE),
	(TimeUnit::Minute, 15, 15 * MS_PER_MINUTE),
	(TimeUnit::Minute, 30, 30 * MS_PER_MINUTE),
	(TimeUnit::Hour, 1, MS_PER_HOUR),
	(TimeUnit::Hour, 3, 3 * MS_PER_HOUR),
	(TimeUnit::Hour, 6, 6 * MS_PER_HOUR),
	(TimeUnit::Hour, 12, 12 * MS_PER_HOUR),
	(TimeUnit::Day, 1, MS_PER_DAY),
	(TimeUnit::Day, 2, 2 * MS_PER_DAY),
	(TimeUnit::Week, 1, MS_PER_WEEK),
	(TimeUnit::Month, 1, MS_PER_MONTH),
	(TimeUnit::Month, 3, 3 * MS_PER_MONTH),
	(TimeUnit::Year, 1, MS_PER_YEAR),
];

/// A 1, 2 or 5 times power-of-ten step splitting `[start, stop]` into about `count` parts.
fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
	let step0 = (stop - start).abs() / count;
	if !step0.is_finite() || step0 <= 0.0 {
		return 0.0;
	}
	let power = 10f64.powf(step0.log10().floor());
	let error = step0 / power;
	let factor = if error >= 7.5 {
		10.0
	} else if error >= 3.5 {
		5.0
	} else if error >= 1.5 {
		2.0
	} else {
		1.0
	};
	factor * power
}

impl TimeInterval {
	/// Picks the interval whose duration is closest (by ratio) to
	/// `span / count`. Returns `None` for an empty span.
	pub fn for_span(start_ms: i64, stop_ms: i64, count: f64) -> Option<Self> {
		if start_ms == stop_ms {
			return None;
		}
		let (lo, hi) = (start_ms.min(stop_ms), start_ms.max(stop_ms));
		let target = (hi - lo) as f64 / count;
		let i = TICK_INTERVALS.partition_point(|&(_, _, duration)| duration as f64 <= target);

		if i == TICK_INTERVALS.len() {
			let years = tick_step(
				lo as f64 / MS_PER_YEAR as f64,
				hi as f64 / MS_PER_YEAR as f64,
				count,
			);
			return Some(Self {
				unit: TimeUnit::Year,
				step: (years.floor() as i64).max(1),
			});
		}
		if i == 0 {
			let step = tick_step(lo as f64, hi as f64, count).floor() as i64;
			return Some(Self {
				unit: TimeUnit::Millisecond,
				step: step.max(1),
			});
		}

		let (below, above) = (TICK_INTERVALS[i - 1], TICK_INTERVALS[i]);
		let (unit, step, _) = if target / (below.2 as f64) < (above.2 as f64) / target {
			below
		} else {
			above
		};
		Some(Self { unit, step })
	}

	/// Latest boundary at or before `t`.
	pub fn floor(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
		match self.unit {
			TimeUnit::Millisecond => {
				let ms = to_millis(t);
				from_millis(ms.div_euclid(self.step) * self.step)
			}
			TimeUnit::Year => {
				let year = t.year().div_euclid(self.step as i32) * self.step as i32;
				NaiveDate::from_yo_opt(year, 1).map(|d| d.and_time(NaiveTime::MIN))
			}
			unit => {
				let mut cur = floor_unit(unit, t);
				while !self.is_boundary(cur) {
					cur = floor_unit(unit, cur.checked_sub_signed(TimeDelta::milliseconds(1))?);
				}
				Some(cur)
			}
		}
	}

	/// Earliest boundary at or after `t`.
	pub fn ceil(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
		let floor = self.floor(t)?;
		if floor == t {
			return Some(t);
		}
		self.next(floor)
	}

	fn next(&self, boundary: NaiveDateTime) -> Option<NaiveDateTime> {
		match self.unit {
			TimeUnit::Millisecond => {
				boundary.checked_add_signed(TimeDelta::milliseconds(self.step))
			}
			TimeUnit::Year => {
				NaiveDate::from_yo_opt(boundary.year() + self.step as i32, 1)
					.map(|d| d.and_time(NaiveTime::MIN))
			}
			unit => {
				let mut cur = offset_unit(unit, boundary)?;
				while !self.is_boundary(cur) {
					cur = offset_unit(unit, cur)?;
				}
				Some(cur)
			}
		}
	}

	fn is_boundary(&self, t: NaiveDateTime) -> bool {
		let field = match self.unit {
			TimeUnit::Second => t.second(),
			TimeUnit::Minute => t.minute(),
			TimeUnit::Hour => t.hour(),
			TimeUnit::Day => t.day0(),
			TimeUnit::Month => t.month0(),
			TimeUnit::Millisecond | TimeUnit::Week | TimeUnit::Year => return true,
		};
		i64::from(field) % self.step == 0
	}
}

/// Truncates `t` to the start of its second, minute, hour, day, week
/// (Sunday) or month.
fn floor_unit(unit: TimeUnit, t: NaiveDateTime) -> NaiveDateTime {
	let date = t.date();
	match unit {
		TimeUnit::Millisecond => t,
		TimeUnit::Second => date.and_time(NaiveTime::MIN) + TimeDelta::seconds(i64::from(t.num_seconds_from_midnight())),
		TimeUnit::Minute => date.and_time(NaiveTime::MIN) + TimeDelta::minutes(i64::from(t.hour() * 60 + t.minute())),
		TimeUnit::Hour => date.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(t.hour())),
		TimeUnit::Day => date.and_time(NaiveTime::MIN),
		TimeUnit::Week => {
			let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
			(date - back).and_time(NaiveTime::MIN)
		}
		TimeUnit::Month => (date - Days::new(u64::from(date.day0()))).and_time(NaiveTime::MIN),
		TimeUnit::Year => (date - Days::new(u64::from(date.ordinal0()))).and_time(NaiveTime::MIN),
	}
}

/// Moves a unit boundary forward by one unit.
fn offset_unit(unit: TimeUnit, t: NaiveDateTime) -> Option<NaiveDateTime> {
	match unit {
		TimeUnit::Millisecond => t.checked_add_signed(TimeDelta::milliseconds(1)),
		TimeUnit::Second => t.checked_add_signed(TimeDelta::seconds(1)),
		TimeUnit::Minute => t.checked_add_signed(TimeDelta::minutes(1)),
		TimeUnit::Hour => t.checked_add_signed(TimeDelta::hours(1)),
		TimeUnit::Day => t.checked_add_days(Days::new(1)),
		TimeUnit::Week => t.checked_add_days(Days::new(7)),
		TimeUnit::Month => t.checked_add_months(Months::new(1)),
		TimeUnit::Year => t.checked_add_months(Months::new(12)),
	}
}

fn to_millis(t: NaiveDateTime) -> i64 {
	t.and_utc().timestamp_millis()
}

fn from_millis(ms: i64) -> Option<NaiveDateTime> {
	DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Linear scale from timestamps to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
	extent: (NaiveDateTime, NaiveDateTime),
	domain: (NaiveDateTime, NaiveDateTime),
	range: (f64, f64),
}

impl TimeScale {
	pub fn new(extent: (NaiveDateTime, NaiveDateTime), range: (f64, f64)) -> Self {
		Self {
			extent,
			domain: extent,
			range,
		}
	}

	/// Widens the domain outward to round calendar boundaries. A domain whose
	/// ends coincide is left as is.
	pub fn nice(mut self) -> Self {
		let (d0, d1) = self.domain;
		let Some(interval) = TimeInterval::for_span(to_millis(d0), to_millis(d1), NICE_TICK_COUNT)
		else {
			return self;
		};
		if let (Some(lo), Some(hi)) = (interval.floor(d0), interval.ceil(d1)) {
			self.domain = (lo, hi);
		}
		self
	}

	/// The observed `[min, max]` timestamps, before any nicing.
	pub fn extent(&self) -> (NaiveDateTime, NaiveDateTime) {
		self.extent
	}

	pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
		self.domain
	}

	pub fn range(&self) -> (f64, f64) {
		self.range
	}

	/// Unclamped linear interpolation; a zero-width domain maps to the middle
	/// of the range.
	pub fn apply(&self, t: NaiveDateTime) -> f64 {
		let (d0, d1) = (to_millis(self.domain.0), to_millis(self.domain.1));
		let (r0, r1) = self.range;
		if d0 == d1 {
			return (r0 + r1) / 2.0;
		}
		let u = (to_millis(t) - d0) as f64 / (d1 - d0) as f64;
		r0 + u * (r1 - r0)
	}
}
