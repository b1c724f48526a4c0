//! Calendar view model: visible ranges, navigation and slot partitioning.
//!
//! Everything here is a pure function of its inputs. Weeks start on Sunday.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::Appointment;

/// First hour shown in week/day views
pub const DAY_START_HOUR: u32 = 8;

/// Exclusive upper bound of the week/day views
pub const DAY_END_HOUR: u32 = 18;

/// Granularity of the calendar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    #[default]
    Month,
}

impl CalendarView {
    pub const ALL: [CalendarView; 3] = [CalendarView::Day, CalendarView::Week, CalendarView::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == raw)
    }

    /// Minutes between generated slot labels, `None` for month view
    pub fn slot_interval_minutes(&self) -> Option<u32> {
        match self {
            Self::Day => Some(30),
            Self::Week => Some(60),
            Self::Month => None,
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    fn sign(self) -> i32 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, both ends included
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Saturday on or after `date`
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let offset = 6 - u64::from(date.weekday().num_days_from_sunday());
    date.checked_add_days(Days::new(offset)).unwrap_or(date)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    add_months_rolling(first_of_month(date), 1)
        .pred_opt()
        .unwrap_or(date)
}

/// Dates covered by `view` around `anchor`.
///
/// Week and month ranges always start on a Sunday and end on a Saturday, so
/// a month range holds whole weeks including days of adjacent months.
pub fn compute_visible_range(view: CalendarView, anchor: NaiveDate) -> DateRange {
    match view {
        CalendarView::Day => DateRange::single(anchor),
        CalendarView::Week => DateRange {
            start: week_start(anchor),
            end: week_end(anchor),
        },
        CalendarView::Month => DateRange {
            start: week_start(first_of_month(anchor)),
            end: week_end(last_of_month(anchor)),
        },
    }
}

/// Move `anchor` one unit of `view` in `direction`.
///
/// Months keep the day-of-month and let overflow roll into the following
/// month, so 2024-01-31 plus one month is 2024-03-02.
pub fn shift_anchor(view: CalendarView, anchor: NaiveDate, direction: Direction) -> NaiveDate {
    let sign = direction.sign();
    match view {
        CalendarView::Day => shift_days(anchor, sign),
        CalendarView::Week => shift_days(anchor, 7 * sign),
        CalendarView::Month => add_months_rolling(anchor, sign),
    }
}

fn shift_days(date: NaiveDate, days: i32) -> NaiveDate {
    let step = Days::new(u64::from(days.unsigned_abs()));
    let shifted = if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    };
    shifted.unwrap_or(date)
}

fn add_months_rolling(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let first = NaiveDate::from_ymd_opt(total.div_euclid(12), total.rem_euclid(12) as u32 + 1, 1);
    first
        .and_then(|first| first.checked_add_days(Days::new(u64::from(date.day0()))))
        .unwrap_or(date)
}

/// Slot labels generated for `view`; empty for month view
pub fn slot_times(view: CalendarView) -> Vec<NaiveTime> {
    let Some(interval) = view.slot_interval_minutes() else {
        return Vec::new();
    };

    (DAY_START_HOUR * 60..DAY_END_HOUR * 60)
        .step_by(interval as usize)
        .filter_map(|minute| NaiveTime::from_hms_opt(minute / 60, minute % 60, 0))
        .collect()
}

/// Header text for the visible period
pub fn period_label(view: CalendarView, anchor: NaiveDate) -> String {
    match view {
        CalendarView::Day => anchor.format("%A, %B %-d, %Y").to_string(),
        CalendarView::Week => {
            let range = compute_visible_range(view, anchor);
            format!(
                "{} - {}",
                range.start.format("%b %-d"),
                range.end.format("%b %-d, %Y")
            )
        }
        CalendarView::Month => anchor.format("%B %Y").to_string(),
    }
}

/// Order appointments by date, then time. Stable, so ties keep load order.
pub fn sort_for_listing(appointments: &mut [Appointment]) {
    appointments.sort_by_key(Appointment::slot_key);
}

/// One time slot of a week/day column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCell {
    pub time: NaiveTime,
    pub appointments: Vec<Appointment>,
}

/// One day of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for filler days of adjacent months in month view
    pub in_period: bool,
    pub appointments: Vec<Appointment>,
    /// Empty in month view
    pub slots: Vec<SlotCell>,
}

/// Appointments laid out for one view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub view: CalendarView,
    pub range: DateRange,
    pub days: Vec<DayCell>,
    /// Appointments with no cell or slot in this view
    pub unplaced: Vec<Appointment>,
}

impl CalendarGrid {
    /// Rows of seven days; a day view yields a single one-day row
    pub fn weeks(&self) -> std::slice::Chunks<'_, DayCell> {
        self.days.chunks(7)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days.iter().find(|cell| cell.date == date)
    }
}

/// Distribute `appointments` over the cells of `view` anchored at `anchor`.
///
/// Month cells collect by date, and only days of the anchor's month are
/// filled. Week and day columns additionally match `time` exactly against the
/// generated slot labels; an appointment between labels stays in its day's
/// list but gets no slot and is reported in `unplaced`.
pub fn partition_by_date(
    appointments: &[Appointment],
    view: CalendarView,
    anchor: NaiveDate,
) -> CalendarGrid {
    let range = compute_visible_range(view, anchor);
    let labels = slot_times(view);

    let mut sorted = appointments.to_vec();
    sort_for_listing(&mut sorted);

    let mut by_date: BTreeMap<NaiveDate, Vec<Appointment>> = BTreeMap::new();
    let mut unplaced = Vec::new();
    for appointment in sorted {
        let in_period = range.contains(appointment.date)
            && (view != CalendarView::Month || same_month(appointment.date, anchor));
        if !in_period {
            unplaced.push(appointment);
            continue;
        }
        if view != CalendarView::Month && !labels.contains(&appointment.time) {
            unplaced.push(appointment.clone());
        }
        by_date.entry(appointment.date).or_default().push(appointment);
    }

    let days = range
        .days()
        .map(|date| {
            let in_period = view != CalendarView::Month || same_month(date, anchor);
            let appointments = by_date.remove(&date).unwrap_or_default();
            let slots = labels
                .iter()
                .map(|&time| SlotCell {
                    time,
                    appointments: appointments
                        .iter()
                        .filter(|a| a.time == time)
                        .cloned()
                        .collect(),
                })
                .collect();

            DayCell {
                date,
                in_period,
                appointments,
                slots,
            }
        })
        .collect();

    CalendarGrid {
        view,
        range,
        days,
        unplaced,
    }
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
