//! Day-granularity range selection for overnight bookings.
//!
//! Overnight bookings reserve whole calendar days with fixed daily check-in
//! and check-out times. This module decides which days are selectable,
//! drives the two-click start/end selection, validates that a completed
//! range contains no blocked day, measures the selected duration against the
//! resource's period bounds, and exposes the per-day decoration predicates
//! the calendar UI queries when styling its cells.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::resource::{OpeningHoursEntry, Reservation, Resource, ResourceConfig};

/// Two-click day-range selection state.
///
/// The variants make the transition table exhaustive: an end date cannot
/// exist without a start date, so "end before start" is unrepresentable
/// rather than validated away after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RangeSelection {
    #[default]
    Empty,
    PartialRange {
        start: DateTime<Utc>,
    },
    CompleteRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl RangeSelection {
    pub fn start(&self) -> Option<DateTime<Utc>> {
        match *self {
            RangeSelection::Empty => None,
            RangeSelection::PartialRange { start }
            | RangeSelection::CompleteRange { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        match *self {
            RangeSelection::CompleteRange { end, .. } => Some(end),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, RangeSelection::CompleteRange { .. })
    }
}

/// Day-level availability view over one resource snapshot.
///
/// Construction fails when the snapshot's reservation list has not been
/// loaded: an empty list is fine, an absent one means the data is still in
/// flight and no day can be classified. All queries are pure functions of
/// the snapshot, the supplied `now` and the caller's privilege flag.
#[derive(Debug)]
pub struct OvernightAvailability<'a> {
    resource: &'a Resource,
    reservations: Vec<&'a Reservation>,
    now: DateTime<Utc>,
    /// Privileged callers skip the reservable-flag, reservable-window and
    /// min/max-period checks. Booked and closed days stay blocked for
    /// everyone.
    bypass_restrictions: bool,
}

impl<'a> OvernightAvailability<'a> {
    pub fn new(
        resource: &'a Resource,
        now: DateTime<Utc>,
        bypass_restrictions: bool,
    ) -> Result<Self> {
        let reservations = resource
            .reservations
            .as_ref()
            .ok_or_else(|| BookingError::ReservationsNotLoaded(resource.id.clone()))?
            .iter()
            .filter(|r| r.state.is_active())
            .collect();
        Ok(Self {
            resource,
            reservations,
            now,
            bypass_restrictions,
        })
    }

    fn config(&self) -> &ResourceConfig {
        &self.resource.config
    }

    /// Check-in instant of a day.
    fn start_of(&self, day: NaiveDate) -> DateTime<Utc> {
        day.and_time(self.config().overnight_start_time).and_utc()
    }

    /// Check-out instant of a day.
    fn end_of(&self, day: NaiveDate) -> DateTime<Utc> {
        day.and_time(self.config().overnight_end_time).and_utc()
    }

    /// Advance the selection with a clicked day.
    ///
    /// Clicking the current start day again deselects; clicking before the
    /// start restarts from the clicked day; clicking after it completes the
    /// range; any click on a completed range restarts from the clicked day.
    pub fn handle_date_select(
        &self,
        selection: RangeSelection,
        clicked: NaiveDate,
    ) -> RangeSelection {
        match selection {
            RangeSelection::Empty => RangeSelection::PartialRange {
                start: self.start_of(clicked),
            },
            RangeSelection::PartialRange { start } => {
                if clicked == start.date_naive() {
                    RangeSelection::Empty
                } else if self.start_of(clicked) < start {
                    RangeSelection::PartialRange {
                        start: self.start_of(clicked),
                    }
                } else {
                    RangeSelection::CompleteRange {
                        start,
                        end: self.end_of(clicked),
                    }
                }
            }
            RangeSelection::CompleteRange { .. } => RangeSelection::PartialRange {
                start: self.start_of(clicked),
            },
        }
    }

    /// Whether a calendar day may not be picked as a range endpoint.
    pub fn is_day_disabled(&self, day: NaiveDate) -> bool {
        if self.is_booked(day) || self.is_closed(day) {
            return true;
        }
        if self.bypass_restrictions {
            return day <= self.now.date_naive();
        }
        if !self.config().reservable {
            return true;
        }
        if self.start_of(day) <= self.now {
            return true;
        }
        let after = self.config().reservable_after.unwrap_or(self.now);
        if day < after.date_naive() {
            return true;
        }
        let before = self
            .config()
            .reservable_before
            .unwrap_or_else(|| self.now + Months::new(12));
        day > before.date_naive()
    }

    /// Day strictly inside a reservation. A reservation's own check-in and
    /// check-out days stay selectable so a new booking can abut it.
    pub fn is_booked(&self, day: NaiveDate) -> bool {
        self.reservations
            .iter()
            .any(|r| r.begin.date_naive() < day && day < r.end.date_naive())
    }

    /// Day whose opening-hours entry has no opening or closing instant.
    pub fn is_closed(&self, day: NaiveDate) -> bool {
        self.resource
            .opening_hours_for(day)
            .is_some_and(OpeningHoursEntry::is_closed)
    }

    /// The chronologically nearest future reservation begins exactly the
    /// day after `day`.
    pub fn is_next_day_booked(&self, day: NaiveDate) -> bool {
        self.reservations
            .iter()
            .filter(|r| r.begin.date_naive() > day)
            .min_by_key(|r| r.begin)
            .is_some_and(|r| r.begin.date_naive() == day + Duration::days(1))
    }

    /// The chronologically nearest past reservation ends exactly the day
    /// before `day`.
    pub fn is_prev_day_booked(&self, day: NaiveDate) -> bool {
        self.reservations
            .iter()
            .filter(|r| r.end.date_naive() < day)
            .max_by_key(|r| r.end)
            .is_some_and(|r| r.end.date_naive() == day - Duration::days(1))
    }

    /// The nearest future closed day is exactly the day after `day`.
    pub fn is_next_day_closed(&self, day: NaiveDate) -> bool {
        self.resource
            .opening_hours
            .iter()
            .filter(|entry| entry.is_closed() && entry.date > day)
            .min_by_key(|entry| entry.date)
            .is_some_and(|entry| entry.date == day + Duration::days(1))
    }

    /// The nearest past closed day is exactly the day before `day`.
    pub fn is_prev_day_closed(&self, day: NaiveDate) -> bool {
        self.resource
            .opening_hours
            .iter()
            .filter(|entry| entry.is_closed() && entry.date < day)
            .max_by_key(|entry| entry.date)
            .is_some_and(|entry| entry.date == day - Duration::days(1))
    }

    /// A completed range is continuous when no day between start and end is
    /// booked or closed.
    ///
    /// The first day is checked from its check-in instant and the last day
    /// up to its check-out instant, so a range may begin the moment an
    /// earlier booking checks out. Interior days must be entirely free.
    pub fn is_selection_continuous(&self, start_day: NaiveDate, end_day: NaiveDate) -> bool {
        let mut day = start_day;
        while day <= end_day {
            if self.is_closed(day) {
                return false;
            }
            let blocked = if day == start_day {
                let instant = self.start_of(day);
                self.reservations
                    .iter()
                    .any(|r| r.begin <= instant && instant <= r.end)
            } else if day == end_day {
                let instant = self.end_of(day);
                self.reservations
                    .iter()
                    .any(|r| r.begin <= instant && instant <= r.end)
            } else {
                self.reservations
                    .iter()
                    .any(|r| r.begin.date_naive() <= day && day <= r.end.date_naive())
            };
            if blocked {
                return false;
            }
            day = day + Duration::days(1);
        }
        true
    }

    /// Duration of a range, check-in on the first day to check-out on the
    /// last. Unreachable with `end_day < start_day` through the selection
    /// API.
    pub fn selection_duration(&self, start_day: NaiveDate, end_day: NaiveDate) -> Duration {
        debug_assert!(start_day <= end_day, "range end precedes start");
        self.end_of(end_day) - self.start_of(start_day)
    }

    /// Selected duration is shorter than the minimum period. Always false
    /// for privileged callers.
    pub fn is_duration_below_min(&self, start_day: NaiveDate, end_day: NaiveDate) -> bool {
        if self.bypass_restrictions {
            return false;
        }
        self.selection_duration(start_day, end_day) < self.config().min_period()
    }

    /// Selected duration exceeds the maximum period, when one is set.
    /// Always false for privileged callers.
    pub fn is_duration_over_max(&self, start_day: NaiveDate, end_day: NaiveDate) -> bool {
        if self.bypass_restrictions {
            return false;
        }
        match self.config().max_period() {
            Some(max) => self.selection_duration(start_day, end_day) > max,
            None => false,
        }
    }
}
