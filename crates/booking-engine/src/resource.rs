//! Domain vocabulary shared by every engine component.
//!
//! Snapshots of resource state arrive from a data-loading collaborator and
//! are treated as immutable for the duration of a query. Nothing in this
//! module reads a clock; "now" is always an explicit argument further up.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationState {
    Confirmed,
    Requested,
    WaitingForPayment,
    Cancelled,
    Denied,
}

impl ReservationState {
    /// Whether the reservation still occupies time on the resource.
    /// Cancelled and denied reservations never participate in availability
    /// math.
    pub fn is_active(self) -> bool {
        !matches!(self, ReservationState::Cancelled | ReservationState::Denied)
    }
}

/// A booking on a resource. `begin < end` holds for loaded data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: u64,
    pub resource: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub state: ReservationState,
    /// True when the reservation belongs to the querying user.
    pub is_own: bool,
}

/// Opening hours for a single calendar date. Either bound being `None`
/// means the resource is closed that date. Entries cover the fetched
/// horizon and are not required to be contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningHoursEntry {
    pub date: NaiveDate,
    pub opens: Option<DateTime<Utc>>,
    pub closes: Option<DateTime<Utc>>,
}

impl OpeningHoursEntry {
    pub fn is_closed(&self) -> bool {
        self.opens.is_none() || self.closes.is_none()
    }
}

/// Booking rules for a resource, immutable per query.
///
/// Durations travel as raw minute counts so snapshots round-trip through
/// serde without a custom duration codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub slot_size_minutes: i64,
    pub min_period_minutes: i64,
    pub max_period_minutes: Option<i64>,
    pub cooldown_minutes: i64,
    pub reservable_after: Option<DateTime<Utc>>,
    pub reservable_before: Option<DateTime<Utc>>,
    pub reservable: bool,
    /// Daily check-in time for overnight bookings.
    pub overnight_start_time: NaiveTime,
    /// Daily check-out time for overnight bookings.
    pub overnight_end_time: NaiveTime,
}

impl ResourceConfig {
    pub fn min_period(&self) -> Duration {
        Duration::minutes(self.min_period_minutes)
    }

    pub fn max_period(&self) -> Option<Duration> {
        self.max_period_minutes.map(Duration::minutes)
    }
}

/// Snapshot of a resource as fetched by the data-loading collaborator.
///
/// `reservations` is `None` until the reservation list has been loaded.
/// Distinct from `Some(vec![])`, which means "loaded, and there are none".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub opening_hours: Vec<OpeningHoursEntry>,
    pub reservations: Option<Vec<Reservation>>,
    pub config: ResourceConfig,
}

impl Resource {
    /// Look up the opening-hours entry for a date, if the fetched horizon
    /// covers it.
    pub fn opening_hours_for(&self, date: NaiveDate) -> Option<&OpeningHoursEntry> {
        self.opening_hours.iter().find(|entry| entry.date == date)
    }
}

/// Bucket active reservations per calendar date.
///
/// A reservation spanning midnight is attributed to every date it touches,
/// begin- and end-date included, so both the time left before midnight and
/// the time available right after it are checked against the same booking.
pub fn reservations_by_date(
    reservations: &[Reservation],
) -> BTreeMap<NaiveDate, Vec<Reservation>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Reservation>> = BTreeMap::new();
    for reservation in reservations.iter().filter(|r| r.state.is_active()) {
        let last = reservation.end.date_naive();
        let mut date = reservation.begin.date_naive();
        while date <= last {
            buckets.entry(date).or_default().push(reservation.clone());
            date = date + Duration::days(1);
        }
    }
    buckets
}
