//! Answer "is there bookable time in this window" and "what is the next
//! day with bookable time" for a resource.
//!
//! Built on top of slot generation: a day has free time when enough
//! consecutive free slots remain to satisfy the resource's minimum booking
//! period. Viewport checks cover a single day, the 3-day mobile window and
//! the Mon–Sun desktop week.
//!
//! A partially loaded data window must never read as availability, so a
//! missing opening-hours entry inside a requested window, or an unloaded
//! reservation list, makes every check here answer "no free time".

use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::resource::{reservations_by_date, OpeningHoursEntry, Reservation, Resource, ResourceConfig};
use crate::slot::{generate_slots, TimeSlot};

/// Days shown by the mobile calendar viewport.
const MOBILE_WINDOW_DAYS: usize = 3;

/// A maximal run of consecutive free slots within one opening window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// Whether a single opening window still contains enough consecutive free
/// slots for a minimum-period booking.
///
/// Absent `opens`/`closes` means the day is closed and the answer is false.
/// When `opens` falls on the same calendar date as `now`, slots that do not
/// end after `now` are discarded before the search.
///
/// With `slot_size == min_period` any free slot qualifies; with
/// `slot_size < min_period` a run of `min_period / slot_size` consecutive
/// free slots is required, searched with a sliding window anchored at every
/// free slot.
pub fn has_free_time_in_day(
    opens: Option<DateTime<Utc>>,
    closes: Option<DateTime<Utc>>,
    reservations_of_day: &[Reservation],
    min_period_minutes: i64,
    slot_size_minutes: i64,
    cooldown_minutes: i64,
    now: DateTime<Utc>,
) -> bool {
    let (Some(opens_at), Some(_)) = (opens, closes) else {
        return false;
    };

    let mut slots = generate_slots(
        opens,
        closes,
        slot_size_minutes,
        reservations_of_day,
        &[],
        cooldown_minutes,
    );
    if opens_at.date_naive() == now.date_naive() {
        slots.retain(|slot| slot.end > now);
    }
    if slots.is_empty() {
        return false;
    }

    let needed = (min_period_minutes / slot_size_minutes).max(1) as usize;
    slots.iter().enumerate().any(|(i, slot)| {
        slot.is_free()
            && i + needed <= slots.len()
            && slots[i..i + needed].iter().all(TimeSlot::is_free)
    })
}

/// Merge a day's free slots into maximal spans.
///
/// Spans are what a UI offers as "available from ... to ..."; reserved and
/// buffered slots break a span. Past slots on the current day are discarded
/// the same way [`has_free_time_in_day`] discards them.
pub fn free_spans_in_day(
    opens: Option<DateTime<Utc>>,
    closes: Option<DateTime<Utc>>,
    reservations_of_day: &[Reservation],
    slot_size_minutes: i64,
    cooldown_minutes: i64,
    now: DateTime<Utc>,
) -> Vec<FreeSpan> {
    let Some(opens_at) = opens else {
        return Vec::new();
    };
    let mut slots = generate_slots(
        opens,
        closes,
        slot_size_minutes,
        reservations_of_day,
        &[],
        cooldown_minutes,
    );
    if opens_at.date_naive() == now.date_naive() {
        slots.retain(|slot| slot.end > now);
    }

    let mut spans: Vec<FreeSpan> = Vec::new();
    for slot in &slots {
        if !slot.is_free() {
            continue;
        }
        match spans.last_mut() {
            Some(span) if span.end == slot.start => {
                span.end = slot.end;
                span.duration_minutes += slot_size_minutes;
            }
            _ => spans.push(FreeSpan {
                start: slot.start,
                end: slot.end,
                duration_minutes: slot_size_minutes,
            }),
        }
    }
    spans
}

/// Find the first date at or after `selected_date` with free time.
///
/// The search starts from the latest of `now`, `selected_date` and the
/// resource's `reservable_after` bound, walks the opening-hours entries in
/// ascending date order and returns the first date whose opening window
/// still has free time. `None` when no candidate day qualifies or when the
/// reservation list has not been loaded.
pub fn find_next_free_slot_date(
    resource: &Resource,
    selected_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<NaiveDate> {
    let reservations = resource.reservations.as_deref()?;
    let config = &resource.config;

    let starting = now
        .max(selected_date)
        .max(config.reservable_after.unwrap_or(now));
    let starting_date = starting.date_naive();

    let mut candidates: Vec<&OpeningHoursEntry> = resource
        .opening_hours
        .iter()
        .filter(|entry| entry.opens.is_some() && entry.closes.is_some())
        .filter(|entry| entry.date >= starting_date)
        .filter(|entry| {
            config
                .reservable_before
                .is_none_or(|before| entry.date < before.date_naive())
        })
        .collect();
    candidates.sort_by_key(|entry| entry.date);

    let buckets = reservations_by_date(reservations);
    candidates
        .into_iter()
        .find(|entry| {
            let of_day = buckets.get(&entry.date).map_or(&[][..], Vec::as_slice);
            has_free_time_in_day(
                entry.opens,
                entry.closes,
                of_day,
                config.min_period_minutes,
                config.slot_size_minutes,
                config.cooldown_minutes,
                now,
            )
        })
        .map(|entry| entry.date)
}

/// Whether the 3-day mobile viewport starting at `selected_date` has free
/// time on any of its days.
///
/// The window is anchored at the opening-hours entry whose date matches
/// `selected_date` and spans that entry plus the next two; running out of
/// fetched entries means the data window is incomplete and the answer is
/// false.
pub fn has_free_times_mobile(
    resource: &Resource,
    selected_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    let selected = selected_date.date_naive();
    let Some(anchor) = resource
        .opening_hours
        .iter()
        .position(|entry| entry.date == selected)
    else {
        return false;
    };

    let mut window = Vec::with_capacity(MOBILE_WINDOW_DAYS);
    for offset in 0..MOBILE_WINDOW_DAYS {
        match resource.opening_hours.get(anchor + offset) {
            Some(entry) => window.push(entry),
            None => return false,
        }
    }

    let window: Vec<&OpeningHoursEntry> = window
        .into_iter()
        .filter(|entry| is_queryable_date(entry.date, &resource.config, now))
        .collect();
    any_day_has_free_time(resource, &window, now)
}

/// Whether the Mon–Sun calendar week containing `selected_date` has free
/// time on any of its days.
///
/// Days already past and days outside the reservable window are dropped
/// first; a missing opening-hours entry for any remaining day of the week
/// means the data window is incomplete and the answer is false.
pub fn has_free_times_desktop(
    resource: &Resource,
    selected_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    let week_start = selected_date.date_naive().week(Weekday::Mon).first_day();

    let mut window = Vec::with_capacity(7);
    for offset in 0..7 {
        let date = week_start + Duration::days(offset);
        if !is_queryable_date(date, &resource.config, now) {
            continue;
        }
        match resource.opening_hours_for(date) {
            Some(entry) => window.push(entry),
            None => return false,
        }
    }
    any_day_has_free_time(resource, &window, now)
}

/// A date is worth querying when it is not already past and lies inside the
/// resource's reservable window.
fn is_queryable_date(date: NaiveDate, config: &ResourceConfig, now: DateTime<Utc>) -> bool {
    if date < now.date_naive() {
        return false;
    }
    let after_ok = config
        .reservable_after
        .is_none_or(|after| date >= after.date_naive());
    let before_ok = config
        .reservable_before
        .is_none_or(|before| date < before.date_naive());
    after_ok && before_ok
}

fn any_day_has_free_time(
    resource: &Resource,
    entries: &[&OpeningHoursEntry],
    now: DateTime<Utc>,
) -> bool {
    let Some(reservations) = resource.reservations.as_deref() else {
        return false;
    };
    if entries.is_empty() {
        return false;
    }

    let buckets = reservations_by_date(reservations);
    let config = &resource.config;
    entries.iter().any(|entry| {
        let of_day = buckets.get(&entry.date).map_or(&[][..], Vec::as_slice);
        has_free_time_in_day(
            entry.opens,
            entry.closes,
            of_day,
            config.min_period_minutes,
            config.slot_size_minutes,
            config.cooldown_minutes,
            now,
        )
    })
}
