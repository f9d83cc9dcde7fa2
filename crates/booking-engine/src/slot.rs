//! Slice a continuous opening window into fixed-size bookable slots
//! annotated with reservation, cooldown and edit state.
//!
//! Leaf component of the engine: the free-time search builds on the slots
//! produced here. Generation is a pure fold; every iteration produces a
//! fresh [`TimeSlot`], nothing is mutated across iterations.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::Reservation;

/// One bookable sub-interval of an opening window.
///
/// Slots are derived state with the lifetime of a single query pass; they
/// are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// A reservation overlaps this slot.
    pub reserved: bool,
    /// The slot falls in the buffer around a reservation. Never true
    /// together with `reserved`.
    pub on_cooldown: bool,
    /// The slot overlaps a reservation currently being edited.
    pub editing: bool,
    /// The overlapping reservation begins exactly at `start`.
    pub reservation_starting: bool,
    /// The overlapping reservation ends exactly at `end`.
    pub reservation_ending: bool,
    /// Reservations that made the slot reserved or put it on cooldown.
    pub reservations: Vec<Reservation>,
}

impl TimeSlot {
    /// A slot is bookable when nothing occupies or buffers it.
    pub fn is_free(&self) -> bool {
        !self.reserved && !self.on_cooldown
    }
}

/// Half-open interval overlap: `[a_start, a_end)` vs `[b_start, b_end)`.
/// Intervals that merely touch do not overlap.
fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Slice `[window_start, window_end)` into slots of `slot_size_minutes`.
///
/// Only whole slots are emitted; a trailing partial slot is dropped. A
/// missing window bound or a non-positive slot size yields an empty list
/// rather than an error, since callers routinely ask before all data has
/// loaded.
///
/// When several reservations overlap one slot, the last one in input order
/// decides the boundary flags. Valid data has non-overlapping active
/// reservations, so the tie-break carries no meaning beyond stability.
pub fn generate_slots(
    window_start: Option<DateTime<Utc>>,
    window_end: Option<DateTime<Utc>>,
    slot_size_minutes: i64,
    reservations: &[Reservation],
    reservations_being_edited: &[Reservation],
    cooldown_minutes: i64,
) -> Vec<TimeSlot> {
    let (Some(window_start), Some(window_end)) = (window_start, window_end) else {
        return Vec::new();
    };
    if slot_size_minutes <= 0 {
        return Vec::new();
    }
    let slot_size = Duration::minutes(slot_size_minutes);
    let cooldown = Duration::minutes(cooldown_minutes);

    let mut slots = Vec::new();
    let mut start = window_start;
    while start + slot_size <= window_end {
        let end = start + slot_size;
        slots.push(build_slot(
            start,
            end,
            reservations,
            reservations_being_edited,
            cooldown,
        ));
        start = end;
    }
    slots
}

fn build_slot(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    reservations: &[Reservation],
    edited: &[Reservation],
    cooldown: Duration,
) -> TimeSlot {
    let overlapping: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| overlaps(r.begin, r.end, start, end))
        .collect();
    let reserved = !overlapping.is_empty();
    let last = overlapping.last();
    let reservation_starting = last.is_some_and(|r| r.begin == start);
    let reservation_ending = last.is_some_and(|r| r.end == end);
    let editing = edited
        .iter()
        .any(|r| overlaps(r.begin, r.end, start, end));

    let mut slot_reservations: Vec<Reservation> =
        overlapping.into_iter().cloned().collect();

    let mut on_cooldown = false;
    if !reserved {
        let buffered: Vec<&Reservation> = reservations
            .iter()
            .filter(|r| overlaps(r.begin - cooldown, r.end + cooldown, start, end))
            .collect();
        if !buffered.is_empty() {
            // A user editing their own reservation must not be locked out by
            // the buffer around it; any foreign contributor keeps the buffer.
            on_cooldown = !(!edited.is_empty() && buffered.iter().all(|r| r.is_own));
            slot_reservations.extend(buffered.into_iter().cloned());
        }
    }

    TimeSlot {
        start,
        end,
        reserved,
        on_cooldown,
        editing,
        reservation_starting,
        reservation_ending,
        reservations: slot_reservations,
    }
}
