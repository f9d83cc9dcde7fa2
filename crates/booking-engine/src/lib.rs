//! # booking-engine
//!
//! Deterministic availability and reservation-range computation for
//! shared-resource booking.
//!
//! End users reserve time on shared resources — rooms, equipment,
//! overnight-stay units. This crate is the pure computation core behind
//! that flow: it turns opening hours, existing reservations and booking
//! rules into bookable time slots, "is there free time" answers over
//! day/week viewports, and day-granularity range selection for multi-day
//! stays. Everything is side-effect free: resource snapshots and the
//! current instant come in as arguments; slots, booleans and dates come
//! out. Identical inputs always produce identical outputs.
//!
//! ## Modules
//!
//! - [`resource`] — domain vocabulary: resources, reservations, opening hours
//! - [`slot`] — opening window → annotated fixed-size time slots
//! - [`freetime`] — free-time answers over day, 3-day and week windows
//! - [`overnight`] — day-granularity range selection for multi-day bookings
//! - [`error`] — error types

pub mod error;
pub mod freetime;
pub mod overnight;
pub mod resource;
pub mod slot;

pub use error::BookingError;
pub use freetime::{
    find_next_free_slot_date, free_spans_in_day, has_free_time_in_day,
    has_free_times_desktop, has_free_times_mobile, FreeSpan,
};
pub use overnight::{OvernightAvailability, RangeSelection};
pub use resource::{
    reservations_by_date, OpeningHoursEntry, Reservation, ReservationState, Resource,
    ResourceConfig,
};
pub use slot::{generate_slots, TimeSlot};
