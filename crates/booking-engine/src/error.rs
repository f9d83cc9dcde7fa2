//! Error types for booking-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    /// The resource snapshot carries no reservation list yet. Distinct from
    /// an empty list: the data is still in flight, so no day can be
    /// classified as available or blocked.
    #[error("reservations have not been loaded for resource {0}")]
    ReservationsNotLoaded(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
