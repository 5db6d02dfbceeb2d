// Remote contract of a car rental company
// Implementations live behind a remoting substrate; this module only fixes the operations
// and which failures each of them may report

use crate::rental::{CarType, Quote, Reservation, ReservationConstraints};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

// Failure to talk to the company at all. Every operation can report this.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),
}

// The company refused to quote or confirm
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReservationError {
    #[error("Constraints cannot be satisfied: {0}")]
    UnsatisfiableConstraints(String),

    #[error("Car no longer available: {0}")]
    Unavailable(String),

    #[error("Reservation error: {0}")]
    Other(String),
}

// Failure of quote creation or confirmation, the only operations that can be refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Reservation(#[from] ReservationError),
}

impl BookingError {
    pub fn is_reservation_failure(&self) -> bool {
        matches!(self, BookingError::Reservation(_))
    }
}

#[async_trait]
pub trait CarRentalCompany: Send + Sync + 'static {
    async fn name(&self) -> Result<String, RemoteError>;

    async fn regions(&self) -> Result<Vec<String>, RemoteError>;

    async fn has_region(&self, region: &str) -> Result<bool, RemoteError>;

    // Full catalog of car types the company rents out
    async fn all_car_types(&self) -> Result<Vec<CarType>, RemoteError>;

    // None when the company has no car type with this name
    async fn car_type(&self, name: &str) -> Result<Option<CarType>, RemoteError>;

    async fn is_available(
        &self,
        car_type: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, RemoteError>;

    async fn available_car_types(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<CarType>, RemoteError>;

    async fn create_quote(
        &self,
        constraints: ReservationConstraints,
        client: &str,
    ) -> Result<Quote, BookingError>;

    async fn confirm_quote(&self, quote: Quote) -> Result<Reservation, BookingError>;

    async fn cancel_reservation(&self, reservation: Reservation) -> Result<(), RemoteError>;

    async fn reservations_by_renter(&self, client: &str) -> Result<Vec<Reservation>, RemoteError>;

    async fn number_of_reservations_for_car_type(
        &self,
        car_type: &str,
    ) -> Result<usize, RemoteError>;
}
