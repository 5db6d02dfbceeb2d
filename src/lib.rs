// Car rental reservation contract and the demonstration client that calls it

pub mod booking_script;
pub mod client;
pub mod company;
pub mod registry;
pub mod rental;

// Re-export key types for convenience
pub use booking_script::{BookingScript, ScriptError, ScriptReport, StepOutcome};
pub use client::{ClientConfig, ClientError, ClientStats, RentalClient};
pub use company::{BookingError, CarRentalCompany, RemoteError, ReservationError};
pub use registry::{CompanyRegistry, RegistryError};
pub use rental::{CarType, Quote, Reservation, ReservationConstraints};
