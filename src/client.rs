// Demonstration client for a car rental company
// Looks the company up by name and forwards every call. It never retries or substitutes
// a fallback value: failures reach the caller in the category the company reported.

use crate::company::{BookingError, CarRentalCompany, RemoteError};
use crate::registry::{CompanyRegistry, RegistryError};
use crate::rental::{CarType, Quote, Reservation, ReservationConstraints};
use anyhow::Context;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;
use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] RegistryError),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub company_name: String,
    pub script_file: String,
    // Per-call limit; None waits as long as the company takes
    pub call_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            company_name: "Hertz".to_string(),
            script_file: "simpleTrips".to_string(),
            call_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.company_name.trim().is_empty() {
            return Err(ClientError::ConfigError(
                "company_name must not be empty".to_string(),
            ));
        }
        if self.call_timeout_ms == Some(0) {
            return Err(ClientError::ConfigError(
                "call_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    // Load a JSON config file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading client config {}", path.display()))?;
        let config: ClientConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing client config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClientStats {
    pub calls_sent: usize,
    pub calls_succeeded: usize,
    pub calls_failed: usize,
    pub reservation_failures: usize,
    pub timeouts: usize,
}

// What the client needs to know about a failure to keep its statistics
trait CallFailure: From<RemoteError> + Display {
    fn is_reservation_failure(&self) -> bool;
    fn is_timeout(&self) -> bool;
}

impl CallFailure for RemoteError {
    fn is_reservation_failure(&self) -> bool {
        false
    }

    fn is_timeout(&self) -> bool {
        matches!(self, RemoteError::Timeout(_))
    }
}

impl CallFailure for BookingError {
    fn is_reservation_failure(&self) -> bool {
        BookingError::is_reservation_failure(self)
    }

    fn is_timeout(&self) -> bool {
        matches!(self, BookingError::Remote(RemoteError::Timeout(_)))
    }
}

pub struct RentalClient {
    company: Arc<dyn CarRentalCompany>,
    config: ClientConfig,
    stats: Mutex<ClientStats>,
}

impl RentalClient {
    // Look the configured company up in the registry
    pub fn connect(registry: &CompanyRegistry, config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let company = registry.lookup(&config.company_name)?;
        info!(company = %config.company_name, "client_connected");
        Ok(Self::from_parts(company, config))
    }

    pub fn with_company(
        company: Arc<dyn CarRentalCompany>,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self::from_parts(company, config))
    }

    fn from_parts(company: Arc<dyn CarRentalCompany>, config: ClientConfig) -> Self {
        Self {
            company,
            config,
            stats: Mutex::new(ClientStats::default()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn stats(&self) -> ClientStats {
        self.stats.lock().clone()
    }

    async fn forward<T, E, F>(&self, operation: &'static str, call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: CallFailure,
    {
        self.stats.lock().calls_sent += 1;
        debug!(company = %self.config.company_name, operation, "forwarding_call");

        let result = match self.config.call_timeout_ms {
            Some(timeout_ms) => {
                match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
                    Ok(result) => result,
                    Err(_) => Err(E::from(RemoteError::Timeout(timeout_ms))),
                }
            }
            None => call.await,
        };

        match &result {
            Ok(_) => self.stats.lock().calls_succeeded += 1,
            Err(e) => {
                {
                    let mut stats = self.stats.lock();
                    stats.calls_failed += 1;
                    if e.is_reservation_failure() {
                        stats.reservation_failures += 1;
                    }
                    if e.is_timeout() {
                        stats.timeouts += 1;
                    }
                }
                warn!(
                    company = %self.config.company_name,
                    operation,
                    error = %e,
                    "call_failed"
                );
            }
        }

        result
    }

    pub async fn name(&self) -> Result<String, RemoteError> {
        self.forward("name", self.company.name()).await
    }

    pub async fn regions(&self) -> Result<Vec<String>, RemoteError> {
        self.forward("regions", self.company.regions()).await
    }

    pub async fn has_region(&self, region: &str) -> Result<bool, RemoteError> {
        self.forward("has_region", self.company.has_region(region)).await
    }

    pub async fn all_car_types(&self) -> Result<Vec<CarType>, RemoteError> {
        self.forward("all_car_types", self.company.all_car_types()).await
    }

    pub async fn car_type(&self, name: &str) -> Result<Option<CarType>, RemoteError> {
        self.forward("car_type", self.company.car_type(name)).await
    }

    pub async fn is_available(
        &self,
        car_type: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool, RemoteError> {
        self.forward(
            "is_available",
            self.company.is_available(car_type, start, end),
        )
        .await
    }

    pub async fn available_car_types(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<CarType>, RemoteError> {
        self.forward(
            "available_car_types",
            self.company.available_car_types(start, end),
        )
        .await
    }

    // Fetch the car types free in the period and report each of them
    pub async fn check_for_available_car_types(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashSet<CarType>, RemoteError> {
        let car_types = self.available_car_types(start, end).await?;
        for car_type in &car_types {
            info!(
                company = %self.config.company_name,
                %start,
                %end,
                car_type = %car_type,
                "car_type_available"
            );
        }
        Ok(car_types)
    }

    pub async fn request_quote(
        &self,
        constraints: ReservationConstraints,
        client_name: &str,
    ) -> Result<Quote, BookingError> {
        self.forward(
            "create_quote",
            self.company.create_quote(constraints, client_name),
        )
        .await
    }

    // Tentative reservation for one car type in a region over the given period
    pub async fn create_quote(
        &self,
        client_name: &str,
        start: NaiveDate,
        end: NaiveDate,
        car_type: &str,
        region: &str,
    ) -> Result<Quote, BookingError> {
        let constraints = ReservationConstraints::new(start, end, car_type, region);
        self.request_quote(constraints, client_name).await
    }

    pub async fn confirm_quote(&self, quote: Quote) -> Result<Reservation, BookingError> {
        self.forward("confirm_quote", self.company.confirm_quote(quote)).await
    }

    pub async fn cancel_reservation(&self, reservation: Reservation) -> Result<(), RemoteError> {
        self.forward(
            "cancel_reservation",
            self.company.cancel_reservation(reservation),
        )
        .await
    }

    pub async fn reservations_by_renter(
        &self,
        client_name: &str,
    ) -> Result<Vec<Reservation>, RemoteError> {
        self.forward(
            "reservations_by_renter",
            self.company.reservations_by_renter(client_name),
        )
        .await
    }

    pub async fn number_of_reservations_for_car_type(
        &self,
        car_type: &str,
    ) -> Result<usize, RemoteError> {
        self.forward(
            "number_of_reservations_for_car_type",
            self.company.number_of_reservations_for_car_type(car_type),
        )
        .await
    }
}
