// Value types referenced by the car rental contract
// These carry no behaviour of their own - the company behind the contract owns all of it

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// A car type offered by a rental company, identified by its name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct CarType {
    pub name: String,
}

impl CarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// Criteria a client supplies when asking for a quote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReservationConstraints {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub car_type: String,
    pub region: String,
}

impl ReservationConstraints {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        car_type: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            car_type: car_type.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for ReservationConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} from {} to {}",
            self.car_type, self.region, self.start, self.end
        )
    }
}

// Tentative, unconfirmed reservation offer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quote {
    pub client: String,
    pub company: String,
    pub constraints: ReservationConstraints,
}

impl Quote {
    pub fn car_type(&self) -> &str {
        &self.constraints.car_type
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote for {} at {}: {}",
            self.client, self.company, self.constraints
        )
    }
}

// Confirmed booking derived from a quote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reservation {
    pub reservation_id: String,
    pub quote: Quote,
}

impl Reservation {
    pub fn renter(&self) -> &str {
        &self.quote.client
    }

    pub fn car_type(&self) -> &str {
        self.quote.car_type()
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reservation {} ({})", self.reservation_id, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_reservation_reads_through_quote() {
        let quote = Quote {
            client: "Jan".to_string(),
            company: "Hertz".to_string(),
            constraints: ReservationConstraints::new(
                date("2025-06-01"),
                date("2025-06-05"),
                "Compact",
                "Brussels",
            ),
        };
        let reservation = Reservation {
            reservation_id: "res-1".to_string(),
            quote,
        };

        assert_eq!(reservation.renter(), "Jan");
        assert_eq!(reservation.car_type(), "Compact");
        assert_eq!(
            reservation.to_string(),
            "Reservation res-1 (Quote for Jan at Hertz: Compact in Brussels from 2025-06-01 to 2025-06-05)"
        );
    }

    #[test]
    fn test_values_survive_json() {
        // Any remoting substrate has to be able to carry these
        let constraints =
            ReservationConstraints::new(date("2025-07-01"), date("2025-07-10"), "Van", "Ghent");
        let json = serde_json::to_string(&constraints).unwrap();
        assert!(json.contains("\"start\":\"2025-07-01\""));

        let back: ReservationConstraints = serde_json::from_str(&json).unwrap();
        assert_eq!(back, constraints);
    }

    #[test]
    fn test_car_type_displays_name() {
        assert_eq!(CarType::new("Luxury").to_string(), "Luxury");
    }
}
