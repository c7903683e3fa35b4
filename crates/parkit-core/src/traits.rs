//! Collaborator traits
//!
//! The parking service talks to its surroundings only through these
//! abstractions: spot allocation, ticket storage, operator input and time.

use crate::models::{ParkingSpot, Ticket, VehicleCategory};
use crate::ParkingResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Spot allocation store
#[async_trait]
pub trait SpotAllocator: Send + Sync {
    /// Next free spot number for a category (0 or negative = lot full)
    async fn next_available_slot(&self, category: VehicleCategory) -> ParkingResult<i32>;

    /// Persist a spot's availability, returns whether the store accepted it
    async fn update_parking(&self, spot: &ParkingSpot) -> ParkingResult<bool>;
}

/// Ticket store
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Number of tickets on file for a registration (open and closed)
    async fn ticket_count_for(&self, vehicle_reg_number: &str) -> ParkingResult<i64>;

    /// Ticket of the vehicle currently parked under this registration
    async fn open_ticket_for(&self, vehicle_reg_number: &str) -> ParkingResult<Option<Ticket>>;

    /// Persist a new ticket
    async fn save_ticket(&self, ticket: &Ticket) -> ParkingResult<bool>;

    /// Persist exit time and price of an existing ticket
    async fn update_ticket(&self, ticket: &Ticket) -> ParkingResult<bool>;
}

/// Operator input source
#[async_trait]
pub trait InputSource: Send + Sync {
    /// Raw vehicle type selection from the menu
    async fn read_category_selection(&self) -> ParkingResult<i32>;

    /// Vehicle registration number
    async fn read_registration(&self) -> ParkingResult<String>;
}

/// Clock trait - abstracts time operations for testability
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
