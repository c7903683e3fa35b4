//! Parking ticket model
//!
//! A ticket records one parking session. Lifecycle:
//! 1. Opened at entry with price 0 and no exit time
//! 2. Closed once at exit (exit time and price set), then persisted by update

use super::ParkingSpot;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parking ticket entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Store-assigned identifier (0 until saved)
    pub id: i64,

    /// Spot the vehicle was parked in
    pub parking_spot: ParkingSpot,

    /// Vehicle registration number
    pub vehicle_reg_number: String,

    /// Fare charged, meaningful only once closed
    pub price: Decimal,

    /// When the vehicle entered
    pub in_time: DateTime<Utc>,

    /// When the vehicle left (None while parked)
    pub out_time: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Open a new ticket for a vehicle entering the lot
    pub fn open(
        parking_spot: ParkingSpot,
        vehicle_reg_number: String,
        in_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            parking_spot,
            vehicle_reg_number,
            price: Decimal::ZERO,
            in_time,
            out_time: None,
        }
    }

    /// Check if the vehicle is still parked
    #[inline]
    pub fn is_open(&self) -> bool {
        self.out_time.is_none()
    }

    /// Time spent in the lot, if the ticket is closed
    pub fn parked_duration(&self) -> Option<Duration> {
        self.out_time.map(|out| out - self.in_time)
    }
}
