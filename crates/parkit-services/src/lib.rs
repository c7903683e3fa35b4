//! Business logic services for ParkIt
//!
//! This crate contains the services that carry the parking lot's decisions:
//! what a stay costs, and how a vehicle enters and leaves.
//!
//! # Services
//!
//! - `FareCalculator` - Pure fare computation with free-parking threshold and
//!   loyalty discount
//! - `ParkingService` - Vehicle entry/exit workflow over the spot, ticket and
//!   input collaborators
//!
//! Top-level workflow operations never return an error: every failure is
//! logged and folded into an outcome value.

pub mod fare;
pub mod parking;

pub use fare::FareCalculator;
pub use parking::{EntryOutcome, EntryReceipt, ExitOutcome, ExitReceipt, ParkingService};

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Hourly rate for cars
    pub const CAR_RATE_PER_HOUR: Decimal = dec!(1.50);

    /// Hourly rate for bikes
    pub const BIKE_RATE_PER_HOUR: Decimal = dec!(1.00);

    /// Stays up to and including this many minutes are free
    pub const FREE_PARKING_MINUTES: i64 = 30;

    /// Price multiplier for loyal customers (5% off)
    pub const LOYALTY_DISCOUNT_FACTOR: Decimal = dec!(0.95);

    /// Decimal places of a price
    pub const PRICE_SCALE: u32 = 2;

    /// A vehicle needs strictly more tickets than this on file to get the discount
    pub const DISCOUNT_MIN_PRIOR_TICKETS: i64 = 1;
}
