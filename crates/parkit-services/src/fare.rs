//! Fare calculation
//!
//! Prices a parking stay from its time span, the vehicle category and the
//! loyalty discount flag:
//!
//! - Stays of 30 minutes or less are free
//! - Otherwise `duration_hours × hourly_rate`, rounded half-up to cents
//! - The 5% discount is applied to the already rounded price and rounded again
//!
//! Applying the discount before the first rounding can land one cent lower
//! (a 65 minute car stay is 1.55 here, 1.54 with a single rounding); the
//! two-step order is the one customers are billed with.

use chrono::{DateTime, Duration, Utc};
use parkit_core::{
    models::{Ticket, VehicleCategory},
    ParkingError, ParkingResult,
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, instrument};

use crate::constants::{
    BIKE_RATE_PER_HOUR, CAR_RATE_PER_HOUR, FREE_PARKING_MINUTES, LOYALTY_DISCOUNT_FACTOR,
    PRICE_SCALE,
};

const MILLIS_PER_HOUR: Decimal = dec!(3600000);

/// Fare calculator
///
/// Stateless; holds no collaborators and has no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct FareCalculator;

impl FareCalculator {
    /// Create a new fare calculator
    pub fn new() -> Self {
        Self
    }

    /// Hourly rate of a vehicle category
    #[inline]
    pub fn hourly_rate(category: VehicleCategory) -> Decimal {
        match category {
            VehicleCategory::Car => CAR_RATE_PER_HOUR,
            VehicleCategory::Bike => BIKE_RATE_PER_HOUR,
        }
    }

    /// Compute the fare for a stay
    ///
    /// # Errors
    ///
    /// Returns `ParkingError::InvalidTimeRange` if `out_time` is missing or
    /// earlier than `in_time`.
    #[instrument(skip(self))]
    pub fn compute_fare(
        &self,
        in_time: DateTime<Utc>,
        out_time: Option<DateTime<Utc>>,
        category: VehicleCategory,
        discount: bool,
    ) -> ParkingResult<Decimal> {
        let out_time = match out_time {
            Some(out) if out >= in_time => out,
            _ => {
                return Err(ParkingError::InvalidTimeRange {
                    entry: in_time,
                    exit: out_time,
                })
            }
        };

        let elapsed = out_time - in_time;
        if elapsed <= Duration::minutes(FREE_PARKING_MINUTES) {
            debug!("Stay of {}s is within the free period", elapsed.num_seconds());
            return Ok(Decimal::ZERO);
        }

        // millis × rate / millis-per-hour keeps non-terminating hour fractions exact
        let millis = Decimal::from(elapsed.num_milliseconds());
        let base = round_price(millis * Self::hourly_rate(category) / MILLIS_PER_HOUR);

        if !discount {
            debug!("Fare for {} over {}ms: {}", category, millis, base);
            return Ok(base);
        }

        let discounted = round_price(base * LOYALTY_DISCOUNT_FACTOR);
        debug!(
            "Fare for {} over {}ms: {} discounted to {}",
            category, millis, base, discounted
        );

        Ok(discounted)
    }

    /// Compute the fare of a ticket from its times and spot category
    pub fn fare_for_ticket(&self, ticket: &Ticket, discount: bool) -> ParkingResult<Decimal> {
        self.compute_fare(
            ticket.in_time,
            ticket.out_time,
            ticket.parking_spot.category,
            discount,
        )
    }
}

/// Round half-up to cents
#[inline]
fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkit_core::models::ParkingSpot;

    fn stay(minutes: i64) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
        let out = Utc::now();
        (out - Duration::minutes(minutes), Some(out))
    }

    fn fare(minutes: i64, category: VehicleCategory, discount: bool) -> Decimal {
        let (in_time, out_time) = stay(minutes);
        FareCalculator::new()
            .compute_fare(in_time, out_time, category, discount)
            .unwrap()
    }

    #[test]
    fn test_fare_table() {
        let cases = [
            (30, VehicleCategory::Car, true, dec!(0)),
            (30, VehicleCategory::Car, false, dec!(0)),
            (30, VehicleCategory::Bike, true, dec!(0)),
            (30, VehicleCategory::Bike, false, dec!(0)),
            (45, VehicleCategory::Car, false, dec!(1.13)),
            (45, VehicleCategory::Car, true, dec!(1.07)),
            (45, VehicleCategory::Bike, false, dec!(0.75)),
            (45, VehicleCategory::Bike, true, dec!(0.71)),
            (60, VehicleCategory::Car, false, dec!(1.50)),
            (60, VehicleCategory::Car, true, dec!(1.43)),
            (60, VehicleCategory::Bike, false, dec!(1.00)),
            (60, VehicleCategory::Bike, true, dec!(0.95)),
            (1440, VehicleCategory::Car, false, dec!(36.00)),
            (1440, VehicleCategory::Car, true, dec!(34.20)),
            (1440, VehicleCategory::Bike, false, dec!(24.00)),
            (1440, VehicleCategory::Bike, true, dec!(22.80)),
        ];

        for (minutes, category, discount, expected) in cases {
            assert_eq!(
                fare(minutes, category, discount),
                expected,
                "{} minutes, {}, discount={}",
                minutes,
                category,
                discount
            );
        }
    }

    #[test]
    fn test_free_parking_threshold_is_inclusive() {
        for category in VehicleCategory::ALL {
            for minutes in [0, 1, 15, 29, 30] {
                assert_eq!(fare(minutes, category, false), Decimal::ZERO);
                assert_eq!(fare(minutes, category, true), Decimal::ZERO);
            }
        }

        let in_time = Utc::now();
        let out_time = in_time + Duration::minutes(30) + Duration::milliseconds(1);
        let price = FareCalculator::new()
            .compute_fare(in_time, Some(out_time), VehicleCategory::Car, false)
            .unwrap();
        assert_eq!(price, dec!(0.75));
    }

    #[test]
    fn test_hour_fraction_that_does_not_terminate() {
        // 65 minutes = 1.0833... hours
        assert_eq!(fare(65, VehicleCategory::Car, false), dec!(1.63));
        assert_eq!(fare(65, VehicleCategory::Bike, false), dec!(1.08));
    }

    #[test]
    fn test_discount_applies_to_rounded_price() {
        // 65 minutes of car parking is 1.625 before rounding
        let discounted = fare(65, VehicleCategory::Car, true);
        assert_eq!(discounted, dec!(1.55));

        let single_step = (dec!(1.625) * LOYALTY_DISCOUNT_FACTOR)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(single_step, dec!(1.54));
        assert_ne!(discounted, single_step);

        // 75 minutes diverges as well
        assert_eq!(fare(75, VehicleCategory::Car, true), dec!(1.79));
    }

    #[test]
    fn test_one_hour_matches_rate() {
        for category in VehicleCategory::ALL {
            let rate = FareCalculator::hourly_rate(category);
            assert_eq!(fare(60, category, false), round_price(rate));
            assert_eq!(
                fare(60, category, true),
                round_price(round_price(rate) * LOYALTY_DISCOUNT_FACTOR)
            );
        }
    }

    #[test]
    fn test_missing_exit_time() {
        let in_time = Utc::now();
        let err = FareCalculator::new()
            .compute_fare(in_time, None, VehicleCategory::Car, false)
            .unwrap_err();

        assert_eq!(
            err,
            ParkingError::InvalidTimeRange {
                entry: in_time,
                exit: None
            }
        );
    }

    #[test]
    fn test_exit_before_entry() {
        let out_time = Utc::now();
        let in_time = out_time + Duration::hours(1);

        let err = FareCalculator::new()
            .compute_fare(in_time, Some(out_time), VehicleCategory::Bike, false)
            .unwrap_err();

        assert_eq!(err.error_code(), "invalid_time_range");
    }

    #[test]
    fn test_fare_for_ticket() {
        let in_time = Utc::now() - Duration::minutes(45);
        let mut ticket = Ticket::open(
            ParkingSpot::new(4, VehicleCategory::Bike, false),
            "BIKE42".to_string(),
            in_time,
        );

        let err = FareCalculator::new().fare_for_ticket(&ticket, false).unwrap_err();
        assert_eq!(err.error_code(), "invalid_time_range");

        ticket.out_time = Some(in_time + Duration::minutes(45));
        assert_eq!(
            FareCalculator::new().fare_for_ticket(&ticket, false).unwrap(),
            dec!(0.75)
        );
    }
}
