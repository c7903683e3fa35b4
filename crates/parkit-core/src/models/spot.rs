//! Parking spot model

use super::VehicleCategory;
use serde::{Deserialize, Serialize};

/// Parking spot entity
///
/// A numbered location restricted to one vehicle category. The store owns the
/// authoritative availability; values held by services are snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpot {
    /// Spot number (positive, unique within the lot)
    pub id: i32,

    /// Category of vehicle this spot accepts
    pub category: VehicleCategory,

    /// Whether the spot is free
    pub available: bool,
}

impl ParkingSpot {
    pub fn new(id: i32, category: VehicleCategory, available: bool) -> Self {
        Self {
            id,
            category,
            available,
        }
    }

    /// Snapshot of this spot marked as taken
    pub fn occupied(&self) -> Self {
        Self {
            available: false,
            ..self.clone()
        }
    }

    /// Snapshot of this spot marked as free
    pub fn released(&self) -> Self {
        Self {
            available: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupy_and_release_are_snapshots() {
        let spot = ParkingSpot::new(4, VehicleCategory::Bike, true);

        let taken = spot.occupied();
        assert!(!taken.available);
        assert!(spot.available);

        let freed = taken.released();
        assert!(freed.available);
        assert_eq!(freed.id, 4);
        assert_eq!(freed.category, VehicleCategory::Bike);
    }
}
