//! Parking spot repository implementation
//!
//! Keeps the lot's spots in memory, keyed by spot number. Allocation always
//! hands out the lowest-numbered free spot of the requested category.

use async_trait::async_trait;
use parking_lot::RwLock;
use parkit_core::{
    config::LotConfig,
    models::{ParkingSpot, VehicleCategory},
    traits::SpotAllocator,
    ParkingResult,
};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// In-memory implementation of SpotAllocator
pub struct InMemorySpotRepository {
    rows: RwLock<BTreeMap<i32, SpotRow>>,
}

impl InMemorySpotRepository {
    /// Create a repository holding the given spots
    pub fn new(spots: impl IntoIterator<Item = ParkingSpot>) -> Self {
        let rows = spots
            .into_iter()
            .map(|spot| (spot.id, SpotRow::from(&spot)))
            .collect();

        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Create a repository with every spot of the configured lot available
    pub fn from_lot(lot: &LotConfig) -> Self {
        Self::new(lot.spots())
    }

    /// Current state of a spot
    pub fn spot(&self, id: i32) -> ParkingResult<Option<ParkingSpot>> {
        self.rows.read().get(&id).map(ParkingSpot::try_from).transpose()
    }

    /// Number of free spots of a category
    pub fn available_count(&self, category: VehicleCategory) -> usize {
        self.rows
            .read()
            .values()
            .filter(|row| row.available && row.category_code == category.code())
            .count()
    }
}

#[async_trait]
impl SpotAllocator for InMemorySpotRepository {
    #[instrument(skip(self))]
    async fn next_available_slot(&self, category: VehicleCategory) -> ParkingResult<i32> {
        let slot = self
            .rows
            .read()
            .values()
            .find(|row| row.available && row.category_code == category.code())
            .map(|row| row.parking_number)
            .unwrap_or(0);

        debug!("Next available {} slot: {}", category, slot);

        Ok(slot)
    }

    #[instrument(skip(self, spot), fields(spot = spot.id))]
    async fn update_parking(&self, spot: &ParkingSpot) -> ParkingResult<bool> {
        let mut rows = self.rows.write();

        match rows.get_mut(&spot.id) {
            Some(row) => {
                row.available = spot.available;
                debug!("Spot {} availability set to {}", spot.id, spot.available);
                Ok(true)
            }
            None => {
                warn!("Cannot update unknown spot {}", spot.id);
                Ok(false)
            }
        }
    }
}

/// Stored spot row
#[derive(Debug, Clone)]
struct SpotRow {
    parking_number: i32,
    category_code: String,
    available: bool,
}

impl From<&ParkingSpot> for SpotRow {
    fn from(spot: &ParkingSpot) -> Self {
        Self {
            parking_number: spot.id,
            category_code: spot.category.code().to_string(),
            available: spot.available,
        }
    }
}

impl TryFrom<&SpotRow> for ParkingSpot {
    type Error = parkit_core::ParkingError;

    fn try_from(row: &SpotRow) -> Result<Self, Self::Error> {
        Ok(ParkingSpot::new(
            row.parking_number,
            row.category_code.parse()?,
            row.available,
        ))
    }
}
