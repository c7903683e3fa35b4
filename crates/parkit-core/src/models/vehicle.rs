//! Vehicle category model
//!
//! The lot accepts two kinds of vehicles. Each spot is restricted to one of
//! them and each has its own hourly rate.

use crate::error::ParkingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleCategory {
    Car,
    Bike,
}

impl VehicleCategory {
    /// All categories, in menu order
    pub const ALL: [VehicleCategory; 2] = [VehicleCategory::Car, VehicleCategory::Bike];

    /// Map an operator menu selection (1 = car, 2 = bike)
    pub fn from_selection(selection: i32) -> Result<Self, ParkingError> {
        match selection {
            1 => Ok(VehicleCategory::Car),
            2 => Ok(VehicleCategory::Bike),
            other => Err(ParkingError::InvalidCategorySelection(other)),
        }
    }

    /// Menu selection number for this category
    pub fn selection(&self) -> i32 {
        match self {
            VehicleCategory::Car => 1,
            VehicleCategory::Bike => 2,
        }
    }

    /// Storage code
    pub fn code(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "CAR",
            VehicleCategory::Bike => "BIKE",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for VehicleCategory {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CAR" => Ok(VehicleCategory::Car),
            "BIKE" => Ok(VehicleCategory::Bike),
            _ => Err(ParkingError::UnsupportedCategory(s.to_string())),
        }
    }
}
