//! Unified error handling for ParkIt
//!
//! A single error type covers fare contract violations, operator input
//! problems and collaborator failures. Each variant maps to a stable error
//! code used in logs.

use crate::models::VehicleCategory;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParkingError {
    // ==================== Fare Errors ====================
    #[error("Invalid time range: exit {exit:?} is missing or before entry {entry}")]
    InvalidTimeRange {
        entry: DateTime<Utc>,
        exit: Option<DateTime<Utc>>,
    },

    #[error("Unsupported vehicle category: {0}")]
    UnsupportedCategory(String),

    // ==================== Operator Input Errors ====================
    #[error("Invalid vehicle category selection: {0}")]
    InvalidCategorySelection(i32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==================== Business Logic Errors ====================
    #[error("No parking spot available for category {0}")]
    NoSpotAvailable(VehicleCategory),

    #[error("No open ticket for vehicle: {0}")]
    NoOpenTicket(String),

    // ==================== Storage Errors ====================
    #[error("Store rejected the change: {0}")]
    StoreRejected(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // ==================== Internal Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParkingError {
    /// Returns the error code for log output
    pub fn error_code(&self) -> &'static str {
        match self {
            ParkingError::InvalidTimeRange { .. } => "invalid_time_range",
            ParkingError::UnsupportedCategory(_) => "unsupported_category",
            ParkingError::InvalidCategorySelection(_) => "invalid_category_selection",
            ParkingError::InvalidInput(_) => "invalid_input",
            ParkingError::NoSpotAvailable(_) => "no_spot_available",
            ParkingError::NoOpenTicket(_) => "no_open_ticket",
            ParkingError::StoreRejected(_) => "store_rejected",
            ParkingError::Storage(_) => "storage_error",
            ParkingError::Config(_) => "config_error",
            ParkingError::Internal(_) => "internal_error",
        }
    }

    /// Whether the error came from a collaborator rather than from the operator
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            ParkingError::Storage(_) | ParkingError::StoreRejected(_)
        )
    }
}

// ==================== From implementations ====================

impl From<std::io::Error> for ParkingError {
    fn from(err: std::io::Error) -> Self {
        ParkingError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for ParkingError {
    fn from(err: config::ConfigError) -> Self {
        ParkingError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ParkingError::InvalidCategorySelection(3).error_code(),
            "invalid_category_selection"
        );
        assert_eq!(
            ParkingError::NoOpenTicket("ABCDEF".to_string()).error_code(),
            "no_open_ticket"
        );
        assert_eq!(
            ParkingError::NoSpotAvailable(VehicleCategory::Bike).error_code(),
            "no_spot_available"
        );
    }

    #[test]
    fn test_storage_failure_classification() {
        assert!(ParkingError::Storage("down".to_string()).is_storage_failure());
        assert!(ParkingError::StoreRejected("ticket 4".to_string()).is_storage_failure());
        assert!(!ParkingError::InvalidInput("empty".to_string()).is_storage_failure());
    }

    #[test]
    fn test_error_messages() {
        let err = ParkingError::NoSpotAvailable(VehicleCategory::Car);
        assert_eq!(err.to_string(), "No parking spot available for category CAR");

        let err = ParkingError::UnsupportedCategory("TRUCK".to_string());
        assert_eq!(err.to_string(), "Unsupported vehicle category: TRUCK");
    }
}
