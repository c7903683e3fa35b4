//! ParkIt Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the ParkIt parking system. It includes:
//!
//! - Domain models (VehicleCategory, ParkingSpot, Ticket)
//! - Collaborator traits for spot allocation, ticket storage and operator input
//! - Unified error handling with stable error codes
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::ParkingError;

/// Result type alias using ParkingError
pub type ParkingResult<T> = Result<T, ParkingError>;
