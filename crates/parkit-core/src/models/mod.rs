//! Domain models for ParkIt
//!
//! This module contains the core domain models used throughout the application.

pub mod spot;
pub mod ticket;
pub mod vehicle;

pub use spot::ParkingSpot;
pub use ticket::Ticket;
pub use vehicle::VehicleCategory;
