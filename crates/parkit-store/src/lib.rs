//! ParkIt Storage Layer
//!
//! This crate provides in-memory implementations of the ParkIt storage
//! collaborators. It includes:
//!
//! - A spot repository seeded from the configured lot layout
//! - A ticket repository assigning sequential ticket ids
//!
//! Both keep rows the way a relational store would (category stored as its
//! code, spot referenced by number) and decode them into domain models on read.

pub mod repositories;

pub use repositories::*;

// Re-export commonly used types
pub use parkit_core::{ParkingError, ParkingResult};
