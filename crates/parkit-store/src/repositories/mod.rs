//! Repository implementations
//!
//! Concrete implementations of the storage traits defined in parkit-core.

pub mod spot_repo;
pub mod ticket_repo;

pub use spot_repo::InMemorySpotRepository;
pub use ticket_repo::InMemoryTicketRepository;
