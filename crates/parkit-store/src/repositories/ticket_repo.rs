//! Ticket repository implementation
//!
//! Stores tickets as rows referencing their spot by number and category code,
//! with sequential ids assigned on save.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use parkit_core::{
    models::{ParkingSpot, Ticket},
    traits::TicketStore,
    ParkingError, ParkingResult,
};
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

/// In-memory implementation of TicketStore
pub struct InMemoryTicketRepository {
    inner: RwLock<TicketTable>,
}

#[derive(Debug)]
struct TicketTable {
    rows: Vec<TicketRow>,
    next_id: i64,
}

impl InMemoryTicketRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TicketTable {
                rows: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// All tickets of a registration, most recent first
    pub fn tickets_for(&self, vehicle_reg_number: &str) -> ParkingResult<Vec<Ticket>> {
        self.inner
            .read()
            .rows
            .iter()
            .rev()
            .filter(|row| row.vehicle_reg_number == vehicle_reg_number)
            .map(Ticket::try_from)
            .collect()
    }

    /// Total number of stored tickets
    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    /// Check if no ticket has been stored yet
    pub fn is_empty(&self) -> bool {
        self.inner.read().rows.is_empty()
    }
}

impl Default for InMemoryTicketRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketRepository {
    #[instrument(skip(self))]
    async fn ticket_count_for(&self, vehicle_reg_number: &str) -> ParkingResult<i64> {
        let count = self
            .inner
            .read()
            .rows
            .iter()
            .filter(|row| row.vehicle_reg_number == vehicle_reg_number)
            .count();

        debug!("Vehicle {} has {} tickets on file", vehicle_reg_number, count);

        Ok(count as i64)
    }

    #[instrument(skip(self))]
    async fn open_ticket_for(&self, vehicle_reg_number: &str) -> ParkingResult<Option<Ticket>> {
        self.inner
            .read()
            .rows
            .iter()
            .rev()
            .find(|row| row.vehicle_reg_number == vehicle_reg_number && row.out_time.is_none())
            .map(Ticket::try_from)
            .transpose()
    }

    #[instrument(skip(self, ticket), fields(vehicle = %ticket.vehicle_reg_number))]
    async fn save_ticket(&self, ticket: &Ticket) -> ParkingResult<bool> {
        let mut table = self.inner.write();

        let id = table.next_id;
        table.next_id += 1;

        let mut row = TicketRow::from(ticket);
        row.id = id;
        table.rows.push(row);

        debug!(
            "Saved ticket {} for vehicle {} in spot {}",
            id, ticket.vehicle_reg_number, ticket.parking_spot.id
        );

        Ok(true)
    }

    #[instrument(skip(self, ticket), fields(ticket = ticket.id))]
    async fn update_ticket(&self, ticket: &Ticket) -> ParkingResult<bool> {
        let mut table = self.inner.write();

        match table.rows.iter_mut().find(|row| row.id == ticket.id) {
            Some(row) => {
                row.price = ticket.price;
                row.out_time = ticket.out_time;
                debug!("Updated ticket {}: price={}", ticket.id, ticket.price);
                Ok(true)
            }
            None => {
                warn!("Cannot update unknown ticket {}", ticket.id);
                Ok(false)
            }
        }
    }
}

/// Stored ticket row
#[derive(Debug, Clone)]
struct TicketRow {
    id: i64,
    parking_number: i32,
    category_code: String,
    vehicle_reg_number: String,
    price: Decimal,
    in_time: DateTime<Utc>,
    out_time: Option<DateTime<Utc>>,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            parking_number: ticket.parking_spot.id,
            category_code: ticket.parking_spot.category.code().to_string(),
            vehicle_reg_number: ticket.vehicle_reg_number.clone(),
            price: ticket.price,
            in_time: ticket.in_time,
            out_time: ticket.out_time,
        }
    }
}

impl TryFrom<&TicketRow> for Ticket {
    type Error = ParkingError;

    /// The spot snapshot is rebuilt as occupied: spot availability lives in the
    /// spot store, not on the ticket.
    fn try_from(row: &TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: row.id,
            parking_spot: ParkingSpot::new(row.parking_number, row.category_code.parse()?, false),
            vehicle_reg_number: row.vehicle_reg_number.clone(),
            price: row.price,
            in_time: row.in_time,
            out_time: row.out_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use parkit_core::models::VehicleCategory;
    use rust_decimal_macros::dec;

    fn ticket(reg: &str, minutes_ago: i64) -> Ticket {
        Ticket::open(
            ParkingSpot::new(1, VehicleCategory::Car, false),
            reg.to_string(),
            Utc::now() - Duration::minutes(minutes_ago),
        )
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = InMemoryTicketRepository::new();

        assert!(repo.save_ticket(&ticket("ABCDEF", 60)).await.unwrap());
        assert!(repo.save_ticket(&ticket("XYZ123", 30)).await.unwrap());

        assert_eq!(repo.len(), 2);
        let open = repo.open_ticket_for("XYZ123").await.unwrap().unwrap();
        assert_eq!(open.id, 2);
        assert_eq!(open.price, Decimal::ZERO);
        assert!(open.is_open());
    }

    #[tokio::test]
    async fn test_count_includes_open_and_closed_tickets() {
        let repo = InMemoryTicketRepository::new();
        assert_eq!(repo.ticket_count_for("ABCDEF").await.unwrap(), 0);

        repo.save_ticket(&ticket("ABCDEF", 120)).await.unwrap();
        let mut first = repo.open_ticket_for("ABCDEF").await.unwrap().unwrap();
        first.out_time = Some(Utc::now());
        first.price = dec!(3.00);
        assert!(repo.update_ticket(&first).await.unwrap());

        repo.save_ticket(&ticket("ABCDEF", 10)).await.unwrap();
        repo.save_ticket(&ticket("OTHER1", 10)).await.unwrap();

        assert_eq!(repo.ticket_count_for("ABCDEF").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_open_ticket_skips_closed_ones() {
        let repo = InMemoryTicketRepository::new();
        repo.save_ticket(&ticket("ABCDEF", 60)).await.unwrap();

        let mut open = repo.open_ticket_for("ABCDEF").await.unwrap().unwrap();
        open.out_time = Some(Utc::now());
        open.price = dec!(1.50);
        repo.update_ticket(&open).await.unwrap();

        assert_eq!(repo.open_ticket_for("ABCDEF").await.unwrap(), None);

        let history = repo.tickets_for("ABCDEF").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, dec!(1.50));
        assert!(!history[0].is_open());
    }

    #[tokio::test]
    async fn test_open_ticket_is_most_recent() {
        let repo = InMemoryTicketRepository::new();
        repo.save_ticket(&ticket("ABCDEF", 90)).await.unwrap();
        repo.save_ticket(&ticket("ABCDEF", 5)).await.unwrap();

        let open = repo.open_ticket_for("ABCDEF").await.unwrap().unwrap();
        assert_eq!(open.id, 2);
    }

    #[tokio::test]
    async fn test_update_unknown_ticket_is_rejected() {
        let repo = InMemoryTicketRepository::new();
        let mut ghost = ticket("ABCDEF", 60);
        ghost.id = 42;

        assert!(!repo.update_ticket(&ghost).await.unwrap());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_ticket_spot_is_rebuilt_as_occupied() {
        let repo = InMemoryTicketRepository::new();
        let mut entering = ticket("BIKE42", 45);
        entering.parking_spot = ParkingSpot::new(4, VehicleCategory::Bike, true);
        repo.save_ticket(&entering).await.unwrap();

        let stored = repo.open_ticket_for("BIKE42").await.unwrap().unwrap();
        assert_eq!(stored.parking_spot, ParkingSpot::new(4, VehicleCategory::Bike, false));
    }
}
