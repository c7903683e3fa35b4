//! Parking service
//!
//! Orchestrates vehicles entering and leaving the lot:
//! - Entry: pick a spot for the vehicle's category, reserve it, open a ticket
//! - Exit: close the open ticket, price it, free the spot
//!
//! Spots are reserved in the spot store before the ticket is created so a spot
//! is never handed out twice. When the ticket cannot be created afterwards the
//! reservation is released again on a best-effort basis.

use chrono::{DateTime, Utc};
use parkit_core::{
    models::{ParkingSpot, Ticket, VehicleCategory},
    traits::{Clock, InputSource, SpotAllocator, SystemClock, TicketStore},
    ParkingError, ParkingResult,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::constants::DISCOUNT_MIN_PRIOR_TICKETS;
use crate::fare::FareCalculator;

/// Whether a vehicle has been here before (entry greeting only)
#[inline]
pub fn has_prior_visit(ticket_count: i64) -> bool {
    ticket_count > 0
}

/// Whether a vehicle gets the loyalty discount at exit
///
/// The count includes the ticket being closed, so two tickets on file means
/// one earlier visit.
#[inline]
pub fn is_discount_eligible(ticket_count: i64) -> bool {
    ticket_count > DISCOUNT_MIN_PRIOR_TICKETS
}

/// Vehicle admitted to the lot
#[derive(Debug, Clone, PartialEq)]
pub struct EntryReceipt {
    pub parking_spot: ParkingSpot,
    pub vehicle_reg_number: String,
    pub in_time: DateTime<Utc>,
    pub returning_customer: bool,
}

/// Result of a vehicle entry
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Spot reserved and ticket persisted
    Admitted(EntryReceipt),
    /// No spot was reserved (bad selection, lot full, allocator failure)
    NoSpotAllocated(ParkingError),
    /// Entry aborted after a spot was chosen
    Failed {
        error: ParkingError,
        /// Spot left marked as taken without a ticket
        orphaned_spot: Option<i32>,
    },
}

/// Vehicle that left the lot
#[derive(Debug, Clone, PartialEq)]
pub struct ExitReceipt {
    /// The closed ticket, with exit time and price
    pub ticket: Ticket,
    pub discounted: bool,
    /// Whether the spot store accepted the spot release
    pub spot_released: bool,
}

impl ExitReceipt {
    pub fn price(&self) -> Decimal {
        self.ticket.price
    }
}

/// Result of a vehicle exit
#[derive(Debug, Clone, PartialEq)]
pub enum ExitOutcome {
    /// Ticket closed and persisted
    Closed(ExitReceipt),
    /// The ticket store refused the update; the spot was left untouched
    UpdateRejected(Ticket),
    /// Exit aborted before the ticket was closed
    Failed(ParkingError),
}

/// Parking service
///
/// Owns its collaborators behind `Arc` so the console and tests can keep
/// handles to the same stores.
pub struct ParkingService<I: InputSource, S: SpotAllocator, T: TicketStore> {
    input: Arc<I>,
    spots: Arc<S>,
    tickets: Arc<T>,
    clock: Arc<dyn Clock>,
    fare: FareCalculator,
}

impl<I: InputSource, S: SpotAllocator, T: TicketStore> ParkingService<I, S, T> {
    /// Create a new parking service using the system clock
    pub fn new(input: Arc<I>, spots: Arc<S>, tickets: Arc<T>) -> Self {
        Self::with_clock(input, spots, tickets, Arc::new(SystemClock))
    }

    /// Create a new parking service with an explicit clock
    pub fn with_clock(
        input: Arc<I>,
        spots: Arc<S>,
        tickets: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            input,
            spots,
            tickets,
            clock,
            fare: FareCalculator::new(),
        }
    }

    /// Process a vehicle entering the lot
    ///
    /// Never fails: every error is logged and reported through the outcome.
    #[instrument(skip(self))]
    pub async fn process_entry(&self) -> EntryOutcome {
        let spot = match self.allocate_spot().await {
            Ok(spot) => spot,
            Err(e) => {
                error!(
                    error_code = e.error_code(),
                    "No parking spot allocated: {}", e
                );
                return EntryOutcome::NoSpotAllocated(e);
            }
        };

        let vehicle_reg_number = match self.input.read_registration().await {
            Ok(reg) => reg,
            Err(e) => return self.entry_failed(e, None),
        };

        let reserved = spot.occupied();
        match self.spots.update_parking(&reserved).await {
            Ok(true) => debug!("Reserved spot {}", reserved.id),
            Ok(false) => {
                let e = ParkingError::StoreRejected(format!("reservation of spot {}", reserved.id));
                return self.entry_failed(e, None);
            }
            Err(e) => return self.entry_failed(e, None),
        }

        match self.issue_ticket(&reserved, vehicle_reg_number).await {
            Ok(receipt) => EntryOutcome::Admitted(receipt),
            Err(e) => {
                let orphaned_spot = if self.release_spot(&reserved).await {
                    warn!("Released spot {} after failed ticket creation", reserved.id);
                    None
                } else {
                    Some(reserved.id)
                };
                self.entry_failed(e, orphaned_spot)
            }
        }
    }

    /// Choose a free spot for the vehicle category picked by the operator
    ///
    /// The returned spot is still available; nothing is reserved yet.
    ///
    /// # Errors
    ///
    /// - `InvalidCategorySelection` if the operator picked an unknown entry
    /// - `NoSpotAvailable` if the category is full
    /// - any allocator failure
    #[instrument(skip(self))]
    pub async fn allocate_spot(&self) -> ParkingResult<ParkingSpot> {
        let selection = self.input.read_category_selection().await?;
        let category = VehicleCategory::from_selection(selection)?;

        let parking_number = self.spots.next_available_slot(category).await?;
        if parking_number <= 0 {
            return Err(ParkingError::NoSpotAvailable(category));
        }

        Ok(ParkingSpot::new(parking_number, category, true))
    }

    /// Free spot for the selected vehicle category, if any
    pub async fn next_parking_spot_if_available(&self) -> Option<ParkingSpot> {
        match self.allocate_spot().await {
            Ok(spot) => Some(spot),
            Err(e) => {
                warn!(error_code = e.error_code(), "No parking spot: {}", e);
                None
            }
        }
    }

    async fn issue_ticket(
        &self,
        reserved: &ParkingSpot,
        vehicle_reg_number: String,
    ) -> ParkingResult<EntryReceipt> {
        let returning_customer =
            has_prior_visit(self.tickets.ticket_count_for(&vehicle_reg_number).await?);

        let in_time = self.clock.now();
        let ticket = Ticket::open(reserved.clone(), vehicle_reg_number, in_time);

        if !self.tickets.save_ticket(&ticket).await? {
            return Err(ParkingError::StoreRejected(format!(
                "ticket for vehicle {}",
                ticket.vehicle_reg_number
            )));
        }

        if returning_customer {
            info!("Welcome back! As a regular user you will get a 5% discount.");
        } else {
            info!("Welcome!");
        }
        info!("Generated ticket and saved it");
        info!("Please park your vehicle in spot number: {}", reserved.id);
        info!(
            "Recorded in-time for vehicle number {} is: {}",
            ticket.vehicle_reg_number, in_time
        );

        Ok(EntryReceipt {
            parking_spot: reserved.clone(),
            vehicle_reg_number: ticket.vehicle_reg_number,
            in_time,
            returning_customer,
        })
    }

    fn entry_failed(&self, error: ParkingError, orphaned_spot: Option<i32>) -> EntryOutcome {
        error!(
            error_code = error.error_code(),
            orphaned_spot = ?orphaned_spot,
            "Unable to process incoming vehicle: {}", error
        );
        EntryOutcome::Failed {
            error,
            orphaned_spot,
        }
    }

    /// Process a vehicle leaving the lot
    ///
    /// Never fails: every error is logged and reported through the outcome.
    #[instrument(skip(self))]
    pub async fn process_exit(&self) -> ExitOutcome {
        match self.close_ticket().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    error_code = e.error_code(),
                    "Unable to process exiting vehicle: {}", e
                );
                ExitOutcome::Failed(e)
            }
        }
    }

    async fn close_ticket(&self) -> ParkingResult<ExitOutcome> {
        let vehicle_reg_number = self.input.read_registration().await?;

        let discounted =
            is_discount_eligible(self.tickets.ticket_count_for(&vehicle_reg_number).await?);

        let mut ticket = self
            .tickets
            .open_ticket_for(&vehicle_reg_number)
            .await?
            .ok_or_else(|| ParkingError::NoOpenTicket(vehicle_reg_number.clone()))?;

        let out_time = self.clock.now();
        ticket.out_time = Some(out_time);
        ticket.price = self.fare.fare_for_ticket(&ticket, discounted)?;

        if !self.tickets.update_ticket(&ticket).await? {
            error!(
                "Unable to update ticket {} for vehicle {}",
                ticket.id, vehicle_reg_number
            );
            return Ok(ExitOutcome::UpdateRejected(ticket));
        }

        let spot_released = self.release_spot(&ticket.parking_spot).await;

        info!("Please pay the parking fare: {:.2}", ticket.price);
        info!(
            "Recorded out-time for vehicle number {} is: {}",
            vehicle_reg_number, out_time
        );

        Ok(ExitOutcome::Closed(ExitReceipt {
            ticket,
            discounted,
            spot_released,
        }))
    }

    /// Mark a spot available again, reporting whether the store accepted it
    async fn release_spot(&self, spot: &ParkingSpot) -> bool {
        match self.spots.update_parking(&spot.released()).await {
            Ok(true) => true,
            Ok(false) => {
                error!("Spot store rejected release of spot {}", spot.id);
                false
            }
            Err(e) => {
                error!(
                    error_code = e.error_code(),
                    "Failed to release spot {}: {}", spot.id, e
                );
                false
            }
        }
    }
}
