//! ParkIt console
//!
//! Runs a parking lot from the terminal. Vehicles enter and leave through a
//! numbered menu; spots and tickets are kept in memory for the lifetime of the
//! process.

mod console;

use anyhow::Context;
use console::ConsoleInput;
use parkit_core::{config::LoggingConfig, AppConfig};
use parkit_services::{EntryOutcome, ExitOutcome, ParkingService};
use parkit_store::{InMemorySpotRepository, InMemoryTicketRepository};
use std::sync::Arc;
use tokio::io::{self, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MENU_ENTRY: i32 = 1;
const MENU_EXIT: i32 = 2;
const MENU_SHUTDOWN: i32 = 3;

/// Initialize tracing subscriber
fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parkit={level},parkit_services={level},parkit_store={level},parkit_core={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if logging.json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_line_number(false))
            .init();
    }
}

fn report_entry(outcome: EntryOutcome) {
    match outcome {
        EntryOutcome::Admitted(receipt) => info!(
            spot = receipt.parking_spot.id,
            vehicle = %receipt.vehicle_reg_number,
            returning = receipt.returning_customer,
            "Vehicle admitted"
        ),
        EntryOutcome::NoSpotAllocated(e) => warn!("Vehicle turned away: {}", e),
        EntryOutcome::Failed {
            error,
            orphaned_spot: Some(spot),
        } => error!(
            spot,
            "Entry failed and spot is still marked taken: {}", error
        ),
        EntryOutcome::Failed { error, .. } if error.is_storage_failure() => {
            error!(error_code = error.error_code(), "Entry failed in storage: {}", error)
        }
        EntryOutcome::Failed { error, .. } => warn!("Entry failed: {}", error),
    }
}

fn report_exit(outcome: ExitOutcome) {
    match outcome {
        ExitOutcome::Closed(receipt) => {
            if !receipt.spot_released {
                error!(
                    spot = receipt.ticket.parking_spot.id,
                    "Ticket closed but the spot could not be released"
                );
            }
            info!(
                ticket = receipt.ticket.id,
                price = %receipt.price(),
                discounted = receipt.discounted,
                "Vehicle left"
            );
        }
        ExitOutcome::UpdateRejected(ticket) => warn!(
            ticket = ticket.id,
            "Ticket update was rejected; vehicle {} is still parked", ticket.vehicle_reg_number
        ),
        ExitOutcome::Failed(e) if e.is_storage_failure() => {
            error!(error_code = e.error_code(), "Exit failed in storage: {}", e)
        }
        ExitOutcome::Failed(e) => warn!("Exit failed: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    info!("Starting ParkIt v{}", env!("CARGO_PKG_VERSION"));

    let spots = Arc::new(InMemorySpotRepository::from_lot(&config.lot));
    let tickets = Arc::new(InMemoryTicketRepository::new());
    let console = Arc::new(ConsoleInput::new(BufReader::new(io::stdin()), io::stdout()));

    info!(
        "Parking lot ready with {} car spots and {} bike spots",
        config.lot.car_spots, config.lot.bike_spots
    );

    let service = ParkingService::new(console.clone(), spots, tickets);

    loop {
        let option = match console.read_menu_option().await? {
            Some(option) => option,
            None => {
                info!("Input closed, shutting down");
                break;
            }
        };

        match option {
            MENU_ENTRY => report_entry(service.process_entry().await),
            MENU_EXIT => report_exit(service.process_exit().await),
            MENU_SHUTDOWN => {
                info!("Shutting down");
                break;
            }
            _ => warn!("Unsupported option. Please enter a number corresponding to the provided menu"),
        }
    }

    Ok(())
}
