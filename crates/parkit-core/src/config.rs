//! Lot and logging settings
//!
//! `lot` sizes the parking lot (car spots first, then bike spots) and `logging`
//! picks the default level and output format. Values are layered: built-in
//! defaults, `config/default`, `config/{RUN_MODE}`, then `PARKIT__SECTION__KEY`
//! variables.

use crate::error::ParkingError;
use crate::models::{ParkingSpot, VehicleCategory};
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use tracing::debug;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub lot: LotConfig,
    pub logging: LoggingConfig,
}

/// Parking lot layout
#[derive(Debug, Deserialize, Clone)]
pub struct LotConfig {
    /// Number of car spots (numbered first, starting at 1)
    #[serde(default = "default_car_spots")]
    pub car_spots: u32,

    /// Number of bike spots (numbered after the car spots)
    #[serde(default = "default_bike_spots")]
    pub bike_spots: u32,
}

fn default_car_spots() -> u32 {
    3
}

fn default_bike_spots() -> u32 {
    2
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LotConfig {
    /// Total number of spots in the lot
    pub fn total_spots(&self) -> u32 {
        self.car_spots.saturating_add(self.bike_spots)
    }

    /// Build the initial spot list, all available
    pub fn spots(&self) -> Vec<ParkingSpot> {
        let cars = (1..=self.car_spots).map(|n| (n, VehicleCategory::Car));
        let bikes = (1..=self.bike_spots).map(|n| (self.car_spots + n, VehicleCategory::Bike));

        cars.chain(bikes)
            .map(|(n, category)| ParkingSpot::new(n as i32, category, true))
            .collect()
    }
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            car_spots: default_car_spots(),
            bike_spots: default_bike_spots(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config files
    pub fn load() -> Result<Self, ParkingError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Self::with_defaults()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with PARKIT_ prefix
            .add_source(
                Environment::with_prefix("PARKIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;

        debug!(
            "Loaded {} configuration: {} car spots, {} bike spots",
            run_mode, app.lot.car_spots, app.lot.bike_spots
        );

        Ok(app)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ParkingError> {
        let config = Self::with_defaults()?
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("PARKIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("lot.car_spots", 3)?
            .set_default("lot.bike_spots", 2)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)
    }

    /// Reject layouts the lot cannot operate with
    pub fn validate(&self) -> Result<(), ParkingError> {
        if self.lot.total_spots() == 0 {
            return Err(ParkingError::Config(
                "lot must have at least one spot".to_string(),
            ));
        }
        if i32::try_from(self.lot.total_spots()).is_err() {
            return Err(ParkingError::Config(format!(
                "lot size {} exceeds spot numbering range",
                self.lot.total_spots()
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lot: LotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
