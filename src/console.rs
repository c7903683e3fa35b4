//! Terminal operator input
//!
//! Prompts on the writer and reads one answer per line from the reader.

use async_trait::async_trait;
use parkit_core::{models::VehicleCategory, traits::InputSource, ParkingError, ParkingResult};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::Mutex;
use tracing::debug;

const MAIN_MENU: &str = "What would you like to do?\n\
                         1. New Vehicle Entering Parking Lot\n\
                         2. Vehicle Exiting Parking Lot\n\
                         3. Shutdown System\n";

const REGISTRATION_PROMPT: &str =
    "Please type the vehicle registration number and press enter key\n";

/// Selection value for an answer that is not a number
const UNPARSABLE_SELECTION: i32 = -1;

/// Line-based console input
pub struct ConsoleInput<R, W> {
    lines: Mutex<Lines<R>>,
    out: Mutex<W>,
}

impl<R, W> ConsoleInput<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            out: Mutex::new(writer),
        }
    }

    /// Main menu choice, `None` once the input is closed
    pub async fn read_menu_option(&self) -> ParkingResult<Option<i32>> {
        self.prompt(MAIN_MENU).await?;
        Ok(self.next_line().await?.map(|line| parse_selection(&line)))
    }

    async fn prompt(&self, text: &str) -> ParkingResult<()> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }

    async fn next_line(&self) -> ParkingResult<Option<String>> {
        Ok(self.lines.lock().await.next_line().await?)
    }
}

#[async_trait]
impl<R, W> InputSource for ConsoleInput<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_category_selection(&self) -> ParkingResult<i32> {
        self.prompt(&vehicle_menu()).await?;

        let line = self
            .next_line()
            .await?
            .ok_or_else(|| ParkingError::InvalidInput("input closed".to_string()))?;

        Ok(parse_selection(&line))
    }

    async fn read_registration(&self) -> ParkingResult<String> {
        self.prompt(REGISTRATION_PROMPT).await?;

        let line = self
            .next_line()
            .await?
            .ok_or_else(|| ParkingError::InvalidInput("input closed".to_string()))?;

        let reg = line.trim();
        if reg.is_empty() {
            return Err(ParkingError::InvalidInput(
                "empty vehicle registration number".to_string(),
            ));
        }

        Ok(reg.to_string())
    }
}

fn vehicle_menu() -> String {
    VehicleCategory::ALL.iter().fold(
        String::from("Please select vehicle type from menu\n"),
        |mut menu, category| {
            menu.push_str(&format!("{}. {}\n", category.selection(), category));
            menu
        },
    )
}

fn parse_selection(line: &str) -> i32 {
    line.trim().parse().unwrap_or_else(|_| {
        debug!("Unparsable selection: {:?}", line);
        UNPARSABLE_SELECTION
    })
}
