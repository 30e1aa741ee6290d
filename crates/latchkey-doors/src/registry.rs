//! The full board and door topology.
//!
//! The registry is built once from a validated [`Config`], attached once
//! at startup, and then shared read-only with the control surface.
//!
//! ```text
//! Registry
//! ├── Board #1 ──► front, back
//! └── Board #2 ──► garage
//! ```
//!
//! Lookups scan the doors in that order: boards as configured, then the
//! doors of each board as configured.

use crate::board::Board;
use crate::door::Door;
use crate::error::Result;
use crate::status::DoorStatus;
use latchkey_core::{Config, Secret};
use latchkey_hardware::DeviceFactory;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Every board and door known to the server.
#[derive(Debug)]
pub struct Registry {
    boards: Vec<Board>,
    secret: Secret,
}

impl Registry {
    /// Build the topology from a configuration, without attaching anything.
    ///
    /// # Errors
    /// Returns `DoorError::Config` if the configuration fails
    /// [`Config::validate`].
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let read_timeout = Duration::from_millis(config.feedback_timeout);
        let boards = config
            .interface_kits
            .iter()
            .enumerate()
            .map(|(index, board)| Board::from_config(index + 1, board, read_timeout))
            .collect();

        Ok(Self {
            boards,
            secret: config.secret.clone(),
        })
    }

    /// Attach every board in configuration order.
    ///
    /// Stops at the first board that fails; its error names the board's
    /// 1-based position.
    ///
    /// # Errors
    /// Any error of [`Board::load`].
    pub async fn load<F>(&self, factory: &F) -> Result<()>
    where
        F: DeviceFactory + ?Sized,
    {
        for board in &self.boards {
            board.load(factory).await?;
        }

        info!(
            boards = self.boards.len(),
            doors = self.doors().count(),
            "all interface kits attached"
        );
        Ok(())
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// All doors, flattened in lookup order.
    pub fn doors(&self) -> impl Iterator<Item = &Arc<Door>> {
        self.boards.iter().flat_map(|board| board.doors().iter())
    }

    /// Find a door by its exact identifier.
    pub fn find_by_identifier(&self, id: &str) -> Option<&Arc<Door>> {
        self.doors().find(|door| door.id() == id)
    }

    /// Find the first door whose display name is exactly `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Door>> {
        self.doors().find(|door| door.name() == Some(name))
    }

    /// Shared secret expected by the control surface.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }

    /// Status of every door, in lookup order.
    pub async fn statuses(&self) -> Vec<DoorStatus> {
        futures::future::join_all(self.doors().map(|door| door.status())).await
    }
}
