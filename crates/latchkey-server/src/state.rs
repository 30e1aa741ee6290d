//! Shared state handed to every handler.

use crate::error::ApiError;
use latchkey_doors::{Door, Registry};
use std::ops::Deref;
use std::sync::Arc;

/// Cheap to clone; every clone shares one registry.
#[derive(Debug, Clone)]
pub struct AppState {
    registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Resolve a path identifier to a door.
    ///
    /// # Errors
    /// `ApiError::DoorNotFound` if no door has this exact identifier.
    pub fn door(&self, id: &str) -> Result<Arc<Door>, ApiError> {
        self.registry
            .find_by_identifier(id)
            .cloned()
            .ok_or(ApiError::DoorNotFound)
    }
}

impl Deref for AppState {
    type Target = Registry;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}
