//! Route handlers.
//!
//! Each handler resolves one door and runs one engine operation on it.

use crate::auth::Authorized;
use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use latchkey_core::Capability;
use latchkey_doors::{DoorError, DoorStatus};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

/// Outcome of an actuation: `{"success": true}` or
/// `{"success": false, "error": "..."}`, always with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Map an engine result onto the response contract.
///
/// An unsupported operation is a precondition failure (422); anything
/// else is reported in-band.
fn outcome(door: &str, result: Result<(), DoorError>) -> Result<Json<Envelope>, ApiError> {
    match result {
        Ok(()) => Ok(Json(Envelope::ok())),
        Err(DoorError::UnsupportedOperation { capability, .. }) => {
            Err(ApiError::Unsupported(capability))
        }
        Err(e) => {
            warn!(door, error = %e, "door operation failed");
            Ok(Json(Envelope::failed(e)))
        }
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({ "hi": true }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn list_doors(_: Authorized, State(state): State<AppState>) -> Json<Vec<DoorStatus>> {
    Json(state.statuses().await)
}

pub async fn show_door(
    _: Authorized,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DoorStatus>, ApiError> {
    let door = state.door(&id)?;
    Ok(Json(door.status().await))
}

pub async fn unlock(
    _: Authorized,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let door = state.door(&id)?;
    if !door.supports_lock() {
        return Err(ApiError::Unsupported(Capability::Lock));
    }

    outcome(door.id(), door.unlock_and_wait().await)
}

pub async fn mag_engage(
    _: Authorized,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let door = state.door(&id)?;
    if !door.supports_mag() {
        return Err(ApiError::Unsupported(Capability::Mag));
    }

    outcome(door.id(), door.mag_engage().await)
}

pub async fn mag_disengage(
    _: Authorized,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let door = state.door(&id)?;
    if !door.supports_mag() {
        return Err(ApiError::Unsupported(Capability::Mag));
    }

    outcome(door.id(), door.mag_disengage().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_json() {
        assert_eq!(
            serde_json::to_value(Envelope::ok()).unwrap(),
            json!({ "success": true })
        );
        assert_eq!(
            serde_json::to_value(Envelope::failed("relay stuck")).unwrap(),
            json!({ "success": false, "error": "relay stuck" })
        );
    }

    #[test]
    fn test_outcome_mapping() {
        let unsupported = DoorError::UnsupportedOperation {
            door: "front".to_string(),
            capability: Capability::Mag,
        };
        assert_eq!(
            outcome("front", Err(unsupported)).unwrap_err(),
            ApiError::Unsupported(Capability::Mag)
        );

        let Json(envelope) = outcome("front", Err(DoorError::NotBound("front".to_string()))).unwrap();
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("not bound"));
    }
}
