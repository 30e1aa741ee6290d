//! Shared-secret check.
//!
//! Every door route takes [`Authorized`] as its first extractor, so the
//! secret is checked before the path is resolved. A wrong secret is a 403
//! whether or not the door exists.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use latchkey_core::constants::SECRET_PARAM;
use tracing::warn;

/// Proof that the request carried the configured secret.
#[derive(Debug, Clone, Copy)]
pub struct Authorized;

impl FromRequestParts<AppState> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A missing or unparsable query counts as an empty secret. When the
        // parameter repeats, the first value is checked.
        let candidate = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(pairs)| {
                pairs
                    .into_iter()
                    .find_map(|(name, value)| (name == SECRET_PARAM).then_some(value))
            })
            .unwrap_or_default();

        if state.secret().matches(&candidate) {
            Ok(Self)
        } else {
            warn!(path = %parts.uri.path(), param = SECRET_PARAM, "rejected request with bad secret");
            Err(ApiError::BadSecret)
        }
    }
}
