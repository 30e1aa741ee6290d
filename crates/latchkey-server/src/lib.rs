//! HTTP control surface for the door engine.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/` | liveness, `{"hi": true}` |
//! | GET | `/doors` | status of every door |
//! | GET | `/doors/{id}` | status of one door |
//! | POST | `/doors/{id}/open`, `/doors/{id}/unlock` | unlock pulse |
//! | POST | `/doors/{id}/mag/engage` | engage the magnet |
//! | POST | `/doors/{id}/mag/disengage` | release the magnet |
//!
//! Every `/doors` route requires `?secret=` to match the configured
//! secret. Actuation results come back as HTTP 200 with
//! `{"success": bool, "error"?: string}`; precondition failures use
//! 403, 404 and 422 with `{"error": string}`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use auth::Authorized;
pub use error::ApiError;
pub use handlers::Envelope;
pub use router::router;
pub use server::Server;
pub use state::AppState;
