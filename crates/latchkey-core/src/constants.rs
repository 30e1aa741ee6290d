//! Core constants for the Latchkey door control server.
//!
//! This module centralizes the default values used when a configuration
//! file leaves a setting out. Boards, doors and the HTTP surface all read
//! their fallbacks from here so the defaults stay consistent between the
//! engine, the server and the command line.
//!
//! # Usage
//!
//! ```
//! use latchkey_core::constants::*;
//! use std::time::Duration;
//!
//! let pulse = Duration::from_millis(DEFAULT_LOCK_PULSE_MS);
//! assert_eq!(pulse, Duration::from_millis(200));
//!
//! assert_eq!(DEFAULT_REMOTE_PORT, 5001);
//! ```

// ============================================================================
// Board Attachment
// ============================================================================

/// Time to wait for an interface kit to report attached (milliseconds).
///
/// Used when a board entry has no `AttachmentTimeout`. A board that does
/// not attach within this window aborts startup.
pub const DEFAULT_ATTACHMENT_TIMEOUT_MS: u64 = 2000;

/// Port of the remote interface kit web service.
///
/// Used for remote connectors when a board entry has a `Host` but no `Port`.
pub const DEFAULT_REMOTE_PORT: u16 = 5001;

// ============================================================================
// Door Actuation
// ============================================================================

/// Dwell time of an unlock pulse (milliseconds).
///
/// An electric strike is held released for this long before the lock
/// channel is written back to `false`. Boards may override it with
/// `LockDelay`.
pub const DEFAULT_LOCK_PULSE_MS: u64 = 200;

/// Upper bound on a single status read (milliseconds).
///
/// A feedback or output read that does not complete in time is reported
/// as the `"error"` status.
pub const DEFAULT_FEEDBACK_TIMEOUT_MS: u64 = 2000;

// ============================================================================
// Control Surface
// ============================================================================

/// Default TCP port of the HTTP control surface.
pub const DEFAULT_LISTEN_PORT: u16 = 4567;

/// Default path of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Query-string parameter carrying the shared secret.
pub const SECRET_PARAM: &str = "secret";

/// Placeholder written in place of secrets when a configuration is displayed.
pub const REDACTED: &str = "********";
