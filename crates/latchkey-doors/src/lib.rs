//! Door actuation engine.
//!
//! Turns a declarative board and door topology into controllable doors:
//!
//! - [`Board`] resolves how to reach an interface kit, attaches it within a
//!   timeout and binds its doors to the live handle.
//! - [`Door`] reads lock and mag status (feedback input first, output level
//!   as a fallback) and actuates the strike and the magnet.
//! - [`Registry`] holds every board and answers door lookups.
//!
//! # Example
//!
//! ```
//! use latchkey_core::Config;
//! use latchkey_doors::{LockStatus, Registry};
//! use latchkey_hardware::mock::MockDeviceFactory;
//!
//! #[tokio::main]
//! async fn main() -> latchkey_doors::Result<()> {
//!     let config: Config = serde_json::from_str(
//!         r#"{ "InterfaceKits": [ { "Doors": [ { "ID": "front", "Lock": 3 } ] } ] }"#,
//!     )
//!     .unwrap();
//!
//!     let registry = Registry::from_config(&config)?;
//!     registry.load(&MockDeviceFactory::new()).await?;
//!
//!     let front = registry.find_by_identifier("front").unwrap();
//!     front.unlock_and_wait().await?;
//!     assert_eq!(front.lock_status().await, LockStatus::Locked);
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod door;
pub mod error;
pub mod registry;
pub mod status;

pub use board::{Board, resolve_connector};
pub use door::Door;
pub use error::{DoorError, Result};
pub use registry::Registry;
pub use status::{DoorStatus, LockStatus, MagStatus};
