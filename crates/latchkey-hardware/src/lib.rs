//! Hardware abstraction layer for the Latchkey door control server.
//!
//! This crate models the digital I/O interface boards ("interface kits")
//! that electric strikes and magnetic locks are wired to. The door engine
//! only needs a narrow capability from a board: open it, wait for it to
//! attach, and read or write boolean channels by index. That capability is
//! the [`InterfaceKitDevice`] trait.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Shared**: Channel operations take `&self`; one attached board is shared
//!   by every door wired to it.
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Locating a Board
//!
//! A [`Connector`] describes where a board lives: attached locally (any
//! board, or one selected by serial number or label) or behind a remote
//! host. Boards are created by a [`DeviceFactory`] and opened against
//! their connector:
//!
//! ```
//! use latchkey_hardware::mock::MockDeviceFactory;
//! use latchkey_hardware::{Connector, DeviceFactory, InterfaceKitDevice};
//!
//! #[tokio::main]
//! async fn main() -> latchkey_hardware::Result<()> {
//!     let factory = MockDeviceFactory::new();
//!     let mut kit = factory.create()?;
//!
//!     kit.open(&Connector::Serial(31337)).await?;
//!     kit.wait_for_attachment().await?;
//!
//!     kit.set_output_state(0, true).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides a simulated interface kit that records a
//! timestamped trace of every output write, and a factory that produces
//! them. No vendor driver is bundled; [`UnavailableDeviceFactory`] stands in
//! for one and refuses to create boards.

pub mod connector;
pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;
pub mod unavailable;

// Re-export commonly used types for convenience
pub use connector::Connector;
pub use devices::AnyInterfaceKit;
pub use error::{HardwareError, Result};
pub use traits::{DeviceFactory, InterfaceKitDevice};
pub use types::{ChannelKind, DeviceInfo};
pub use unavailable::UnavailableDeviceFactory;
