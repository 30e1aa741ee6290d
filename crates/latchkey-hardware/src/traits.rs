//! Interface kit trait definitions.
//!
//! This module defines the capability the door engine needs from a digital
//! I/O board: open it against a [`Connector`], wait for it to attach, then
//! read and write boolean channels by index. Everything about the bus or
//! vendor library behind a board stays on the other side of this trait.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::connector::Connector;
use crate::devices::AnyInterfaceKit;
use crate::error::Result;
use crate::types::DeviceInfo;

/// Digital I/O board abstraction.
///
/// A board is created detached, opened against a connector, and becomes
/// usable once it reports attached. Channel operations take `&self` so a
/// single attached board can be shared between doors behind an `Arc`.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic parameters, or the enum wrapper
/// [`AnyInterfaceKit`] for concrete dispatch:
///
/// ```
/// use latchkey_hardware::devices::AnyInterfaceKit;
/// use latchkey_hardware::traits::InterfaceKitDevice;
/// use latchkey_hardware::mock::MockInterfaceKit;
/// use latchkey_hardware::Connector;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (kit, _handle) = MockInterfaceKit::new();
///     let mut kit = AnyInterfaceKit::Mock(kit);
///
///     kit.open(&Connector::Any).await?;
///     kit.wait_for_attachment().await?;
///
///     kit.set_output_state(3, true).await?;
///     assert!(kit.output_state(3).await?);
///     Ok(())
/// }
/// ```
pub trait InterfaceKitDevice: Send + Sync {
    /// Open the board against a connector.
    ///
    /// Opening starts attachment; it does not wait for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector cannot be used, e.g. the remote
    /// host refuses the connection or the password is wrong.
    async fn open(&mut self, connector: &Connector) -> Result<()>;

    /// Resolve once the board reports attached.
    ///
    /// This may never resolve if the board never shows up; callers bound
    /// it with a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is closed while waiting.
    async fn wait_for_attachment(&self) -> Result<()>;

    /// Check if the board is currently attached.
    fn is_attached(&self) -> bool;

    /// Number of digital inputs.
    fn input_count(&self) -> usize;

    /// Number of digital outputs.
    fn output_count(&self) -> usize;

    /// Read a digital input.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The board is not attached
    /// - The index is out of range
    /// - The read fails
    async fn input_state(&self, index: usize) -> Result<bool>;

    /// Read the last state written to a digital output.
    ///
    /// # Errors
    ///
    /// Same as [`InterfaceKitDevice::input_state`].
    async fn output_state(&self, index: usize) -> Result<bool>;

    /// Drive a digital output.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The board is not attached
    /// - The index is out of range
    /// - The write fails
    async fn set_output_state(&self, index: usize, state: bool) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is not attached.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Creates fresh, unopened interface kits.
///
/// Each board in the configuration asks the factory for its own instance
/// before opening it.
pub trait DeviceFactory: Send + Sync {
    /// Create a new detached board.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying driver cannot allocate a device.
    fn create(&self) -> Result<AnyInterfaceKit>;
}
