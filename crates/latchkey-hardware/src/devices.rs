//! Enum wrapper for interface kit dispatch.
//!
//! Native `async fn` in traits (RPITIT, Rust Edition 2024) are not
//! object-safe, so `Box<dyn InterfaceKitDevice>` is not available. The
//! engine instead holds an [`AnyInterfaceKit`] and dispatches on the
//! concrete variant.
//!
//! This approach provides:
//! - Zero-cost abstraction (monomorphization at compile-time)
//! - `Send` futures at every call site, so doors can pulse from spawned tasks
//! - Room for a vendor driver as another variant
//!
//! # Examples
//!
//! ```
//! use latchkey_hardware::devices::AnyInterfaceKit;
//! use latchkey_hardware::mock::MockInterfaceKit;
//!
//! let (kit, _handle) = MockInterfaceKit::new();
//! let any_kit = AnyInterfaceKit::Mock(kit);
//! ```

use crate::mock::MockInterfaceKit;
use crate::traits::InterfaceKitDevice;
use crate::{Connector, DeviceInfo, Result};

/// Enum wrapper for interface kit dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyInterfaceKit {
    /// Mock interface kit for development and testing.
    Mock(MockInterfaceKit),
}

impl InterfaceKitDevice for AnyInterfaceKit {
    async fn open(&mut self, connector: &Connector) -> Result<()> {
        match self {
            Self::Mock(device) => device.open(connector).await,
        }
    }

    async fn wait_for_attachment(&self) -> Result<()> {
        match self {
            Self::Mock(device) => device.wait_for_attachment().await,
        }
    }

    fn is_attached(&self) -> bool {
        match self {
            Self::Mock(device) => device.is_attached(),
        }
    }

    fn input_count(&self) -> usize {
        match self {
            Self::Mock(device) => device.input_count(),
        }
    }

    fn output_count(&self) -> usize {
        match self {
            Self::Mock(device) => device.output_count(),
        }
    }

    async fn input_state(&self, index: usize) -> Result<bool> {
        match self {
            Self::Mock(device) => device.input_state(index).await,
        }
    }

    async fn output_state(&self, index: usize) -> Result<bool> {
        match self {
            Self::Mock(device) => device.output_state(index).await,
        }
    }

    async fn set_output_state(&self, index: usize, state: bool) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_output_state(index, state).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}
