//! Factory used when no interface kit driver is compiled in.

use crate::{HardwareError, Result, devices::AnyInterfaceKit, traits::DeviceFactory};

/// [`DeviceFactory`] that refuses to create boards.
///
/// Loading any board through it fails, so a server configured with boards
/// never starts without real hardware behind them.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableDeviceFactory;

impl DeviceFactory for UnavailableDeviceFactory {
    fn create(&self) -> Result<AnyInterfaceKit> {
        Err(HardwareError::unsupported("no interface kit driver available"))
    }
}
