//! Mock device implementations for testing and development.
//!
//! This module provides a simulated interface kit and a factory producing
//! them, so the door engine and the HTTP surface can run without physical
//! hardware.

pub mod factory;
pub mod interface_kit;

// Re-export commonly used types
pub use factory::MockDeviceFactory;
pub use interface_kit::{
    AttachBehavior, DEFAULT_MOCK_CHANNELS, MockInterfaceKit, MockInterfaceKitBuilder,
    MockInterfaceKitHandle, OutputWrite,
};
