//! Factory producing mock interface kits.

use super::interface_kit::{
    AttachBehavior, DEFAULT_MOCK_CHANNELS, MockInterfaceKit, MockInterfaceKitHandle,
};
use crate::{HardwareError, Result, devices::AnyInterfaceKit, traits::DeviceFactory};
use parking_lot::Mutex;

/// [`DeviceFactory`] handing out mock boards.
///
/// Every board it creates shares the same attach behavior and channel
/// counts. The factory keeps a handle to each board, in creation order,
/// so a test can inspect the board behind the n-th configured entry.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockDeviceFactory;
/// use latchkey_hardware::traits::DeviceFactory;
///
/// let factory = MockDeviceFactory::new();
/// let _first = factory.create().unwrap();
/// let _second = factory.create().unwrap();
///
/// assert_eq!(factory.handles().len(), 2);
/// assert_eq!(factory.handle(1).unwrap().name(), "Mock InterfaceKit #2");
/// ```
#[derive(Debug)]
pub struct MockDeviceFactory {
    behavior: AttachBehavior,
    input_count: usize,
    output_count: usize,
    create_failure: Option<String>,
    created: Mutex<Vec<MockInterfaceKitHandle>>,
}

impl Default for MockDeviceFactory {
    fn default() -> Self {
        Self {
            behavior: AttachBehavior::default(),
            input_count: DEFAULT_MOCK_CHANNELS,
            output_count: DEFAULT_MOCK_CHANNELS,
            create_failure: None,
            created: Mutex::new(Vec::new()),
        }
    }
}

impl MockDeviceFactory {
    /// Factory for 8/8 boards that attach immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how created boards react to being opened.
    pub fn with_behavior(mut self, behavior: AttachBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set the channel counts of created boards.
    pub fn with_channels(mut self, input_count: usize, output_count: usize) -> Self {
        self.input_count = input_count;
        self.output_count = output_count;
        self
    }

    /// Factory whose `create` always fails, like a missing driver.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            create_failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Handles of every board created so far.
    pub fn handles(&self) -> Vec<MockInterfaceKitHandle> {
        self.created.lock().clone()
    }

    /// Handle of the board created at `index` (0-based).
    pub fn handle(&self, index: usize) -> Option<MockInterfaceKitHandle> {
        self.created.lock().get(index).cloned()
    }
}

impl DeviceFactory for MockDeviceFactory {
    fn create(&self) -> Result<AnyInterfaceKit> {
        if let Some(message) = &self.create_failure {
            return Err(HardwareError::other(message.clone()));
        }

        let mut created = self.created.lock();
        let number = created.len() + 1;

        let (kit, handle) = MockInterfaceKit::builder()
            .name(format!("Mock InterfaceKit #{number}"))
            .serial_number(i32::try_from(number).unwrap_or(i32::MAX))
            .channels(self.input_count, self.output_count)
            .attach(self.behavior.clone())
            .build();

        created.push(handle);
        Ok(AnyInterfaceKit::Mock(kit))
    }
}
