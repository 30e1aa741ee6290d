//! Mock interface kit implementation for testing and development.
//!
//! This module provides a simulated digital I/O board that keeps its
//! channel states in memory and records every output write with a
//! timestamp, so tests can check the exact pulse trace a door produced.

use crate::{
    Connector, HardwareError, Result,
    traits::InterfaceKitDevice,
    types::{ChannelKind, DeviceInfo},
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Channel count of the simulated board on each side (8 in / 8 out).
pub const DEFAULT_MOCK_CHANNELS: usize = 8;

/// How a mock board reacts to being opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttachBehavior {
    /// Attached as soon as it is opened.
    #[default]
    Immediate,

    /// Attached after the given delay.
    Delayed(Duration),

    /// Opens fine but never attaches.
    Never,

    /// Opening fails with this message.
    FailOpen(String),
}

/// One recorded write to an output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputWrite {
    /// Output index.
    pub channel: usize,

    /// Value written.
    pub state: bool,

    /// When the write was applied.
    pub at: Instant,
}

#[derive(Debug)]
struct Shared {
    name: String,
    serial_number: i32,
    input_count: usize,
    output_count: usize,
    inputs: Mutex<Vec<bool>>,
    outputs: Mutex<Vec<bool>>,
    writes: Mutex<Vec<OutputWrite>>,
    read_failures: Mutex<HashSet<(ChannelKind, usize)>>,
    // `None` fails every write, `Some(v)` only writes of `v`.
    write_failures: Mutex<HashMap<usize, Option<bool>>>,
    attached: watch::Sender<bool>,
    connector: Mutex<Option<Connector>>,
}

impl Shared {
    fn is_attached(&self) -> bool {
        *self.attached.borrow()
    }

    fn check(&self, kind: ChannelKind, index: usize) -> Result<()> {
        if !self.is_attached() {
            return Err(HardwareError::disconnected(self.name.clone()));
        }

        let count = match kind {
            ChannelKind::Input => self.input_count,
            ChannelKind::Output => self.output_count,
        };
        if index >= count {
            return Err(HardwareError::invalid_channel(kind, index, count));
        }

        Ok(())
    }

    fn check_read(&self, kind: ChannelKind, index: usize) -> Result<()> {
        self.check(kind, index)?;
        if self.read_failures.lock().contains(&(kind, index)) {
            return Err(HardwareError::communication(format!(
                "{} failed to read {kind} {index}",
                self.name
            )));
        }
        Ok(())
    }
}

/// Mock interface kit for testing and development.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockInterfaceKit;
/// use latchkey_hardware::traits::InterfaceKitDevice;
/// use latchkey_hardware::Connector;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut kit, handle) = MockInterfaceKit::new();
///     kit.open(&Connector::Any).await?;
///     kit.wait_for_attachment().await?;
///
///     kit.set_output_state(0, true).await?;
///     kit.set_output_state(0, false).await?;
///
///     let trace: Vec<bool> = handle.writes_to(0).iter().map(|w| w.state).collect();
///     assert_eq!(trace, [true, false]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockInterfaceKit {
    shared: Arc<Shared>,
    behavior: AttachBehavior,
}

impl MockInterfaceKit {
    /// Create a new 8/8 mock board that attaches immediately.
    ///
    /// Returns a tuple of (MockInterfaceKit, MockInterfaceKitHandle) where
    /// the handle drives inputs and inspects outputs.
    pub fn new() -> (Self, MockInterfaceKitHandle) {
        Self::builder().build()
    }

    /// Start configuring a mock board.
    pub fn builder() -> MockInterfaceKitBuilder {
        MockInterfaceKitBuilder::default()
    }
}

impl InterfaceKitDevice for MockInterfaceKit {
    async fn open(&mut self, connector: &Connector) -> Result<()> {
        if let AttachBehavior::FailOpen(message) = &self.behavior {
            return Err(HardwareError::open_failed(message.clone()));
        }

        *self.shared.connector.lock() = Some(connector.clone());

        match &self.behavior {
            AttachBehavior::Immediate => {
                self.shared.attached.send_replace(true);
            }
            AttachBehavior::Delayed(delay) => {
                let shared = Arc::clone(&self.shared);
                let delay = *delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    shared.attached.send_replace(true);
                });
            }
            AttachBehavior::Never | AttachBehavior::FailOpen(_) => {}
        }

        Ok(())
    }

    async fn wait_for_attachment(&self) -> Result<()> {
        let mut attached = self.shared.attached.subscribe();
        attached
            .wait_for(|attached| *attached)
            .await
            .map_err(|_| HardwareError::disconnected(self.shared.name.clone()))?;
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.shared.is_attached()
    }

    fn input_count(&self) -> usize {
        self.shared.input_count
    }

    fn output_count(&self) -> usize {
        self.shared.output_count
    }

    async fn input_state(&self, index: usize) -> Result<bool> {
        self.shared.check_read(ChannelKind::Input, index)?;
        Ok(self.shared.inputs.lock()[index])
    }

    async fn output_state(&self, index: usize) -> Result<bool> {
        self.shared.check_read(ChannelKind::Output, index)?;
        Ok(self.shared.outputs.lock()[index])
    }

    async fn set_output_state(&self, index: usize, state: bool) -> Result<()> {
        self.shared.check(ChannelKind::Output, index)?;

        let rejected = self
            .shared
            .write_failures
            .lock()
            .get(&index)
            .is_some_and(|only| only.is_none_or(|value| value == state));
        if rejected {
            return Err(HardwareError::communication(format!(
                "{} failed to write output {index}",
                self.shared.name
            )));
        }

        self.shared.outputs.lock()[index] = state;
        self.shared.writes.lock().push(OutputWrite {
            channel: index,
            state,
            at: Instant::now(),
        });
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        if !self.is_attached() {
            return Err(HardwareError::disconnected(self.shared.name.clone()));
        }

        let mut info = DeviceInfo::new(
            self.shared.name.clone(),
            self.shared.input_count,
            self.shared.output_count,
        )
        .with_serial_number(self.shared.serial_number);

        if let Some(Connector::Label(label) | Connector::RemoteLabel { label, .. }) =
            self.shared.connector.lock().as_ref()
        {
            info = info.with_label(label.clone());
        }

        Ok(info)
    }
}

/// Builder for [`MockInterfaceKit`].
#[derive(Debug, Clone)]
pub struct MockInterfaceKitBuilder {
    name: String,
    serial_number: i32,
    input_count: usize,
    output_count: usize,
    behavior: AttachBehavior,
}

impl Default for MockInterfaceKitBuilder {
    fn default() -> Self {
        Self {
            name: "Mock InterfaceKit".to_string(),
            serial_number: 0,
            input_count: DEFAULT_MOCK_CHANNELS,
            output_count: DEFAULT_MOCK_CHANNELS,
            behavior: AttachBehavior::default(),
        }
    }
}

impl MockInterfaceKitBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn serial_number(mut self, serial_number: i32) -> Self {
        self.serial_number = serial_number;
        self
    }

    pub fn channels(mut self, input_count: usize, output_count: usize) -> Self {
        self.input_count = input_count;
        self.output_count = output_count;
        self
    }

    pub fn attach(mut self, behavior: AttachBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn build(self) -> (MockInterfaceKit, MockInterfaceKitHandle) {
        let (attached, _) = watch::channel(false);

        let shared = Arc::new(Shared {
            name: self.name,
            serial_number: self.serial_number,
            input_count: self.input_count,
            output_count: self.output_count,
            inputs: Mutex::new(vec![false; self.input_count]),
            outputs: Mutex::new(vec![false; self.output_count]),
            writes: Mutex::new(Vec::new()),
            read_failures: Mutex::new(HashSet::new()),
            write_failures: Mutex::new(HashMap::new()),
            attached,
            connector: Mutex::new(None),
        });

        let kit = MockInterfaceKit {
            shared: Arc::clone(&shared),
            behavior: self.behavior,
        };

        (kit, MockInterfaceKitHandle { shared })
    }
}

/// Handle for controlling a mock interface kit.
///
/// Drives input channels, injects failures and exposes the output write
/// trace. It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockInterfaceKitHandle {
    shared: Arc<Shared>,
}

impl MockInterfaceKitHandle {
    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Connector the board was opened with, if it has been opened.
    pub fn connector(&self) -> Option<Connector> {
        self.shared.connector.lock().clone()
    }

    /// Check if the board is attached.
    pub fn is_attached(&self) -> bool {
        self.shared.is_attached()
    }

    /// Mark the board attached, regardless of its attach behavior.
    pub fn attach(&self) {
        self.shared.attached.send_replace(true);
    }

    /// Simulate the board dropping off the bus.
    pub fn detach(&self) {
        self.shared.attached.send_replace(false);
    }

    /// Set the level seen on an input. Out-of-range indices are ignored.
    pub fn set_input(&self, index: usize, state: bool) {
        if let Some(slot) = self.shared.inputs.lock().get_mut(index) {
            *slot = state;
        }
    }

    /// Current level of an output (`false` when out of range).
    pub fn output(&self, index: usize) -> bool {
        self.shared
            .outputs
            .lock()
            .get(index)
            .copied()
            .unwrap_or(false)
    }

    /// Every output write so far, in order.
    pub fn writes(&self) -> Vec<OutputWrite> {
        self.shared.writes.lock().clone()
    }

    /// Output writes to one channel, in order.
    pub fn writes_to(&self, channel: usize) -> Vec<OutputWrite> {
        self.shared
            .writes
            .lock()
            .iter()
            .filter(|write| write.channel == channel)
            .copied()
            .collect()
    }

    /// Closed `true` windows on a channel as `(rise, fall)` pairs.
    ///
    /// A window still open at the end of the trace is not included.
    pub fn pulses(&self, channel: usize) -> Vec<(Instant, Instant)> {
        let mut pulses = Vec::new();
        let mut rise = None;

        for write in self.writes_to(channel) {
            match (write.state, rise) {
                (true, None) => rise = Some(write.at),
                (false, Some(start)) => {
                    pulses.push((start, write.at));
                    rise = None;
                }
                _ => {}
            }
        }

        pulses
    }

    /// Forget the recorded trace.
    pub fn clear_writes(&self) {
        self.shared.writes.lock().clear();
    }

    /// Make reads of one channel fail.
    pub fn fail_reads(&self, kind: ChannelKind, index: usize) {
        self.shared.read_failures.lock().insert((kind, index));
    }

    /// Make every write to an output fail.
    pub fn fail_writes(&self, index: usize) {
        self.shared.write_failures.lock().insert(index, None);
    }

    /// Make writes of one value to an output fail, e.g. only re-engaging.
    pub fn fail_writes_of(&self, index: usize, state: bool) {
        self.shared.write_failures.lock().insert(index, Some(state));
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.shared.read_failures.lock().clear();
        self.shared.write_failures.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn attached_kit() -> (MockInterfaceKit, MockInterfaceKitHandle) {
        let (mut kit, handle) = MockInterfaceKit::new();
        kit.open(&Connector::Any).await.unwrap();
        kit.wait_for_attachment().await.unwrap();
        (kit, handle)
    }

    #[tokio::test]
    async fn test_mock_kit_immediate_attach() {
        let (mut kit, handle) = MockInterfaceKit::new();
        assert!(!kit.is_attached());

        kit.open(&Connector::Serial(42)).await.unwrap();
        kit.wait_for_attachment().await.unwrap();

        assert!(kit.is_attached());
        assert!(handle.is_attached());
        assert_eq!(handle.connector(), Some(Connector::Serial(42)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_kit_delayed_attach() {
        let (mut kit, _handle) = MockInterfaceKit::builder()
            .attach(AttachBehavior::Delayed(Duration::from_millis(500)))
            .build();

        kit.open(&Connector::Any).await.unwrap();
        assert!(!kit.is_attached());

        let started = Instant::now();
        kit.wait_for_attachment().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(kit.is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_kit_never_attaches() {
        let (mut kit, _handle) = MockInterfaceKit::builder()
            .attach(AttachBehavior::Never)
            .build();

        kit.open(&Connector::Any).await.unwrap();
        let waited =
            tokio::time::timeout(Duration::from_secs(5), kit.wait_for_attachment()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_mock_kit_fail_open() {
        let (mut kit, handle) = MockInterfaceKit::builder()
            .attach(AttachBehavior::FailOpen("bad password".to_string()))
            .build();

        let result = kit.open(&Connector::Any).await;
        assert!(matches!(result, Err(HardwareError::OpenFailed { .. })));
        assert_eq!(handle.connector(), None);
    }

    #[tokio::test]
    async fn test_mock_kit_io_requires_attachment() {
        let (kit, handle) = MockInterfaceKit::new();

        assert!(matches!(
            kit.set_output_state(0, true).await,
            Err(HardwareError::Disconnected { .. })
        ));
        assert!(kit.input_state(0).await.is_err());
        assert!(kit.get_info().await.is_err());
        assert!(handle.writes().is_empty());
    }

    #[tokio::test]
    async fn test_mock_kit_channel_range() {
        let (kit, _handle) = attached_kit().await;

        assert!(matches!(
            kit.set_output_state(DEFAULT_MOCK_CHANNELS, true).await,
            Err(HardwareError::InvalidChannel {
                kind: ChannelKind::Output,
                ..
            })
        ));
        assert!(matches!(
            kit.input_state(DEFAULT_MOCK_CHANNELS).await,
            Err(HardwareError::InvalidChannel {
                kind: ChannelKind::Input,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_mock_kit_outputs_and_trace() {
        let (kit, handle) = attached_kit().await;

        kit.set_output_state(3, true).await.unwrap();
        assert!(kit.output_state(3).await.unwrap());
        assert!(handle.output(3));

        kit.set_output_state(3, false).await.unwrap();
        kit.set_output_state(5, true).await.unwrap();

        let states: Vec<bool> = handle.writes_to(3).iter().map(|w| w.state).collect();
        assert_eq!(states, [true, false]);
        assert_eq!(handle.writes().len(), 3);
        assert_eq!(handle.pulses(3).len(), 1);
        assert!(handle.pulses(5).is_empty());

        handle.clear_writes();
        assert!(handle.writes().is_empty());
        assert!(handle.output(5));
    }

    #[tokio::test]
    async fn test_mock_kit_inputs() {
        let (kit, handle) = attached_kit().await;

        assert!(!kit.input_state(1).await.unwrap());
        handle.set_input(1, true);
        assert!(kit.input_state(1).await.unwrap());

        handle.set_input(100, true);
    }

    #[tokio::test]
    async fn test_mock_kit_injected_failures() {
        let (kit, handle) = attached_kit().await;

        handle.fail_reads(ChannelKind::Input, 2);
        assert!(matches!(
            kit.input_state(2).await,
            Err(HardwareError::CommunicationError { .. })
        ));
        assert!(kit.output_state(2).await.is_ok());

        handle.fail_writes_of(4, false);
        kit.set_output_state(4, true).await.unwrap();
        assert!(kit.set_output_state(4, false).await.is_err());
        assert!(handle.output(4));

        handle.fail_writes(6);
        assert!(kit.set_output_state(6, true).await.is_err());
        assert!(kit.set_output_state(6, false).await.is_err());

        handle.clear_failures();
        kit.set_output_state(4, false).await.unwrap();
        assert!(kit.input_state(2).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_kit_detach() {
        let (kit, handle) = attached_kit().await;

        handle.detach();
        assert!(!kit.is_attached());
        assert!(kit.output_state(0).await.is_err());

        handle.attach();
        assert!(kit.output_state(0).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_kit_info() {
        let (mut kit, _handle) = MockInterfaceKit::builder()
            .name("Front Kit")
            .serial_number(31337)
            .channels(16, 4)
            .build();
        kit.open(&Connector::Label("front".to_string())).await.unwrap();

        let info = kit.get_info().await.unwrap();
        assert_eq!(info.name, "Front Kit");
        assert_eq!(info.serial_number, Some(31337));
        assert_eq!(info.label.as_deref(), Some("front"));
        assert_eq!(info.input_count, 16);
        assert_eq!(info.output_count, 4);
    }
}
