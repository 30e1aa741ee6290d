//! Interface kit topology and attachment.
//!
//! A [`Board`] is built from one `InterfaceKits` entry. It knows how to
//! reach its interface kit ([`resolve_connector`]), how long to wait for
//! it to attach, and which doors are wired to it. [`Board::load`] attaches
//! the kit and binds every door to it in one step; a board that fails to
//! attach leaves all of its doors unbound.

use crate::door::Door;
use crate::error::{DoorError, Result};
use latchkey_core::BoardConfig;
use latchkey_core::constants::{
    DEFAULT_ATTACHMENT_TIMEOUT_MS, DEFAULT_LOCK_PULSE_MS, DEFAULT_REMOTE_PORT,
};
use latchkey_hardware::{
    AnyInterfaceKit, Connector, DeviceFactory, DeviceInfo, InterfaceKitDevice,
};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, error, info};

/// Pick the connector for a board entry.
///
/// With a `Host` the board is remote: by serial if one is set, else by
/// label, else the first board on that host. `Port` defaults to 5001 and
/// `Password` to empty. Without a host the board is local, by serial,
/// label or the first one found, in that order.
pub fn resolve_connector(config: &BoardConfig) -> Connector {
    match &config.host {
        Some(host) => {
            let host = host.clone();
            let port = config.port.unwrap_or(DEFAULT_REMOTE_PORT);
            let password = config.password.clone().unwrap_or_default();

            match (config.serial, &config.label) {
                (Some(serial), _) => Connector::RemoteSerial {
                    serial: Some(serial),
                    host,
                    port,
                    password,
                },
                (None, Some(label)) => Connector::RemoteLabel {
                    label: label.clone(),
                    host,
                    port,
                    password,
                },
                (None, None) => Connector::RemoteSerial {
                    serial: None,
                    host,
                    port,
                    password,
                },
            }
        }
        None => match (config.serial, &config.label) {
            (Some(serial), _) => Connector::Serial(serial),
            (None, Some(label)) => Connector::Label(label.clone()),
            (None, None) => Connector::Any,
        },
    }
}

/// One interface kit and the doors wired to it.
#[derive(Debug)]
pub struct Board {
    position: usize,
    connector: Connector,
    attachment_timeout: Duration,
    lock_pulse: Duration,
    doors: Vec<Arc<Door>>,
    device: OnceLock<Arc<AnyInterfaceKit>>,
}

impl Board {
    /// Build a detached board from its configuration entry.
    ///
    /// `position` is the 1-based index of the entry, used in logs and
    /// errors; `read_timeout` bounds each door status read.
    pub fn from_config(position: usize, config: &BoardConfig, read_timeout: Duration) -> Self {
        let attachment_timeout = Duration::from_millis(
            config
                .attachment_timeout
                .unwrap_or(DEFAULT_ATTACHMENT_TIMEOUT_MS),
        );
        let lock_pulse =
            Duration::from_millis(config.lock_delay.unwrap_or(DEFAULT_LOCK_PULSE_MS));

        let doors = config
            .doors
            .iter()
            .map(|door| Arc::new(Door::new(door, lock_pulse, read_timeout)))
            .collect();

        Self {
            position,
            connector: resolve_connector(config),
            attachment_timeout,
            lock_pulse,
            doors,
            device: OnceLock::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    pub fn attachment_timeout(&self) -> Duration {
        self.attachment_timeout
    }

    /// Unlock pulse length shared by every door on this board.
    pub fn lock_pulse(&self) -> Duration {
        self.lock_pulse
    }

    /// Doors in configuration order.
    pub fn doors(&self) -> &[Arc<Door>] {
        &self.doors
    }

    pub fn is_attached(&self) -> bool {
        self.device.get().is_some_and(|device| device.is_attached())
    }

    /// Information reported by the attached kit.
    ///
    /// # Errors
    /// `DoorError::Hardware` if the board is not attached.
    pub async fn device_info(&self) -> Result<DeviceInfo> {
        let device = self.device.get().ok_or_else(|| {
            latchkey_hardware::HardwareError::disconnected(format!(
                "interface kit #{}",
                self.position
            ))
        })?;
        Ok(device.get_info().await?)
    }

    /// Attach the interface kit and bind every door to it.
    ///
    /// A fresh kit is taken from `factory`, opened against the resolved
    /// connector, then given `attachment_timeout` to report attached.
    /// Calling `load` on an attached board does nothing.
    ///
    /// # Errors
    /// - `DoorError::AttachmentError` if the kit cannot be created or opened
    /// - `DoorError::AttachmentTimeout` if it does not attach in time
    /// - `DoorError::Config` if a door uses a channel the kit does not have
    pub async fn load<F>(&self, factory: &F) -> Result<()>
    where
        F: DeviceFactory + ?Sized,
    {
        if self.device.get().is_some() {
            debug!(board = self.position, "interface kit already attached");
            return Ok(());
        }

        let attachment_error = |source| DoorError::AttachmentError {
            board: self.position,
            source,
        };

        let mut device = factory.create().map_err(attachment_error)?;

        info!(
            board = self.position,
            connector = %self.connector,
            timeout_ms = self.attachment_timeout.as_millis(),
            "opening interface kit"
        );
        device.open(&self.connector).await.map_err(attachment_error)?;

        match tokio::time::timeout(self.attachment_timeout, device.wait_for_attachment()).await {
            Ok(Ok(())) => {}
            Ok(Err(source)) => return Err(attachment_error(source)),
            Err(_) => {
                let timeout_ms =
                    u64::try_from(self.attachment_timeout.as_millis()).unwrap_or(u64::MAX);
                error!(board = self.position, timeout_ms, "interface kit did not attach");
                return Err(DoorError::AttachmentTimeout {
                    board: self.position,
                    timeout_ms,
                });
            }
        }

        self.check_channels(&device)?;

        let device = Arc::new(device);
        for door in &self.doors {
            door.bind(Arc::clone(&device));
        }
        let _ = self.device.set(device);

        info!(
            board = self.position,
            connector = %self.connector,
            doors = self.doors.len(),
            "interface kit attached"
        );
        Ok(())
    }

    fn check_channels(&self, device: &AnyInterfaceKit) -> Result<()> {
        let input_count = device.input_count();
        let output_count = device.output_count();

        for door in &self.doors {
            let (inputs, outputs) = door.channels();
            let bad_input = inputs.into_iter().find(|&index| index >= input_count);
            let bad_output = outputs.into_iter().find(|&index| index >= output_count);

            let problem = match (bad_input, bad_output) {
                (_, Some(index)) => Some(("output", index, output_count)),
                (Some(index), None) => Some(("input", index, input_count)),
                (None, None) => None,
            };

            if let Some((kind, index, count)) = problem {
                return Err(latchkey_core::Error::Config(format!(
                    "door {} uses {kind} {index} but interface kit #{} has {count}",
                    door.id(),
                    self.position
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_core::DoorConfig;
    use latchkey_hardware::mock::{AttachBehavior, MockDeviceFactory};
    use rstest::rstest;

    const READ_TIMEOUT: Duration = Duration::from_millis(2000);

    fn board_config(
        serial: Option<i32>,
        label: Option<&str>,
        host: Option<&str>,
    ) -> BoardConfig {
        BoardConfig {
            serial,
            label: label.map(str::to_string),
            host: host.map(str::to_string),
            ..Default::default()
        }
    }

    fn remote_serial(serial: Option<i32>) -> Connector {
        Connector::RemoteSerial {
            serial,
            host: "door-ctl".to_string(),
            port: 5001,
            password: String::new(),
        }
    }

    #[rstest]
    #[case(None, None, None, Connector::Any)]
    #[case(Some(7), None, None, Connector::Serial(7))]
    #[case(None, Some("annex"), None, Connector::Label("annex".to_string()))]
    #[case(Some(7), Some("annex"), None, Connector::Serial(7))]
    #[case(None, None, Some("door-ctl"), remote_serial(None))]
    #[case(Some(7), None, Some("door-ctl"), remote_serial(Some(7)))]
    #[case(Some(7), Some("annex"), Some("door-ctl"), remote_serial(Some(7)))]
    #[case(None, Some("annex"), Some("door-ctl"), Connector::RemoteLabel {
        label: "annex".to_string(),
        host: "door-ctl".to_string(),
        port: 5001,
        password: String::new(),
    })]
    fn test_resolve_connector(
        #[case] serial: Option<i32>,
        #[case] label: Option<&str>,
        #[case] host: Option<&str>,
        #[case] expected: Connector,
    ) {
        assert_eq!(resolve_connector(&board_config(serial, label, host)), expected);
    }

    #[test]
    fn test_resolve_connector_port_and_password() {
        let config = BoardConfig {
            host: Some("door-ctl".to_string()),
            port: Some(5555),
            password: Some("pw".to_string()),
            ..Default::default()
        };

        assert_eq!(
            resolve_connector(&config),
            Connector::RemoteSerial {
                serial: None,
                host: "door-ctl".to_string(),
                port: 5555,
                password: "pw".to_string(),
            }
        );
    }

    #[test]
    fn test_board_defaults() {
        let board = Board::from_config(1, &BoardConfig::default(), READ_TIMEOUT);

        assert_eq!(board.attachment_timeout(), Duration::from_millis(2000));
        assert_eq!(board.lock_pulse(), Duration::from_millis(200));
        assert_eq!(board.connector(), &Connector::Any);
        assert!(!board.is_attached());
    }

    #[test]
    fn test_lock_delay_applies_to_every_door() {
        let config = BoardConfig {
            lock_delay: Some(750),
            attachment_timeout: Some(100),
            doors: vec![
                DoorConfig {
                    id: "a".to_string(),
                    lock: Some(0),
                    ..Default::default()
                },
                DoorConfig {
                    id: "b".to_string(),
                    lock: Some(1),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let board = Board::from_config(1, &config, READ_TIMEOUT);
        assert_eq!(board.attachment_timeout(), Duration::from_millis(100));
        assert!(
            board
                .doors()
                .iter()
                .all(|door| door.lock_pulse() == Duration::from_millis(750))
        );
    }

    #[tokio::test]
    async fn test_load_binds_doors() {
        let config = BoardConfig {
            serial: Some(31337),
            doors: vec![DoorConfig {
                id: "front".to_string(),
                lock: Some(3),
                ..Default::default()
            }],
            ..Default::default()
        };
        let board = Board::from_config(1, &config, READ_TIMEOUT);
        let factory = MockDeviceFactory::new();

        assert!(!board.doors()[0].is_bound());
        board.load(&factory).await.unwrap();

        assert!(board.is_attached());
        assert!(board.doors()[0].is_bound());
        assert_eq!(
            factory.handle(0).unwrap().connector(),
            Some(Connector::Serial(31337))
        );
        assert_eq!(board.device_info().await.unwrap().output_count, 8);

        board.load(&factory).await.unwrap();
        assert_eq!(factory.handles().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_timeout() {
        let config = BoardConfig {
            attachment_timeout: Some(500),
            doors: vec![DoorConfig {
                id: "front".to_string(),
                lock: Some(0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let board = Board::from_config(3, &config, READ_TIMEOUT);
        let factory = MockDeviceFactory::new().with_behavior(AttachBehavior::Never);

        let error = board.load(&factory).await.unwrap_err();
        assert!(matches!(
            error,
            DoorError::AttachmentTimeout {
                board: 3,
                timeout_ms: 500
            }
        ));
        assert!(!board.is_attached());
        assert!(!board.doors()[0].is_bound());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_waits_for_slow_board() {
        let config = BoardConfig {
            attachment_timeout: Some(1000),
            ..Default::default()
        };
        let board = Board::from_config(1, &config, READ_TIMEOUT);
        let factory = MockDeviceFactory::new()
            .with_behavior(AttachBehavior::Delayed(Duration::from_millis(400)));

        board.load(&factory).await.unwrap();
        assert!(board.is_attached());
    }

    #[tokio::test]
    async fn test_load_open_failure() {
        let board = Board::from_config(2, &BoardConfig::default(), READ_TIMEOUT);
        let factory = MockDeviceFactory::new()
            .with_behavior(AttachBehavior::FailOpen("connection refused".to_string()));

        assert!(matches!(
            board.load(&factory).await,
            Err(DoorError::AttachmentError { board: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_load_create_failure() {
        let board = Board::from_config(1, &BoardConfig::default(), READ_TIMEOUT);
        let factory = MockDeviceFactory::failing("driver not loaded");

        assert!(matches!(
            board.load(&factory).await,
            Err(DoorError::AttachmentError { board: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_out_of_range_channel() {
        let config = BoardConfig {
            doors: vec![DoorConfig {
                id: "front".to_string(),
                mag_feedback: Some(4),
                ..Default::default()
            }],
            ..Default::default()
        };
        let board = Board::from_config(1, &config, READ_TIMEOUT);
        let factory = MockDeviceFactory::new().with_channels(4, 4);

        let error = board.load(&factory).await.unwrap_err();
        assert!(matches!(error, DoorError::Config(_)));
        assert!(error.to_string().contains("input 4"));
        assert!(!board.doors()[0].is_bound());
    }
}
