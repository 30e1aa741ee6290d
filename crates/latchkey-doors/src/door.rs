//! Actuation and status of a single door.
//!
//! A door is a set of optional channel bindings on one interface kit:
//!
//! | Field | Direction | Meaning |
//! |-------|-----------|---------|
//! | `lock` | output | electric strike, pulsed `true` then `false` to unlock |
//! | `lock_feedback` | input | strike sensor, authoritative for lock status |
//! | `mag` | output | magnetic lock, held engaged (`true`) or disengaged |
//! | `mag_feedback` | input | magnet sensor, authoritative for mag status |
//!
//! # Concurrency
//!
//! Each door owns two independent guards. Unlock pulses on the same door
//! run one after another; mag writes are serialized among themselves; an
//! in-flight pulse never delays the mag channel or any other door. Status
//! reads take no guard and may observe a pulse in progress.
//!
//! # Unlock Protocol
//!
//! ```text
//! acquire lock guard ──► lock := true ──► sleep(pulse) ──► lock := false ──► release
//!                          │ fails                            │ fails
//!                          └─► error, no pulse                └─► error, door may be released
//! ```
//!
//! The pulse runs on its own task and reports through a oneshot channel.
//! A caller that stops waiting does not cut the pulse short.

use crate::error::{DoorError, Result};
use crate::status::{DoorStatus, LockStatus, MagStatus};
use latchkey_core::{Capability, DoorConfig};
use latchkey_hardware::{AnyInterfaceKit, HardwareError, InterfaceKitDevice};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, error, info, warn};

/// Channel consulted for a status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusSource {
    Feedback(usize),
    Output(usize),
}

impl StatusSource {
    /// Feedback input wins over the output's last written level.
    fn select(feedback: Option<usize>, output: Option<usize>) -> Option<Self> {
        feedback
            .map(Self::Feedback)
            .or_else(|| output.map(Self::Output))
    }
}

/// One physical door bound to one interface kit.
#[derive(Debug)]
pub struct Door {
    id: String,
    name: Option<String>,
    lock: Option<usize>,
    lock_feedback: Option<usize>,
    mag: Option<usize>,
    mag_feedback: Option<usize>,

    lock_pulse: Duration,
    read_timeout: Duration,

    device: OnceLock<Arc<AnyInterfaceKit>>,
    lock_guard: Mutex<()>,
    mag_guard: Mutex<()>,
}

impl Door {
    /// Create an unbound door from its configuration entry.
    ///
    /// `lock_pulse` is how long the strike stays released; `read_timeout`
    /// bounds each status read.
    pub fn new(config: &DoorConfig, lock_pulse: Duration, read_timeout: Duration) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            lock: config.lock,
            lock_feedback: config.lock_feedback,
            mag: config.mag,
            mag_feedback: config.mag_feedback,
            lock_pulse,
            read_timeout,
            device: OnceLock::new(),
            lock_guard: Mutex::new(()),
            mag_guard: Mutex::new(()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn lock_pulse(&self) -> Duration {
        self.lock_pulse
    }

    pub fn supports_lock(&self) -> bool {
        self.lock.is_some()
    }

    pub fn supports_mag(&self) -> bool {
        self.mag.is_some()
    }

    /// Check if the door's board has been attached.
    pub fn is_bound(&self) -> bool {
        self.device.get().is_some()
    }

    /// Output and input channels this door uses, as `(inputs, outputs)`.
    pub(crate) fn channels(&self) -> (Vec<usize>, Vec<usize>) {
        let inputs = self.lock_feedback.into_iter().chain(self.mag_feedback).collect();
        let outputs = self.lock.into_iter().chain(self.mag).collect();
        (inputs, outputs)
    }

    /// Attach the live board handle. Only the first call has an effect.
    pub(crate) fn bind(&self, device: Arc<AnyInterfaceKit>) -> bool {
        self.device.set(device).is_ok()
    }

    fn device(&self) -> Result<&Arc<AnyInterfaceKit>> {
        self.device
            .get()
            .ok_or_else(|| DoorError::NotBound(self.id.clone()))
    }

    fn unsupported(&self, capability: Capability) -> DoorError {
        DoorError::UnsupportedOperation {
            door: self.id.clone(),
            capability,
        }
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    /// Current strike state, degraded to `Error` on any read failure.
    pub async fn lock_status(&self) -> LockStatus {
        let Some(source) = StatusSource::select(self.lock_feedback, self.lock) else {
            return LockStatus::Unsupported;
        };

        match self.read(source).await {
            Ok(released) => LockStatus::from_state(released),
            Err(e) => {
                warn!(door = %self.id, ?source, error = %e, "lock status unavailable");
                LockStatus::Error
            }
        }
    }

    /// Current magnet state, degraded to `Error` on any read failure.
    pub async fn mag_status(&self) -> MagStatus {
        let Some(source) = StatusSource::select(self.mag_feedback, self.mag) else {
            return MagStatus::Unsupported;
        };

        match self.read(source).await {
            Ok(engaged) => MagStatus::from_state(engaged),
            Err(e) => {
                warn!(door = %self.id, ?source, error = %e, "mag status unavailable");
                MagStatus::Error
            }
        }
    }

    /// Snapshot for the control surface. Never fails.
    pub async fn status(&self) -> DoorStatus {
        let (lock, mag) = tokio::join!(self.lock_status(), self.mag_status());

        DoorStatus {
            id: self.id.clone(),
            name: self.name.clone(),
            lock,
            mag,
        }
    }

    async fn read(&self, source: StatusSource) -> Result<bool> {
        let device = self.device()?;
        let read = async {
            match source {
                StatusSource::Feedback(index) => device.input_state(index).await,
                StatusSource::Output(index) => device.output_state(index).await,
            }
        };

        let timeout_ms = u64::try_from(self.read_timeout.as_millis()).unwrap_or(u64::MAX);
        let state = tokio::time::timeout(self.read_timeout, read)
            .await
            .map_err(|_| HardwareError::timeout(timeout_ms))??;
        Ok(state)
    }

    // ------------------------------------------------------------------
    // Mag
    // ------------------------------------------------------------------

    /// Hold the magnetic lock engaged.
    ///
    /// # Errors
    /// - `DoorError::UnsupportedOperation` if no `mag` channel is wired
    /// - `DoorError::NotBound` if the board is not attached
    /// - `DoorError::Hardware` if the write fails
    pub async fn mag_engage(&self) -> Result<()> {
        self.set_mag(true).await
    }

    /// Release the magnetic lock.
    ///
    /// # Errors
    /// Same as [`Door::mag_engage`].
    pub async fn mag_disengage(&self) -> Result<()> {
        self.set_mag(false).await
    }

    async fn set_mag(&self, engaged: bool) -> Result<()> {
        let channel = self.mag.ok_or_else(|| self.unsupported(Capability::Mag))?;
        let device = self.device()?;

        let _guard = self.mag_guard.lock().await;
        if let Err(e) = device.set_output_state(channel, engaged).await {
            error!(door = %self.id, channel, engaged, error = %e, "mag write failed");
            return Err(e.into());
        }

        info!(door = %self.id, channel, status = %MagStatus::from_state(engaged), "mag set");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Unlock
    // ------------------------------------------------------------------

    /// Start an unlock pulse and return the channel its result arrives on.
    ///
    /// The pulse runs on a spawned task, after any pulse already in flight
    /// on this door. Dropping the receiver does not stop it.
    ///
    /// # Errors
    /// - `DoorError::UnsupportedOperation` if no `lock` channel is wired
    /// - `DoorError::NotBound` if the board is not attached
    ///
    /// Hardware failures during the pulse are delivered through the
    /// returned receiver.
    pub fn unlock(self: &Arc<Self>) -> Result<oneshot::Receiver<Result<()>>> {
        let channel = self.lock.ok_or_else(|| self.unsupported(Capability::Lock))?;
        let device = Arc::clone(self.device()?);
        let door = Arc::clone(self);
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let result = door.pulse(&device, channel).await;
            if tx.send(result).is_err() {
                debug!(door = %door.id, "unlock finished after caller stopped waiting");
            }
        });

        Ok(rx)
    }

    /// Run an unlock pulse and wait for it to finish.
    ///
    /// # Errors
    /// Everything [`Door::unlock`] can return, plus hardware failures of
    /// the pulse itself.
    pub async fn unlock_and_wait(self: &Arc<Self>) -> Result<()> {
        self.unlock()?
            .await
            .unwrap_or_else(|_| Err(DoorError::Aborted(self.id.clone())))
    }

    async fn pulse(&self, device: &AnyInterfaceKit, channel: usize) -> Result<()> {
        let _guard = self.lock_guard.lock().await;
        let duration_ms = u64::try_from(self.lock_pulse.as_millis()).unwrap_or(u64::MAX);

        debug!(door = %self.id, channel, duration_ms, "releasing strike");
        if let Err(e) = device.set_output_state(channel, true).await {
            error!(door = %self.id, channel, error = %e, "failed to release strike");
            return Err(e.into());
        }

        tokio::time::sleep(self.lock_pulse).await;

        if let Err(e) = device.set_output_state(channel, false).await {
            error!(
                door = %self.id,
                channel,
                error = %e,
                "failed to re-engage strike, door may be left unlocked"
            );
            return Err(e.into());
        }

        info!(door = %self.id, channel, duration_ms, "door unlocked");
        Ok(())
    }
}
