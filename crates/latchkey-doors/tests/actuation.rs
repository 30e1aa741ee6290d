//! Integration tests for the door engine
//!
//! These tests build a registry from a configuration document, attach it to
//! mock interface kits and check the channel traces actuation leaves behind.

use latchkey_core::Config;
use latchkey_doors::{DoorError, LockStatus, MagStatus, Registry};
use latchkey_hardware::mock::{AttachBehavior, MockDeviceFactory, MockInterfaceKitHandle};
use std::time::Duration;

const PULSE: Duration = Duration::from_millis(200);

const TWO_BOARDS: &str = r#"{
    "Secret": "X",
    "InterfaceKits": [
        {
            "Serial": 1001,
            "Doors": [
                { "ID": "front", "Name": "Front Door", "Lock": 3 },
                { "ID": "lab", "Lock": 0, "Mag": 1, "MagFeedback": 2 }
            ]
        },
        {
            "Serial": 1002,
            "LockDelay": 500,
            "Doors": [
                { "ID": "garage", "Lock": 0 },
                { "ID": "sensor-only", "LockFeedback": 6 }
            ]
        }
    ]
}"#;

async fn attached(
    document: &str,
) -> (Registry, MockDeviceFactory, Vec<MockInterfaceKitHandle>) {
    let config: Config = serde_json::from_str(document).unwrap();
    let registry = Registry::from_config(&config).unwrap();
    let factory = MockDeviceFactory::new();
    registry.load(&factory).await.unwrap();
    let handles = factory.handles();
    (registry, factory, handles)
}

#[tokio::test(start_paused = true)]
async fn test_unlock_leaves_false_true_false_trace() {
    let (registry, _factory, handles) = attached(TWO_BOARDS).await;
    let front = registry.find_by_identifier("front").unwrap();

    front.unlock_and_wait().await.unwrap();

    let trace: Vec<bool> = handles[0].writes_to(3).iter().map(|w| w.state).collect();
    assert_eq!(trace, [true, false]);
    assert!(!handles[0].output(3));
    assert_eq!(front.lock_status().await, LockStatus::Locked);
}

#[tokio::test(start_paused = true)]
async fn test_same_door_pulses_are_sequential() {
    let (registry, _factory, handles) = attached(TWO_BOARDS).await;
    let front = registry.find_by_identifier("front").unwrap();

    let first = front.unlock().unwrap();
    let second = front.unlock().unwrap();
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let pulses = handles[0].pulses(3);
    assert_eq!(pulses.len(), 2);
    assert!(
        pulses[0].1 <= pulses[1].0,
        "second pulse started before the first re-engaged"
    );
    for (released, engaged) in pulses {
        assert!(engaged - released >= PULSE);
    }
}

#[tokio::test(start_paused = true)]
async fn test_different_doors_overlap() {
    let (registry, _factory, handles) = attached(TWO_BOARDS).await;
    let front = registry.find_by_identifier("front").unwrap();
    let lab = registry.find_by_identifier("lab").unwrap();

    let a = front.unlock().unwrap();
    let b = lab.unlock().unwrap();
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let front_pulse = handles[0].pulses(3)[0];
    let lab_pulse = handles[0].pulses(0)[0];
    assert!(front_pulse.0 < lab_pulse.1 && lab_pulse.0 < front_pulse.1);
}

#[tokio::test(start_paused = true)]
async fn test_board_pulse_override() {
    let (registry, _factory, handles) = attached(TWO_BOARDS).await;
    let garage = registry.find_by_identifier("garage").unwrap();

    garage.unlock_and_wait().await.unwrap();

    let (released, engaged) = handles[1].pulses(0)[0];
    assert!(engaged - released >= Duration::from_millis(500));
    assert!(handles[0].writes().is_empty());
}

#[tokio::test]
async fn test_mag_status_follows_feedback() {
    let (registry, _factory, handles) = attached(TWO_BOARDS).await;
    let lab = registry.find_by_identifier("lab").unwrap();

    lab.mag_engage().await.unwrap();
    assert!(handles[0].output(1));
    // Feedback input is authoritative and has not moved yet.
    assert_eq!(lab.mag_status().await, MagStatus::Disengaged);

    handles[0].set_input(2, true);
    assert_eq!(lab.mag_status().await, MagStatus::Engaged);
}

#[tokio::test]
async fn test_unsupported_operations_write_nothing() {
    let (registry, _factory, handles) = attached(TWO_BOARDS).await;
    let sensor = registry.find_by_identifier("sensor-only").unwrap();

    assert!(sensor.unlock().unwrap_err().is_unsupported());
    assert!(sensor.mag_engage().await.unwrap_err().is_unsupported());
    assert!(handles[1].writes().is_empty());

    let status = sensor.status().await;
    assert_eq!(status.lock, LockStatus::Locked);
    assert_eq!(status.mag, MagStatus::Unsupported);
}

#[tokio::test]
async fn test_statuses_in_lookup_order() {
    let (registry, _factory, _handles) = attached(TWO_BOARDS).await;

    let statuses = registry.statuses().await;
    let ids: Vec<&str> = statuses.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["front", "lab", "garage", "sensor-only"]);
    assert_eq!(statuses[0].name.as_deref(), Some("Front Door"));
}

#[tokio::test(start_paused = true)]
async fn test_attachment_timeout_aborts_startup() {
    let config: Config = serde_json::from_str(
        r#"{ "InterfaceKits": [ {}, { "AttachmentTimeout": 250 } ] }"#,
    )
    .unwrap();
    let registry = Registry::from_config(&config).unwrap();
    let factory = MockDeviceFactory::new().with_behavior(AttachBehavior::Never);

    let error = registry.load(&factory).await.unwrap_err();
    assert!(matches!(error, DoorError::AttachmentTimeout { board: 1, .. }));
    assert!(error.is_startup_failure());
    assert_eq!(factory.handles().len(), 1);
}

#[tokio::test]
async fn test_open_failure_aborts_startup() {
    let config: Config =
        serde_json::from_str(r#"{ "InterfaceKits": [ { "Host": "10.0.0.9" } ] }"#).unwrap();
    let registry = Registry::from_config(&config).unwrap();
    let factory =
        MockDeviceFactory::new().with_behavior(AttachBehavior::FailOpen("refused".to_string()));

    let error = registry.load(&factory).await.unwrap_err();
    assert!(matches!(error, DoorError::AttachmentError { board: 1, .. }));
    assert!(registry.doors().all(|door| !door.is_bound()));
}
