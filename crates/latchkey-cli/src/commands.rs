use crate::{BoardArgs, DoorArgs, ServeArgs};
use anyhow::{Context, Result, bail};
use latchkey_core::{Config, DoorConfig};
use latchkey_doors::Registry;
use latchkey_hardware::DeviceFactory;
use latchkey_server::Server;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Load, validate, attach, bind, serve. Any failure before the listener
/// is bound aborts startup.
pub async fn serve<F>(path: &Path, args: &ServeArgs, factory: &F) -> Result<()>
where
    F: DeviceFactory + ?Sized,
{
    let config = Config::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    let registry = Registry::from_config(&config).context("invalid door configuration")?;

    if registry.secret().is_empty() {
        warn!("no secret configured, any client that can reach the server can open doors");
    }

    info!(
        boards = registry.boards().len(),
        doors = registry.doors().count(),
        "attaching interface kits"
    );
    registry
        .load(factory)
        .await
        .context("interface kits did not attach")?;

    let host = args
        .host
        .as_deref()
        .filter(|host| !host.is_empty())
        .unwrap_or("0.0.0.0");
    let server = Server::bind((host, args.port), Arc::new(registry))
        .await
        .with_context(|| format!("failed to listen on {host}:{}", args.port))?;

    server.run().await.context("HTTP server failed")
}

/// Configuration as pretty JSON with the secret and passwords masked.
pub fn show(path: &Path) -> Result<String> {
    let config = Config::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok(serde_json::to_string_pretty(&config.redacted())?)
}

/// Load (or start) the configuration, apply `change`, and save it back.
///
/// The value produced by `change` is returned only once the file is saved.
pub fn edit<T, F>(path: &Path, change: F) -> Result<T>
where
    F: FnOnce(&mut Config) -> Result<T>,
{
    let mut config = Config::load_or_default(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    let value = change(&mut config)?;
    config
        .save(path)
        .with_context(|| format!("failed to write configuration to {}", path.display()))?;
    info!(path = %path.display(), "configuration saved");
    Ok(value)
}

pub fn set(config: &mut Config, assignments: &[String]) -> Result<()> {
    for assignment in assignments {
        config.apply_setting(assignment)?;
    }
    Ok(())
}

/// Append a board and return its 1-based position.
pub fn add_board(config: &mut Config, args: BoardArgs) -> usize {
    config.interface_kits.push(args.into());
    config.interface_kits.len()
}

pub fn add_door(config: &mut Config, args: DoorArgs) -> Result<()> {
    let count = config.interface_kits.len();
    if args.board == 0 || args.board > count {
        bail!(
            "interface kit #{} does not exist, {count} configured",
            args.board
        );
    }

    let door = DoorConfig {
        id: args.id,
        name: args.name,
        floor: args.floor,
        lock: args.lock,
        lock_feedback: args.lock_feedback,
        mag: args.mag,
        mag_feedback: args.mag_feedback,
    };

    let mut candidate = config.clone();
    candidate.interface_kits[args.board - 1].doors.push(door);
    candidate.validate()?;

    *config = candidate;
    Ok(())
}

pub fn remove_door(config: &mut Config, id: &str) -> Result<()> {
    if !config.remove_door(id) {
        bail!("no door with ID {id}");
    }
    Ok(())
}
