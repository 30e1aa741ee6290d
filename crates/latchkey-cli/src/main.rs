//! `latchkey`: door control server.
//!
//! # Usage
//!
//! Serve the doors described in `config.json` on port 4567:
//! ```bash
//! latchkey
//! latchkey serve --port 8080
//! ```
//!
//! No interface kit driver is bundled, so boards are only attached with
//! `--simulate`:
//! ```bash
//! latchkey serve --simulate
//! ```
//!
//! Edit the configuration file:
//! ```bash
//! latchkey config set secret=s3cret feedbacktimeout=1500
//! latchkey config add-board --serial 31337
//! latchkey config add-door --board 1 --id front --name "Front Door" --lock 3
//! latchkey config show
//! ```

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use latchkey_core::BoardConfig;
use latchkey_core::constants::{DEFAULT_CONFIG_PATH, DEFAULT_LISTEN_PORT};
use latchkey_hardware::UnavailableDeviceFactory;
use latchkey_hardware::mock::MockDeviceFactory;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "latchkey", version = latchkey_core::VERSION)]
#[command(about = "HTTP control server for electric strikes and magnetic locks", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Attach every interface kit and serve the HTTP API (default)
    Serve(ServeArgs),

    /// Inspect or edit the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to listen on; all interfaces when omitted
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_LISTEN_PORT)]
    pub port: u16,

    /// Drive simulated interface kits instead of real boards
    #[arg(long)]
    pub simulate: bool,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_LISTEN_PORT,
            simulate: false,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Set top-level values, e.g. `secret=abc feedbacktimeout=1500`
    Set {
        #[arg(required = true, value_name = "NAME=VALUE")]
        assignments: Vec<String>,
    },

    /// Append an interface kit
    AddBoard(BoardArgs),

    /// Append a door to an interface kit
    AddDoor(DoorArgs),

    /// Remove a door by ID
    RemoveDoor { id: String },

    /// Print the configuration with secrets masked
    Show,
}

#[derive(Debug, Clone, Default, Args)]
pub struct BoardArgs {
    #[arg(long)]
    pub serial: Option<i32>,

    #[arg(long)]
    pub label: Option<String>,

    /// Remote host serving the interface kit
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub password: Option<String>,

    /// Milliseconds to wait for the board to attach
    #[arg(long)]
    pub attachment_timeout: Option<u64>,

    /// Unlock pulse length in milliseconds
    #[arg(long)]
    pub lock_delay: Option<u64>,
}

impl From<BoardArgs> for BoardConfig {
    fn from(args: BoardArgs) -> Self {
        Self {
            serial: args.serial,
            label: args.label,
            host: args.host,
            port: args.port,
            password: args.password,
            attachment_timeout: args.attachment_timeout,
            lock_delay: args.lock_delay,
            doors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct DoorArgs {
    /// 1-based position of the interface kit
    #[arg(long)]
    pub board: usize,

    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub floor: Option<String>,

    /// Strike output channel
    #[arg(long)]
    pub lock: Option<usize>,

    #[arg(long)]
    pub lock_feedback: Option<usize>,

    /// Magnetic lock output channel
    #[arg(long)]
    pub mag: Option<usize>,

    #[arg(long)]
    pub mag_feedback: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for command output such as `config show`.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Command::Serve(ServeArgs::default())) {
        Command::Serve(args) if args.simulate => {
            warn!("serving simulated interface kits, no door will move");
            commands::serve(&cli.config, &args, &MockDeviceFactory::new()).await
        }
        Command::Serve(args) => {
            commands::serve(&cli.config, &args, &UnavailableDeviceFactory).await
        }
        Command::Config(command) => run_config(&cli.config, command),
    }
}

fn run_config(path: &std::path::Path, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", commands::show(path)?);
            Ok(())
        }
        ConfigCommand::Set { assignments } => {
            commands::edit(path, |config| commands::set(config, &assignments))
        }
        ConfigCommand::AddBoard(args) => {
            let position =
                commands::edit(path, |config| Ok(commands::add_board(config, args)))?;
            println!("added interface kit #{position}");
            Ok(())
        }
        ConfigCommand::AddDoor(args) => commands::edit(path, |config| commands::add_door(config, args)),
        ConfigCommand::RemoveDoor { id } => {
            commands::edit(path, |config| commands::remove_door(config, &id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["latchkey"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config.json"));
    }

    #[test]
    fn test_parse_serve() {
        let cli =
            Cli::try_parse_from(["latchkey", "serve", "--host", "127.0.0.1", "--port", "8080"])
                .unwrap();
        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, 8080);
        assert!(!args.simulate);
    }

    #[test]
    fn test_parse_serve_simulate() {
        let cli = Cli::try_parse_from(["latchkey", "serve", "--simulate"]).unwrap();
        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.simulate);
        assert_eq!(args.port, DEFAULT_LISTEN_PORT);
    }

    #[test]
    fn test_version() {
        use clap::CommandFactory;
        assert_eq!(Cli::command().get_version(), Some(latchkey_core::VERSION));
    }

    #[test]
    fn test_parse_add_door() {
        let cli = Cli::try_parse_from([
            "latchkey",
            "--config",
            "/etc/latchkey.json",
            "config",
            "add-door",
            "--board",
            "2",
            "--id",
            "front",
            "--lock",
            "3",
            "--mag-feedback",
            "1",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/latchkey.json"));
        let Some(Command::Config(ConfigCommand::AddDoor(args))) = cli.command else {
            panic!("expected config add-door");
        };
        assert_eq!(args.board, 2);
        assert_eq!(args.id, "front");
        assert_eq!(args.lock, Some(3));
        assert_eq!(args.mag_feedback, Some(1));
        assert_eq!(args.mag, None);
    }

    #[test]
    fn test_set_requires_assignment() {
        assert!(Cli::try_parse_from(["latchkey", "config", "set"]).is_err());
    }
}
