use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    // Topology errors
    #[error("Duplicate door identifier: {0}")]
    DuplicateDoor(String),

    #[error(
        "Channel conflict on interface kit #{board}: output {channel} is used by doors {first} and {second}"
    )]
    ChannelConflict {
        board: usize,
        channel: usize,
        first: String,
        second: String,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
