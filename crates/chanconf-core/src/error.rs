//! Error type for settings loading and channel resolution.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// `system` listed inside the channel list it would expand to.
    #[error("'system' cannot be used as a channel in {}", path.display())]
    SystemInChannelList { path: PathBuf },

    #[error("proxy_servers setting not a mapping in {}", path.display())]
    InvalidProxyServers { path: PathBuf },

    #[error("channel alias {alias:?} cannot be used for token matching: {source}")]
    InvalidAlias {
        alias: String,
        #[source]
        source: regex::Error,
    },

    #[error("read settings file {}: {source}", path.display())]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse settings file {}: {source}", path.display())]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, ChannelError>;
