//! Channel configuration resolution.
//!
//! Turns channel specifiers (`defaults`, `system`, `local`, bare names, URLs)
//! from user settings and system policy into platform-qualified URLs, assigns
//! fetch priorities, maps URLs back to short labels and redacts embedded
//! tokens. Everything goes through a [`ChannelContext`].

pub mod alias;
pub mod canonical;
pub mod config;
pub mod context;
pub mod error;
pub mod expand;
pub mod local;
pub mod logging;
pub mod platform;
pub mod policy;
pub mod priority;
pub mod token;

pub use alias::ChannelAlias;
pub use canonical::UNKNOWN_CHANNEL;
pub use config::{LoadOptions, RcFile, Settings};
pub use context::{ChannelContext, ConfigSnapshot};
pub use error::{ChannelError, Result};
pub use local::LocalChannels;
pub use priority::{PriorityEntry, PriorityTable};
pub use token::{NoTokenProvider, StaticTokenProvider, TokenCodec, TokenProvider};
