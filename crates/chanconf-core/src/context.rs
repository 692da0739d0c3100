//! Configuration snapshot and the context every resolution call goes through.
//!
//! [`ConfigSnapshot`] is built once per load and shared behind an `Arc`; a
//! reload swaps in a new snapshot and leaves older ones untouched for whoever
//! still holds them. [`ChannelContext`] adds the pieces that are not part of
//! the settings: the token provider, the local-channel cache and the platform.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::alias::{ChannelAlias, DEFAULT_CHANNEL_ALIAS};
use crate::config::{LoadOptions, RcFile};
use crate::error::Result;
use crate::local::LocalChannels;
use crate::platform;
use crate::token::{NoTokenProvider, TokenCodec, TokenProvider};

/// Default repositories behind the `defaults` specifier.
pub const DEFAULT_CHANNEL_URLS: [&str; 2] = [
    "https://repo.continuum.io/pkgs/free",
    "https://repo.continuum.io/pkgs/pro",
];

/// Immutable view of the settings relevant to channel resolution.
#[derive(Debug)]
pub struct ConfigSnapshot {
    /// User settings file, if one exists.
    pub user: Option<RcFile>,
    /// System policy file, if one exists.
    pub system: Option<RcFile>,
    pub alias: ChannelAlias,
    pub codec: TokenCodec,
    /// Bases behind `defaults`, trailing slash trimmed.
    pub default_urls: Vec<String>,
    pub add_token: bool,
    pub offline: bool,
    pub proxy_servers: BTreeMap<String, String>,
    pub test_urls: Option<Vec<String>>,
}

impl ConfigSnapshot {
    /// Read the files named in `options` and build a snapshot.
    pub fn load(options: &LoadOptions) -> Result<Self> {
        let user = match options.user_rc.as_deref() {
            Some(path) => RcFile::load(path)?,
            None => None,
        };
        let system = match options.sys_rc.as_deref() {
            Some(path) => RcFile::load(path)?,
            None => None,
        };
        Self::from_files(user, system, options.test_urls.clone())
    }

    /// Build a snapshot from already parsed files.
    pub fn from_files(
        user: Option<RcFile>,
        system: Option<RcFile>,
        test_urls: Option<Vec<String>>,
    ) -> Result<Self> {
        // Misplaced `system` is a load error, not something to hit mid-resolution.
        if let Some(rc) = &user {
            rc.channels()?;
        }
        let user_settings = user.as_ref().map(|rc| &rc.settings);
        let sys_settings = system.as_ref().map(|rc| &rc.settings);

        // A restrictive system policy also pins the alias.
        let policy_alias = sys_settings
            .filter(|s| !s.allow_other_channels())
            .and_then(|s| s.channel_alias.as_deref());
        let raw_alias = policy_alias
            .or_else(|| user_settings.and_then(|s| s.channel_alias.as_deref()))
            .unwrap_or(DEFAULT_CHANNEL_ALIAS);
        let alias = ChannelAlias::parse(raw_alias);
        let codec = TokenCodec::for_alias(alias.base())?;

        let default_urls = sys_settings
            .and_then(|s| s.default_channels.clone())
            .unwrap_or_else(|| DEFAULT_CHANNEL_URLS.iter().map(|u| u.to_string()).collect())
            .into_iter()
            .map(|u| u.trim_end_matches('/').to_string())
            .collect();

        let proxy_servers = match &user {
            Some(rc) => rc.settings.proxy_servers(&rc.path)?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            add_token: user_settings.map_or(true, |s| s.add_token()),
            offline: user_settings.is_some_and(|s| s.offline()),
            user,
            system,
            alias,
            codec,
            default_urls,
            proxy_servers,
            test_urls,
        })
    }
}

/// Entry point for channel resolution.
///
/// Holds everything that used to be process-wide state, so each caller (and
/// each test) works on its own context.
#[derive(Debug)]
pub struct ChannelContext {
    pub(crate) snapshot: Arc<ConfigSnapshot>,
    pub(crate) provider: Box<dyn TokenProvider>,
    pub(crate) local: LocalChannels,
    pub(crate) subdir: String,
    pub(crate) allowed: Option<Arc<[String]>>,
}

impl ChannelContext {
    /// Build a context and compute the allowed channel set.
    pub fn new(
        snapshot: ConfigSnapshot,
        provider: Box<dyn TokenProvider>,
        local: LocalChannels,
    ) -> Result<Self> {
        Self::with_subdir(snapshot, provider, local, platform::current_subdir())
    }

    /// Like [`ChannelContext::new`] with an explicit platform subdir.
    pub fn with_subdir(
        snapshot: ConfigSnapshot,
        provider: Box<dyn TokenProvider>,
        local: LocalChannels,
        subdir: impl Into<String>,
    ) -> Result<Self> {
        let mut ctx = Self {
            snapshot: Arc::new(snapshot),
            provider,
            local,
            subdir: subdir.into(),
            allowed: None,
        };
        ctx.allowed = ctx.compute_allowed()?;
        tracing::info!(
            alias = %ctx.snapshot.alias.base(),
            restricted = ctx.allowed.is_some(),
            "channel configuration loaded"
        );
        Ok(ctx)
    }

    /// Load settings per `options` with the given token provider.
    pub fn load(options: &LoadOptions, provider: Box<dyn TokenProvider>) -> Result<Self> {
        let snapshot = ConfigSnapshot::load(options)?;
        Self::new(
            snapshot,
            provider,
            LocalChannels::new(options.local_build_root.clone()),
        )
    }

    /// Load settings per `options` without a token provider.
    pub fn load_without_tokens(options: &LoadOptions) -> Result<Self> {
        Self::load(options, Box::new(NoTokenProvider))
    }

    /// Re-read settings. On error the current snapshot stays in place.
    ///
    /// The local-channel cache survives; only its build root is updated.
    pub fn reload(&mut self, options: &LoadOptions) -> Result<()> {
        let fresh = Arc::new(ConfigSnapshot::load(options)?);
        let previous = std::mem::replace(&mut self.snapshot, fresh);
        let previous_allowed = self.allowed.take();
        match self.compute_allowed() {
            Ok(allowed) => {
                self.allowed = allowed;
                if self.local.build_root() != options.local_build_root.as_deref() {
                    self.local = LocalChannels::new(options.local_build_root.clone());
                }
                Ok(())
            }
            Err(e) => {
                self.snapshot = previous;
                self.allowed = previous_allowed;
                Err(e)
            }
        }
    }

    /// Current snapshot; stays valid after a later reload.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn alias(&self) -> &ChannelAlias {
        &self.snapshot.alias
    }

    /// Platform subdir used when no platform is requested.
    pub fn subdir(&self) -> &str {
        &self.subdir
    }

    /// Hide embedded tokens; use before logging or displaying any URL.
    pub fn redact(&self, url: &str) -> String {
        self.snapshot.codec.redact(url)
    }

    /// Remove embedded tokens.
    pub fn strip_token(&self, url: &str) -> String {
        self.snapshot.codec.strip(url)
    }

    /// Drop discovered local channels; the next `local` expansion checks again.
    pub fn invalidate_local_channels(&mut self) {
        self.local.invalidate();
    }
}
