//! Channel alias: the base URL that bare channel names are appended to.

use crate::token::{TokenCodec, TokenProvider, TokenProviderError};

/// Alias used when neither settings file configures one.
pub const DEFAULT_CHANNEL_ALIAS: &str = "https://conda.anaconda.org/";

/// Normalized channel alias.
///
/// Stored without a trailing slash and without any `t/<token>/` segment; a
/// token is only attached by [`ChannelAlias::resolve`] when URLs are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAlias {
    base: String,
}

impl ChannelAlias {
    /// Parse a configured alias, dropping a trailing token segment and slashes.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim().trim_end_matches('/');
        let base = match trimmed.rsplit_once("/t/") {
            Some((head, tail)) if TokenCodec::is_well_formed(tail) || tail == "<TOKEN>" => head,
            _ => trimmed,
        };
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Base with one trailing slash; bare channel names are appended to this.
    pub fn prefix(&self) -> String {
        format!("{}/", self.base)
    }

    /// True for `file:` aliases, which never carry tokens.
    pub fn is_local(&self) -> bool {
        self.base.starts_with("file:")
    }

    fn host(&self) -> String {
        url::Url::parse(&self.base)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Alias prefix to use for URL construction, with a token attached when
    /// `add_token` is set and the provider has one for this alias.
    ///
    /// Provider problems are logged and never fail resolution.
    pub fn resolve(&self, add_token: bool, provider: &dyn TokenProvider) -> String {
        let prefix = self.prefix();
        if self.is_local() || !add_token {
            return prefix;
        }

        match provider.lookup(&self.host()) {
            Ok(Some(provided)) if prefix.starts_with(&provided.domain) => {
                if TokenCodec::is_well_formed(&provided.token) {
                    tracing::debug!(alias = %prefix, "attaching token to channel alias");
                    TokenCodec::inject(&prefix, &provided.token)
                } else {
                    tracing::warn!(alias = %prefix, "ignoring malformed token from token provider");
                    prefix
                }
            }
            Ok(Some(provided)) => {
                tracing::debug!(
                    alias = %prefix,
                    domain = %provided.domain,
                    "token provider domain does not match channel alias"
                );
                prefix
            }
            Ok(None) => prefix,
            Err(TokenProviderError::Unavailable) => {
                tracing::debug!("no token provider available");
                prefix
            }
            Err(e) => {
                tracing::warn!("could not obtain channel token ({e})");
                prefix
            }
        }
    }
}

impl Default for ChannelAlias {
    fn default() -> Self {
        Self::parse(DEFAULT_CHANNEL_ALIAS)
    }
}
