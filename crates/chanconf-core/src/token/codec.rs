//! Redact, strip and inject the `t/<token>/` URL segment.

use regex::Regex;

use crate::error::{ChannelError, Result};

/// Literal that replaces a token in redacted URLs.
pub const TOKEN_PLACEHOLDER: &str = "<TOKEN>";

/// Hosts of the default token-hosting service, matched in addition to the alias.
const FALLBACK_HOSTS: [&str; 2] = ["binstar.org", "anaconda.org"];

/// Minimum token length accepted by the pattern and by [`TokenCodec::inject`].
const MIN_TOKEN_LEN: usize = 4;

/// Compiled token pattern for one channel alias.
///
/// The pattern only matches a `t/<token>/` segment directly following the
/// alias or one of the fallback hosts, so arbitrary third-party URLs that
/// happen to contain `/t/` are left alone.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    pattern: Regex,
}

impl TokenCodec {
    /// Build the codec for the given alias base (trailing slash optional).
    pub fn for_alias(alias_base: &str) -> Result<Self> {
        let alias = alias_base.trim_end_matches('/');
        let mut hosts: Vec<String> = Vec::with_capacity(FALLBACK_HOSTS.len() + 1);
        if !alias.is_empty() {
            hosts.push(regex::escape(alias));
        }
        hosts.extend(FALLBACK_HOSTS.iter().map(|h| regex::escape(h)));

        // `<` and `>` are accepted so an already redacted URL matches again.
        let source = format!(
            r"((?:{})/?)(t/[0-9a-zA-Z\-<>]{{{MIN_TOKEN_LEN},}})/",
            hosts.join("|")
        );
        let pattern = Regex::new(&source).map_err(|source| ChannelError::InvalidAlias {
            alias: alias.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    /// Replace any embedded token with [`TOKEN_PLACEHOLDER`].
    pub fn redact(&self, url: &str) -> String {
        self.pattern
            .replace_all(url, format!("${{1}}t/{TOKEN_PLACEHOLDER}/").as_str())
            .into_owned()
    }

    /// Remove the token segment entirely.
    pub fn strip(&self, url: &str) -> String {
        self.pattern.replace_all(url, "${1}").into_owned()
    }

    /// Append `t/<token>/` to an alias prefix.
    pub fn inject(alias_prefix: &str, token: &str) -> String {
        if alias_prefix.ends_with('/') {
            format!("{alias_prefix}t/{token}/")
        } else {
            format!("{alias_prefix}/t/{token}/")
        }
    }

    /// True if `token` would be recognised (and therefore stripped) by the codec.
    pub fn is_well_formed(token: &str) -> bool {
        token.len() >= MIN_TOKEN_LEN
            && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    /// True if the URL carries a token segment.
    pub fn has_token(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}
