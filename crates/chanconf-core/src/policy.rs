//! System policy: the fixed channel set when other channels are disallowed.

use std::sync::Arc;

use crate::context::ChannelContext;
use crate::error::Result;

impl ChannelContext {
    /// Channel URLs permitted by system policy, or `None` when unrestricted.
    ///
    /// Computed once per snapshot. Rejecting other channels is up to the caller.
    pub fn allowed_channels(&self) -> Option<&[String]> {
        self.allowed.as_deref()
    }

    /// True when unrestricted, or when `url` (token and trailing slash
    /// normalized) is in the allowed set.
    pub fn is_channel_allowed(&self, url: &str) -> bool {
        let Some(allowed) = self.allowed.as_deref() else {
            return true;
        };
        let codec = &self.snapshot.codec;
        let wanted = format!("{}/", codec.strip(url).trim_end_matches('/'));
        allowed
            .iter()
            .any(|a| format!("{}/", codec.strip(a).trim_end_matches('/')) == wanted)
    }

    /// Resolve the restricted set from the system file.
    ///
    /// `system` here refers to the system file's own channel list, not the
    /// user's.
    pub(crate) fn compute_allowed(&mut self) -> Result<Option<Arc<[String]>>> {
        let snapshot = Arc::clone(&self.snapshot);
        let Some(system) = snapshot.system.as_ref() else {
            return Ok(None);
        };
        if system.settings.allow_other_channels() {
            return Ok(None);
        }

        let base = if system.settings.declares_channels() {
            "system"
        } else {
            "defaults"
        };
        let urls = self.expand_against(&[base], Some(system), None, false)?;
        tracing::info!(
            count = urls.len(),
            path = %system.path.display(),
            "channels restricted by system policy"
        );
        Ok(Some(urls.into()))
    }
}
