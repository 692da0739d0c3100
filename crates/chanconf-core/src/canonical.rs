//! Canonical channel labels: URL back to `defaults`, `local`, a short name,
//! or the URL itself.

use crate::context::ChannelContext;

/// Label for a missing URL.
pub const UNKNOWN_CHANNEL: &str = "<unknown>";

/// Legacy internal file server; everything under it is labelled `filer`.
const FILER_PREFIX: &str = "http://filer/";

/// Drop the last two `/`-separated segments (platform subdir and the empty
/// segment after the trailing slash).
///
/// `https://host/chan/linux-64/` becomes `https://host/chan`. Input with fewer
/// segments is returned whole.
pub fn channel_root(url: &str) -> &str {
    url.rsplitn(3, '/').last().unwrap_or(url)
}

impl ChannelContext {
    /// Short display label for a channel URL. Never fails.
    pub fn canonical_label(&self, url: Option<&str>) -> String {
        match url {
            Some(url) => self.label_for(url, true),
            None => UNKNOWN_CHANNEL.to_string(),
        }
    }

    /// Split a package URL into its channel root and that root's label.
    pub fn url_to_channel(&self, url: Option<&str>) -> (Option<String>, String) {
        match url {
            Some(url) => {
                let root = channel_root(url);
                (Some(root.to_string()), self.label_for(root, true))
            }
            None => (None, UNKNOWN_CHANNEL.to_string()),
        }
    }

    /// `try_https` allows one retry with `http:` replaced by `https:`.
    fn label_for(&self, url: &str, try_https: bool) -> String {
        let snapshot = &self.snapshot;
        let stripped = snapshot.codec.strip(url);
        let channel = stripped.trim_end_matches('/');

        if snapshot.default_urls.iter().any(|d| channel.starts_with(d.as_str())) {
            return "defaults".to_string();
        }
        if self.local.urls().iter().any(|l| channel.starts_with(l.as_str())) {
            return "local".to_string();
        }
        if channel.starts_with(FILER_PREFIX) {
            return "filer".to_string();
        }
        if let Some(name) = channel.strip_prefix(snapshot.alias.prefix().as_str()) {
            return name.to_string();
        }
        if try_https {
            if let Some(rest) = channel.strip_prefix("http:/") {
                let https = format!("https:/{rest}");
                let label = self.label_for(&https, false);
                if label != https {
                    return label;
                }
            }
        }
        channel.to_string()
    }
}
