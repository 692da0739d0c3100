//! Specifier expansion: `defaults`, `system`, `local`, bare names and URLs
//! to platform-qualified channel URLs.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::RcFile;
use crate::context::ChannelContext;
use crate::error::Result;
use crate::platform::NOARCH;

/// True if `s` has a URL scheme; anything else is a bare channel name.
///
/// A URL that has a scheme but is otherwise malformed (bad port, bad host)
/// still counts and is passed through as given.
pub fn is_url(s: &str) -> bool {
    !matches!(url::Url::parse(s), Err(url::ParseError::RelativeUrlWithoutBase))
}

impl ChannelContext {
    /// Expand specifiers into `<base>/<platform>/` and `<base>/noarch/` URLs.
    ///
    /// `platform` defaults to the context subdir. With `offline_only`, bases
    /// not using the `file:` scheme are dropped.
    pub fn expand<S: AsRef<str>>(
        &mut self,
        specifiers: &[S],
        platform: Option<&str>,
        offline_only: bool,
    ) -> Result<Vec<String>> {
        let snapshot = Arc::clone(&self.snapshot);
        self.expand_against(specifiers, snapshot.user.as_ref(), platform, offline_only)
    }

    /// Channel URLs for the current configuration.
    ///
    /// Uses the test override list if set, else the user's `channels`
    /// (through `system`), else `defaults`.
    pub fn channel_urls(&mut self, platform: Option<&str>, offline: bool) -> Result<Vec<String>> {
        let snapshot = Arc::clone(&self.snapshot);
        let base_urls: Vec<String> = if let Some(urls) = &snapshot.test_urls {
            urls.clone()
        } else if snapshot
            .user
            .as_ref()
            .is_some_and(|rc| rc.settings.declares_channels())
        {
            vec!["system".to_string()]
        } else {
            vec!["defaults".to_string()]
        };
        self.expand(&base_urls, platform, offline || snapshot.offline)
    }

    /// Expansion with `system` resolved against `system_file`.
    ///
    /// `system` splices that file's channels in place, ahead of the remaining
    /// specifiers; without a file it means `defaults`.
    pub(crate) fn expand_against<S: AsRef<str>>(
        &mut self,
        specifiers: &[S],
        system_file: Option<&RcFile>,
        platform: Option<&str>,
        offline_only: bool,
    ) -> Result<Vec<String>> {
        let snapshot = Arc::clone(&self.snapshot);
        let defaults: Vec<String> = snapshot
            .default_urls
            .iter()
            .map(|u| format!("{}/", u.trim_end_matches('/')))
            .collect();
        let platform = platform.unwrap_or(self.subdir.as_str()).to_string();

        let mut queue: VecDeque<String> =
            specifiers.iter().map(|s| s.as_ref().to_string()).collect();
        let mut alias_prefix: Option<String> = None;
        let mut urls = Vec::new();

        while let Some(spec) = queue.pop_front() {
            let bases = match (spec.as_str(), system_file) {
                ("system", Some(rc)) => {
                    for channel in rc.channels()?.into_iter().rev() {
                        queue.push_front(channel);
                    }
                    continue;
                }
                ("defaults" | "system", _) => defaults.clone(),
                ("local", _) => self.local.urls(),
                _ => vec![spec],
            };

            for base in bases {
                let mut base = base.trim_end_matches('/').to_string();
                if !is_url(&base) {
                    let prefix = alias_prefix.get_or_insert_with(|| {
                        snapshot
                            .alias
                            .resolve(snapshot.add_token, self.provider.as_ref())
                    });
                    base = format!("{prefix}{base}");
                }
                if offline_only && !base.starts_with("file:") {
                    let url = snapshot.codec.redact(&base);
                    tracing::debug!(%url, "offline: skipping channel");
                    continue;
                }
                for subdir in [platform.as_str(), NOARCH] {
                    urls.push(format!("{base}/{subdir}/"));
                }
            }
        }

        tracing::debug!(count = urls.len(), "expanded channel specifiers");
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::context::ConfigSnapshot;
    use crate::local::LocalChannels;
    use crate::token::{NoTokenProvider, StaticTokenProvider};
    use std::path::PathBuf;

    fn rc(yaml: &str) -> RcFile {
        RcFile {
            path: PathBuf::from("/home/u/.condarc"),
            settings: Settings::from_yaml(yaml, std::path::Path::new("u")).unwrap(),
        }
    }

    fn ctx_with(user: Option<RcFile>) -> ChannelContext {
        let snap = ConfigSnapshot::from_files(user, None, None).unwrap();
        ChannelContext::with_subdir(
            snap,
            Box::new(NoTokenProvider),
            LocalChannels::default(),
            "linux-64",
        )
        .unwrap()
    }

    #[test]
    fn is_url_detects_scheme() {
        assert!(is_url("https://example.org/x"));
        assert!(is_url("file:///srv/chan"));
        assert!(!is_url("conda-forge"));
        assert!(!is_url("some/path"));
    }

    #[test]
    fn malformed_url_with_scheme_is_not_a_bare_name() {
        assert!(is_url("https://example.org:99999/chan"));
        assert!(is_url("https://bad host/chan"));

        let mut ctx = ctx_with(None);
        let urls = ctx
            .expand(&["https://example.org:99999/chan"], Some("linux-64"), false)
            .unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.org:99999/chan/linux-64/",
                "https://example.org:99999/chan/noarch/",
            ]
        );
    }

    #[test]
    fn defaults_expand_per_base_in_order() {
        let mut ctx = ctx_with(None);
        let urls = ctx.expand(&["defaults"], Some("osx-64"), false).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://repo.continuum.io/pkgs/free/osx-64/",
                "https://repo.continuum.io/pkgs/free/noarch/",
                "https://repo.continuum.io/pkgs/pro/osx-64/",
                "https://repo.continuum.io/pkgs/pro/noarch/",
            ]
        );
    }

    #[test]
    fn platform_defaults_to_context_subdir() {
        let mut ctx = ctx_with(None);
        let urls = ctx.expand(&["https://example.org/chan/"], None, false).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.org/chan/linux-64/",
                "https://example.org/chan/noarch/",
            ]
        );
    }

    #[test]
    fn bare_name_uses_alias() {
        let user = rc("channel_alias: https://example.org/\n");
        let mut ctx = ctx_with(Some(user));
        let urls = ctx.expand(&["myname"], None, false).unwrap();
        assert_eq!(urls[0], "https://example.org/myname/linux-64/");
        assert_eq!(urls[1], "https://example.org/myname/noarch/");
    }

    #[test]
    fn bare_name_gets_token_from_provider() {
        let snap = ConfigSnapshot::from_files(None, None, None).unwrap();
        let provider =
            StaticTokenProvider::new("https://api.anaconda.org", Some("abcd-1234".into()));
        let mut ctx = ChannelContext::with_subdir(
            snap,
            Box::new(provider),
            LocalChannels::default(),
            "linux-64",
        )
        .unwrap();
        let urls = ctx.expand(&["private"], None, false).unwrap();
        assert_eq!(urls[0], "https://conda.anaconda.org/t/abcd-1234/private/linux-64/");
        assert_eq!(
            ctx.redact(&urls[0]),
            "https://conda.anaconda.org/t/<TOKEN>/private/linux-64/"
        );
    }

    #[test]
    fn system_without_settings_file_means_defaults() {
        let mut ctx = ctx_with(None);
        let sys = ctx.expand(&["system"], None, false).unwrap();
        let defaults = ctx.expand(&["defaults"], None, false).unwrap();
        assert_eq!(sys, defaults);
    }

    #[test]
    fn system_splices_in_place() {
        let user = rc("channels: [https://a.example/x, https://b.example/y]\n");
        let mut ctx = ctx_with(Some(user));
        let urls = ctx
            .expand(&["https://first.example/f", "system", "https://last.example/l"], None, false)
            .unwrap();
        let bases: Vec<&str> = urls
            .iter()
            .step_by(2)
            .map(|u| u.trim_end_matches("/linux-64/"))
            .collect();
        assert_eq!(
            bases,
            vec![
                "https://first.example/f",
                "https://a.example/x",
                "https://b.example/y",
                "https://last.example/l",
            ]
        );
    }

    #[test]
    fn system_inside_channel_list_is_error() {
        let mut ctx = ctx_with(None);
        let bad = rc("channels: [defaults, system]\n");
        assert!(matches!(
            ctx.expand_against(&["https://x.example/a", "system"], Some(&bad), None, false),
            Err(crate::error::ChannelError::SystemInChannelList { .. })
        ));
    }

    #[test]
    fn local_without_build_output_contributes_nothing() {
        let mut ctx = ctx_with(None);
        assert!(ctx.expand(&["local"], None, false).unwrap().is_empty());
    }

    #[test]
    fn offline_keeps_only_file_urls() {
        let mut ctx = ctx_with(None);
        let urls = ctx
            .expand(&["https://example.org/chan", "file:///srv/chan"], Some("linux-64"), true)
            .unwrap();
        assert_eq!(
            urls,
            vec!["file:///srv/chan/linux-64/", "file:///srv/chan/noarch/"]
        );
    }

    #[test]
    fn channel_urls_uses_user_channels() {
        let user = rc("channels: [https://a.example/x]\n");
        let mut ctx = ctx_with(Some(user));
        assert_eq!(
            ctx.channel_urls(None, false).unwrap(),
            vec!["https://a.example/x/linux-64/", "https://a.example/x/noarch/"]
        );
    }

    #[test]
    fn channel_urls_null_channels_key_yields_nothing() {
        let mut ctx = ctx_with(Some(rc("channels:\n")));
        assert!(ctx.channel_urls(None, false).unwrap().is_empty());
    }

    #[test]
    fn channel_urls_falls_back_to_defaults() {
        let mut ctx = ctx_with(Some(rc("offline: false\n")));
        assert_eq!(ctx.channel_urls(None, false).unwrap().len(), 4);
    }

    #[test]
    fn channel_urls_honours_offline_setting() {
        let user = rc("channels: [https://a.example/x, file:///srv/c]\noffline: true\n");
        let mut ctx = ctx_with(Some(user));
        assert_eq!(
            ctx.channel_urls(None, false).unwrap(),
            vec!["file:///srv/c/linux-64/", "file:///srv/c/noarch/"]
        );
    }

    #[test]
    fn channel_urls_test_override() {
        let snap =
            ConfigSnapshot::from_files(None, None, Some(vec!["https://test.example/t".into()]))
                .unwrap();
        let mut ctx = ChannelContext::with_subdir(
            snap,
            Box::new(NoTokenProvider),
            LocalChannels::default(),
            "win-64",
        )
        .unwrap();
        assert_eq!(
            ctx.channel_urls(None, false).unwrap(),
            vec!["https://test.example/t/win-64/", "https://test.example/t/noarch/"]
        );
    }
}
