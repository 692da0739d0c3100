use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChannelError, Result};

/// Settings file name, in the user's home and in the install prefix.
pub const RC_FILE_NAME: &str = ".condarc";
/// Explicit user settings path; a single space disables user settings.
pub const CONDARC_ENV: &str = "CONDARC";
/// Install prefix holding the system settings file.
pub const ROOT_PREFIX_ENV: &str = "CONDA_ROOT";
/// Build root whose existence makes the `local` channel available.
pub const BUILD_ROOT_ENV: &str = "CONDA_BLD_PATH";
/// Whitespace-separated base URLs for test harnesses; replaces normal defaults.
pub const TEST_URLS_ENV: &str = "CHANCONF_TEST_URLS";

/// `ssl_verify` is either a switch or a CA bundle path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SslVerify {
    Enabled(bool),
    CaBundle(String),
}

/// Recognized keys of one settings file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Ordered channel specifiers.
    #[serde(default)]
    pub channels: Option<Vec<String>>,
    /// Base URL prefixed to bare channel names.
    #[serde(default)]
    pub channel_alias: Option<String>,
    #[serde(default)]
    pub add_anaconda_token: Option<bool>,
    /// Older spelling of `add_anaconda_token`, consulted only when that is unset.
    #[serde(default)]
    pub add_binstar_token: Option<bool>,
    /// Only meaningful in the system file: false restricts channels to the system list.
    #[serde(default)]
    pub allow_other_channels: Option<bool>,
    #[serde(default)]
    pub offline: Option<bool>,
    /// Only meaningful in the system file: replaces the built-in default channels.
    #[serde(default)]
    pub default_channels: Option<Vec<String>>,
    /// Kept raw so a wrong shape is reported by [`Settings::proxy_servers`].
    #[serde(default)]
    pub proxy_servers: Option<serde_yaml::Value>,
    #[serde(default)]
    pub ssl_verify: Option<SslVerify>,
    /// Set when the file has a `channels` key, even with a null value.
    #[serde(skip)]
    channels_key: bool,
}

impl Settings {
    /// Parse settings from YAML text. Blank, comment-only or null input yields defaults.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self> {
        let blank = text
            .lines()
            .map(str::trim)
            .all(|l| l.is_empty() || l.starts_with('#') || l == "---");
        if blank {
            return Ok(Self::default());
        }
        let parse_error = |source| ChannelError::ParseSettings {
            path: path.to_path_buf(),
            source,
        };
        let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(parse_error)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        let channels_key = value.get("channels").is_some();
        let mut settings: Self = serde_yaml::from_value(value).map_err(parse_error)?;
        settings.channels_key = channels_key;
        Ok(settings)
    }

    /// Whether the file names its own channel list (`channels:` present,
    /// possibly empty or null).
    pub fn declares_channels(&self) -> bool {
        self.channels_key || self.channels.is_some()
    }

    /// Whether a token may be attached to the channel alias (default true).
    pub fn add_token(&self) -> bool {
        self.add_anaconda_token
            .or(self.add_binstar_token)
            .unwrap_or(true)
    }

    pub fn allow_other_channels(&self) -> bool {
        self.allow_other_channels.unwrap_or(true)
    }

    pub fn offline(&self) -> bool {
        self.offline.unwrap_or(false)
    }

    /// Proxy servers by scheme. `path` is only used for the error message.
    pub fn proxy_servers(&self, path: &Path) -> Result<BTreeMap<String, String>> {
        let invalid = || ChannelError::InvalidProxyServers {
            path: path.to_path_buf(),
        };
        let mapping = match &self.proxy_servers {
            None | Some(serde_yaml::Value::Null) => return Ok(BTreeMap::new()),
            Some(serde_yaml::Value::Mapping(m)) => m,
            Some(_) => return Err(invalid()),
        };
        mapping
            .iter()
            .map(|(k, v)| match (k.as_str(), v.as_str()) {
                (Some(k), Some(v)) => Ok((k.to_string(), v.to_string())),
                _ => Err(invalid()),
            })
            .collect()
    }
}

/// A settings file that exists on disk, with its parsed contents.
#[derive(Debug, Clone)]
pub struct RcFile {
    pub path: PathBuf,
    pub settings: Settings,
}

impl RcFile {
    /// Load the file at `path`; `Ok(None)` if it is not a regular file.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let data = fs::read_to_string(path).map_err(|source| ChannelError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Settings::from_yaml(&data, path)?;
        tracing::debug!("loaded settings from {}", path.display());
        Ok(Some(Self {
            path: path.to_path_buf(),
            settings,
        }))
    }

    /// The `channels` list, rejecting a nested `system` entry.
    pub fn channels(&self) -> Result<Vec<String>> {
        let channels = self.settings.channels.clone().unwrap_or_default();
        if channels.iter().any(|c| c == "system") {
            return Err(ChannelError::SystemInChannelList {
                path: self.path.clone(),
            });
        }
        Ok(channels)
    }
}

/// Where settings come from, plus the collaborators channel resolution needs.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// User settings file (may be absent or point at a missing file).
    pub user_rc: Option<PathBuf>,
    /// System policy file inside the install prefix.
    pub sys_rc: Option<PathBuf>,
    /// Build root for `local` channel discovery.
    pub local_build_root: Option<PathBuf>,
    /// Test-only base list; when set it replaces the configured channels.
    pub test_urls: Option<Vec<String>>,
}

impl LoadOptions {
    /// Fill options from the environment: [`CONDARC_ENV`], [`ROOT_PREFIX_ENV`],
    /// [`BUILD_ROOT_ENV`], [`TEST_URLS_ENV`] and the home directory.
    pub fn from_env() -> Self {
        let root_prefix = std::env::var_os(ROOT_PREFIX_ENV).map(PathBuf::from);
        let sys_rc = root_prefix.map(|p| p.join(RC_FILE_NAME));
        let user_default = dirs::home_dir().map(|h| h.join(RC_FILE_NAME));
        let condarc = std::env::var(CONDARC_ENV).ok();

        Self {
            user_rc: discover_rc_path(
                condarc.as_deref(),
                user_default.as_deref(),
                sys_rc.as_deref(),
            ),
            sys_rc,
            local_build_root: std::env::var_os(BUILD_ROOT_ENV).map(PathBuf::from),
            test_urls: std::env::var(TEST_URLS_ENV)
                .ok()
                .and_then(|v| parse_test_urls(&v)),
        }
    }
}

/// Pick the settings file to use as "user" settings.
///
/// `CONDARC` wins (a single space means none); otherwise the first existing of
/// the home file and the system file.
pub fn discover_rc_path(
    condarc_env: Option<&str>,
    user_default: Option<&Path>,
    sys_rc: Option<&Path>,
) -> Option<PathBuf> {
    match condarc_env {
        Some(" ") => return None,
        Some(p) if !p.is_empty() => return Some(PathBuf::from(p)),
        _ => {}
    }
    [user_default, sys_rc]
        .into_iter()
        .flatten()
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
}

fn parse_test_urls(value: &str) -> Option<Vec<String>> {
    let urls: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    if urls.is_empty() {
        None
    } else {
        Some(urls)
    }
}
