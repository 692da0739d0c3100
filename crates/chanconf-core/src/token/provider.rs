//! Token provider capability.

use std::fmt;

/// A token handed out by a provider, with the channel domain it is valid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedToken {
    /// Channel domain (e.g. `https://conda.anaconda.org/`), always slash-terminated.
    pub domain: String,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenProviderError {
    /// No provider is installed or configured.
    #[error("token provider not available")]
    Unavailable,
    #[error("token provider failed: {0}")]
    Failed(String),
}

/// Source of authentication tokens for the channel alias.
///
/// Lookups may perform network or socket I/O and can block; callers that need
/// a deadline must impose it themselves.
pub trait TokenProvider: fmt::Debug {
    /// Look up a token for the given alias host.
    fn lookup(&self, host: &str) -> Result<Option<ProvidedToken>, TokenProviderError>;
}

/// Default provider: reports itself unavailable, so no token is ever attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTokenProvider;

impl TokenProvider for NoTokenProvider {
    fn lookup(&self, _host: &str) -> Result<Option<ProvidedToken>, TokenProviderError> {
        Err(TokenProviderError::Unavailable)
    }
}

/// Provider with a fixed API endpoint and optional token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    domain: String,
    token: Option<String>,
}

impl StaticTokenProvider {
    /// `api_url` is the service API endpoint; its channel domain is derived from it.
    pub fn new(api_url: &str, token: Option<String>) -> Self {
        Self {
            domain: channel_domain_for_api(api_url),
            token,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("domain", &self.domain)
            .field("token", &self.token.as_ref().map(|_| "<TOKEN>"))
            .finish()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn lookup(&self, _host: &str) -> Result<Option<ProvidedToken>, TokenProviderError> {
        Ok(self.token.as_ref().map(|token| ProvidedToken {
            domain: self.domain.clone(),
            token: token.clone(),
        }))
    }
}

/// Map a service API URL to the domain its channels are served from.
///
/// `https://api.anaconda.org` serves channels from `https://conda.anaconda.org/`.
/// The result is always slash-terminated.
pub fn channel_domain_for_api(api_url: &str) -> String {
    let mapped = match url::Url::parse(api_url) {
        Ok(mut parsed) => {
            let renamed = parsed
                .host_str()
                .and_then(|h| h.strip_prefix("api."))
                .map(|rest| format!("conda.{rest}"));
            if let Some(host) = renamed {
                // set_host only fails for hosts that could not have parsed.
                let _ = parsed.set_host(Some(&host));
            }
            parsed.to_string()
        }
        Err(_) => api_url.to_string(),
    };
    format!("{}/", mapped.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_host_maps_to_conda_host() {
        assert_eq!(
            channel_domain_for_api("https://api.anaconda.org"),
            "https://conda.anaconda.org/"
        );
        assert_eq!(
            channel_domain_for_api("https://api.example.com/"),
            "https://conda.example.com/"
        );
    }

    #[test]
    fn non_api_host_kept() {
        assert_eq!(
            channel_domain_for_api("https://repo.example.com/conda"),
            "https://repo.example.com/conda/"
        );
    }

    #[test]
    fn no_token_provider_is_unavailable() {
        assert!(matches!(
            NoTokenProvider.lookup("conda.anaconda.org"),
            Err(TokenProviderError::Unavailable)
        ));
    }

    #[test]
    fn static_provider_returns_token_and_domain() {
        let p = StaticTokenProvider::new("https://api.anaconda.org", Some("abcd-1234".into()));
        let t = p.lookup("conda.anaconda.org").unwrap().unwrap();
        assert_eq!(t.domain, "https://conda.anaconda.org/");
        assert_eq!(t.token, "abcd-1234");
    }

    #[test]
    fn static_provider_debug_hides_token() {
        let p = StaticTokenProvider::new("https://api.anaconda.org", Some("abcd-1234".into()));
        assert!(!format!("{p:?}").contains("abcd-1234"));
    }
}
