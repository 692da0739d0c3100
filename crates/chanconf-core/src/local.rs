//! Discovery cache for the `local` build channel.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Locally built packages channel.
///
/// Populated on first use while the build root exists, then reused until
/// [`LocalChannels::invalidate`] is called; the build output location does not
/// move while the process runs. Lookups go through a shared reference so that
/// label resolution can discover the channel too.
#[derive(Debug, Clone, Default)]
pub struct LocalChannels {
    build_root: Option<PathBuf>,
    discovered: RefCell<Vec<String>>,
}

impl LocalChannels {
    pub fn new(build_root: Option<PathBuf>) -> Self {
        Self {
            build_root,
            discovered: RefCell::new(Vec::new()),
        }
    }

    pub fn build_root(&self) -> Option<&Path> {
        self.build_root.as_deref()
    }

    /// Local channel URLs, discovering the build root if nothing is cached.
    pub fn urls(&self) -> Vec<String> {
        let mut discovered = self.discovered.borrow_mut();
        if discovered.is_empty() {
            if let Some(url) = self.discover() {
                discovered.push(url);
            }
        }
        discovered.clone()
    }

    /// Forget discovered URLs so the next [`LocalChannels::urls`] checks again.
    pub fn invalidate(&mut self) {
        self.discovered.get_mut().clear();
    }

    fn discover(&self) -> Option<String> {
        let root = self.build_root.as_deref()?;
        if !root.exists() {
            tracing::debug!(path = %root.display(), "local build root missing");
            return None;
        }
        let url = file_url(root);
        match &url {
            Some(url) => tracing::debug!(%url, "discovered local channel"),
            None => {
                tracing::warn!(path = %root.display(), "cannot express build root as file URL")
            }
        }
        url
    }
}

/// `file://` URL for a directory, without trailing slash.
fn file_url(path: &Path) -> Option<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    let url = url::Url::from_directory_path(&absolute).ok()?;
    Some(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn no_build_root_yields_nothing() {
        let local = LocalChannels::new(None);
        assert!(local.urls().is_empty());
    }

    #[test]
    fn missing_build_root_yields_nothing() {
        let dir = tempdir().unwrap();
        let local = LocalChannels::new(Some(dir.path().join("conda-bld")));
        assert!(local.urls().is_empty());
        assert!(local.urls().is_empty());
    }

    #[test]
    fn existing_build_root_is_discovered_once() {
        let dir = tempdir().unwrap();
        let mut local = LocalChannels::new(Some(dir.path().to_path_buf()));
        let urls = local.urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].starts_with("file:///"));
        assert!(!urls[0].ends_with('/'));

        // Cached: removing the directory does not change the answer.
        let path = dir.path().to_path_buf();
        drop(dir);
        assert!(!path.exists());
        assert_eq!(local.urls(), urls);

        local.invalidate();
        assert!(local.urls().is_empty());
    }
}
