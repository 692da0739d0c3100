//! Channel priority tiers.

use std::collections::HashMap;

use serde::Serialize;

use crate::canonical::channel_root;
use crate::context::ChannelContext;

/// One channel URL with its label and tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityEntry {
    /// Channel URL with exactly one trailing slash.
    pub url: String,
    /// Canonical label of the channel root.
    pub label: String,
    /// Lower tiers are preferred.
    pub priority: usize,
}

/// Channel URLs in first-seen order with their priority tiers.
#[derive(Debug, Clone, Default)]
pub struct PriorityTable {
    entries: Vec<PriorityEntry>,
    index: HashMap<String, usize>,
}

impl PriorityTable {
    /// Entry for `url`; the trailing slash is normalized first.
    pub fn get(&self, url: &str) -> Option<&PriorityEntry> {
        self.index.get(&normalize(url)).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(&normalize(url))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriorityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct tiers.
    pub fn tier_count(&self) -> usize {
        self.entries.last().map_or(0, |e| e.priority + 1)
    }

    fn push(&mut self, entry: PriorityEntry) {
        self.index.insert(entry.url.clone(), self.entries.len());
        self.entries.push(entry);
    }
}

fn normalize(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

impl ChannelContext {
    /// Assign priority tiers to channel URLs.
    ///
    /// Duplicates (after slash normalization) keep their first position. The
    /// tier starts at 0 and goes up by one whenever the canonical label of the
    /// channel root differs from the previous entry's, so consecutive URLs of
    /// one channel share a tier.
    pub fn assign_priority<S: AsRef<str>>(&self, channels: &[S]) -> PriorityTable {
        let mut table = PriorityTable::default();
        let mut last: Option<String> = None;
        let mut priority = 0;

        for channel in channels {
            let url = normalize(channel.as_ref());
            if table.contains(&url) {
                continue;
            }
            let label = self.canonical_label(Some(channel_root(&url)));
            match &last {
                Some(prev) if *prev != label => priority += 1,
                _ => {}
            }
            last = Some(label.clone());
            table.push(PriorityEntry {
                url,
                label,
                priority,
            });
        }
        table
    }
}
