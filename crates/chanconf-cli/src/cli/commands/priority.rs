//! `chanconf priority` – configured channel URLs with labels and tiers.

use anyhow::Result;
use chanconf_core::{ChannelContext, PriorityEntry};
use std::io::Write;

pub fn run_priority(
    ctx: &mut ChannelContext,
    platform: Option<&str>,
    offline: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let urls = ctx.channel_urls(platform, offline)?;
    let table = ctx.assign_priority(&urls);
    let entries: Vec<PriorityEntry> = table
        .iter()
        .map(|e| PriorityEntry {
            url: ctx.redact(&e.url),
            ..e.clone()
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{:<4} {:<24} {}", "PRIO", "CHANNEL", "URL")?;
        for e in &entries {
            writeln!(out, "{:<4} {:<24} {}", e.priority, e.label, e.url)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{context, output};

    #[test]
    fn table_lists_tiers() {
        let mut ctx = context(Some("channels: [conda-forge, defaults]\n"), None);
        let mut buf = Vec::new();
        run_priority(&mut ctx, None, false, false, &mut buf).unwrap();
        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("PRIO"));
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("0    conda-forge"));
        assert!(lines[3].starts_with("1    defaults"));
    }

    #[test]
    fn json_entries() {
        let mut ctx = context(None, None);
        let mut buf = Vec::new();
        run_priority(&mut ctx, Some("win-64"), false, true, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output(buf)).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["label"], "defaults");
        assert_eq!(entries[0]["priority"], 0);
        assert_eq!(entries[0]["url"], "https://repo.continuum.io/pkgs/free/win-64/");
    }
}
