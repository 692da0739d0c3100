//! `chanconf canonical <url>` – short label of a channel URL.

use anyhow::Result;
use chanconf_core::ChannelContext;
use std::io::Write;

/// Print the label; with `root`, print `<root>\t<label>` for a platform URL.
pub fn run_canonical(
    ctx: &ChannelContext,
    url: &str,
    root: bool,
    out: &mut impl Write,
) -> Result<()> {
    if root {
        let (channel, label) = ctx.url_to_channel(Some(url));
        let channel = channel.map(|c| ctx.redact(&c)).unwrap_or_default();
        writeln!(out, "{channel}\t{label}")?;
    } else {
        writeln!(out, "{}", ctx.canonical_label(Some(url)))?;
    }
    Ok(())
}
