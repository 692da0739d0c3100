//! `chanconf allowed` – channels permitted by system policy.

use anyhow::Result;
use chanconf_core::ChannelContext;
use std::io::Write;

pub fn run_allowed(ctx: &ChannelContext, out: &mut impl Write) -> Result<()> {
    match ctx.allowed_channels() {
        None => writeln!(out, "All channels allowed.")?,
        Some(urls) => {
            for url in urls {
                writeln!(out, "{}", ctx.redact(url))?;
            }
        }
    }
    Ok(())
}
