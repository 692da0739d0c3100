//! `chanconf redact <url>...` – hide embedded tokens.

use anyhow::Result;
use chanconf_core::ChannelContext;
use std::io::Write;

pub fn run_redact(ctx: &ChannelContext, urls: &[String], out: &mut impl Write) -> Result<()> {
    for url in urls {
        writeln!(out, "{}", ctx.redact(url))?;
    }
    Ok(())
}
