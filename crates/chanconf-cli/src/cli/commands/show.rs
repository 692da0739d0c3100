//! `chanconf show` – effective settings relevant to channel resolution.

use anyhow::Result;
use chanconf_core::ChannelContext;
use std::io::Write;

pub fn run_show(ctx: &ChannelContext, out: &mut impl Write) -> Result<()> {
    let snapshot = ctx.snapshot();
    let path_or_none = |rc: Option<&chanconf_core::RcFile>| {
        rc.map(|rc| rc.path.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    writeln!(out, "{:<20} {}", "user settings:", path_or_none(snapshot.user.as_ref()))?;
    writeln!(out, "{:<20} {}", "system settings:", path_or_none(snapshot.system.as_ref()))?;
    writeln!(out, "{:<20} {}", "channel alias:", ctx.redact(&ctx.alias().prefix()))?;
    writeln!(out, "{:<20} {}", "platform:", ctx.subdir())?;
    writeln!(out, "{:<20} {}", "add token:", snapshot.add_token)?;
    writeln!(out, "{:<20} {}", "offline:", snapshot.offline)?;
    writeln!(
        out,
        "{:<20} {}",
        "restricted:",
        ctx.allowed_channels().is_some()
    )?;
    if !snapshot.proxy_servers.is_empty() {
        let schemes: Vec<&str> = snapshot.proxy_servers.keys().map(String::as_str).collect();
        writeln!(out, "{:<20} {}", "proxies:", schemes.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{context, output};

    #[test]
    fn shows_alias_and_files() {
        let ctx = context(
            Some("channel_alias: https://example.org/\nproxy_servers:\n  https: http://p:1\n"),
            None,
        );
        let mut buf = Vec::new();
        run_show(&ctx, &mut buf).unwrap();
        let text = output(buf);
        assert!(text.contains("/home/u/.condarc"));
        assert!(text.contains("https://example.org/"));
        assert!(text.contains("linux-64"));
        assert!(text.contains("proxies:"));
        assert!(!text.contains("http://p:1"));
    }
}
