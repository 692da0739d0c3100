//! `chanconf urls` – print platform-qualified channel URLs.

use anyhow::Result;
use chanconf_core::ChannelContext;
use std::io::Write;

/// Expand `specifiers`, or the configured channels when none are given.
pub fn run_urls(
    ctx: &mut ChannelContext,
    specifiers: &[String],
    platform: Option<&str>,
    offline: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let urls = if specifiers.is_empty() {
        ctx.channel_urls(platform, offline)?
    } else {
        let offline = offline || ctx.snapshot().offline;
        ctx.expand(specifiers, platform, offline)?
    };
    let urls: Vec<String> = urls.iter().map(|u| ctx.redact(u)).collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &urls)?;
        writeln!(out)?;
    } else {
        for url in &urls {
            writeln!(out, "{url}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{context, output};

    #[test]
    fn prints_defaults_one_per_line() {
        let mut ctx = context(None, None);
        let mut buf = Vec::new();
        run_urls(&mut ctx, &[], None, false, false, &mut buf).unwrap();
        let text = output(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "https://repo.continuum.io/pkgs/free/linux-64/");
        assert_eq!(lines[3], "https://repo.continuum.io/pkgs/pro/noarch/");
    }

    #[test]
    fn explicit_specifiers_as_json() {
        let mut ctx = context(Some("channel_alias: https://example.org\n"), None);
        let mut buf = Vec::new();
        run_urls(&mut ctx, &["myname".to_string()], Some("osx-64"), false, true, &mut buf).unwrap();
        let urls: Vec<String> = serde_json::from_str(&output(buf)).unwrap();
        assert_eq!(
            urls,
            vec!["https://example.org/myname/osx-64/", "https://example.org/myname/noarch/"]
        );
    }
}
