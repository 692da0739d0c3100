//! CLI for inspecting channel configuration.

mod commands;

use anyhow::{Context, Result};
use chanconf_core::{ChannelContext, LoadOptions};
use clap::{CommandFactory, Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use commands::{
    run_allowed, run_canonical, run_completions, run_priority, run_redact, run_show, run_urls,
};

/// Top-level CLI for chanconf.
#[derive(Debug, Parser)]
#[command(name = "chanconf")]
#[command(about = "Resolve and inspect package channel configuration", long_about = None)]
pub struct Cli {
    /// User settings file (default: $CONDARC, ~/.condarc, then the system file).
    #[arg(long, global = true, value_name = "PATH")]
    pub rc: Option<PathBuf>,

    /// System policy file (default: $CONDA_ROOT/.condarc).
    #[arg(long, global = true, value_name = "PATH")]
    pub sys_rc: Option<PathBuf>,

    /// Build root for the `local` channel (default: $CONDA_BLD_PATH).
    #[arg(long, global = true, value_name = "DIR")]
    pub build_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print platform-qualified channel URLs.
    Urls {
        /// Channel specifiers to expand instead of the configured channels.
        specifiers: Vec<String>,
        /// Platform subdir (e.g. linux-64); defaults to this machine's.
        #[arg(long)]
        platform: Option<String>,
        /// Keep only file:// channels.
        #[arg(long)]
        offline: bool,
        /// Print a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Print channel URLs with their canonical labels and priority tiers.
    Priority {
        /// Platform subdir (e.g. linux-64); defaults to this machine's.
        #[arg(long)]
        platform: Option<String>,
        /// Keep only file:// channels.
        #[arg(long)]
        offline: bool,
        /// Print a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical label of a channel URL.
    Canonical {
        url: String,
        /// Treat URL as a platform URL and also print its channel root.
        #[arg(long)]
        root: bool,
    },

    /// Print the channel URLs allowed by system policy.
    Allowed,

    /// Print URLs with embedded tokens hidden.
    Redact {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Show the effective alias, settings files and platform.
    Show,

    /// Generate shell completions on stdout.
    Completions {
        shell: clap_complete::Shell,
    },
}

impl Cli {
    /// Load options from the environment, overridden by command-line flags.
    pub fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::from_env();
        if let Some(rc) = &self.rc {
            options.user_rc = Some(rc.clone());
        }
        if let Some(sys_rc) = &self.sys_rc {
            options.sys_rc = Some(sys_rc.clone());
        }
        if let Some(root) = &self.build_root {
            options.local_build_root = Some(root.clone());
        }
        options
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let options = cli.load_options();
        tracing::debug!("load options: {:?}", options);
        let mut out = io::stdout().lock();

        match cli.command {
            CliCommand::Urls {
                specifiers,
                platform,
                offline,
                json,
            } => {
                let mut ctx = load_context(&options)?;
                run_urls(&mut ctx, &specifiers, platform.as_deref(), offline, json, &mut out)?;
            }
            CliCommand::Priority {
                platform,
                offline,
                json,
            } => {
                let mut ctx = load_context(&options)?;
                run_priority(&mut ctx, platform.as_deref(), offline, json, &mut out)?;
            }
            CliCommand::Canonical { url, root } => {
                run_canonical(&load_context(&options)?, &url, root, &mut out)?
            }
            CliCommand::Allowed => run_allowed(&load_context(&options)?, &mut out)?,
            CliCommand::Redact { urls } => run_redact(&load_context(&options)?, &urls, &mut out)?,
            CliCommand::Show => run_show(&load_context(&options)?, &mut out)?,
            // Needs no settings, so it works even with a broken settings file.
            CliCommand::Completions { shell } => {
                run_completions(shell, &mut Cli::command(), &mut out)?
            }
        }

        Ok(())
    }
}

fn load_context(options: &LoadOptions) -> Result<ChannelContext> {
    ChannelContext::load_without_tokens(options).context("load channel configuration")
}

#[cfg(test)]
mod tests;
