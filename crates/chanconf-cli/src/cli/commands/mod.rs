//! CLI command handlers. Each command is in its own file.
//!
//! Handlers write to the given writer so tests can capture output. URLs are
//! always redacted before they are printed.

mod allowed;
mod canonical;
mod completions;
mod priority;
mod redact;
mod show;
mod urls;

pub use allowed::run_allowed;
pub use canonical::run_canonical;
pub use completions::run_completions;
pub use priority::run_priority;
pub use redact::run_redact;
pub use show::run_show;
pub use urls::run_urls;
