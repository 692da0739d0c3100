//! Authentication tokens embedded in channel URLs.
//!
//! Private channels are addressed as `<alias>/t/<token>/<channel>/...`. The
//! codec hides or removes that segment before a URL is displayed or compared;
//! the provider is the pluggable source of a token for the configured alias.

mod codec;
mod provider;

pub use codec::{TokenCodec, TOKEN_PLACEHOLDER};
pub use provider::{
    channel_domain_for_api, NoTokenProvider, ProvidedToken, StaticTokenProvider, TokenProvider,
    TokenProviderError,
};
