use reqwest::Client;

use crate::prelude::*;

/// Shared client of the history service, without a request timeout.
pub fn try_new() -> Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build the HTTP client")
}
