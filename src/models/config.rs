//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::pagination::PageLimits;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HMAC secret used to verify bearer tokens.
    pub secret: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "max_page_size")]
    pub max_page_size: usize,
    #[serde(default = "cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "cache_capacity")]
    pub cache_capacity: u64,
}

fn default_page_size() -> usize {
    crate::pagination::params::DEFAULT_LIMIT
}

fn max_page_size() -> usize {
    crate::pagination::params::MAX_LIMIT
}

fn cache_ttl_secs() -> u64 {
    30
}

fn cache_capacity() -> u64 {
    10_000
}

impl ServerConfig {
    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(self.default_page_size, self.max_page_size)
    }
}
