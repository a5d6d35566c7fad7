//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_REGISTRY_TIMEOUT_SECS};
use crate::{ZrcError, ZrcResult};
use std::time::Duration;
use zrc_uuid::ResourceUrls;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    urls: ResourceUrls,
    page_size: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ZrcError::Configuration`] if `base_url` is not an absolute http(s) URL or
    /// `page_size` is zero.
    pub fn new(base_url: &str, page_size: usize) -> ZrcResult<Self> {
        let urls =
            ResourceUrls::new(base_url).map_err(|e| ZrcError::Configuration(e.to_string()))?;

        if page_size == 0 {
            return Err(ZrcError::Configuration(
                "page size must be greater than zero".into(),
            ));
        }

        Ok(Self { urls, page_size })
    }

    pub fn urls(&self) -> &ResourceUrls {
        &self.urls
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the page size from an optional string value.
///
/// If `value` is `None` or blank, returns [`DEFAULT_PAGE_SIZE`].
pub fn page_size_from_env_value(value: Option<String>) -> ZrcResult<usize> {
    non_blank(value)
        .map(|v| {
            v.parse::<usize>()
                .map_err(|e| ZrcError::Configuration(format!("invalid page size '{v}': {e}")))
        })
        .transpose()
        .map(|parsed| parsed.unwrap_or(DEFAULT_PAGE_SIZE))
}

/// Parse the outbound registry timeout (whole seconds) from an optional string value.
pub fn registry_timeout_from_env_value(value: Option<String>) -> ZrcResult<Duration> {
    let secs = non_blank(value)
        .map(|v| {
            v.parse::<u64>().map_err(|e| {
                ZrcError::Configuration(format!("invalid registry timeout '{v}': {e}"))
            })
        })
        .transpose()?
        .unwrap_or(DEFAULT_REGISTRY_TIMEOUT_SECS);

    Ok(Duration::from_secs(secs))
}
