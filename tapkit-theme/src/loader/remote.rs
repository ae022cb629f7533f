//! Blocking fetch of remote `.json` documents.
//!
//! The request itself runs asynchronously on a dedicated thread with its own
//! single-threaded runtime; the calling thread waits on a oneshot channel until
//! the response (or failure) arrives. There is no timeout unless the caller
//! opts in through [RemoteOptions::timeout], so a hung server hangs the caller.

use std::time::Duration;

use url::Url;

use crate::error::LoadError;

/// Options for remote document loads.
#[derive(Debug, Clone, Default)]
pub struct RemoteOptions {
    /// Optional request timeout. `None` waits for as long as the transport does.
    pub timeout: Option<Duration>,
}

impl RemoteOptions {
    /// Set a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Check that `url` is an absolute http(s) URL whose path ends in `.json`.
///
/// Runs before any network access.
pub fn validate_url(url: &str) -> Result<Url, LoadError> {
    let parsed = Url::parse(url).map_err(|e| LoadError::invalid_url(url, e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LoadError::invalid_url(
            url,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    if !parsed.path().to_ascii_lowercase().ends_with(".json") {
        return Err(LoadError::invalid_url(url, "path does not end in .json"));
    }

    Ok(parsed)
}

/// Fetch `url` and block the calling thread until the body is available.
///
/// Must not be called from inside an async runtime.
#[cfg(feature = "remote")]
pub fn fetch_blocking(url: &Url, options: &RemoteOptions) -> Result<Vec<u8>, LoadError> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let request_url = url.clone();
    let timeout = options.timeout;

    log::debug!("Fetching theme document from {}", url);

    std::thread::Builder::new()
        .name("tapkit-fetch".to_string())
        .spawn(move || {
            let _ = tx.send(fetch(request_url, timeout));
        })
        .map_err(|e| LoadError::network(url.as_str(), e))?;

    rx.blocking_recv()
        .map_err(|_| LoadError::network(url.as_str(), "fetch thread exited without a response"))?
}

#[cfg(feature = "remote")]
fn fetch(url: Url, timeout: Option<Duration>) -> Result<Vec<u8>, LoadError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LoadError::network(url.as_str(), e))?;

    runtime.block_on(async {
        let mut request = reqwest::Client::new().get(url.clone());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| LoadError::network(url.as_str(), e))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::network(url.as_str(), e))?;

        Ok(body.to_vec())
    })
}

/// Remote loading is compiled out; every fetch fails.
#[cfg(not(feature = "remote"))]
pub fn fetch_blocking(url: &Url, _options: &RemoteOptions) -> Result<Vec<u8>, LoadError> {
    Err(LoadError::network(url.as_str(), "remote loading is disabled"))
}
