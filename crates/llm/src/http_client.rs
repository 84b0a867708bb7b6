//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with proxy and
//! timeout support.

use std::time::Duration;

use spec_rag_core::proxy::ProxyConfig;

use crate::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` with the resolved proxy configuration.
///
/// - `Some(proxy)` -> configure proxy on the client
/// - `None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
///
/// `timeout_secs` bounds each whole request, including reading the body.
pub fn build_http_client(
    proxy: Option<&ProxyConfig>,
    timeout_secs: u64,
) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs));
    match proxy {
        Some(cfg) => {
            let url = cfg.url();
            let mut p = reqwest::Proxy::all(&url).map_err(|e| LlmError::InvalidRequest {
                message: format!("invalid proxy URL {}: {}", url, e),
            })?;
            if let (Some(u), Some(pw)) = (&cfg.username, &cfg.password) {
                p = p.basic_auth(u, pw);
            }
            builder = builder.proxy(p);
        }
        None => {
            builder = builder.no_proxy();
        }
    }
    builder.build().map_err(|e| LlmError::NetworkError {
        message: format!("failed to build HTTP client: {}", e),
    })
}
