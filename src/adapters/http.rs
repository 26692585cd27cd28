use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AnalyzerError, Result};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// 依配置建立共用的 HTTP client
pub fn build_http_client<C: ConfigProvider + ?Sized>(config: &C) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent().to_string());

    if let Some(timeout) = config.timeout_seconds() {
        builder = builder.timeout(Duration::from_secs(timeout));
    }

    Ok(builder.build()?)
}

pub(crate) fn is_rate_limited(response: &Response) -> bool {
    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => true,
        StatusCode::FORBIDDEN => response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim() == "0")
            .unwrap_or(false),
        _ => false,
    }
}

/// Maps a non-success response onto the generic status errors.
pub(crate) fn status_error(response: &Response) -> AnalyzerError {
    let url = response.url().to_string();
    if is_rate_limited(response) {
        AnalyzerError::RateLimitError { url }
    } else {
        AnalyzerError::HttpStatusError {
            status: response.status().as_u16(),
            url,
        }
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
