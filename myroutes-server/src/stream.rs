//! Reverse proxy for camera streams.
//!
//! Camera servers refuse cross-origin playback and some expect a browser
//! `Referer`. HLS manifests are rewritten so that every playlist, segment
//! and key they reference is fetched through this proxy as well.

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};
use url::{Url, form_urlencoded};

use crate::{ApiError, config::StreamConfig};

pub const PROXY_PATH: &str = "/api/proxy-stream";

const OFFLINE_MESSAGE: &str = "This CCTV stream is currently offline or the URL is no longer \
     valid. The camera may be disconnected or undergoing maintenance.";
const SLOW_HOST_TIMEOUT_MESSAGE: &str = "Stream server not responding - this CCTV may be \
     offline or the stream URL may be expired. Try opening in a new tab or use an alternative \
     camera.";
const TIMEOUT_MESSAGE: &str = "Request timeout - stream may be slow or offline";

#[derive(Debug, Clone)]
pub struct StreamProxy {
    client: Client,
    config: StreamConfig,
}

impl StreamProxy {
    pub fn new(client: Client, config: StreamConfig) -> Self {
        Self { client, config }
    }

    fn is_slow_host(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| self.config.slow_hosts.iter().any(|slow| slow == host))
    }

    /// Fetches `target` and relays it with permissive CORS headers.
    ///
    /// A missing stream (404) is answered with 200 and a JSON error so that
    /// players can show a message instead of retrying. Other upstream
    /// failures keep their status.
    pub async fn fetch(&self, target: &str) -> Result<Response, ApiError> {
        let url = Url::parse(target)
            .map_err(|e| ApiError::BadRequest(format!("Invalid stream URL '{target}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::BadRequest(format!(
                "Unsupported stream URL scheme '{}'",
                url.scheme()
            )));
        }

        let slow = self.is_slow_host(&url);
        let mut request = self.client.get(url.as_str()).header(header::ACCEPT, "*/*");
        if slow {
            request = request.timeout(Duration::from_secs(self.config.slow_timeout_secs));
        } else {
            request = request
                .timeout(Duration::from_secs(self.config.timeout_secs))
                .header(header::USER_AGENT, &self.config.user_agent)
                .header(header::REFERER, &self.config.referer)
                .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9");
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!("Stream {url} timed out");
                let message = if slow {
                    SLOW_HOST_TIMEOUT_MESSAGE
                } else {
                    TIMEOUT_MESSAGE
                };
                return Ok(json_response(StatusCode::GATEWAY_TIMEOUT, json!({ "error": message })));
            }
            Err(e) => return Err(ApiError::upstream("Stream server")(e)),
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("Stream {url} not found");
            return Ok(json_response(
                StatusCode::OK,
                json!({
                    "error": "Stream not available",
                    "message": OFFLINE_MESSAGE,
                    "url": target,
                    "status": 404,
                }),
            ));
        }

        if !status.is_success() {
            let code =
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            return Ok(json_response(
                code,
                json!({
                    "error": format!("Failed to fetch stream: {status}"),
                    "url": target,
                    "contentType": content_type,
                    "status": status.as_u16(),
                }),
            ));
        }

        let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());
        let body = if is_manifest(&content_type, &url) {
            let text = response
                .text()
                .await
                .map_err(ApiError::upstream("Stream server"))?;
            Body::from(rewrite_manifest(&text, &url))
        } else {
            let bytes = response
                .bytes()
                .await
                .map_err(ApiError::upstream("Stream server"))?;
            Body::from(bytes)
        };

        let mut response = Response::new(body);
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
        insert_cors_headers(headers);
        Ok(response)
    }
}

/// Answer to a bare `OPTIONS` on the proxy
pub fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    insert_cors_headers(headers);
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

fn insert_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, HEAD, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Range, Content-Type"),
    );
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    let mut response = (status, axum::Json(body)).into_response();
    insert_cors_headers(response.headers_mut());
    response
}

fn is_manifest(content_type: &str, url: &Url) -> bool {
    content_type.to_ascii_lowercase().contains("mpegurl") || url.as_str().contains(".m3u8")
}

/// Proxy path for `target`
pub fn proxy_url(target: &Url) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", target.as_str())
        .finish();
    format!("{PROXY_PATH}?{query}")
}

/// Routes every URI in an HLS manifest through the proxy.
///
/// Blank lines and tags without a `URI=` attribute pass through unchanged.
/// Relative references are resolved against `base`; references that cannot
/// be resolved are left as they are.
pub fn rewrite_manifest(text: &str, base: &Url) -> String {
    text.split('\n')
        .map(|line| rewrite_line(line, base))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_line(line: &str, base: &Url) -> String {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return line.to_string();
    }
    if trimmed.starts_with('#') {
        if trimmed.contains("URI=") {
            return rewrite_uri_attributes(line, base);
        }
        return line.to_string();
    }

    match base.join(trimmed) {
        Ok(target) => proxy_url(&target),
        Err(_) => line.to_string(),
    }
}

fn rewrite_uri_attributes(line: &str, base: &Url) -> String {
    const ATTRIBUTE: &str = "URI=\"";

    let mut out = String::with_capacity(line.len() + 64);
    let mut rest = line;
    while let Some(start) = rest.find(ATTRIBUTE) {
        let value_start = start + ATTRIBUTE.len();
        let Some(len) = rest[value_start..].find('"') else {
            break;
        };
        let uri = &rest[value_start..value_start + len];

        out.push_str(&rest[..value_start]);
        match base.join(uri) {
            Ok(target) if !uri.is_empty() => out.push_str(&proxy_url(&target)),
            _ => out.push_str(uri),
        }
        out.push('"');
        rest = &rest[value_start + len + 1..];
    }
    out.push_str(rest);
    out
}
