use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("{service} request failed: {source}")]
    Upstream {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} answered with status {status}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
    },
    #[error("{0} did not respond in time")]
    Timeout(&'static str),
    #[error(transparent)]
    Core(#[from] myroutes_core::Error),
}

impl ApiError {
    pub fn upstream(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| {
            if source.is_timeout() {
                Self::Timeout(service)
            } else {
                Self::Upstream { service, source }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        use myroutes_core::Error as Core;

        match self {
            Self::BadRequest(_) | Self::Core(Core::InvalidData(_)) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { .. }
            | Self::UpstreamStatus { .. }
            | Self::Core(
                Core::UpstreamRouting(_) | Core::PolylineDecoding(_) | Core::Json(_),
            ) => StatusCode::BAD_GATEWAY,
            Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("{self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
