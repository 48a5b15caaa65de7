use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    error::SubmitError,
    model::{BackendPayload, RejectionBody, WeatherRequestBody},
};

pub mod http;

pub use http::HttpBackend;

/// The weather service the form talks to.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    /// `POST` a form submission.
    async fn submit(&self, request: &WeatherRequestBody) -> Result<BackendPayload, SubmitError>;

    /// Fetch a record the backend stored earlier.
    async fn recall(&self, id: &str) -> Result<BackendPayload, SubmitError>;
}

/// Map a received response onto the success payload or a rejection.
///
/// A success status with a body that is not JSON counts as a transport failure:
/// nothing usable came back.
pub fn classify_response(status: StatusCode, body: &str) -> Result<BackendPayload, SubmitError> {
    if status.is_success() {
        return BackendPayload::from_json(body).map_err(|err| {
            warn!(%status, body = %truncate_body(body), "undecodable success body");
            SubmitError::transport(format!("undecodable response body: {err}"))
        });
    }

    let detail = serde_json::from_str::<RejectionBody>(body)
        .ok()
        .and_then(|b| b.detail);
    debug!(%status, body = %truncate_body(body), "backend rejected request");

    Err(SubmitError::rejection(status.as_u16(), detail))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
