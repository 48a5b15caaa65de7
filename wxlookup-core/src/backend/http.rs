use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::debug;

use crate::{
    Config,
    error::SubmitError,
    model::{BackendPayload, WeatherRequestBody},
};

use super::{WeatherBackend, classify_response};

/// `WeatherBackend` over plain HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    endpoint: Url,
    http: Client,
}

impl HttpBackend {
    /// Client without a request timeout.
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint, http: Client::new() }
    }

    pub fn with_timeout(endpoint: Url, timeout: Option<Duration>) -> Result<Self> {
        let Some(timeout) = timeout else {
            return Ok(Self::new(endpoint));
        };

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { endpoint, http })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(config.endpoint_url()?, config.request_timeout())
    }

    fn record_url(&self, id: &str) -> Result<Url, SubmitError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| SubmitError::transport(format!("endpoint {} has no path", self.endpoint)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn read(&self, res: Response) -> Result<BackendPayload, SubmitError> {
        let status = res.status();
        let body = res.text().await.map_err(SubmitError::transport)?;
        debug!(%status, bytes = body.len(), "backend responded");
        classify_response(status, &body)
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    async fn submit(&self, request: &WeatherRequestBody) -> Result<BackendPayload, SubmitError> {
        debug!(
            endpoint = %self.endpoint,
            location = %request.location,
            date = %request.date,
            "submitting weather request"
        );

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(SubmitError::transport)?;

        self.read(res).await
    }

    async fn recall(&self, id: &str) -> Result<BackendPayload, SubmitError> {
        let url = self.record_url(id)?;
        debug!(%url, "recalling stored weather record");

        let res = self.http.get(url).send().await.map_err(SubmitError::transport)?;
        self.read(res).await
    }
}
