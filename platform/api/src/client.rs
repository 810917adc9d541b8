use std::{marker::PhantomData, time::Duration};

use entity::{Record, RecordId};
use reqwest::{RequestBuilder, Response};
use tracing::{debug, warn};
use url::Url;

use crate::{ApiError, ApiResult, Resource};

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    /// `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
        }
    }
}

/// Thin wrapper over a shared `reqwest::Client` rooted at the API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.to_string()));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::transport)?;
        Ok(Self {
            http,
            base: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Typed handle on one collection, e.g. `/departments`.
    pub fn resource<R: Record>(&self) -> Resource<R> {
        Resource {
            client: self.clone(),
            _record: PhantomData,
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn collection_url(&self, collection: &str) -> ApiResult<Url> {
        self.url_for(&[collection])
    }

    pub(crate) fn member_url(&self, collection: &str, id: &RecordId) -> ApiResult<Url> {
        self.url_for(&[collection, &id.to_string()])
    }

    fn url_for(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and turn any non-2xx answer into [`ApiError::Status`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "api request failed");
            ApiError::transport(err)
        })?;
        let status = response.status();
        debug!(%status, url = %response.url(), "api response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(%status, body = %body, "api returned an error status");
        Err(ApiError::status(status.as_u16(), &body))
    }
}
