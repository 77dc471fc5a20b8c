//! NASPi REST client.
//!
//! Async HTTP client using `reqwest`; chunks go out as multipart forms.

use std::time::Duration;

use naspi_protocol::constants::{
    self, CANCEL_UPLOAD_PATH, LIST_FILES_PATH, PATH_QUERY, UPLOAD_CHUNK_PATH,
};
use naspi_protocol::messages::ErrorResponse;
use naspi_protocol::{CancelUploadRequest, ChunkFields, ListFilesResponse};
use reqwest::multipart::{Form, Part};
use tracing::trace;

use crate::backend::{BackendFuture, NasBackend};
use crate::error::BackendError;

/// [`NasBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client for `base_url` (e.g. `http://naspi.local:5000`)
    /// with the default request timeout.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, constants::DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::InvalidUrl(format!(
                "{base_url}: unsupported scheme"
            )));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Turns a non-2xx response into [`BackendError::Status`].
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl NasBackend for HttpBackend {
    fn upload_chunk(&self, fields: ChunkFields, data: Vec<u8>) -> BackendFuture<'_, ()> {
        Box::pin(async move {
            trace!(
                file = %fields.filename,
                chunk = fields.chunk_index,
                total = fields.total_chunks,
                bytes = data.len(),
                "sending chunk"
            );

            let chunk = Part::bytes(data).file_name(fields.filename.clone());
            let form = fields
                .form_fields()
                .into_iter()
                .fold(Form::new().part(constants::fields::CHUNK, chunk), |form, (name, value)| {
                    form.text(name, value)
                });

            let resp = self
                .http
                .post(self.url(UPLOAD_CHUNK_PATH))
                .multipart(form)
                .send()
                .await?;
            Self::check(resp).await?;
            Ok(())
        })
    }

    fn cancel_upload(&self, request: CancelUploadRequest) -> BackendFuture<'_, ()> {
        Box::pin(async move {
            let resp = self
                .http
                .post(self.url(CANCEL_UPLOAD_PATH))
                .json(&request)
                .send()
                .await?;
            Self::check(resp).await?;
            Ok(())
        })
    }

    fn list_files<'a>(&'a self, path: &'a str) -> BackendFuture<'a, ListFilesResponse> {
        Box::pin(async move {
            let resp = self
                .http
                .get(self.url(LIST_FILES_PATH))
                .query(&[(PATH_QUERY, path)])
                .send()
                .await?;
            let body = Self::check(resp).await?.bytes().await?;
            Ok(ListFilesResponse::from_slice(&body)?)
        })
    }
}
