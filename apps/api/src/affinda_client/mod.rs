//! Affinda client — the only place that talks to the resume-parsing API.
//!
//! One request per upload: `POST` multipart with the file and `wait=true`, so the
//! answer carries the parsed document instead of a job reference. No retries.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{ACCEPT, AUTHORIZATION},
    multipart::{Form, Part},
    Client,
};
use tracing::{debug, warn};

use crate::errors::UploadError;
use crate::parsing::models::SelectedFile;
use crate::parsing::raw::{RawErrorBody, RawResumeResponse};

/// Multipart field the document is sent under.
pub const FILE_FIELD: &str = "file";
/// Multipart field asking the API to block until parsing is done.
pub const WAIT_FIELD: &str = "wait";
/// How much of an unreadable error body makes it into the log.
const LOGGED_BODY_CHARS: usize = 200;

/// Anything that can turn a selected file into the parser's raw payload.
///
/// `AppState` carries an `Arc<dyn ResumeParser>`; tests swap in fakes.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn parse(&self, file: &SelectedFile) -> Result<RawResumeResponse, UploadError>;
}

#[derive(Clone)]
pub struct AffindaClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl AffindaClient {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    fn form(file: &SelectedFile) -> Result<Form, UploadError> {
        let part = Part::bytes(file.content.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(file.kind.mime_type())
            .map_err(|e| UploadError::Unknown(format!("invalid MIME type: {e}")))?;

        Ok(Form::new().part(FILE_FIELD, part).text(WAIT_FIELD, "true"))
    }
}

#[async_trait]
impl ResumeParser for AffindaClient {
    async fn parse(&self, file: &SelectedFile) -> Result<RawResumeResponse, UploadError> {
        let form = Self::form(file)?;

        let response = self
            .client
            .post(&self.api_url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Parsing API request failed: {e}");
                UploadError::from(e)
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = RawErrorBody::message_from_body(&body);
            match &message {
                Some(message) => warn!("Parsing API returned {status}: {message}"),
                None => warn!("Parsing API returned {status}: {}", body_excerpt(&body)),
            }
            return Err(UploadError::Transport {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            warn!("Failed to read parsing API response: {e}");
            UploadError::from(e)
        })?;

        let raw: RawResumeResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!("Parsing API returned a malformed body: {e}");
            UploadError::Unknown(format!("malformed response body: {e}"))
        })?;

        debug!("Parsing API call succeeded: {} bytes", body.len());

        Ok(raw)
    }
}

/// Leading part of an error body, cut on a char boundary.
fn body_excerpt(body: &str) -> &str {
    match body.char_indices().nth(LOGGED_BODY_CHARS) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
