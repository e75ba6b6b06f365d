//! `reqwest`-backed [`ProcessTransport`].

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

use crate::{MultipartUpload, ProcessError, ProcessResponse, ProcessTransport};

/// Production transport issuing real HTTP requests.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client (no request timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a caller-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProcessTransport for ReqwestTransport {
    async fn post_multipart(
        &self,
        endpoint: &str,
        upload: MultipartUpload,
    ) -> Result<ProcessResponse, ProcessError> {
        let part = file_part(&upload.bytes, &upload.file_name, &upload.content_type);
        let form = Form::new().part(upload.field_name, part);

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|error| ProcessError::Transport(error.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if !response.status().is_success() {
            return Ok(ProcessResponse {
                status,
                content_type,
                body: Default::default(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| ProcessError::Transport(format!("reading body failed: {error}")))?;

        Ok(ProcessResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Builds the file part, typed with `content_type` when it parses.
///
/// A declared type that is not a valid MIME type (`"image/"`) still yields a
/// part, sent untyped.
fn file_part(bytes: &Bytes, file_name: &str, content_type: &str) -> Part {
    let untyped = || Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
    if content_type.is_empty() {
        return untyped();
    }

    match untyped().mime_str(content_type) {
        Ok(part) => part,
        Err(error) => {
            tracing::debug!(%content_type, %error, "sending part without a type");
            untyped()
        }
    }
}
