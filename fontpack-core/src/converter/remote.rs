//! Remote HTTP converter transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::batch::UploadedFont;
use crate::converter::FontConverter;
use crate::error::{ConvertError, Result};
use crate::format::TargetFormat;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Delegates each conversion to a remote endpoint: one multipart POST with a
/// `file` field and a `target_format` field. Success is the converted bytes;
/// failure is a JSON `{"error": ...}` body.
pub struct RemoteConverter {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

/// Error body shape the remote service returns on failure.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    error: String,
}

impl RemoteConverter {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        RemoteConverter::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConvertError::ConverterUnavailable(e.to_string()))?;

        Ok(RemoteConverter {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }
}

#[async_trait]
impl FontConverter for RemoteConverter {
    async fn convert(&self, font: &UploadedFont, target: TargetFormat) -> Result<Vec<u8>> {
        let part = Part::bytes(font.data.clone()).file_name(font.name.clone());
        let form = Form::new()
            .part("file", part)
            .text("target_format", target.to_string());

        debug!(endpoint = %self.endpoint, file = %font.name, "posting to remote converter");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ConvertError::Timeout {
                        file: font.name.clone(),
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    ConvertError::ConverterUnavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let message = match response.json::<RemoteErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => "font conversion failed".to_string(),
            };
            return Err(ConvertError::Conversion {
                file: font.name.clone(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConvertError::ConverterUnavailable(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_body_shape() {
        let body: RemoteErrorBody =
            serde_json::from_str(r#"{"error": "Font conversion failed"}"#).unwrap();
        assert_eq!(body.error, "Font conversion failed");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        // Reserved TEST-NET-1 address; nothing listens there.
        let converter =
            RemoteConverter::with_timeout("http://192.0.2.1:9/convert", Duration::from_millis(200))
                .unwrap();

        let error = converter
            .convert(
                &UploadedFont::new("Arial.ttf", b"bytes".to_vec()),
                TargetFormat::Woff2,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ConvertError::ConverterUnavailable(_) | ConvertError::Timeout { .. }
        ));
    }
}
