//! Text extraction via an external OCR/document-analysis service

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::{Error, Result};

/// Trait for extracting plain text from an uploaded document.
///
/// The OCR engine itself is an external collaborator; this contract is a
/// single blocking call with no partial-result streaming.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from raw file bytes
    async fn extract_text(&self, filename: &str, data: &[u8]) -> Result<String>;

    /// Get extractor name for logging
    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    text: String,
}

/// HTTP client for a hosted OCR service.
///
/// Posts the document as multipart form data and expects `{"text": ...}`
/// back. Requests are bounded by the configured timeout so a stuck
/// extraction fails the upload instead of hanging it.
pub struct OcrServiceClient {
    client: Client,
    config: OcrConfig,
}

impl OcrServiceClient {
    /// Create a new OCR client.
    ///
    /// Fails eagerly with [`Error::ConfigurationMissing`] when no endpoint is
    /// configured, so a misconfigured deployment surfaces at startup rather
    /// than on the first upload.
    pub fn new(config: OcrConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(Error::configuration(
                "OCR service endpoint is not configured",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("failed to build OCR HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextExtractor for OcrServiceClient {
    async fn extract_text(&self, filename: &str, data: &[u8]) -> Result<String> {
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename.to_string()),
        );

        let mut request = self.client.post(&self.config.endpoint).multipart(form);
        if let Some(ref api_key) = self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::extraction(format!("OCR request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::extraction(format!(
                "OCR service returned HTTP {}: {}",
                status, body
            )));
        }

        let extracted: ExtractResponse = response
            .json()
            .await
            .map_err(|e| Error::extraction(format!("invalid OCR response: {}", e)))?;

        tracing::debug!(
            filename,
            chars = extracted.text.len(),
            "text extraction completed"
        );

        Ok(extracted.text)
    }

    fn name(&self) -> &str {
        "ocr-service"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_endpoint_fails_at_construction() {
        let config = OcrConfig::default();
        assert!(matches!(
            OcrServiceClient::new(config),
            Err(Error::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn configured_endpoint_constructs() {
        let config = OcrConfig {
            endpoint: "http://localhost:9000/extract".to_string(),
            api_key: None,
            timeout_secs: 30,
        };
        assert!(OcrServiceClient::new(config).is_ok());
    }
}
