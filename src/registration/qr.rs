use super::tourist_id::TouristId;
use crate::config::QrConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// Builds QR image URLs for the external QR rendering endpoint
#[derive(Clone, Debug)]
pub struct QrCodeSpec {
    endpoint: String,
    size: u32,
    error_correction: String,
    verify_url_base: String,
}

impl QrCodeSpec {
    pub fn from_config(config: &QrConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            size: config.size,
            error_correction: config.error_correction.clone(),
            verify_url_base: config.verify_url_base.clone(),
        }
    }

    /// Text encoded into the QR image
    pub fn payload(&self, id: &TouristId) -> String {
        format!(
            "Tourist ID: {}\nSafety Portal: {}{}",
            id, self.verify_url_base, id
        )
    }

    /// PNG URL, e.g. `...?size=300x300&format=png&ecc=M&data=<encoded payload>`
    pub fn image_url(&self, id: &TouristId) -> String {
        format!(
            "{}?size={}x{}&format=png&ecc={}&data={}",
            self.endpoint,
            self.size,
            self.size,
            self.error_correction,
            urlencoding::encode(&self.payload(id))
        )
    }
}

impl Default for QrCodeSpec {
    fn default() -> Self {
        Self::from_config(&QrConfig::default())
    }
}

/// File name offered when the QR image is downloaded
pub fn download_file_name(id: &TouristId) -> String {
    format!("tourist-id-{}.png", id)
}

/// QR image could not be loaded
#[derive(Debug, Clone, PartialEq)]
pub enum QrFetchError {
    Request(String),
    Status(u16),
    EmptyBody,
}

impl fmt::Display for QrFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrFetchError::Request(e) => write!(f, "QR image request failed: {}", e),
            QrFetchError::Status(code) => write!(f, "QR endpoint returned status {}", code),
            QrFetchError::EmptyBody => write!(f, "QR endpoint returned an empty image"),
        }
    }
}

impl std::error::Error for QrFetchError {}

/// Loads QR images over HTTP. One attempt per call, no retry.
#[derive(Clone)]
pub struct QrFetcher {
    client: Client,
}

impl QrFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build QR HTTP client")?;
        Ok(Self { client })
    }

    pub fn from_config(config: &QrConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.fetch_timeout_seconds))
    }

    /// Fetch the PNG bytes behind `url`
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, QrFetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "QR image request failed");
            QrFetchError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "QR endpoint returned error status");
            return Err(QrFetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| QrFetchError::Request(e.to_string()))?;

        if bytes.is_empty() {
            return Err(QrFetchError::EmptyBody);
        }

        Ok(bytes.to_vec())
    }
}
