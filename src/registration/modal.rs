use super::qr::{download_file_name, QrCodeSpec};
use super::tourist_id::TouristId;
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::error;

/// How long the "Copied!" confirmation stays up
pub const COPY_CONFIRMATION: Duration = Duration::from_millis(2000);

/// Load state of the QR image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QrImageState {
    Loading,
    Ready,
    Error,
}

/// Clipboard write failed
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardError(pub String);

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clipboard write failed: {}", self.0)
    }
}

impl std::error::Error for ClipboardError {}

/// Text sink used by "Copy ID"
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard holding the last copied text
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

/// Link to save the QR image
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrDownload {
    pub url: String,
    pub file_name: String,
}

/// QR display opened once an ID has been issued
#[derive(Clone, Debug)]
pub struct QrModal {
    tourist_id: TouristId,
    qr_url: String,
    image: QrImageState,
    copied_at: Option<Instant>,
}

impl QrModal {
    pub fn open(tourist_id: TouristId, spec: &QrCodeSpec) -> Self {
        let qr_url = spec.image_url(&tourist_id);
        Self {
            tourist_id,
            qr_url,
            image: QrImageState::Loading,
            copied_at: None,
        }
    }

    pub fn tourist_id(&self) -> &TouristId {
        &self.tourist_id
    }

    pub fn qr_url(&self) -> &str {
        &self.qr_url
    }

    pub fn image(&self) -> QrImageState {
        self.image
    }

    pub fn mark_loaded(&mut self) {
        self.image = QrImageState::Ready;
    }

    /// Image failed to load. Stays in error; no retry.
    pub fn mark_failed(&mut self) {
        self.image = QrImageState::Error;
    }

    /// Copy the tourist ID. A failure is logged and leaves the copy
    /// unconfirmed; it is not surfaced otherwise.
    pub fn copy_id(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        match clipboard.write_text(self.tourist_id.as_str()) {
            Ok(()) => {
                self.copied_at = Some(now);
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to copy tourist ID");
                false
            }
        }
    }

    /// Whether "Copied!" is still showing at `now`
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPY_CONFIRMATION)
            .unwrap_or(false)
    }

    /// Download link, unavailable while the image is in error
    pub fn download(&self) -> Option<QrDownload> {
        if self.qr_url.is_empty() || self.image == QrImageState::Error {
            return None;
        }
        Some(QrDownload {
            url: self.qr_url.clone(),
            file_name: download_file_name(&self.tourist_id),
        })
    }

    /// Wire view at `now`
    pub fn view(&self, now: Instant) -> QrModalView {
        QrModalView {
            tourist_id: self.tourist_id.clone(),
            qr_url: self.qr_url.clone(),
            image: self.image,
            copied: self.is_copied(now),
            download: self.download(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrModalView {
    pub tourist_id: TouristId,
    pub qr_url: String,
    pub image: QrImageState,
    pub copied: bool,
    pub download: Option<QrDownload>,
}
