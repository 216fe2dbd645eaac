// Registration flow: form -> delay -> tourist ID -> QR display

mod flow;
mod form;
mod modal;
mod qr;
mod tourist_id;

pub use flow::{FlowPhase, FlowStatus, RegistrationError, RegistrationFlow};
pub use form::{FormError, RegistrationForm};
pub use modal::{
    Clipboard, ClipboardError, MemoryClipboard, QrDownload, QrImageState, QrModal, QrModalView,
    COPY_CONFIRMATION,
};
pub use qr::{download_file_name, QrCodeSpec, QrFetchError, QrFetcher};
pub use tourist_id::TouristId;

#[cfg(test)]
mod tests;
