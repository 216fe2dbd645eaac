use super::form::{FormError, RegistrationForm};
use super::modal::{Clipboard, QrModal, QrModalView};
use super::qr::QrCodeSpec;
use super::tourist_id::TouristId;
use crate::config::{QrConfig, RegistrationConfig};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Registration flow phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowPhase {
    /// Form accepts input; no QR display open
    Editing,
    /// Artificial processing delay running; form disabled
    Submitting,
    /// ID issued, form reset, QR display open
    Complete,
}

/// Submission rejected or abandoned
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationError {
    InvalidForm(FormError),
    /// Another submission is still in its processing delay
    AlreadySubmitting,
    /// The flow was torn down while this submission was waiting
    Discarded,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::InvalidForm(e) => write!(f, "{}", e),
            RegistrationError::AlreadySubmitting => {
                write!(f, "a registration is already being processed")
            }
            RegistrationError::Discarded => {
                write!(f, "registration discarded: flow was torn down")
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

impl From<FormError> for RegistrationError {
    fn from(e: FormError) -> Self {
        RegistrationError::InvalidForm(e)
    }
}

/// Snapshot of the flow for the wire
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStatus {
    pub phase: FlowPhase,
    pub modal: Option<QrModalView>,
}

struct FlowState {
    phase: FlowPhase,
    /// Bumped on teardown; a submission finishing under a newer generation
    /// drops its result
    generation: u64,
    modal: Option<QrModal>,
}

/// One-shot registration: Editing -> Submitting -> Complete.
///
/// Cloning shares the same flow. The issued ID is never fed into the
/// tracking stores and nothing is persisted.
#[derive(Clone)]
pub struct RegistrationFlow {
    state: Arc<Mutex<FlowState>>,
    delay: Duration,
    id_prefix: String,
    qr: QrCodeSpec,
}

impl RegistrationFlow {
    pub fn new(delay: Duration, id_prefix: impl Into<String>, qr: QrCodeSpec) -> Self {
        Self {
            state: Arc::new(Mutex::new(FlowState {
                phase: FlowPhase::Editing,
                generation: 0,
                modal: None,
            })),
            delay,
            id_prefix: id_prefix.into(),
            qr,
        }
    }

    pub fn from_config(registration: &RegistrationConfig, qr: &QrConfig) -> Self {
        Self::new(
            registration.delay(),
            registration.id_prefix.clone(),
            QrCodeSpec::from_config(qr),
        )
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> FlowPhase {
        self.lock().phase
    }

    /// Current phase and QR display
    pub fn status(&self) -> FlowStatus {
        let state = self.lock();
        let now = Instant::now();
        FlowStatus {
            phase: state.phase,
            modal: state.modal.as_ref().map(|modal| modal.view(now)),
        }
    }

    /// The open QR display, if any
    pub fn modal(&self) -> Option<QrModal> {
        self.lock().modal.clone()
    }

    /// Submit the form: wait out the processing delay, issue an ID and open
    /// the QR display.
    ///
    /// The delay runs on its own task, so dropping the returned future does
    /// not leave the flow stuck in Submitting; the ID is still issued and
    /// the display opened. If the flow is torn down meanwhile the issued ID
    /// is dropped and `Discarded` is returned.
    pub async fn submit(&self, form: RegistrationForm) -> Result<QrModal, RegistrationError> {
        form.validate()?;

        let generation = {
            let mut state = self.lock();
            if state.phase == FlowPhase::Submitting {
                return Err(RegistrationError::AlreadySubmitting);
            }
            state.phase = FlowPhase::Submitting;
            state.modal = None;
            state.generation
        };

        let flow = self.clone();
        let issue = tokio::spawn(async move {
            tokio::time::sleep(flow.delay).await;
            flow.issue(generation)
        });

        match issue.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Registration task failed");
                self.abandon(generation);
                Err(RegistrationError::Discarded)
            }
        }
    }

    fn issue(&self, generation: u64) -> Result<QrModal, RegistrationError> {
        let tourist_id = TouristId::generate(&self.id_prefix, Utc::now(), &mut rand::thread_rng());

        let mut state = self.lock();
        if state.generation != generation {
            warn!(tourist_id = %tourist_id, "Registration finished after teardown, discarding");
            return Err(RegistrationError::Discarded);
        }

        let modal = QrModal::open(tourist_id, &self.qr);
        state.phase = FlowPhase::Complete;
        state.modal = Some(modal.clone());

        info!(tourist_id = %modal.tourist_id(), "Tourist ID issued");
        Ok(modal)
    }

    /// Back to Editing if the submission of `generation` is still pending
    fn abandon(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation == generation && state.phase == FlowPhase::Submitting {
            state.phase = FlowPhase::Editing;
        }
    }

    /// Close the QR display and return to Editing. Returns whether one was open.
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        if state.phase == FlowPhase::Submitting {
            return false;
        }
        state.phase = FlowPhase::Editing;
        state.modal.take().is_some()
    }

    /// Copy the open display's tourist ID to `clipboard`. `None` when no
    /// display is open; otherwise the display after the attempt, which stays
    /// unconfirmed if the write failed.
    pub fn copy_id(&self, clipboard: &dyn Clipboard) -> Option<QrModal> {
        let mut state = self.lock();
        let modal = state.modal.as_mut()?;
        modal.copy_id(clipboard, Instant::now());
        Some(modal.clone())
    }

    /// Apply a QR image load result, if the display for `tourist_id` is
    /// still open. Results for a replaced or closed display are ignored.
    pub fn record_image_result(&self, tourist_id: &TouristId, loaded: bool) -> Option<QrModal> {
        let mut state = self.lock();
        let modal = state.modal.as_mut()?;
        if modal.tourist_id() != tourist_id {
            return None;
        }

        if loaded {
            modal.mark_loaded();
        } else {
            modal.mark_failed();
        }
        Some(modal.clone())
    }

    /// Tear the flow down: close the display and invalidate any in-flight
    /// submission.
    pub fn teardown(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.phase = FlowPhase::Editing;
        state.modal = None;
    }
}
