use super::*;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn filled_form() -> RegistrationForm {
    RegistrationForm {
        full_name: "Asha Rao".to_string(),
        passport_number: "Z1234567".to_string(),
        emergency_contact: "+91-9000000000".to_string(),
        itinerary: "Day 1: Tawang, Day 2: Sela Pass".to_string(),
    }
}

fn test_flow(delay: Duration) -> RegistrationFlow {
    RegistrationFlow::new(delay, "TST", QrCodeSpec::default())
}

struct BrokenClipboard;

/// Captures formatted log output
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Clipboard for BrokenClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError("permission denied".to_string()))
    }
}

#[test]
fn test_form_requires_all_fields() {
    assert!(filled_form().validate().is_ok());

    let form = RegistrationForm {
        passport_number: "   ".to_string(),
        itinerary: String::new(),
        ..filled_form()
    };
    assert_eq!(
        form.validate(),
        Err(FormError::MissingFields(vec!["passportNumber", "itinerary"]))
    );

    let empty = RegistrationForm::default();
    let Err(FormError::MissingFields(missing)) = empty.validate() else {
        panic!("empty form must be rejected");
    };
    assert_eq!(missing.len(), 4);
}

#[test]
fn test_tourist_id_format() {
    let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let id = TouristId::generate("TST", now, &mut StdRng::seed_from_u64(1));

    let parts: Vec<&str> = id.as_str().split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "TST");
    assert_eq!(parts[1], "1700000000123");
    assert_eq!(parts[2].len(), 9);
    assert!(parts[2]
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn test_tourist_ids_are_distinct() {
    let now = Utc::now();
    let mut rng = rand::thread_rng();
    let ids: HashSet<TouristId> = (0..500)
        .map(|_| TouristId::generate("TST", now, &mut rng))
        .collect();
    assert_eq!(ids.len(), 500);
}

#[test]
fn test_qr_url_encodes_payload() {
    let spec = QrCodeSpec::default();
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let id = TouristId::generate("TST", now, &mut StdRng::seed_from_u64(9));

    assert_eq!(
        spec.payload(&id),
        format!(
            "Tourist ID: {}\nSafety Portal: https://suraksha-setu.gov.in/verify/{}",
            id, id
        )
    );

    let url = spec.image_url(&id);
    assert!(url.starts_with(
        "https://api.qrserver.com/v1/create-qr-code/?size=300x300&format=png&ecc=M&data="
    ));
    assert!(url.contains("Tourist%20ID%3A%20TST-1700000000000-"));
    assert!(url.contains("%0ASafety%20Portal%3A%20https%3A%2F%2Fsuraksha-setu.gov.in%2Fverify%2F"));
    assert!(!url.contains('\n'));
}

#[test]
fn test_modal_copy_confirmation_window() {
    let id = TouristId::generate("TST", Utc::now(), &mut StdRng::seed_from_u64(2));
    let mut modal = QrModal::open(id.clone(), &QrCodeSpec::default());
    let clipboard = MemoryClipboard::default();
    let start = Instant::now();

    assert!(!modal.is_copied(start));
    assert!(modal.copy_id(&clipboard, start));
    assert_eq!(clipboard.contents().as_deref(), Some(id.as_str()));
    assert!(modal.is_copied(start + Duration::from_millis(1999)));
    assert!(!modal.is_copied(start + COPY_CONFIRMATION));
}

#[test]
fn test_modal_clipboard_failure_leaves_copy_unconfirmed() {
    let id = TouristId::generate("TST", Utc::now(), &mut StdRng::seed_from_u64(3));
    let mut modal = QrModal::open(id, &QrCodeSpec::default());
    let now = Instant::now();

    assert!(!modal.copy_id(&BrokenClipboard, now));
    assert!(!modal.is_copied(now));
}

#[test]
fn test_modal_download_unavailable_on_error() {
    let id = TouristId::generate("TST", Utc::now(), &mut StdRng::seed_from_u64(4));
    let mut modal = QrModal::open(id.clone(), &QrCodeSpec::default());
    assert_eq!(modal.image(), QrImageState::Loading);

    let download = modal.download().unwrap();
    assert_eq!(download.file_name, format!("tourist-id-{}.png", id));
    assert_eq!(download.url, modal.qr_url());

    modal.mark_failed();
    assert_eq!(modal.image(), QrImageState::Error);
    assert!(modal.download().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_submit_walks_through_phases() {
    let flow = test_flow(Duration::from_millis(1500));
    assert_eq!(flow.phase(), FlowPhase::Editing);

    let handle = tokio::spawn({
        let flow = flow.clone();
        async move { flow.submit(filled_form()).await }
    });
    tokio::task::yield_now().await;
    assert_eq!(flow.phase(), FlowPhase::Submitting);

    let modal = handle.await.unwrap().unwrap();
    assert!(modal.tourist_id().as_str().starts_with("TST-"));
    assert_eq!(modal.image(), QrImageState::Loading);

    let status = flow.status();
    assert_eq!(status.phase, FlowPhase::Complete);
    assert_eq!(
        status.modal.map(|m| m.tourist_id),
        Some(modal.tourist_id().clone())
    );

    assert!(flow.close());
    assert_eq!(flow.phase(), FlowPhase::Editing);
    assert!(!flow.close());
}

#[tokio::test(start_paused = true)]
async fn test_submit_takes_the_full_delay() {
    let flow = test_flow(Duration::from_millis(1500));
    let start = tokio::time::Instant::now();

    flow.submit(filled_form()).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_submit_rejected() {
    let flow = test_flow(Duration::from_millis(1500));

    let first = tokio::spawn({
        let flow = flow.clone();
        async move { flow.submit(filled_form()).await }
    });
    tokio::task::yield_now().await;

    let second = flow.submit(filled_form()).await;
    assert_eq!(second.unwrap_err(), RegistrationError::AlreadySubmitting);

    assert!(first.await.unwrap().is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_submit_still_completes() {
    let flow = test_flow(Duration::from_millis(1500));

    // Caller gives up partway through the delay
    let abandoned =
        tokio::time::timeout(Duration::from_millis(100), flow.submit(filled_form())).await;
    assert!(abandoned.is_err());
    assert_eq!(flow.phase(), FlowPhase::Submitting);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(flow.phase(), FlowPhase::Complete);
    assert!(flow.modal().is_some());

    let next = flow.submit(filled_form()).await;
    assert!(next.is_ok());
    assert_eq!(flow.phase(), FlowPhase::Complete);
}

#[tokio::test(start_paused = true)]
async fn test_submit_logs_tourist_id_not_personal_data() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let flow = test_flow(Duration::from_millis(1500));
    let modal = flow.submit(filled_form()).await.unwrap();

    let output = logs.contents();
    assert!(output.contains(modal.tourist_id().as_str()));
    assert!(!output.contains("Z1234567"));
    assert!(!output.contains("Asha Rao"));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_form_does_not_start_submission() {
    let flow = test_flow(Duration::from_millis(1500));

    let result = flow.submit(RegistrationForm::default()).await;
    assert!(matches!(result, Err(RegistrationError::InvalidForm(_))));
    assert_eq!(flow.phase(), FlowPhase::Editing);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_discards_in_flight_submission() {
    let flow = test_flow(Duration::from_millis(1500));

    let handle = tokio::spawn({
        let flow = flow.clone();
        async move { flow.submit(filled_form()).await }
    });
    tokio::task::yield_now().await;

    flow.teardown();

    assert_eq!(handle.await.unwrap().unwrap_err(), RegistrationError::Discarded);
    assert_eq!(flow.phase(), FlowPhase::Editing);
    assert!(flow.modal().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_repeated_submissions_issue_distinct_ids() {
    let flow = test_flow(Duration::from_millis(10));
    let mut ids = HashSet::new();

    for _ in 0..20 {
        let modal = flow.submit(filled_form()).await.unwrap();
        ids.insert(modal.tourist_id().clone());
    }
    assert_eq!(ids.len(), 20);
}

#[tokio::test(start_paused = true)]
async fn test_stale_image_result_ignored() {
    let flow = test_flow(Duration::from_millis(10));
    let first = flow.submit(filled_form()).await.unwrap();
    let second = flow.submit(filled_form()).await.unwrap();

    assert!(flow
        .record_image_result(first.tourist_id(), true)
        .is_none());

    let updated = flow
        .record_image_result(second.tourist_id(), false)
        .unwrap();
    assert_eq!(updated.image(), QrImageState::Error);
    assert_eq!(flow.modal().unwrap().image(), QrImageState::Error);
}

#[tokio::test]
async fn test_qr_fetcher_returns_png_bytes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/qr")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(vec![0x89, b'P', b'N', b'G'])
        .create_async()
        .await;

    let fetcher = QrFetcher::new(Duration::from_secs(5)).unwrap();
    let bytes = fetcher
        .fetch(&format!("{}/qr?size=300x300", server.url()))
        .await
        .unwrap();

    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_qr_fetcher_reports_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/qr")
        .with_status(503)
        .create_async()
        .await;

    let fetcher = QrFetcher::new(Duration::from_secs(5)).unwrap();
    let err = fetcher
        .fetch(&format!("{}/qr", server.url()))
        .await
        .unwrap_err();

    assert_eq!(err, QrFetchError::Status(503));
}
