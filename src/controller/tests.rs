use std::{
    io,
    sync::{
        Arc,
        Mutex,
    },
};

use async_trait::async_trait;
use chrono::{
    DateTime,
    Duration,
    TimeZone,
    Utc,
};

use super::Controller;
use crate::{
    api::{
        Backend,
        BuiltDeck,
        SessionLink,
        SubscriptionRecord,
        UsageReport,
        UsageResetReceipt,
    },
    core::{
        form::{
            YieldBand,
            MISSING_EMAIL,
            MISSING_MODES,
            MISSING_TEXT,
        },
        models::{
            BuildRequest,
            HealthState,
            Tone,
            EMAIL_STORAGE_KEY,
        },
        AnkifyError,
    },
    persistence::{
        JsonFileStore,
        KeyValueStore,
        MemoryStore,
    },
    report::RecordingSink,
    session::{
        ReturnParams,
        CANCELED_MESSAGE,
        SUBSCRIBED_MESSAGE,
    },
    view::testing::FakeView,
};

#[derive(Clone)]
enum Reply<T> {
    Ok(T),
    Status(u16, &'static str),
    Transport,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T, AnkifyError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status, body) => {
                Err(AnkifyError::Status { status: *status, body: body.to_string() })
            }
            Reply::Transport => {
                Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused").into())
            }
        }
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

fn subscription(status: &str, period_end: DateTime<Utc>) -> SubscriptionRecord {
    SubscriptionRecord {
        found: true,
        status: Some(status.to_string()),
        current_period_end: period_end.timestamp(),
        ..Default::default()
    }
}

struct FakeBackend {
    health: Reply<()>,
    usage: Reply<UsageReport>,
    subscription: Reply<SubscriptionRecord>,
    checkout: Reply<SessionLink>,
    portal: Reply<SessionLink>,
    build: Reply<BuiltDeck>,
    reset: Reply<UsageResetReceipt>,
    calls: Mutex<Vec<&'static str>>,
    last_build: Mutex<Option<BuildRequest>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            health: Reply::Ok(()),
            usage: Reply::Ok(UsageReport {
                cards_used: Some(3.0),
                cap: Some(50.0),
                month: Some("2024-05".to_string()),
                version: Some(1),
            }),
            subscription: Reply::Ok(subscription("active", now() + Duration::days(30))),
            checkout: Reply::Ok(SessionLink {
                url: Some("https://checkout.example/session".to_string()),
            }),
            portal: Reply::Ok(SessionLink { url: Some("https://billing.example/portal".to_string()) }),
            build: Reply::Ok(BuiltDeck {
                bytes: vec![0x50, 0x4b, 0x03, 0x04],
                content_disposition: Some(r#"attachment; filename="My Deck.apkg""#.to_string()),
            }),
            reset: Reply::Ok(UsageResetReceipt {
                ok: true,
                usage: UsageReport {
                    cards_used: Some(0.0),
                    cap: Some(100.0),
                    month: Some("2025-03".to_string()),
                    version: Some(1),
                },
            }),
            calls: Mutex::new(Vec::new()),
            last_build: Mutex::new(None),
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn health(&self) -> Result<(), AnkifyError> {
        self.record("health");
        self.health.get()
    }

    async fn usage(&self) -> Result<UsageReport, AnkifyError> {
        self.record("usage");
        self.usage.get()
    }

    async fn subscription(&self, _email: &str) -> Result<SubscriptionRecord, AnkifyError> {
        self.record("subscription");
        self.subscription.get()
    }

    async fn checkout(&self, _email: &str) -> Result<SessionLink, AnkifyError> {
        self.record("checkout");
        self.checkout.get()
    }

    async fn billing_portal(&self, _email: &str) -> Result<SessionLink, AnkifyError> {
        self.record("billing_portal");
        self.portal.get()
    }

    async fn build_deck(&self, request: &BuildRequest) -> Result<BuiltDeck, AnkifyError> {
        self.record("build");
        *self.last_build.lock().unwrap() = Some(request.clone());
        self.build.get()
    }

    async fn reset_usage(&self, _cap: Option<u32>) -> Result<UsageResetReceipt, AnkifyError> {
        self.record("reset_usage");
        self.reset.get()
    }
}

struct Harness {
    backend: Arc<FakeBackend>,
    store: Arc<MemoryStore>,
    sink: Arc<RecordingSink>,
    controller: Controller,
}

fn harness(backend: FakeBackend) -> Harness {
    let backend = Arc::new(backend);
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let controller = Controller::new(backend.clone(), store.clone(), sink.clone()).with_clock(now);
    Harness { backend, store, sink, controller }
}

fn stored_email(h: &Harness) -> Option<String> {
    h.store.get(EMAIL_STORAGE_KEY).unwrap()
}

#[tokio::test]
async fn health_reports_ok_and_unavailable() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new();
    h.controller.refresh_health(&mut view).await;
    assert_eq!(view.health, HealthState::Ok);

    for reply in [Reply::Status(503, "down"), Reply::Transport] {
        let h = harness(FakeBackend { health: reply, ..FakeBackend::new() });
        h.controller.refresh_health(&mut view).await;
        assert_eq!(view.health, HealthState::Unavailable);
        assert_eq!(view.health.text(), "unavailable");
    }
}

#[tokio::test]
async fn usage_renders_or_falls_back() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new();
    h.controller.refresh_usage(&mut view).await;
    assert_eq!(view.usage_text, "Usage: 3 / 50 (month: 2024-05)");

    let h = harness(FakeBackend { usage: Reply::Ok(UsageReport::default()), ..FakeBackend::new() });
    h.controller.refresh_usage(&mut view).await;
    assert_eq!(view.usage_text, "Usage: ? / ? (month: ?)");

    for reply in [Reply::Status(500, "boom"), Reply::Transport] {
        let h = harness(FakeBackend { usage: reply, ..FakeBackend::new() });
        h.controller.refresh_usage(&mut view).await;
        assert_eq!(view.usage_text, "Usage: unavailable");
        assert_eq!(h.sink.errors().len(), 1);
    }
}

#[tokio::test]
async fn blank_email_skips_subscription_lookup() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new();
    view.signed_in = Some("stale".to_string());
    view.subscribe_visible = false;

    h.controller.check_subscription(&mut view, "").await;

    assert!(h.backend.calls().is_empty());
    assert_eq!(view.signed_in, None);
    assert!(view.subscribe_visible);
}

#[tokio::test]
async fn active_subscription_shows_pill_and_hides_subscribe() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new();

    h.controller.check_subscription(&mut view, "me@example.com").await;

    assert_eq!(view.signed_in.as_deref(), Some("Signed in as me@example.com — Active"));
    assert!(!view.subscribe_visible);
}

#[tokio::test]
async fn canceled_subscription_with_future_period_is_not_active() {
    let h = harness(FakeBackend {
        subscription: Reply::Ok(subscription("canceled", now() + Duration::days(5))),
        ..FakeBackend::new()
    });
    let mut view = FakeView::new();
    view.subscribe_visible = false;

    h.controller.check_subscription(&mut view, "me@example.com").await;

    assert_eq!(view.signed_in, None);
    assert!(view.subscribe_visible);
}

#[tokio::test]
async fn subscription_lookup_failure_counts_as_not_subscribed() {
    for reply in [Reply::Status(400, "Provide ?email="), Reply::Transport] {
        let h = harness(FakeBackend { subscription: reply, ..FakeBackend::new() });
        let mut view = FakeView::new();
        view.signed_in = Some("stale".to_string());

        h.controller.check_subscription(&mut view, "me@example.com").await;

        assert_eq!(view.signed_in, None);
        assert!(view.subscribe_visible);
        assert!(view.status.is_none());
        assert_eq!(h.sink.errors()[0].event, "subscription");
    }
}

#[tokio::test]
async fn subscribe_without_email_makes_no_request() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new().with_email("   ");

    h.controller.subscribe(&mut view).await;

    assert!(h.backend.calls().is_empty());
    assert_eq!(view.status_text(), MISSING_EMAIL);
    assert_eq!(view.status.as_ref().unwrap().tone, Tone::Err);
    assert_eq!(stored_email(&h), None);
}

#[tokio::test]
async fn subscribe_persists_email_and_redirects() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new().with_email("  Me@Example.com ");

    h.controller.subscribe(&mut view).await;

    assert_eq!(h.backend.calls(), vec!["checkout"]);
    assert_eq!(stored_email(&h).as_deref(), Some("me@example.com"));
    assert_eq!(view.status_history[0].text, "Opening secure checkout…");
    assert_eq!(view.status_history[0].tone, Tone::Neutral);
    assert_eq!(view.opened_urls, vec!["https://checkout.example/session"]);
}

#[tokio::test]
async fn manage_billing_uses_the_portal_endpoint() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new().with_email("me@example.com");

    h.controller.manage_billing(&mut view).await;

    assert_eq!(h.backend.calls(), vec!["billing_portal"]);
    assert_eq!(view.opened_urls, vec!["https://billing.example/portal"]);
}

#[tokio::test]
async fn payment_flow_surfaces_server_text_verbatim() {
    let h = harness(FakeBackend {
        portal: Reply::Status(404, "No Stripe customer found for this email. Subscribe first."),
        ..FakeBackend::new()
    });
    let mut view = FakeView::new().with_email("me@example.com");

    h.controller.manage_billing(&mut view).await;

    assert_eq!(view.status_text(), "No Stripe customer found for this email. Subscribe first.");
    assert_eq!(view.status.as_ref().unwrap().tone, Tone::Err);
    assert!(view.opened_urls.is_empty());
}

#[tokio::test]
async fn payment_flow_without_url_is_unexpected() {
    let h = harness(FakeBackend {
        checkout: Reply::Ok(SessionLink { url: None }),
        ..FakeBackend::new()
    });
    let mut view = FakeView::new().with_email("me@example.com");

    h.controller.subscribe(&mut view).await;

    assert_eq!(view.status_text(), "Unexpected response from server.");
    assert!(view.opened_urls.is_empty());
}

#[tokio::test]
async fn payment_flow_transport_error_shows_error_text() {
    let h = harness(FakeBackend { checkout: Reply::Transport, ..FakeBackend::new() });
    let mut view = FakeView::new().with_email("me@example.com");

    h.controller.subscribe(&mut view).await;

    assert!(view.status_text().starts_with("Error: "));
    assert!(view.status_text().contains("connection refused"));
    assert_eq!(h.sink.errors()[0].event, "checkout");
}

#[tokio::test]
async fn build_without_email_is_rejected() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new().with_text("Some text");

    h.controller.build_deck(&mut view).await;

    assert!(h.backend.calls().is_empty());
    assert_eq!(view.status_text(), MISSING_EMAIL);
}

#[tokio::test]
async fn build_with_empty_text_makes_no_request() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new().with_email("me@example.com").with_text("  \n ");

    h.controller.build_deck(&mut view).await;

    assert!(h.backend.calls().is_empty());
    assert_eq!(view.status_text(), MISSING_TEXT);
    assert_eq!(view.status.as_ref().unwrap().tone, Tone::Err);
    assert!(view.scrolled);
    // The email is saved before the text is looked at.
    assert_eq!(stored_email(&h).as_deref(), Some("me@example.com"));
}

#[tokio::test]
async fn build_with_no_modes_makes_no_request() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new().with_email("me@example.com").with_text("Cells divide.");
    view.modes.clear();

    h.controller.build_deck(&mut view).await;

    assert!(h.backend.calls().is_empty());
    assert_eq!(view.status_text(), MISSING_MODES);
}

#[tokio::test]
async fn successful_build_downloads_then_refreshes() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new().with_email("Me@Example.com").with_text("Cells divide.");
    view.deck_title = "Bio 101".to_string();
    view.yield_slider = 0;

    h.controller.build_deck(&mut view).await;

    assert_eq!(h.backend.calls(), vec!["build", "usage", "subscription"]);
    let request = h.backend.last_build.lock().unwrap().clone().unwrap();
    assert_eq!(request.email, "me@example.com");
    assert_eq!(request.deck_title, "Bio 101");
    assert_eq!(request.yield_level, 0.0);

    assert_eq!(view.downloads.len(), 1);
    assert_eq!(view.downloads[0].0, "My Deck.apkg");
    assert_eq!(view.downloads[0].1, vec![0x50, 0x4b, 0x03, 0x04]);
    assert_eq!(view.status_text(), "Downloaded My Deck.apkg");
    assert_eq!(view.status.as_ref().unwrap().tone, Tone::Ok);
    assert_eq!(view.usage_text, "Usage: 3 / 50 (month: 2024-05)");
    assert!(view.signed_in.is_some());
}

#[tokio::test]
async fn build_without_disposition_names_file_after_title() {
    let h = harness(FakeBackend {
        build: Reply::Ok(BuiltDeck { bytes: vec![1, 2, 3], content_disposition: None }),
        ..FakeBackend::new()
    });
    let mut view = FakeView::new().with_email("me@example.com").with_text("Cells divide.");
    view.deck_title = "Bio 101".to_string();

    h.controller.build_deck(&mut view).await;

    assert_eq!(view.downloads[0].0, "Bio_101.apkg");
}

#[tokio::test]
async fn refused_build_saves_nothing_and_rechecks_subscription() {
    let h = harness(FakeBackend {
        build: Reply::Status(402, "Subscription inactive. Please subscribe to continue."),
        subscription: Reply::Ok(subscription("past_due", now() + Duration::days(1))),
        ..FakeBackend::new()
    });
    let mut view = FakeView::new().with_email("me@example.com").with_text("Cells divide.");
    view.subscribe_visible = false;

    h.controller.build_deck(&mut view).await;

    assert_eq!(h.backend.calls(), vec!["build", "subscription"]);
    assert!(view.downloads.is_empty());
    assert_eq!(view.status_text(), "Subscription inactive. Please subscribe to continue.");
    assert!(view.subscribe_visible);
}

#[tokio::test]
async fn build_transport_failure_rechecks_subscription() {
    let h = harness(FakeBackend { build: Reply::Transport, ..FakeBackend::new() });
    let mut view = FakeView::new().with_email("me@example.com").with_text("Cells divide.");

    h.controller.build_deck(&mut view).await;

    assert_eq!(h.backend.calls(), vec!["build", "subscription"]);
    assert!(view.downloads.is_empty());
    assert!(view.status_text().starts_with("Error: "));
}

#[tokio::test]
async fn init_runs_checks_in_order() {
    let h = harness(FakeBackend::new());
    h.store.set(EMAIL_STORAGE_KEY, "me@example.com").unwrap();
    let mut view = FakeView::new();

    h.controller.init(&mut view, ReturnParams::default()).await;

    assert_eq!(view.email, "me@example.com");
    assert_eq!(h.backend.calls(), vec!["health", "usage", "subscription"]);
    assert_eq!(view.health, HealthState::Ok);
    assert_eq!(view.yield_band, Some(YieldBand::Balanced));
    assert!(view.status.is_none());
    assert!(!view.return_params_cleared);
}

#[tokio::test]
async fn init_after_checkout_rechecks_and_clears_markers() {
    let h = harness(FakeBackend::new());
    h.store.set(EMAIL_STORAGE_KEY, "me@example.com").unwrap();
    let mut view = FakeView::new();
    let params = ReturnParams { subscribed: true, canceled: false };

    h.controller.init(&mut view, params).await;

    assert_eq!(h.backend.calls(), vec!["health", "usage", "subscription", "subscription"]);
    assert_eq!(view.status_text(), SUBSCRIBED_MESSAGE);
    assert!(view.return_params_cleared);
}

#[tokio::test]
async fn init_after_cancel_without_email_only_clears_markers() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new();
    let params = ReturnParams { subscribed: false, canceled: true };

    h.controller.init(&mut view, params).await;

    assert_eq!(h.backend.calls(), vec!["health", "usage"]);
    assert!(view.status.is_none());
    assert!(view.return_params_cleared);

    let mut view = FakeView::new().with_email("me@example.com");
    h.controller.init(&mut view, params).await;
    assert_eq!(view.status_text(), CANCELED_MESSAGE);
}

#[tokio::test]
async fn persisted_email_is_restored_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let backend = Arc::new(FakeBackend::new());
    let sink = Arc::new(RecordingSink::new());

    let controller =
        Controller::new(backend.clone(), Arc::new(JsonFileStore::new(&path)), sink.clone())
            .with_clock(now);
    let mut view = FakeView::new().with_email(" Someone@Example.com ");
    controller.on_email_committed(&mut view).await;

    let reloaded =
        Controller::new(backend, Arc::new(JsonFileStore::new(&path)), sink).with_clock(now);
    let mut fresh = FakeView::new();
    reloaded.init(&mut fresh, ReturnParams::default()).await;

    assert_eq!(fresh.email, "someone@example.com");
}

#[tokio::test]
async fn email_commit_persists_even_when_cleared() {
    let h = harness(FakeBackend::new());
    h.store.set(EMAIL_STORAGE_KEY, "old@example.com").unwrap();
    let mut view = FakeView::new();

    h.controller.on_email_committed(&mut view).await;

    assert_eq!(stored_email(&h).as_deref(), Some(""));
    assert!(h.backend.calls().is_empty());
    assert!(view.subscribe_visible);
}

#[test]
fn slider_input_updates_label() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new();
    for (slider, band) in [
        (1, YieldBand::Exhaustive),
        (25, YieldBand::Broad),
        (60, YieldBand::Balanced),
        (99, YieldBand::HighYield),
        (100, YieldBand::OnlyHighest),
    ] {
        view.yield_slider = slider;
        h.controller.on_yield_input(&mut view);
        assert_eq!(view.yield_band, Some(band));
    }
}

#[tokio::test]
async fn usage_reset_renders_new_usage() {
    let h = harness(FakeBackend::new());
    let mut view = FakeView::new();

    h.controller.reset_usage(&mut view, Some(100)).await;

    assert_eq!(view.usage_text, "Usage: 0 / 100 (month: 2025-03)");
    assert_eq!(view.status_text(), "Usage reset.");

    let h = harness(FakeBackend { reset: Reply::Status(500, ""), ..FakeBackend::new() });
    h.controller.reset_usage(&mut view, None).await;
    assert_eq!(view.status_text(), "Request failed (HTTP 500).");
}
