//! Reacts to user actions: reads the form, talks to the backend, updates the view.
//!
//! Every action catches its own failures. Whatever goes wrong ends up on the status line
//! (or silently downgrades an indicator) and in the [`ReportSink`], and the form is left
//! ready for another try. Nothing is retried automatically.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::{
    DateTime,
    Utc,
};

use crate::{
    api::{
        Backend,
        SessionLink,
        UNAVAILABLE_USAGE,
    },
    core::{
        download::derive_filename,
        form::{
            collect_build_request,
            normalize_email,
            YieldBand,
            MISSING_EMAIL,
        },
        models::{
            HealthState,
            StatusMessage,
            EMAIL_STORAGE_KEY,
        },
        AnkifyError,
    },
    persistence::KeyValueStore,
    report::ReportSink,
    session::ReturnParams,
    view::View,
};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaymentFlow {
    Checkout,
    BillingPortal,
}

impl PaymentFlow {
    fn event(&self) -> &'static str {
        match self {
            PaymentFlow::Checkout => "checkout",
            PaymentFlow::BillingPortal => "billing_portal",
        }
    }

    fn progress(&self) -> &'static str {
        match self {
            PaymentFlow::Checkout => "Opening secure checkout…",
            PaymentFlow::BillingPortal => "Opening billing portal…",
        }
    }
}

#[derive(Clone)]
pub struct Controller {
    backend: Arc<dyn Backend>,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn ReportSink>,
    clock: Clock,
}

impl Controller {
    pub fn new(
        backend: Arc<dyn Backend>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self { backend, store, sink, clock: Arc::new(Utc::now) }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn fail(&self, view: &mut dyn View, event: &str, message: String) {
        self.sink.error(event, &message);
        view.set_status(StatusMessage::err(message), true);
    }

    /// What the user sees for a failed checkout, portal or build call.
    fn describe_failure(error: &AnkifyError) -> String {
        match error {
            AnkifyError::Status { status, body } if body.trim().is_empty() => {
                format!("Request failed (HTTP {status}).")
            }
            AnkifyError::Status { body, .. } => body.clone(),
            AnkifyError::UnexpectedResponse => error.to_string(),
            other => format!("Error: {other}"),
        }
    }

    fn persist_email(&self, email: &str) {
        if let Err(e) = self.store.set(EMAIL_STORAGE_KEY, email) {
            self.sink.error("persist_email", &e.to_string());
        }
    }

    fn restore_email(&self, view: &mut dyn View) {
        match self.store.get(EMAIL_STORAGE_KEY) {
            Ok(Some(email)) => view.set_email(&email),
            Ok(None) => {}
            Err(e) => self.sink.info("restore_email", &e.to_string()),
        }
    }

    /// Normalized email from the form, or an error status when it is blank.
    fn require_email(&self, view: &mut dyn View) -> Option<String> {
        let email = normalize_email(&view.email());
        if email.is_empty() {
            view.set_status(StatusMessage::err(MISSING_EMAIL), true);
            return None;
        }
        Some(email)
    }

    pub async fn refresh_health(&self, view: &mut dyn View) {
        let health = match self.backend.health().await {
            Ok(()) => HealthState::Ok,
            Err(e) => {
                self.sink.error("health", &e.to_string());
                HealthState::Unavailable
            }
        };
        view.set_health(health);
    }

    pub async fn refresh_usage(&self, view: &mut dyn View) {
        match self.backend.usage().await {
            Ok(usage) => view.set_usage_text(usage.render()),
            Err(e) => {
                self.sink.error("usage", &e.to_string());
                view.set_usage_text(UNAVAILABLE_USAGE.to_string());
            }
        }
    }

    fn show_not_subscribed(view: &mut dyn View) {
        view.set_signed_in(None);
        view.set_subscribe_visible(true);
    }

    /// Brings the signed-in pill and the subscribe button in line with the server.
    /// Any failure counts as "not subscribed".
    pub async fn check_subscription(&self, view: &mut dyn View, email: &str) {
        if email.is_empty() {
            Self::show_not_subscribed(view);
            return;
        }

        match self.backend.subscription(email).await {
            Ok(record) if record.is_active_at((self.clock)()) => {
                view.set_signed_in(Some(format!("Signed in as {email} — Active")));
                view.set_subscribe_visible(false);
            }
            Ok(_) => Self::show_not_subscribed(view),
            Err(e) => {
                self.sink.error("subscription", &e.to_string());
                Self::show_not_subscribed(view);
            }
        }
    }

    pub async fn subscribe(&self, view: &mut dyn View) {
        self.start_payment_flow(view, PaymentFlow::Checkout).await;
    }

    pub async fn manage_billing(&self, view: &mut dyn View) {
        self.start_payment_flow(view, PaymentFlow::BillingPortal).await;
    }

    async fn start_payment_flow(&self, view: &mut dyn View, flow: PaymentFlow) {
        let Some(email) = self.require_email(view) else {
            return;
        };
        self.persist_email(&email);
        view.set_status(StatusMessage::info(flow.progress()), false);

        let result = match flow {
            PaymentFlow::Checkout => self.backend.checkout(&email).await,
            PaymentFlow::BillingPortal => self.backend.billing_portal(&email).await,
        };

        match result {
            Ok(SessionLink { url: Some(url) }) if !url.is_empty() => {
                self.sink.info(flow.event(), "redirecting to payment provider");
                view.open_external(&url);
            }
            Ok(_) => self.fail(view, flow.event(), AnkifyError::UnexpectedResponse.to_string()),
            Err(e) => self.fail(view, flow.event(), Self::describe_failure(&e)),
        }
    }

    pub async fn build_deck(&self, view: &mut dyn View) {
        let Some(email) = self.require_email(view) else {
            return;
        };
        self.persist_email(&email);

        let request = match collect_build_request(&*view, &email) {
            Ok(request) => request,
            Err(e) => {
                view.set_status(StatusMessage::err(e.to_string()), true);
                return;
            }
        };

        view.set_status(StatusMessage::info("Building deck… this can take a minute."), false);

        match self.backend.build_deck(&request).await {
            Ok(deck) => {
                let filename =
                    derive_filename(deck.content_disposition.as_deref(), &request.deck_title);
                self.sink.info("build", &format!("{} bytes saved as {}", deck.bytes.len(), filename));
                view.offer_download(&filename, deck.bytes);
                view.set_status(StatusMessage::ok(format!("Downloaded {filename}")), false);
                self.refresh_usage(view).await;
                self.check_subscription(view, &email).await;
            }
            Err(e) => {
                // A refusal here is often an inactive subscription; let the pill catch up.
                self.fail(view, "build", Self::describe_failure(&e));
                self.check_subscription(view, &email).await;
            }
        }
    }

    /// Startup sequence. Runs once, each step awaited before the next.
    pub async fn init(&self, view: &mut dyn View, params: ReturnParams) {
        self.restore_email(view);
        self.on_yield_input(view);

        self.refresh_health(view).await;
        self.refresh_usage(view).await;

        let email = normalize_email(&view.email());
        if !email.is_empty() {
            self.check_subscription(view, &email).await;
        }

        if let Some(message) = params.message() {
            if !email.is_empty() {
                view.set_status(StatusMessage::info(message), false);
                self.check_subscription(view, &email).await;
            }
            view.clear_return_params();
        }
    }

    pub fn on_yield_input(&self, view: &mut dyn View) {
        let band = YieldBand::from_slider(view.yield_slider());
        view.set_yield_label(band);
    }

    /// The email field changed or lost focus.
    pub async fn on_email_committed(&self, view: &mut dyn View) {
        let email = normalize_email(&view.email());
        self.persist_email(&email);
        self.check_subscription(view, &email).await;
    }

    /// Starts a fresh usage month on the server, optionally with a new cap.
    pub async fn reset_usage(&self, view: &mut dyn View, cap: Option<u32>) {
        view.set_status(StatusMessage::info("Resetting usage…"), false);
        match self.backend.reset_usage(cap).await {
            Ok(receipt) if receipt.ok => {
                view.set_usage_text(receipt.usage.render());
                view.set_status(StatusMessage::ok("Usage reset."), false);
            }
            Ok(_) => self.fail(view, "usage_reset", AnkifyError::UnexpectedResponse.to_string()),
            Err(e) => self.fail(view, "usage_reset", Self::describe_failure(&e)),
        }
    }
}
