use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{
        CACHE_CONTROL,
        CONTENT_DISPOSITION,
        PRAGMA,
    },
    Client,
    RequestBuilder,
    Response,
};
use url::Url;

use super::types::{
    BuiltDeck,
    EmailBody,
    SessionLink,
    SubscriptionRecord,
    UsageReport,
    UsageResetBody,
    UsageResetReceipt,
};
use crate::core::{
    models::BuildRequest,
    AnkifyError,
};

/// The deck service as seen from the client. One method per endpoint.
///
/// Non-success statuses come back as [`AnkifyError::Status`] carrying the body text;
/// deciding whether that is shown or swallowed is the caller's business.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /healthz`, status only.
    async fn health(&self) -> Result<(), AnkifyError>;
    async fn usage(&self) -> Result<UsageReport, AnkifyError>;
    async fn subscription(&self, email: &str) -> Result<SubscriptionRecord, AnkifyError>;
    async fn checkout(&self, email: &str) -> Result<SessionLink, AnkifyError>;
    async fn billing_portal(&self, email: &str) -> Result<SessionLink, AnkifyError>;
    async fn build_deck(&self, request: &BuildRequest) -> Result<BuiltDeck, AnkifyError>;
    async fn reset_usage(&self, cap: Option<u32>) -> Result<UsageResetReceipt, AnkifyError>;
}

/// Without a `timeout` a request waits for as long as the server keeps the connection open.
pub fn http_client(timeout: Option<Duration>) -> Result<Client, AnkifyError> {
    let mut builder = Client::builder()
        .user_agent(concat!("ankify/", env!("CARGO_PKG_VERSION"), " (+reqwest)"));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AnkifyError::Custom(format!("HTTP client build failed: {e}")))
}

pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AnkifyError> {
        Ok(Self { client: http_client(timeout)?, base_url: Url::parse(base_url)? })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AnkifyError> {
        Ok(self.base_url.join(path)?)
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, AnkifyError> {
        Ok(self
            .client
            .get(self.endpoint(path)?)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache"))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, AnkifyError> {
        Ok(self.client.post(self.endpoint(path)?))
    }

    async fn session_link(&self, path: &str, email: &str) -> Result<SessionLink, AnkifyError> {
        let response = self.post(path)?.json(&EmailBody { email }).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, AnkifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AnkifyError::Status { status: status.as_u16(), body })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn health(&self) -> Result<(), AnkifyError> {
        ensure_success(self.get("/healthz")?.send().await?).await?;
        Ok(())
    }

    async fn usage(&self) -> Result<UsageReport, AnkifyError> {
        let response = ensure_success(self.get("/usage")?.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn subscription(&self, email: &str) -> Result<SubscriptionRecord, AnkifyError> {
        let response = self.get("/admin/subscriptions")?.query(&[("email", email)]).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn checkout(&self, email: &str) -> Result<SessionLink, AnkifyError> {
        self.session_link("/api/checkout", email).await
    }

    async fn billing_portal(&self, email: &str) -> Result<SessionLink, AnkifyError> {
        self.session_link("/api/billing-portal", email).await
    }

    async fn build_deck(&self, request: &BuildRequest) -> Result<BuiltDeck, AnkifyError> {
        let response = self.post("/build-apkg")?.json(request).send().await?;
        let response = ensure_success(response).await?;

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(BuiltDeck { bytes, content_disposition })
    }

    async fn reset_usage(&self, cap: Option<u32>) -> Result<UsageResetReceipt, AnkifyError> {
        let response = self.post("/usage/reset")?.json(&UsageResetBody { cap }).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}
