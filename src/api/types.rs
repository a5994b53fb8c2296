use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use serde_json::Value;

/// Keeps numbers, drops everything else. The usage endpoint is read loosely: a field of
/// the wrong type renders as `?` instead of failing the whole body.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_u64().and_then(|v| u32::try_from(v).ok()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| value.as_f64().map(|f| f as i64)).unwrap_or(0))
}

/// `GET /usage`. Every field is optional; missing ones render as `?`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UsageReport {
    #[serde(default, deserialize_with = "lenient_number")]
    pub cards_used: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub month: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub version: Option<u32>,
}

impl UsageReport {
    pub fn render(&self) -> String {
        let number = |n: Option<f64>| n.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
        format!(
            "Usage: {} / {} (month: {})",
            number(self.cards_used),
            number(self.cap),
            self.month.as_deref().unwrap_or("?")
        )
    }
}

pub const UNAVAILABLE_USAGE: &str = "Usage: unavailable";

/// `GET /admin/subscriptions?email=`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubscriptionRecord {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub status: Option<String>,
    /// Unix seconds. `null` or absent reads as 0, which is always in the past.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub current_period_end: i64,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
}

impl SubscriptionRecord {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let paid = matches!(self.status.as_deref(), Some("active") | Some("trialing"));
        let period_end_ms = self.current_period_end.saturating_mul(1000);
        self.found && paid && period_end_ms >= now.timestamp_millis()
    }
}

/// Reply of the checkout and billing-portal endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionLink {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailBody<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageResetBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UsageResetReceipt {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub usage: UsageReport,
}

/// A successful build: the `.apkg` payload and the server's suggested name, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltDeck {
    pub bytes: Vec<u8>,
    pub content_disposition: Option<String>,
}
