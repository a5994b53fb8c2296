//! Markers the payment provider sends the user back with.

use url::{
    form_urlencoded,
    Url,
};

use crate::core::AnkifyError;

pub const SUBSCRIBED_MESSAGE: &str = "Subscription updated. Checking status…";
pub const CANCELED_MESSAGE: &str = "Checkout canceled.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnParams {
    pub subscribed: bool,
    pub canceled: bool,
}

impl ReturnParams {
    /// Reads `subscribed=1` / `canceled=1` from a query string, with or without the `?`.
    pub fn from_query(query: &str) -> Self {
        let mut params = ReturnParams::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match (key.as_ref(), value.as_ref()) {
                ("subscribed", "1") => params.subscribed = true,
                ("canceled", "1") => params.canceled = true,
                _ => {}
            }
        }
        params
    }

    /// Accepts the return URL itself (`http://host/?subscribed=1`) or a bare query.
    pub fn from_launch_arg(arg: &str) -> Result<Self, AnkifyError> {
        let arg = arg.trim();
        if arg.contains("://") {
            let url = Url::parse(arg)?;
            return Ok(Self::from_query(url.query().unwrap_or("")));
        }
        Ok(Self::from_query(arg))
    }

    /// Status shown after returning from the provider. Success wins if both are set.
    pub fn message(&self) -> Option<&'static str> {
        if self.subscribed {
            Some(SUBSCRIBED_MESSAGE)
        } else if self.canceled {
            Some(CANCELED_MESSAGE)
        } else {
            None
        }
    }
}
