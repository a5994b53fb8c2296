pub mod client;
pub mod types;

pub use client::{
    Backend,
    HttpBackend,
};
pub use types::{
    BuiltDeck,
    SessionLink,
    SubscriptionRecord,
    UsageReport,
    UsageResetReceipt,
    UNAVAILABLE_USAGE,
};
