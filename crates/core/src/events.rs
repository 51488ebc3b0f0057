//! Clickstream event definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw row from the clickstream log.
///
/// Every field is read as text and may be absent: empty CSV fields, short
/// rows, and columns missing from the header all deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Epoch milliseconds, string-encoded
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub visitorid: Option<String>,
    /// Free-text event label
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub itemid: Option<String>,
    #[serde(default)]
    pub transactionid: Option<String>,
}

impl RawEvent {
    pub fn new(
        timestamp: impl Into<String>,
        visitorid: impl Into<String>,
        event: impl Into<String>,
        itemid: impl Into<String>,
        transactionid: Option<&str>,
    ) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            visitorid: Some(visitorid.into()),
            event: Some(event.into()),
            itemid: Some(itemid.into()),
            transactionid: transactionid.map(str::to_string),
        }
    }
}

/// Funnel steps recognised by the aggregators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    View,
    AddToCart,
    Transaction,
}

impl EventKind {
    /// Funnel order: view → addtocart → transaction.
    pub const FUNNEL: [EventKind; 3] = [Self::View, Self::AddToCart, Self::Transaction];

    /// Matches a normalized (lower-cased) event name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "view" => Some(Self::View),
            "addtocart" => Some(Self::AddToCart),
            "transaction" => Some(Self::Transaction),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::AddToCart => "addtocart",
            Self::Transaction => "transaction",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical event with a guaranteed calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub event_date: NaiveDate,
    pub user_id: Option<String>,
    pub item_id: Option<String>,
    /// Lower-cased label; not restricted to the known kinds
    pub event_name: Option<String>,
    pub transaction_id: Option<String>,
}

impl NormalizedEvent {
    /// The funnel step this event counts toward, if any.
    pub fn kind(&self) -> Option<EventKind> {
        self.event_name.as_deref().and_then(EventKind::from_name)
    }

    pub fn user(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn item(&self) -> Option<&str> {
        self.item_id.as_deref()
    }
}
