use chrono::{DateTime, Local, SecondsFormat};

use crate::analyzer::Mentions;

/// The `QueryResult` struct records the outcome of one successfully answered query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The prompt exactly as it was sent.
    pub query: String,
    /// When the answer was captured.
    pub timestamp: DateTime<Local>,
    /// Whether the company name appears in the answer.
    pub company_mentioned: bool,
    /// The configured product names found in the answer, in configuration order.
    pub products_mentioned: Vec<String>,
    /// Whether the domain appears in the answer.
    pub url_mentioned: bool,
    /// The raw answer text.
    pub full_response: String,
}

impl QueryResult {
    /// Builds a record from an answer and its analysis, stamped with the current time.
    pub fn new(query: impl Into<String>, answer: impl Into<String>, mentions: Mentions) -> Self {
        Self {
            query: query.into(),
            timestamp: Local::now(),
            company_mentioned: mentions.company,
            products_mentioned: mentions.products,
            url_mentioned: mentions.url,
            full_response: answer.into(),
        }
    }

    /// The timestamp as RFC 3339 with second precision, e.g. `2024-05-01T09:30:00+09:00`.
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// The matched products joined with `", "`, or the `none` marker when nothing matched.
    pub fn products_display(&self) -> String {
        if self.products_mentioned.is_empty() {
            crate::NO_PRODUCTS.to_string()
        } else {
            self.products_mentioned.join(", ")
        }
    }

    /// Whether at least one configured product was found.
    pub fn any_product_mentioned(&self) -> bool {
        !self.products_mentioned.is_empty()
    }
}
