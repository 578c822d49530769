//! Market-data abstraction for fetching instrument quotes.

use crate::domain::{Quote, Ticker};
use async_trait::async_trait;
use std::fmt;

pub mod http;
pub mod mock;

pub use http::HttpQuoteSource;
pub use mock::MockQuoteSource;

/// Quote source trait for fetching bid/ask reference data.
///
/// Implementations must handle retry/backoff and rate limiting.
#[async_trait]
pub trait QuoteSource: Send + Sync + fmt::Debug {
    /// Fetch quotes for the given tickers.
    ///
    /// # Arguments
    /// * `tickers` - Instruments to quote. An empty slice requests every
    ///   instrument the source knows about.
    ///
    /// # Returns
    /// Vector of quotes. Instruments the source cannot price are simply
    /// absent from the result; absence is not an error.
    async fn fetch_quotes(&self, tickers: &[Ticker]) -> Result<Vec<Quote>, MarketDataError>;
}

/// Error type for quote-source operations.
#[derive(Debug, Clone)]
pub enum MarketDataError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for MarketDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketDataError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MarketDataError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            MarketDataError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            MarketDataError::RateLimited => write!(f, "Rate limited"),
            MarketDataError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for MarketDataError {}
