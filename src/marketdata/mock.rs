//! Mock quote source for testing without network calls.

use super::{MarketDataError, QuoteSource};
use crate::domain::{Quote, Ticker};
use async_trait::async_trait;

/// Mock quote source that returns predefined quotes.
#[derive(Debug, Clone, Default)]
pub struct MockQuoteSource {
    quotes: Vec<Quote>,
    fail_with: Option<String>,
}

impl MockQuoteSource {
    /// Create a new mock quote source with no quotes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quote to the mock source.
    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quotes.push(quote);
        self
    }

    /// Add multiple quotes to the mock source.
    pub fn with_quotes(mut self, quotes: Vec<Quote>) -> Self {
        self.quotes.extend(quotes);
        self
    }

    /// Make every fetch fail with the given message.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }
}

#[async_trait]
impl QuoteSource for MockQuoteSource {
    async fn fetch_quotes(&self, tickers: &[Ticker]) -> Result<Vec<Quote>, MarketDataError> {
        if let Some(message) = &self.fail_with {
            return Err(MarketDataError::Other(message.clone()));
        }

        Ok(self
            .quotes
            .iter()
            .filter(|q| tickers.is_empty() || tickers.contains(&q.ticker))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decimal;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[tokio::test]
    async fn test_mock_fetch_all() {
        let mock = MockQuoteSource::new()
            .with_quote(Quote::new(Ticker::new("GOI2027"), d("99.5"), d("100.5")))
            .with_quote(Quote::new(Ticker::new("TBILL26"), d("98"), d("98.5")));

        let quotes = mock.fetch_quotes(&[]).await.unwrap();
        assert_eq!(quotes.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_fetch_filtered() {
        let mock = MockQuoteSource::new()
            .with_quote(Quote::new(Ticker::new("GOI2027"), d("99.5"), d("100.5")))
            .with_quote(Quote::new(Ticker::new("TBILL26"), d("98"), d("98.5")));

        let quotes = mock
            .fetch_quotes(&[Ticker::new("tbill26")])
            .await
            .unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].ticker, Ticker::new("TBILL26"));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockQuoteSource::new().with_failure("feed down");
        let err = mock.fetch_quotes(&[]).await.unwrap_err();
        assert!(matches!(err, MarketDataError::Other(_)));
    }
}
