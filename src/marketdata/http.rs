//! HTTP quote-source client for the reference-data endpoint.

use super::{MarketDataError, QuoteSource};
use crate::domain::{Decimal, Quote, Ticker};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Quote source backed by an HTTP reference-data service.
///
/// Expects `GET {base}/quotes` to return a JSON array of objects with
/// `ticker`, `bid`, and `ask` fields (bid/ask as decimal strings).
#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    client: Client,
    base_url: String,
}

impl HttpQuoteSource {
    /// Create a new HTTP quote source.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn get_quotes_json(
        &self,
        tickers: &[Ticker],
    ) -> Result<serde_json::Value, MarketDataError> {
        let url = format!("{}/quotes", self.base_url);
        let query: Vec<(&str, String)> = if tickers.is_empty() {
            Vec::new()
        } else {
            let joined = tickers
                .iter()
                .map(Ticker::as_str)
                .collect::<Vec<_>>()
                .join(",");
            vec![("tickers", joined)]
        };

        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .get(&url)
                .query(&query)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(MarketDataError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(MarketDataError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(MarketDataError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(MarketDataError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(MarketDataError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch_quotes(&self, tickers: &[Ticker]) -> Result<Vec<Quote>, MarketDataError> {
        debug!("Fetching quotes for {} tickers", tickers.len());

        let response = self.get_quotes_json(tickers).await?;

        let quotes_json = response
            .as_array()
            .ok_or_else(|| MarketDataError::ParseError("Expected array response".to_string()))?;

        let mut quotes = Vec::new();
        for quote_json in quotes_json {
            match parse_quote(quote_json) {
                Ok(quote) => quotes.push(quote),
                Err(e) => {
                    warn!("Failed to parse quote: {}", e);
                }
            }
        }

        Ok(quotes)
    }
}

fn parse_quote(quote_json: &serde_json::Value) -> Result<Quote, MarketDataError> {
    let ticker = quote_json
        .get("ticker")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MarketDataError::ParseError("Missing ticker field".to_string()))?;

    let bid_str = quote_json
        .get("bid")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MarketDataError::ParseError("Missing bid field".to_string()))?;
    let bid = Decimal::from_str_canonical(bid_str)
        .map_err(|e| MarketDataError::ParseError(format!("Invalid bid: {}", e)))?;

    let ask_str = quote_json
        .get("ask")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MarketDataError::ParseError("Missing ask field".to_string()))?;
    let ask = Decimal::from_str_canonical(ask_str)
        .map_err(|e| MarketDataError::ParseError(format!("Invalid ask: {}", e)))?;

    Ok(Quote::new(Ticker::new(ticker), bid, ask))
}
