use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDto {
    pub ticker: String,
    pub bid: String,
    pub ask: String,
    pub mid: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesResponse {
    pub quotes: Vec<QuoteDto>,
}

/// Current quotes for every instrument present in the order store.
pub async fn get_quotes(State(state): State<AppState>) -> Result<Json<QuotesResponse>, AppError> {
    let tickers = state.repo.distinct_tickers().await?;
    let quotes = state.quotes.fetch_quotes(&tickers).await?;

    let quotes = quotes
        .iter()
        .map(|q| QuoteDto {
            ticker: q.ticker.as_str().to_string(),
            bid: q.bid.to_canonical_string(),
            ask: q.ask.to_canonical_string(),
            mid: q.mid().to_canonical_string(),
        })
        .collect();

    Ok(Json(QuotesResponse { quotes }))
}
