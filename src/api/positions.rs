use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{
    parse_method, sort_transactions_chronological, InventoryMethod, OrderStatus, QuoteBoard,
    Ticker, Transaction,
};
use crate::engine::{aggregate, match_transactions, summarize, Breakdown, LotPortion, Position};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodQuery {
    pub method: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotPortionDto {
    pub tx_id: Uuid,
    pub quantity: String,
    pub price: String,
}

impl From<&LotPortion> for LotPortionDto {
    fn from(lot: &LotPortion) -> Self {
        LotPortionDto {
            tx_id: lot.tx_id,
            quantity: lot.quantity.to_canonical_string(),
            price: lot.price.to_canonical_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownDto {
    pub open_lots: Vec<LotPortionDto>,
    pub formula_trace: String,
}

impl From<&Breakdown> for BreakdownDto {
    fn from(b: &Breakdown) -> Self {
        BreakdownDto {
            open_lots: b.open_lots.iter().map(LotPortionDto::from).collect(),
            formula_trace: b.formula_trace.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub ticker: String,
    pub net_quantity: String,
    pub average_cost: String,
    pub market_price: Option<String>,
    pub notional_value: String,
    pub mark_to_market_pnl: String,
    pub unrealized_pnl_percent: String,
    pub contributing_transactions: Vec<Uuid>,
    pub breakdown: BreakdownDto,
}

impl From<&Position> for PositionDto {
    fn from(p: &Position) -> Self {
        PositionDto {
            ticker: p.ticker.as_str().to_string(),
            net_quantity: p.net_quantity.to_canonical_string(),
            average_cost: p.average_cost.to_canonical_string(),
            market_price: p.market_price.map(|m| m.to_canonical_string()),
            notional_value: p.notional_value.to_canonical_string(),
            mark_to_market_pnl: p.mark_to_market_pnl.to_canonical_string(),
            unrealized_pnl_percent: p.unrealized_pnl_percent.to_canonical_string(),
            contributing_transactions: p.contributing_transactions.clone(),
            breakdown: BreakdownDto::from(&p.breakdown),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub total_mtm_pnl: String,
    pub open_positions: usize,
    pub gross_notional: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub method: InventoryMethod,
    pub positions: Vec<PositionDto>,
    pub summary: SummaryDto,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

fn resolve_method(raw: Option<&str>, state: &AppState) -> Result<InventoryMethod, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(parse_method(s)?),
        None => Ok(state.config.inventory_method),
    }
}

async fn quote_board_for(
    state: &AppState,
    transactions: &[Transaction],
) -> Result<QuoteBoard, AppError> {
    let mut tickers: Vec<Ticker> = Vec::new();
    for tx in transactions {
        if !tickers.contains(&tx.ticker) {
            tickers.push(tx.ticker.clone());
        }
    }
    let quotes = state.quotes.fetch_quotes(&tickers).await?;
    Ok(QuoteBoard::from_quotes(quotes))
}

pub async fn get_positions(
    Query(params): Query<MethodQuery>,
    State(state): State<AppState>,
) -> Result<Json<PositionsResponse>, AppError> {
    let method = resolve_method(params.method.as_deref(), &state)?;

    let transactions = state
        .repo
        .list_orders(Some(OrderStatus::Filled), None)
        .await?;
    let board = quote_board_for(&state, &transactions).await?;

    // Stored rows already passed request validation, so a failure here
    // means the store itself holds bad data.
    let positions =
        aggregate(&transactions, method, &board).map_err(|e| AppError::Internal(e.to_string()))?;
    let summary = summarize(&positions);

    let warnings = positions
        .iter()
        .filter(|p| !p.is_priced())
        .map(|p| format!("no quote for {}", p.ticker))
        .collect();

    Ok(Json(PositionsResponse {
        method,
        positions: positions.iter().map(PositionDto::from).collect(),
        summary: SummaryDto {
            total_mtm_pnl: summary.total_mtm_pnl.to_canonical_string(),
            open_positions: summary.open_positions,
            gross_notional: summary.gross_notional.to_canonical_string(),
        },
        warnings,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownResponse {
    pub ticker: String,
    pub method: InventoryMethod,
    pub net_quantity: String,
    pub average_cost: String,
    pub open_lots: Vec<LotPortionDto>,
    pub formula_trace: String,
}

pub async fn get_breakdown(
    Path(ticker): Path<String>,
    Query(params): Query<MethodQuery>,
    State(state): State<AppState>,
) -> Result<Json<BreakdownResponse>, AppError> {
    let method = resolve_method(params.method.as_deref(), &state)?;
    let ticker = Ticker::new(&ticker);
    if ticker.is_empty() {
        return Err(AppError::BadRequest("ticker must not be empty".to_string()));
    }

    let mut transactions = state
        .repo
        .list_orders(Some(OrderStatus::Filled), Some(&ticker))
        .await?;
    if transactions.is_empty() {
        return Err(AppError::NotFound(format!("no filled orders for {ticker}")));
    }
    sort_transactions_chronological(&mut transactions);

    let outcome =
        match_transactions(&transactions, method).map_err(|e| AppError::Internal(e.to_string()))?;
    if outcome.net_remaining.is_zero() {
        return Err(AppError::NotFound(format!("position in {ticker} is flat")));
    }

    Ok(Json(BreakdownResponse {
        ticker: ticker.as_str().to_string(),
        method,
        net_quantity: outcome.net_remaining.to_canonical_string(),
        average_cost: outcome.average_cost.to_canonical_string(),
        open_lots: outcome.open_lots.iter().map(LotPortionDto::from).collect(),
        formula_trace: outcome.formula_trace,
    }))
}
