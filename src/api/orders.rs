use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::api::AppState;
use crate::db::OrderUpdate;
use crate::domain::{Decimal, OrderStatus, Side, Ticker, Transaction};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    pub id: Option<Uuid>,
    pub ticker: String,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
    pub status: Option<OrderStatus>,
    pub executed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: Uuid,
    pub ticker: String,
    pub side: Side,
    pub quantity: String,
    pub price: String,
    pub status: OrderStatus,
    pub executed_at: DateTime<Utc>,
}

impl From<&Transaction> for OrderDto {
    fn from(tx: &Transaction) -> Self {
        OrderDto {
            id: tx.id,
            ticker: tx.ticker.as_str().to_string(),
            side: tx.side,
            quantity: tx.quantity.to_canonical_string(),
            price: tx.price.to_canonical_string(),
            status: tx.status,
            executed_at: tx.executed_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderResponse {
    pub order: OrderDto,
    pub created: bool,
}

pub async fn submit_order(
    State(state): State<AppState>,
    Json(req): Json<SubmitOrderRequest>,
) -> Result<(StatusCode, Json<SubmitOrderResponse>), AppError> {
    let tx = Transaction::new(
        req.id.unwrap_or_else(Uuid::new_v4),
        Ticker::new(&req.ticker),
        req.side,
        req.quantity,
        req.price,
        req.status.unwrap_or(OrderStatus::Filled),
        req.executed_at.unwrap_or_else(Utc::now),
        0,
    )?;

    let created = state.repo.insert_order(&tx).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SubmitOrderResponse {
            order: OrderDto::from(&tx),
            created,
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub ticker: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountsDto {
    pub pending: i64,
    pub filled: i64,
    pub cancelled: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderDto>,
    pub counts: StatusCountsDto,
    pub total_value: String,
}

pub async fn list_orders(
    Query(params): Query<ListOrdersQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListOrdersResponse>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(OrderStatus::from_str)
        .transpose()
        .map_err(|_| {
            AppError::BadRequest("status must be pending, filled, or cancelled".to_string())
        })?;

    let ticker = params
        .ticker
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Ticker::new);

    let orders = state.repo.list_orders(status, ticker.as_ref()).await?;
    let counts = state.repo.count_by_status().await?;

    // Gross executed value of the listed orders, cancelled ones excluded.
    let total_value = orders
        .iter()
        .filter(|tx| tx.status != OrderStatus::Cancelled)
        .fold(Decimal::zero(), |acc, tx| acc + tx.gross_value());

    Ok(Json(ListOrdersResponse {
        orders: orders.iter().map(OrderDto::from).collect(),
        counts: StatusCountsDto {
            pending: counts.pending,
            filled: counts.filled,
            cancelled: counts.cancelled,
        },
        total_value: total_value.to_canonical_string(),
    }))
}

pub async fn cancel_order(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<OrderDto>, AppError> {
    match state.repo.cancel_order(&id).await? {
        OrderUpdate::Updated => {}
        OrderUpdate::NotFound => {
            return Err(AppError::NotFound(format!("order {id} does not exist")))
        }
        OrderUpdate::NotPending => {
            return Err(AppError::Conflict(format!(
                "order {id} is not pending and cannot be cancelled"
            )))
        }
    }

    let tx = state
        .repo
        .get_order(&id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("order {id} vanished after cancel")))?;
    Ok(Json(OrderDto::from(&tx)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendOrderRequest {
    pub quantity: Decimal,
    pub price: Decimal,
}

pub async fn amend_order(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(req): Json<AmendOrderRequest>,
) -> Result<Json<OrderDto>, AppError> {
    if !req.quantity.is_positive() {
        return Err(AppError::BadRequest("quantity must be positive".to_string()));
    }
    if !req.price.is_positive() {
        return Err(AppError::BadRequest("price must be positive".to_string()));
    }

    match state.repo.amend_order(&id, req.quantity, req.price).await? {
        OrderUpdate::Updated => {}
        OrderUpdate::NotFound => {
            return Err(AppError::NotFound(format!("order {id} does not exist")))
        }
        OrderUpdate::NotPending => {
            return Err(AppError::Conflict(format!(
                "order {id} is not pending and cannot be amended"
            )))
        }
    }

    let tx = state
        .repo
        .get_order(&id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("order {id} vanished after amend")))?;
    Ok(Json(OrderDto::from(&tx)))
}
