//! Domain primitives: Ticker, Side, OrderStatus, InventoryMethod.

use serde::{Deserialize, Serialize};

/// Instrument ticker symbol (e.g., "GOI2027", "TBILL26").
///
/// Canonicalized to uppercase on construction so lookups and grouping
/// are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Create a Ticker, trimming whitespace and uppercasing.
    pub fn new(raw: &str) -> Self {
        Ticker(raw.trim().to_uppercase())
    }

    /// Get the canonical ticker as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the canonical symbol is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order side: Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy side (long).
    Buy,
    /// Sell side (short).
    Sell,
}

impl Side {
    /// Get the signed multiplier for this side (+1 for Buy, -1 for Sell).
    pub fn sign(&self) -> i32 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    /// The opposite side.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(format!("unknown side: {}", other)),
        }
    }
}

/// Order lifecycle status.
///
/// Only `Filled` orders contribute to positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted but not yet executed.
    Pending,
    /// Executed and position-affecting.
    Filled,
    /// Withdrawn before execution.
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Filled => write!(f, "filled"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "filled" => Ok(OrderStatus::Filled),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Cost-basis method used when matching closing orders against open lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryMethod {
    /// First-in-first-out: oldest open lot consumed first.
    Fifo,
    /// Last-in-first-out: newest open lot consumed first.
    Lifo,
    /// Weighted average: lots consumed FIFO, cost reported as the
    /// quantity-weighted mean of what remains.
    #[serde(rename = "wavg")]
    WeightedAvg,
}

impl std::fmt::Display for InventoryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryMethod::Fifo => write!(f, "fifo"),
            InventoryMethod::Lifo => write!(f, "lifo"),
            InventoryMethod::WeightedAvg => write!(f, "wavg"),
        }
    }
}

impl std::str::FromStr for InventoryMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fifo" => Ok(InventoryMethod::Fifo),
            "lifo" => Ok(InventoryMethod::Lifo),
            "wavg" | "weighted_avg" | "weightedavg" => Ok(InventoryMethod::WeightedAvg),
            other => Err(format!("unknown inventory method: {}", other)),
        }
    }
}
