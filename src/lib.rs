pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod marketdata;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    Decimal, InventoryMethod, OrderStatus, Quote, QuoteBoard, Side, Ticker, Transaction,
};
pub use error::AppError;
pub use marketdata::{HttpQuoteSource, MarketDataError, MockQuoteSource, QuoteSource};
