//! Core business logic: currencies, rates, history and the calculators built on them

pub mod assistant;
pub mod config;
pub mod currency;
pub mod error;
pub mod expenses;
pub mod favorites;
pub mod history;
pub mod log;
pub mod provider;
pub mod rates;

// Re-export main types for cleaner imports
pub use assistant::{AiCapability, Assistant, CurrencyPair};
pub use currency::CurrencyCode;
pub use error::FxError;
pub use history::HistoricalPoint;
pub use provider::RateProvider;
pub use rates::{CrossRates, RateTable};
