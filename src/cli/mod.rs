//! Terminal front end: one module per subcommand plus shared table and styling helpers

pub mod chat;
pub mod convert;
pub mod currencies;
pub mod expenses;
pub mod favorites;
pub mod history;
pub mod insights;
pub mod rates;
pub mod setup;
pub mod ui;
