//! Domain errors for rate resolution and the calculators built on it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    /// The base is not in the rate table (and is not USD), or is not a supported code.
    #[error("Base currency unresolvable: {base}")]
    UnresolvableBaseCurrency { base: String },

    #[error("No rate for {target} against base {base}")]
    UnresolvableTargetCurrency { base: String, target: String },

    /// A zero, negative or non-finite rate was found in the table or produced by a division.
    #[error("Corrupt rate table: {code} has rate {rate}")]
    CorruptRateTable { code: String, rate: f64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl FxError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        FxError::InvalidArgument(msg.into())
    }
}
