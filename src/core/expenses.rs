//! Travel expense sheet: itemized amounts in one currency, totalled and converted.

use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use crate::core::rates::CrossRates;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseItem {
    pub name: String,
    pub amount: f64,
}

impl ExpenseItem {
    pub fn new(name: &str, amount: f64) -> Result<Self, FxError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FxError::invalid("expense name must not be empty"));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(FxError::invalid(format!(
                "expense amount for '{name}' must be a positive number, got {amount}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            amount,
        })
    }
}

/// Parses `NAME=AMOUNT`, e.g. `Hotel=120.50`.
impl FromStr for ExpenseItem {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, amount) = s
            .rsplit_once('=')
            .ok_or_else(|| FxError::invalid(format!("expected NAME=AMOUNT, got '{s}'")))?;
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| FxError::invalid(format!("invalid amount in '{s}'")))?;
        ExpenseItem::new(name, amount)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseSheet {
    currency: CurrencyCode,
    items: Vec<ExpenseItem>,
}

impl ExpenseSheet {
    pub fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            items: Vec::new(),
        }
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn items(&self) -> &[ExpenseItem] {
        &self.items
    }

    pub fn add(&mut self, name: &str, amount: f64) -> Result<&ExpenseItem, FxError> {
        self.push(ExpenseItem::new(name, amount)?);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn push(&mut self, item: ExpenseItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> Result<ExpenseItem, FxError> {
        if index >= self.items.len() {
            return Err(FxError::invalid(format!(
                "no expense at position {index} ({} items)",
                self.items.len()
            )));
        }
        Ok(self.items.remove(index))
    }

    /// Sum of all items in the sheet currency.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Total converted with `rates`, which must be based on the sheet currency.
    ///
    /// An empty sheet converts to zero even without a rate; otherwise `None`
    /// means the target rate is unavailable.
    pub fn converted_total(&self, rates: &CrossRates, target: CurrencyCode) -> Option<f64> {
        let total = self.total();
        if total == 0.0 {
            return Some(0.0);
        }
        rates.convert(total, target)
    }
}
