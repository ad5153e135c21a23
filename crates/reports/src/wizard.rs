//! Parameters collected before printing a product ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockreport_core::{DomainError, DomainResult, LocationId, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLedgerParams {
    pub products: Vec<ProductId>,
    pub warehouses: Vec<LocationId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ProductLedgerParams {
    pub fn validate(&self) -> DomainResult<()> {
        if self.products.is_empty() {
            return Err(DomainError::validation("select at least one product"));
        }
        if self.warehouses.is_empty() {
            return Err(DomainError::validation("select at least one warehouse"));
        }
        if self.start_date > self.end_date {
            return Err(DomainError::validation("start date must not be after end date"));
        }
        Ok(())
    }
}
