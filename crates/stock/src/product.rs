use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use stockreport_core::{Entity, ProductId, UomId};

/// Unit of measure.
///
/// `factor` is how many reference units of the category one of this unit holds
/// (a dozen has factor 12 when the reference is a unit). `rounding` is the
/// smallest representable step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uom {
    pub id: UomId,
    pub name: String,
    pub symbol: String,
    pub factor: Decimal,
    pub rounding: Decimal,
}

impl Uom {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, factor: Decimal, rounding: Decimal) -> Self {
        Self {
            id: UomId::new(),
            name: name.into(),
            symbol: symbol.into(),
            factor,
            rounding,
        }
    }

    /// Reference unit of the "Units" category.
    pub fn unit() -> Self {
        Self::new("Unit", "u", Decimal::ONE, Decimal::ONE)
    }

    /// Round a quantity to this unit's precision.
    pub fn round(&self, qty: Decimal) -> Decimal {
        if self.rounding.is_zero() {
            return qty;
        }
        (qty / self.rounding).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * self.rounding
    }

    /// Convert `qty` expressed in `self` into `to`, rounded to `to`'s precision.
    pub fn compute_qty(&self, qty: Decimal, to: &Uom) -> Decimal {
        if self.id == to.id || to.factor.is_zero() {
            return to.round(qty);
        }
        to.round(qty * self.factor / to.factor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub code: String,
    pub name: String,
    pub default_uom: Uom,
}

impl Product {
    pub fn new(code: impl Into<String>, name: impl Into<String>, default_uom: Uom) -> Self {
        Self {
            id: ProductId::new(),
            code: code.into(),
            name: name.into(),
            default_uom,
        }
    }

    /// `[code] name`, or just the name for products without a code.
    pub fn rec_name(&self) -> String {
        if self.code.is_empty() {
            self.name.clone()
        } else {
            format!("[{}] {}", self.code, self.name)
        }
    }

    /// Report ordering: code, then name, then id.
    pub fn sort_key(&self) -> (String, String, ProductId) {
        (self.code.clone(), self.name.clone(), self.id)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
