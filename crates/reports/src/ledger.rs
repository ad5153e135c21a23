//! Product ledger: per-product movement categories over a date window, with
//! opening and closing stock.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use stockreport_core::{DomainError, LocationId, ProductId};
use stockreport_stock::{
    LocationType, MoveFilter, MoveOrder, MoveState, Product, StockMove, StockRepository,
};

use crate::error::ReportError;
use crate::wizard::ProductLedgerParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCategory {
    Purchased,
    Produced,
    Sold,
    LostAndFound,
    Consumed,
}

impl LedgerCategory {
    pub const ALL: [LedgerCategory; 5] = [
        LedgerCategory::Purchased,
        LedgerCategory::Produced,
        LedgerCategory::Sold,
        LedgerCategory::LostAndFound,
        LedgerCategory::Consumed,
    ];

    pub fn title(self) -> &'static str {
        match self {
            LedgerCategory::Purchased => "Purchased",
            LedgerCategory::Produced => "Produced",
            LedgerCategory::Sold => "Sold",
            LedgerCategory::LostAndFound => "Lost and Found",
            LedgerCategory::Consumed => "Consumed",
        }
    }

    /// Moves of `product` in the inclusive window that belong to this category.
    ///
    /// Consumption carries no state condition.
    pub fn filter(self, product: ProductId, start: NaiveDate, end: NaiveDate) -> MoveFilter {
        let base = MoveFilter::new().product(product).effective_between(start, end);
        match self {
            LedgerCategory::Purchased => base.state(MoveState::Done).from_type(LocationType::Supplier),
            LedgerCategory::Produced => base.state(MoveState::Done).from_type(LocationType::Production),
            LedgerCategory::Sold => base.state(MoveState::Done).to_type(LocationType::Customer),
            LedgerCategory::LostAndFound => base.state(MoveState::Done).from_type(LocationType::LostFound),
            LedgerCategory::Consumed => base.to_type(LocationType::Production),
        }
    }
}

/// Quantities are in the product's default unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub opening_stock: Decimal,
    pub purchased: Decimal,
    pub produced: Decimal,
    pub sold: Decimal,
    pub lost_and_found: Decimal,
    pub consumed: Decimal,
    pub closing_stock: Decimal,
}

impl LedgerSummary {
    pub fn total(&self, category: LedgerCategory) -> Decimal {
        match category {
            LedgerCategory::Purchased => self.purchased,
            LedgerCategory::Produced => self.produced,
            LedgerCategory::Sold => self.sold,
            LedgerCategory::LostAndFound => self.lost_and_found,
            LedgerCategory::Consumed => self.consumed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    pub product: Product,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purchases: Vec<StockMove>,
    pub productions: Vec<StockMove>,
    pub customers: Vec<StockMove>,
    pub lost_and_founds: Vec<StockMove>,
    pub consumed: Vec<StockMove>,
    pub summary: LedgerSummary,
}

impl LedgerRecord {
    pub fn moves(&self, category: LedgerCategory) -> &[StockMove] {
        match category {
            LedgerCategory::Purchased => &self.purchases,
            LedgerCategory::Produced => &self.productions,
            LedgerCategory::Sold => &self.customers,
            LedgerCategory::LostAndFound => &self.lost_and_founds,
            LedgerCategory::Consumed => &self.consumed,
        }
    }
}

fn total(moves: &[StockMove]) -> Decimal {
    moves.iter().map(|m| m.internal_quantity).sum()
}

/// Ledger of one product over `[start, end]` restricted to `warehouses`.
pub fn compute_ledger<R>(
    repo: &R,
    product: &Product,
    warehouses: &[LocationId],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<LedgerRecord, ReportError>
where
    R: StockRepository + ?Sized,
{
    let day_before = start
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| DomainError::validation("start date out of range"))?;

    let find = |category: LedgerCategory| {
        repo.find_moves(&category.filter(product.id, start, end), MoveOrder::EffectiveDate)
    };

    let purchases = find(LedgerCategory::Purchased)?;
    let productions = find(LedgerCategory::Produced)?;
    let customers = find(LedgerCategory::Sold)?;
    let lost_and_founds = find(LedgerCategory::LostAndFound)?;
    let consumed = find(LedgerCategory::Consumed)?;

    let summary = LedgerSummary {
        opening_stock: repo.quantity_as_of(product.id, warehouses, day_before)?,
        purchased: total(&purchases),
        produced: total(&productions),
        sold: total(&customers),
        lost_and_found: total(&lost_and_founds),
        consumed: total(&consumed),
        closing_stock: repo.quantity_as_of(product.id, warehouses, end)?,
    };

    tracing::debug!(
        product = %product.id,
        %start,
        %end,
        purchased = %summary.purchased,
        sold = %summary.sold,
        "ledger computed"
    );

    Ok(LedgerRecord {
        product: product.clone(),
        start_date: start,
        end_date: end,
        purchases,
        productions,
        customers,
        lost_and_founds,
        consumed,
        summary,
    })
}

/// Ledger of every selected product, in selection order.
/// Every selected warehouse must exist.
pub fn product_ledger<R>(repo: &R, params: &ProductLedgerParams) -> Result<Vec<LedgerRecord>, ReportError>
where
    R: StockRepository + ?Sized,
{
    params.validate()?;
    for warehouse in &params.warehouses {
        repo.location(*warehouse)?;
    }
    params
        .products
        .iter()
        .map(|id| {
            let product = repo.product(*id)?;
            compute_ledger(repo, &product, &params.warehouses, params.start_date, params.end_date)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use stockreport_infra::InMemoryStockStore;
    use stockreport_stock::{Location, RepositoryError, Uom};

    struct World {
        store: InMemoryStockStore,
        product: Product,
        warehouse: Location,
        storage: Location,
        supplier: Location,
        customer: Location,
        production: Location,
        lost_found: Location,
    }

    fn world() -> World {
        let store = InMemoryStockStore::new();
        let warehouse = Location::new("Warehouse", LocationType::Warehouse);
        let storage = Location::new("Storage", LocationType::Storage).with_parent(warehouse.id);
        let supplier = Location::new("Supplier", LocationType::Supplier);
        let customer = Location::new("Customer", LocationType::Customer);
        let production = Location::new("Production", LocationType::Production);
        let lost_found = Location::new("Lost and Found", LocationType::LostFound);
        for loc in [&warehouse, &storage, &supplier, &customer, &production, &lost_found] {
            store.insert_location(loc.clone());
        }
        let product = Product::new("123", "Bat Mobile", Uom::unit());
        store.insert_product(product.clone());
        World {
            store,
            product,
            warehouse,
            storage,
            supplier,
            customer,
            production,
            lost_found,
        }
    }

    impl World {
        fn add(&self, qty: Decimal, from: &Location, to: &Location, date: NaiveDate, state: MoveState) -> StockMove {
            let mv = StockMove::new(self.product.clone(), Uom::unit(), qty, from.clone(), to.clone())
                .with_state(state)
                .with_effective_date(date);
            self.store.insert_move(mv.clone());
            mv
        }

        fn ledger(&self, start: NaiveDate, end: NaiveDate) -> LedgerRecord {
            compute_ledger(&self.store, &self.product, &[self.warehouse.id], start, end).unwrap()
        }
    }

    fn days_ago(today: NaiveDate, n: u64) -> NaiveDate {
        today.checked_sub_days(Days::new(n)).unwrap()
    }

    #[test]
    fn purchases_count_only_done_moves_inside_window() {
        let w = world();
        let today = Utc::now().date_naive();

        w.add(dec!(2), &w.supplier, &w.storage, days_ago(today, 10), MoveState::Done);
        w.add(dec!(2), &w.supplier, &w.storage, days_ago(today, 5), MoveState::Done);
        w.add(dec!(2), &w.supplier, &w.storage, days_ago(today, 30), MoveState::Done);
        w.add(dec!(2), &w.supplier, &w.storage, days_ago(today, 3), MoveState::Draft);

        let ledger = w.ledger(days_ago(today, 15), today);

        assert_eq!(ledger.purchases.len(), 2);
        assert_eq!(ledger.summary.purchased, dec!(4));
        assert_eq!(ledger.summary.opening_stock, dec!(2));
        assert_eq!(ledger.summary.closing_stock, dec!(6));
    }

    #[test]
    fn moves_land_in_their_categories() {
        let w = world();
        let d = NaiveDate::from_ymd_opt(2015, 5, 10).unwrap();

        w.add(dec!(10), &w.supplier, &w.storage, d, MoveState::Done);
        w.add(dec!(5), &w.production, &w.storage, d, MoveState::Done);
        w.add(dec!(3), &w.storage, &w.customer, d, MoveState::Done);
        w.add(dec!(1), &w.lost_found, &w.storage, d, MoveState::Done);
        w.add(dec!(4), &w.storage, &w.production, d, MoveState::Done);
        w.add(dec!(2), &w.storage, &w.production, d, MoveState::Assigned);

        let ledger = w.ledger(d, d);
        let s = &ledger.summary;
        assert_eq!(s.purchased, dec!(10));
        assert_eq!(s.produced, dec!(5));
        assert_eq!(s.sold, dec!(3));
        assert_eq!(s.lost_and_found, dec!(1));
        // Consumption is not restricted to done moves.
        assert_eq!(s.consumed, dec!(6));
        assert_eq!(ledger.consumed.len(), 2);
        assert_eq!(s.opening_stock, Decimal::ZERO);
        assert_eq!(s.closing_stock, dec!(9));
    }

    #[test]
    fn categories_are_in_ascending_date_order() {
        let w = world();
        let d = |day| NaiveDate::from_ymd_opt(2015, 5, day).unwrap();
        w.add(dec!(1), &w.supplier, &w.storage, d(20), MoveState::Done);
        w.add(dec!(1), &w.supplier, &w.storage, d(2), MoveState::Done);
        w.add(dec!(1), &w.supplier, &w.storage, d(11), MoveState::Done);

        let ledger = w.ledger(d(1), d(31));
        let dates: Vec<_> = ledger.purchases.iter().filter_map(|m| m.effective_date).collect();
        assert_eq!(dates, vec![d(2), d(11), d(20)]);
    }

    #[test]
    fn totals_use_normalized_quantity() {
        let w = world();
        let d = NaiveDate::from_ymd_opt(2015, 5, 10).unwrap();
        let dozen = Uom::new("Dozen", "dz", dec!(12), dec!(1));
        let mv = StockMove::new(w.product.clone(), dozen, dec!(2), w.supplier.clone(), w.storage.clone())
            .with_state(MoveState::Done)
            .with_effective_date(d);
        w.store.insert_move(mv);

        let ledger = w.ledger(d, d);
        assert_eq!(ledger.summary.purchased, dec!(24));
    }

    #[test]
    fn product_ledger_validates_and_keeps_selection_order() {
        let w = world();
        let other = Product::new("456", "Grapple Gun", Uom::unit());
        w.store.insert_product(other.clone());
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2015, 1, 31).unwrap();

        let params = ProductLedgerParams {
            products: vec![other.id, w.product.id],
            warehouses: vec![w.warehouse.id],
            start_date: start,
            end_date: end,
        };
        let records = product_ledger(&w.store, &params).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product, other);
        assert_eq!(records[1].product, w.product);

        let inverted = ProductLedgerParams {
            start_date: end,
            end_date: start,
            ..params.clone()
        };
        assert!(matches!(
            product_ledger(&w.store, &inverted),
            Err(ReportError::InvalidParameters(_))
        ));

        let unknown = ProductLedgerParams {
            products: vec![ProductId::new()],
            ..params
        };
        assert!(matches!(
            product_ledger(&w.store, &unknown),
            Err(ReportError::Repository(_))
        ));
    }

    #[test]
    fn unknown_warehouse_is_not_found() {
        let w = world();
        let today = Utc::now().date_naive();
        w.add(dec!(2), &w.supplier, &w.storage, days_ago(today, 3), MoveState::Done);

        let params = ProductLedgerParams {
            products: vec![w.product.id],
            warehouses: vec![w.warehouse.id, LocationId::new()],
            start_date: days_ago(today, 10),
            end_date: today,
        };
        assert!(matches!(
            product_ledger(&w.store, &params),
            Err(ReportError::Repository(RepositoryError::NotFound { kind: "location", .. }))
        ));
    }

    #[derive(Debug, Clone, Copy)]
    enum Flow {
        Purchase,
        Production,
        Sale,
        Found,
        Consumption,
    }

    fn flow() -> impl Strategy<Value = Flow> {
        prop_oneof![
            Just(Flow::Purchase),
            Just(Flow::Production),
            Just(Flow::Sale),
            Just(Flow::Found),
            Just(Flow::Consumption),
        ]
    }

    fn state() -> impl Strategy<Value = MoveState> {
        prop_oneof![
            Just(MoveState::Draft),
            Just(MoveState::Assigned),
            Just(MoveState::Done),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: each category total is the sum of exactly the moves whose
        /// location types, state and date match that category.
        #[test]
        fn totals_match_category_predicates(
            moves in prop::collection::vec((flow(), state(), 0u32..40, 1i64..100), 0..30)
        ) {
            let w = world();
            let base = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
            let start = base + Days::new(10);
            let end = base + Days::new(25);

            let mut expected = LedgerSummary::default();
            for (flow, state, offset, qty) in moves {
                let date = base + Days::new(u64::from(offset));
                let qty = Decimal::from(qty);
                let (from, to) = match flow {
                    Flow::Purchase => (&w.supplier, &w.storage),
                    Flow::Production => (&w.production, &w.storage),
                    Flow::Sale => (&w.storage, &w.customer),
                    Flow::Found => (&w.lost_found, &w.storage),
                    Flow::Consumption => (&w.storage, &w.production),
                };
                w.add(qty, from, to, date, state);

                let inside = date >= start && date <= end;
                let done = state == MoveState::Done;
                match flow {
                    Flow::Purchase if inside && done => expected.purchased += qty,
                    Flow::Production if inside && done => expected.produced += qty,
                    Flow::Sale if inside && done => expected.sold += qty,
                    Flow::Found if inside && done => expected.lost_and_found += qty,
                    Flow::Consumption if inside => expected.consumed += qty,
                    _ => {}
                }
            }

            let ledger = w.ledger(start, end);
            for category in LedgerCategory::ALL {
                prop_assert_eq!(ledger.summary.total(category), expected.total(category));
                for mv in ledger.moves(category) {
                    let date = mv.effective_date.unwrap();
                    prop_assert!(date >= start && date <= end);
                    if category != LedgerCategory::Consumed {
                        prop_assert_eq!(mv.state, MoveState::Done);
                    }
                }
            }
        }

        /// Property: opening stock plus done inflows minus done outflows inside
        /// the window equals closing stock.
        #[test]
        fn opening_and_closing_reconcile(
            moves in prop::collection::vec((flow(), 0u32..40, 1i64..100), 0..30)
        ) {
            let w = world();
            let base = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
            let start = base + Days::new(10);
            let end = base + Days::new(25);

            for (flow, offset, qty) in moves {
                let date = base + Days::new(u64::from(offset));
                let (from, to) = match flow {
                    Flow::Purchase => (&w.supplier, &w.storage),
                    Flow::Production => (&w.production, &w.storage),
                    Flow::Sale => (&w.storage, &w.customer),
                    Flow::Found => (&w.lost_found, &w.storage),
                    Flow::Consumption => (&w.storage, &w.production),
                };
                w.add(Decimal::from(qty), from, to, date, MoveState::Done);
            }

            let s = w.ledger(start, end).summary;
            prop_assert_eq!(
                s.opening_stock + s.purchased + s.produced + s.lost_and_found - s.sold - s.consumed,
                s.closing_stock
            );
        }
    }
}
