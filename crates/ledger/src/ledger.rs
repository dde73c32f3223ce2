use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use restock_core::{ProductId, StockError, StockResult};

use crate::product::{NewProduct, Product, ProductPatch};
use crate::record::SaleRecord;

/// One (product id, quantity) pair within a sale request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u64,
}

/// A feasibility-checked, not-yet-applied set of deductions.
///
/// Produced by [`StockLedger::try_reserve`], consumed by
/// [`StockLedger::commit`]. Carries the name and unit price snapshots taken at
/// validation time; a concurrent price edit does not change what is charged.
#[derive(Debug, Clone)]
pub struct Reservation {
    lines: Vec<ReservedLine>,
}

#[derive(Debug, Clone)]
struct ReservedLine {
    product_id: ProductId,
    product_name: String,
    quantity: u64,
    unit_price: u64,
}

impl Reservation {
    /// Total sale amount in smallest currency units: Σ(price snapshot × qty).
    pub fn total_price(&self) -> u64 {
        self.lines
            .iter()
            .map(|l| l.unit_price.saturating_mul(l.quantity))
            .sum()
    }
}

/// Post-commit stock level of one affected product, returned by
/// [`StockLedger::commit`] so callers can drive alerting without a second read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedStock {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
    products: BTreeMap<ProductId, Product>,
    records: Vec<SaleRecord>,
    next_id: u64,
}

/// Authoritative product → quantity/price mapping plus the append-only sale
/// history.
///
/// A single `RwLock` over the whole state keeps each commit's
/// read-modify-write in one exclusive critical section: per-product changes
/// serialize, multi-row commits are atomic, and there is no lock ordering to
/// get wrong. `try_reserve` validates against one read-lock acquisition, so a
/// reservation is checked against a single consistent snapshot.
#[derive(Debug, Default)]
pub struct StockLedger {
    inner: RwLock<LedgerState>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StockResult<RwLockReadGuard<'_, LedgerState>> {
        self.inner
            .read()
            .map_err(|_| StockError::fatal("ledger lock poisoned"))
    }

    fn write(&self) -> StockResult<RwLockWriteGuard<'_, LedgerState>> {
        self.inner
            .write()
            .map_err(|_| StockError::fatal("ledger lock poisoned"))
    }

    pub fn add_product(&self, new: NewProduct) -> StockResult<Product> {
        new.validate()?;
        let mut state = self.write()?;
        state.next_id += 1;
        let product = Product {
            id: ProductId::new(state.next_id),
            name: new.name.trim().to_string(),
            quantity: new.quantity,
            price: new.price,
            expiry_date: new.expiry_date,
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn get(&self, id: ProductId) -> StockResult<Product> {
        self.read()?
            .products
            .get(&id)
            .cloned()
            .ok_or(StockError::ProductNotFound(id))
    }

    /// Read-only snapshot of every product row.
    pub fn list(&self) -> StockResult<Vec<Product>> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    /// Read-only snapshot of the sale history.
    pub fn sale_records(&self) -> StockResult<Vec<SaleRecord>> {
        Ok(self.read()?.records.clone())
    }

    /// Feasibility check for a set of deductions. Never mutates.
    ///
    /// All lines are validated against one consistent snapshot: unknown ids
    /// fail the whole request before any availability check, and duplicate
    /// ids are not merged — each line draws on the running balance.
    pub fn try_reserve(&self, lines: &[LineItem]) -> StockResult<Reservation> {
        let state = self.read()?;
        let reserved = check_lines(&state, lines)?;
        Ok(Reservation { lines: reserved })
    }

    /// Apply every deduction in `reservation` as a single unit, or nothing.
    ///
    /// Availability is re-checked under the exclusive lock before any row is
    /// touched: a product deleted since the reservation was taken is a fatal
    /// commit failure, stock taken by a racing commit surfaces as
    /// `InsufficientStock`. Either way nothing was applied and the whole sale
    /// may be retried from validation.
    pub fn commit(&self, reservation: Reservation) -> StockResult<Vec<CommittedStock>> {
        let mut state = self.write()?;

        // Compute every post-commit quantity before touching a row, so the
        // apply step below cannot fail halfway through.
        let mut post: BTreeMap<ProductId, u64> = BTreeMap::new();
        for line in &reservation.lines {
            let current = match post.get(&line.product_id) {
                Some(q) => *q,
                None => {
                    state
                        .products
                        .get(&line.product_id)
                        .ok_or_else(|| {
                            StockError::fatal(format!(
                                "product {} was deleted during commit",
                                line.product_id
                            ))
                        })?
                        .quantity
                }
            };
            let next = current.checked_sub(line.quantity).ok_or_else(|| {
                StockError::InsufficientStock {
                    name: line.product_name.clone(),
                    available: current,
                }
            })?;
            post.insert(line.product_id, next);
        }

        let now = Utc::now();
        let mut affected: BTreeMap<ProductId, CommittedStock> = BTreeMap::new();
        for line in &reservation.lines {
            if let Some(product) = state.products.get_mut(&line.product_id) {
                product.quantity = post[&line.product_id];
                affected.insert(
                    product.id,
                    CommittedStock {
                        product_id: product.id,
                        product_name: product.name.clone(),
                        quantity: product.quantity,
                    },
                );
            }
        }
        for line in &reservation.lines {
            state.records.push(SaleRecord {
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity_sold: line.quantity,
                unit_price: line.unit_price,
                sold_at: now,
            });
        }

        Ok(affected.into_values().collect())
    }

    /// Direct single-row quantity write; returns the post-mutation row.
    pub fn set_quantity(&self, id: ProductId, quantity: u64) -> StockResult<Product> {
        let mut state = self.write()?;
        let product = state
            .products
            .get_mut(&id)
            .ok_or(StockError::ProductNotFound(id))?;
        product.quantity = quantity;
        Ok(product.clone())
    }

    /// Relative quantity change (manual restock / correction); the resulting
    /// quantity must not be negative.
    pub fn adjust_quantity(&self, id: ProductId, delta: i64) -> StockResult<Product> {
        let mut state = self.write()?;
        let product = state
            .products
            .get_mut(&id)
            .ok_or(StockError::ProductNotFound(id))?;
        let next = product.quantity as i128 + delta as i128;
        if next < 0 {
            return Err(StockError::invalid_input("quantity cannot be negative"));
        }
        product.quantity = u64::try_from(next)
            .map_err(|_| StockError::invalid_input("quantity out of range"))?;
        Ok(product.clone())
    }

    /// Direct single-row edit; `None` fields are left unchanged. Returns the
    /// post-mutation row.
    pub fn edit_product(&self, id: ProductId, patch: ProductPatch) -> StockResult<Product> {
        patch.validate()?;
        let mut state = self.write()?;
        let product = state
            .products
            .get_mut(&id)
            .ok_or(StockError::ProductNotFound(id))?;
        if let Some(name) = patch.name {
            product.name = name.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            product.quantity = quantity;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(expiry_date) = patch.expiry_date {
            product.expiry_date = Some(expiry_date);
        }
        Ok(product.clone())
    }

    /// Remove a product row; returns the removed row so callers can retract
    /// any alert referencing it.
    pub fn delete_product(&self, id: ProductId) -> StockResult<Product> {
        let mut state = self.write()?;
        state
            .products
            .remove(&id)
            .ok_or(StockError::ProductNotFound(id))
    }
}

fn check_lines(state: &LedgerState, lines: &[LineItem]) -> StockResult<Vec<ReservedLine>> {
    // Resolve every id first: an unknown product fails the whole request
    // before any availability check runs.
    for line in lines {
        if !state.products.contains_key(&line.product_id) {
            return Err(StockError::ProductNotFound(line.product_id));
        }
    }

    let mut remaining: BTreeMap<ProductId, u64> = BTreeMap::new();
    let mut reserved = Vec::with_capacity(lines.len());
    for line in lines {
        let product = &state.products[&line.product_id];
        let available = remaining
            .entry(line.product_id)
            .or_insert(product.quantity);
        if *available < line.quantity {
            return Err(StockError::InsufficientStock {
                name: product.name.clone(),
                available: *available,
            });
        }
        *available -= line.quantity;
        reserved.push(ReservedLine {
            product_id: line.product_id,
            product_name: product.name.clone(),
            quantity: line.quantity,
            unit_price: product.price,
        });
    }
    Ok(reserved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(name: &str, quantity: u64, price: u64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            quantity,
            price,
            expiry_date: None,
        }
    }

    fn line(id: ProductId, quantity: u64) -> LineItem {
        LineItem {
            product_id: id,
            quantity,
        }
    }

    #[test]
    fn reserve_and_commit_decrements_and_records() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 5, 100)).unwrap();
        let b = ledger.add_product(product("Sugar", 3, 250)).unwrap();

        let reservation = ledger
            .try_reserve(&[line(a.id, 2), line(b.id, 1)])
            .unwrap();
        assert_eq!(reservation.total_price(), 2 * 100 + 250);

        let committed = ledger.commit(reservation).unwrap();
        assert_eq!(committed.len(), 2);
        assert_eq!(ledger.get(a.id).unwrap().quantity, 3);
        assert_eq!(ledger.get(b.id).unwrap().quantity, 2);

        let records = ledger.sale_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_name, "Rice");
        assert_eq!(records[0].quantity_sold, 2);
        assert_eq!(records[0].unit_price, 100);
    }

    #[test]
    fn duplicate_lines_draw_on_the_running_balance() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 5, 100)).unwrap();

        let err = ledger
            .try_reserve(&[line(a.id, 3), line(a.id, 3)])
            .unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                name: "Rice".to_string(),
                available: 2,
            }
        );

        // Cumulative but feasible: both lines pass.
        let reservation = ledger.try_reserve(&[line(a.id, 3), line(a.id, 2)]).unwrap();
        let committed = ledger.commit(reservation).unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].quantity, 0);
    }

    #[test]
    fn unknown_product_fails_before_availability() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 1, 100)).unwrap();

        // The second line would also be insufficient, but the unknown id wins.
        let err = ledger
            .try_reserve(&[line(ProductId::new(999), 1), line(a.id, 5)])
            .unwrap_err();
        assert_eq!(err, StockError::ProductNotFound(ProductId::new(999)));
    }

    #[test]
    fn failed_reserve_leaves_everything_unchanged() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 5, 100)).unwrap();
        let b = ledger.add_product(product("Sugar", 1, 250)).unwrap();

        let err = ledger
            .try_reserve(&[line(a.id, 1), line(b.id, 10)])
            .unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                name: "Sugar".to_string(),
                available: 1,
            }
        );
        assert_eq!(ledger.get(a.id).unwrap().quantity, 5);
        assert_eq!(ledger.get(b.id).unwrap().quantity, 1);
        assert!(ledger.sale_records().unwrap().is_empty());
    }

    #[test]
    fn commit_after_concurrent_delete_is_fatal_and_applies_nothing() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 5, 100)).unwrap();
        let b = ledger.add_product(product("Sugar", 5, 250)).unwrap();

        let reservation = ledger
            .try_reserve(&[line(a.id, 1), line(b.id, 1)])
            .unwrap();
        ledger.delete_product(b.id).unwrap();

        let err = ledger.commit(reservation).unwrap_err();
        assert!(matches!(err, StockError::Fatal(_)));
        assert_eq!(ledger.get(a.id).unwrap().quantity, 5);
        assert!(ledger.sale_records().unwrap().is_empty());
    }

    #[test]
    fn racing_commit_surfaces_insufficiency_without_going_negative() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 5, 100)).unwrap();

        let first = ledger.try_reserve(&[line(a.id, 3)]).unwrap();
        let second = ledger.try_reserve(&[line(a.id, 3)]).unwrap();

        ledger.commit(first).unwrap();
        let err = ledger.commit(second).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                name: "Rice".to_string(),
                available: 2,
            }
        );
        assert_eq!(ledger.get(a.id).unwrap().quantity, 2);
        assert_eq!(ledger.sale_records().unwrap().len(), 1);
    }

    #[test]
    fn adjust_quantity_rejects_negative_result() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 3, 100)).unwrap();

        let err = ledger.adjust_quantity(a.id, -4).unwrap_err();
        assert!(matches!(err, StockError::InvalidInput(_)));
        assert_eq!(ledger.get(a.id).unwrap().quantity, 3);

        let updated = ledger.adjust_quantity(a.id, 12).unwrap();
        assert_eq!(updated.quantity, 15);
    }

    #[test]
    fn edit_product_only_touches_given_fields() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 3, 100)).unwrap();

        let updated = ledger
            .edit_product(
                a.id,
                ProductPatch {
                    price: Some(120),
                    ..ProductPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Rice");
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.price, 120);
    }

    #[test]
    fn add_product_rejects_blank_name() {
        let ledger = StockLedger::new();
        let err = ledger.add_product(product("   ", 3, 100)).unwrap_err();
        assert!(matches!(err, StockError::InvalidInput(_)));
    }

    #[test]
    fn concurrent_sales_never_oversell() {
        let ledger = StockLedger::new();
        let a = ledger.add_product(product("Rice", 100, 100)).unwrap();

        let successes = std::sync::atomic::AtomicU64::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        let Ok(reservation) = ledger.try_reserve(&[line(a.id, 1)]) else {
                            continue;
                        };
                        match ledger.commit(reservation) {
                            Ok(_) => {
                                successes.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                            }
                            Err(StockError::InsufficientStock { .. }) => {}
                            Err(other) => panic!("unexpected commit error: {other}"),
                        }
                    }
                });
            }
        });

        let sold = successes.load(std::sync::atomic::Ordering::Relaxed);
        assert_eq!(ledger.get(a.id).unwrap().quantity, 100 - sold);
        assert_eq!(ledger.sale_records().unwrap().len(), sold as usize);
    }

    proptest! {
        #[test]
        fn quantity_tracks_committed_deductions_exactly(
            initial in 0u64..50,
            requests in proptest::collection::vec(1u64..10, 1..20),
        ) {
            let ledger = StockLedger::new();
            let a = ledger.add_product(product("Rice", initial, 100)).unwrap();

            let mut expected = initial;
            for qty in requests {
                match ledger.try_reserve(&[line(a.id, qty)]) {
                    Ok(reservation) => {
                        ledger.commit(reservation).unwrap();
                        expected -= qty;
                    }
                    Err(StockError::InsufficientStock { available, .. }) => {
                        prop_assert_eq!(available, expected);
                        prop_assert!(qty > expected);
                    }
                    Err(other) => return Err(TestCaseError::fail(format!("{other}"))),
                }
                prop_assert_eq!(ledger.get(a.id).unwrap().quantity, expected);
            }
        }
    }
}
