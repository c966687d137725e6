// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership-scoped order repository.
//!
//! Every operation takes the caller's validated identity and evaluates the
//! ownership predicate inside the same transaction as the id lookup — there
//! is no "fetch by id, then check owner in the handler" window anywhere.
//! A non-owner and a non-existent id produce the same `NotFound`, so the
//! response never leaks whether another user's order exists.

use redb::ReadableTable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    make_owner_index_key, make_owner_prefix, make_owner_prefix_end, DbError, DbResult,
    OrderDatabase, ORDERS, ORDER_ID_SEQUENCE, OWNER_ORDER_INDEX, SEQUENCES,
};
use super::super::ownership::OwnedResource;

/// Order record.
///
/// `id`, `total_amount`, and `owner_username` are server-assigned; the API
/// request types cannot carry them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredOrder {
    /// Server-assigned monotonic identifier.
    pub id: u64,
    /// Product name (1-100 characters).
    pub product_name: String,
    /// Ordered quantity, at least 1.
    pub quantity: u32,
    /// Price per unit, greater than zero.
    pub unit_price: Decimal,
    /// Always `quantity * unit_price`, recomputed on every write.
    pub total_amount: Decimal,
    /// Identity that created the order. Set once, never rewritten.
    pub owner_username: String,
}

impl OwnedResource for StoredOrder {
    fn owner_username(&self) -> &str {
        &self.owner_username
    }
}

/// The one place order totals are computed.
fn compute_total(quantity: u32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// Repository for order CRUD, always scoped to an owner.
pub struct OrderRepository<'a> {
    db: &'a OrderDatabase,
}

impl<'a> OrderRepository<'a> {
    /// Create a new OrderRepository.
    pub fn new(db: &'a OrderDatabase) -> Self {
        Self { db }
    }

    /// Create an order for `owner`.
    ///
    /// Allocates the next id from the persisted sequence in the same write
    /// transaction as the insert, so ids are unique and monotonic even
    /// under concurrent creates. `total_amount` is computed here, never
    /// taken from input.
    pub fn create(
        &self,
        owner: &str,
        product_name: &str,
        quantity: u32,
        unit_price: Decimal,
    ) -> DbResult<StoredOrder> {
        let write_txn = self.db.begin_write()?;
        let order = {
            let mut seq_table = write_txn.open_table(SEQUENCES)?;
            let last = seq_table
                .get(ORDER_ID_SEQUENCE)?
                .map(|v| v.value())
                .unwrap_or(0);
            let id = last + 1;
            seq_table.insert(ORDER_ID_SEQUENCE, id)?;

            let order = StoredOrder {
                id,
                product_name: product_name.to_string(),
                quantity,
                unit_price,
                total_amount: compute_total(quantity, unit_price),
                owner_username: owner.to_string(),
            };
            let json = serde_json::to_vec(&order)?;

            let mut orders_table = write_txn.open_table(ORDERS)?;
            orders_table.insert(id, json.as_slice())?;

            let mut idx_table = write_txn.open_table(OWNER_ORDER_INDEX)?;
            idx_table.insert(make_owner_index_key(owner, id).as_slice(), id)?;

            order
        };
        write_txn.commit()?;
        Ok(order)
    }

    /// List all orders of `owner`, newest (highest id) first.
    ///
    /// Scans the owner's index prefix; the inverted-id key layout makes the
    /// forward scan come out in descending id order.
    pub fn list(&self, owner: &str) -> DbResult<Vec<StoredOrder>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(OWNER_ORDER_INDEX)?;
        let orders_table = read_txn.open_table(ORDERS)?;

        let prefix = make_owner_prefix(owner);
        let end = make_owner_prefix_end(owner);

        let mut orders = Vec::new();
        for entry in idx_table.range(prefix.as_slice()..end.as_slice())? {
            let entry = entry?;
            let id = entry.1.value();
            if let Some(value) = orders_table.get(id)? {
                let order: StoredOrder = serde_json::from_slice(value.value())?;
                if order.owned_by(owner) {
                    orders.push(order);
                }
            }
        }

        Ok(orders)
    }

    /// Get one order, only if it exists and belongs to `owner`.
    pub fn get(&self, owner: &str, id: u64) -> DbResult<Option<StoredOrder>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS)?;
        match table.get(id)? {
            Some(value) => {
                let order: StoredOrder = serde_json::from_slice(value.value())?;
                if order.owned_by(owner) {
                    Ok(Some(order))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Overwrite an owned order's fields and recompute the total.
    ///
    /// Ownership check and overwrite are one write transaction; the owner
    /// field itself is never rewritten. A missing id and a foreign owner
    /// return the same `NotFound`.
    pub fn update(
        &self,
        owner: &str,
        id: u64,
        product_name: &str,
        quantity: u32,
        unit_price: Decimal,
    ) -> DbResult<StoredOrder> {
        let write_txn = self.db.begin_write()?;
        let order = {
            let mut table = write_txn.open_table(ORDERS)?;

            let existing_bytes = {
                let existing = table
                    .get(id)?
                    .ok_or_else(|| DbError::NotFound(format!("Order {id} not found")))?;
                existing.value().to_vec()
            };

            let mut order: StoredOrder = serde_json::from_slice(&existing_bytes)?;
            if !order.owned_by(owner) {
                return Err(DbError::NotFound(format!("Order {id} not found")));
            }

            order.product_name = product_name.to_string();
            order.quantity = quantity;
            order.unit_price = unit_price;
            order.total_amount = compute_total(quantity, unit_price);

            let json = serde_json::to_vec(&order)?;
            table.insert(id, json.as_slice())?;
            order
        };
        write_txn.commit()?;
        Ok(order)
    }

    /// Delete an owned order and its index entry.
    pub fn delete(&self, owner: &str, id: u64) -> DbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS)?;

            let owned = match table.get(id)? {
                Some(value) => {
                    let order: StoredOrder = serde_json::from_slice(value.value())?;
                    order.owned_by(owner)
                }
                None => return Err(DbError::NotFound(format!("Order {id} not found"))),
            };
            if !owned {
                return Err(DbError::NotFound(format!("Order {id} not found")));
            }

            table.remove(id)?;
            let mut idx_table = write_txn.open_table(OWNER_ORDER_INDEX)?;
            idx_table.remove(make_owner_index_key(owner, id).as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (OrderDatabase, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = OrderDatabase::open(&dir.path().join("orders.redb")).expect("Failed to open db");
        (db, dir)
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn create_computes_total_and_sets_owner() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let order = repo.create("a@x.com", "Widget", 3, dec("9.99")).unwrap();

        assert_eq!(order.total_amount, dec("29.97"));
        assert_eq!(order.owner_username, "a@x.com");
        assert_eq!(order.quantity, 3);
    }

    #[test]
    fn ids_are_monotonic_across_owners() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let first = repo.create("a@x.com", "Pen", 1, dec("1.50")).unwrap();
        let second = repo.create("b@x.com", "Pen", 1, dec("1.50")).unwrap();
        let third = repo.create("a@x.com", "Pen", 1, dec("1.50")).unwrap();

        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[test]
    fn list_returns_only_own_orders_newest_first() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let o1 = repo.create("a@x.com", "Pen", 1, dec("1.50")).unwrap();
        repo.create("b@x.com", "Intruder", 1, dec("1.00")).unwrap();
        let o2 = repo.create("a@x.com", "Pad", 2, dec("3.00")).unwrap();

        let orders = repo.list("a@x.com").unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, o2.id);
        assert_eq!(orders[1].id, o1.id);
        assert!(orders.iter().all(|o| o.owner_username == "a@x.com"));
    }

    #[test]
    fn list_for_unknown_owner_is_empty() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        repo.create("a@x.com", "Pen", 1, dec("1.50")).unwrap();
        assert!(repo.list("nobody@x.com").unwrap().is_empty());
    }

    #[test]
    fn get_hides_other_owners_orders() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let order = repo.create("a@x.com", "Pen", 2, dec("1.50")).unwrap();

        assert!(repo.get("a@x.com", order.id).unwrap().is_some());
        // Same result as a missing id.
        assert!(repo.get("b@x.com", order.id).unwrap().is_none());
        assert!(repo.get("a@x.com", order.id + 100).unwrap().is_none());
    }

    #[test]
    fn update_recomputes_total_and_keeps_owner() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let order = repo.create("a@x.com", "Pen", 2, dec("1.50")).unwrap();
        assert_eq!(order.total_amount, dec("3.00"));

        let updated = repo
            .update("a@x.com", order.id, "Pen (blue)", 5, dec("2.00"))
            .unwrap();

        assert_eq!(updated.id, order.id);
        assert_eq!(updated.product_name, "Pen (blue)");
        assert_eq!(updated.total_amount, dec("10.00"));
        assert_eq!(updated.owner_username, "a@x.com");

        let stored = repo.get("a@x.com", order.id).unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn update_by_non_owner_is_not_found_and_changes_nothing() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let order = repo.create("a@x.com", "Pen", 2, dec("1.50")).unwrap();

        let result = repo.update("b@x.com", order.id, "Hijacked", 9, dec("9.99"));
        assert!(matches!(result, Err(DbError::NotFound(_))));

        let stored = repo.get("a@x.com", order.id).unwrap().unwrap();
        assert_eq!(stored, order);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let result = repo.update("a@x.com", 42, "Pen", 1, dec("1.00"));
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn delete_by_non_owner_is_not_found_and_keeps_order() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let order = repo.create("a@x.com", "Pen", 2, dec("1.50")).unwrap();

        let result = repo.delete("b@x.com", order.id);
        assert!(matches!(result, Err(DbError::NotFound(_))));
        assert!(repo.get("a@x.com", order.id).unwrap().is_some());
    }

    #[test]
    fn delete_removes_order_and_index_entry() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let order = repo.create("a@x.com", "Pen", 2, dec("1.50")).unwrap();
        repo.delete("a@x.com", order.id).unwrap();

        assert!(repo.get("a@x.com", order.id).unwrap().is_none());
        assert!(repo.list("a@x.com").unwrap().is_empty());

        let result = repo.delete("a@x.com", order.id);
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let (db, _dir) = test_db();
        let repo = OrderRepository::new(&db);

        let first = repo.create("a@x.com", "Pen", 1, dec("1.00")).unwrap();
        repo.delete("a@x.com", first.id).unwrap();

        let second = repo.create("a@x.com", "Pad", 1, dec("1.00")).unwrap();
        assert!(second.id > first.id);
    }
}
