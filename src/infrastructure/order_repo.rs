use std::collections::hash_map::Entry;
use std::collections::HashMap;

use diesel::connection::{AnsiTransactionManager, DefaultLoadingMode, TransactionManager};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;
use crate::schema::{deliveries, items, orders, payments};

use super::errors::{Stage, StoreError};
use super::models::{
    DeliveryRow, ItemRow, JoinedRow, NewItemRow, NewOrderRow, NewPaymentRow, OrderRow, PaymentRow,
};

// ── Transactions ─────────────────────────────────────────────────────────────

/// Run `f` inside a transaction, committing on success and rolling back on error.
///
/// Unlike `Connection::transaction`, a failed rollback never hides the error
/// that caused it: both end up in `StoreError::RollbackFailed`.
fn in_transaction<T, F>(conn: &mut PgConnection, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, StoreError>,
{
    AnsiTransactionManager::begin_transaction(conn)
        .map_err(|e| StoreError::database(Stage::Begin, e))?;

    match f(conn) {
        Ok(value) => {
            AnsiTransactionManager::commit_transaction(conn).map_err(StoreError::commit)?;
            Ok(value)
        }
        Err(cause) => match AnsiTransactionManager::rollback_transaction(conn) {
            Ok(()) => Err(cause),
            Err(rollback) => {
                log::warn!("rollback failed after {cause}: {rollback}");
                Err(StoreError::RollbackFailed {
                    cause: Box::new(cause),
                    rollback,
                })
            }
        },
    }
}

// ── Reconstruction ───────────────────────────────────────────────────────────

/// Fold joined rows into aggregates, one per distinct `order_uid`.
///
/// Aggregates live in an arena; the index map only points into it, so every
/// item after the first is pushed onto the stored aggregate itself. Payment
/// and delivery come from the first row of each order; the join repeats them
/// on every further row and those copies are dropped.
pub fn group_rows<I>(rows: I) -> Result<Vec<Order>, StoreError>
where
    I: IntoIterator<Item = Result<JoinedRow, StoreError>>,
{
    let mut arena: Vec<Order> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let (order, item, payment, delivery) = row?;
        let item = item.into_item()?;

        match slots.entry(order.order_uid.clone()) {
            Entry::Occupied(slot) => arena[*slot.get()].items.push(item),
            Entry::Vacant(slot) => {
                let payment = payment.into_payment()?;
                slot.insert(arena.len());
                arena.push(order.into_order(item, payment, delivery.into()));
            }
        }
    }

    Ok(arena)
}

// ── Store ────────────────────────────────────────────────────────────────────

/// Persists order aggregates across the `orders`, `items`, `payments` and
/// `deliveries` tables and rebuilds them with a single join.
#[derive(Clone)]
pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert the order row, one row per item in the given order, then the
    /// payment and delivery rows, all in one transaction.
    pub fn insert(&self, order: &Order) -> Result<(), StoreError> {
        if let Err(DomainError::InvalidInput(reason)) = order.validate() {
            return Err(StoreError::InvalidOrder(reason));
        }

        let mut conn = self.pool.get()?;
        let uid = order.order_uid.as_str();

        in_transaction(&mut conn, |conn| {
            diesel::insert_into(orders::table)
                .values(&NewOrderRow::from(order))
                .execute(conn)
                .map_err(|e| StoreError::statement(Stage::InsertOrder, uid, e))?;

            for (idx, item) in order.items.iter().enumerate() {
                let row = NewItemRow::new(uid, item)?;
                diesel::insert_into(items::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| StoreError::statement(Stage::InsertItem(idx), uid, e))?;
            }

            let payment = NewPaymentRow::new(uid, &order.payment)?;
            diesel::insert_into(payments::table)
                .values(&payment)
                .execute(conn)
                .map_err(|e| StoreError::statement(Stage::InsertPayment, uid, e))?;

            diesel::insert_into(deliveries::table)
                .values(&DeliveryRow::new(uid, &order.delivery))
                .execute(conn)
                .map_err(|e| StoreError::statement(Stage::InsertDelivery, uid, e))?;

            Ok(())
        })?;

        log::debug!("stored order {uid} with {} item(s)", order.items.len());
        Ok(())
    }

    /// Rebuild every order that has at least one item, a payment and a delivery.
    ///
    /// The join is inner on all four tables. `insert` refuses orders without
    /// items, so only rows written around it can be skipped here.
    pub fn load_all(&self) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.get()?;

        let orders = in_transaction(&mut conn, load_joined)?;

        log::debug!("loaded {} order(s)", orders.len());
        Ok(orders)
    }
}

/// Body of the read transaction: one join, folded row by row.
fn load_joined(conn: &mut PgConnection) -> Result<Vec<Order>, StoreError> {
    diesel::sql_query("SET TRANSACTION READ ONLY")
        .execute(conn)
        .map_err(|e| StoreError::database(Stage::Query, e))?;

    let rows = orders::table
        .inner_join(items::table)
        .inner_join(payments::table)
        .inner_join(deliveries::table)
        .select((
            OrderRow::as_select(),
            ItemRow::as_select(),
            PaymentRow::as_select(),
            DeliveryRow::as_select(),
        ))
        .load_iter::<JoinedRow, DefaultLoadingMode>(conn)
        .map_err(|e| StoreError::database(Stage::Query, e))?;

    group_rows(rows.map(|row| row.map_err(|e| StoreError::database(Stage::FetchRow, e))))
}

impl OrderRepository for DieselOrderStore {
    fn insert(&self, order: &Order) -> Result<(), DomainError> {
        Ok(DieselOrderStore::insert(self, order)?)
    }

    fn load_all(&self) -> Result<Vec<Order>, DomainError> {
        Ok(DieselOrderStore::load_all(self)?)
    }
}
