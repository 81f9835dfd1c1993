//! In-memory overlay over the order store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::errors::DomainError;
use crate::domain::order::Order;

/// Unbounded, thread-safe map from `order_uid` to order.
///
/// Orders are moved in on upload and handed out as `Arc<Order>`: readers share
/// the cached value but cannot mutate it, and an update replaces the whole
/// entry. Entries never expire.
#[derive(Debug, Default)]
pub struct OrderCache {
    orders: RwLock<HashMap<String, Arc<Order>>>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store every given order under its `order_uid`, last write wins.
    ///
    /// Returns how many orders were stored. Uploading nothing is an error and
    /// leaves the cache as it was.
    pub fn upload<I>(&self, orders: I) -> Result<usize, DomainError>
    where
        I: IntoIterator<Item = Order>,
    {
        let batch: Vec<Order> = orders.into_iter().collect();
        if batch.is_empty() {
            return Err(DomainError::InvalidInput("no orders given".to_string()));
        }

        let count = batch.len();
        // Entries are swapped whole, so a poisoned map is still consistent.
        let mut map = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        for order in batch {
            map.insert(order.order_uid.clone(), Arc::new(order));
        }
        log::debug!("cached {count} order(s), {} total", map.len());

        Ok(count)
    }

    pub fn get_single(&self, order_uid: &str) -> Result<Arc<Order>, DomainError> {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(order_uid)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(order_uid.to_string()))
    }

    /// Every cached order, in no particular order.
    ///
    /// Uploads racing with this call may or may not show up in the result.
    pub fn get_all(&self) -> Vec<Arc<Order>> {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
