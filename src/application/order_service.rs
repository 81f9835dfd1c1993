use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;
use crate::infrastructure::order_cache::OrderCache;

/// Serves reads from the cache and sends writes through the repository first.
pub struct OrderService<R> {
    repo: R,
    cache: OrderCache,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            cache: OrderCache::new(),
        }
    }

    /// Fill the cache from the repository. Returns the number of orders cached.
    ///
    /// If loading fails the cache is left untouched.
    pub fn warm_up(&self) -> Result<usize, DomainError> {
        let orders = self.repo.load_all()?;
        if orders.is_empty() {
            log::info!("order store is empty, nothing to cache");
            return Ok(0);
        }
        let count = self.cache.upload(orders)?;
        log::info!("cache warmed with {count} order(s)");
        Ok(count)
    }

    /// Persist `order`, then make it visible to cached reads.
    ///
    /// Orders failing [`Order::validate`] reach neither the repository nor the cache.
    pub fn create_order(&self, order: Order) -> Result<(), DomainError> {
        order.validate()?;
        self.repo.insert(&order)?;
        self.cache.upload([order])?;
        Ok(())
    }

    pub fn get_order(&self, order_uid: &str) -> Result<Arc<Order>, DomainError> {
        self.cache.get_single(order_uid)
    }

    pub fn list_orders(&self) -> Vec<Arc<Order>> {
        self.cache.get_all()
    }

    pub fn cache(&self) -> &OrderCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::test_support;

    fn order(uid: &str) -> Order {
        test_support::order(uid, 1)
    }

    /// Repository double keeping rows in insertion order.
    #[derive(Default)]
    struct MemoryRepository {
        orders: Mutex<Vec<Order>>,
        fail_loads: bool,
    }

    impl OrderRepository for MemoryRepository {
        fn insert(&self, order: &Order) -> Result<(), DomainError> {
            let mut orders = self.orders.lock().unwrap();
            if orders.iter().any(|o| o.order_uid == order.order_uid) {
                return Err(DomainError::AlreadyExists(order.order_uid.clone()));
            }
            orders.push(order.clone());
            Ok(())
        }

        fn load_all(&self) -> Result<Vec<Order>, DomainError> {
            if self.fail_loads {
                return Err(DomainError::Unavailable("connection refused".to_string()));
            }
            Ok(self.orders.lock().unwrap().clone())
        }
    }

    #[test]
    fn warm_up_caches_everything_stored() {
        let repo = MemoryRepository::default();
        repo.insert(&order("a")).unwrap();
        repo.insert(&order("b")).unwrap();
        let service = OrderService::new(repo);

        assert_eq!(service.warm_up().expect("warm up failed"), 2);
        assert_eq!(service.list_orders().len(), 2);
        assert_eq!(*service.get_order("a").expect("cached"), order("a"));
    }

    #[test]
    fn warm_up_of_empty_store_is_zero() {
        let service = OrderService::new(MemoryRepository::default());

        assert_eq!(service.warm_up().expect("warm up failed"), 0);
        assert!(service.cache().is_empty());
    }

    #[test]
    fn failed_warm_up_leaves_cache_untouched() {
        let service = OrderService::new(MemoryRepository {
            fail_loads: true,
            ..Default::default()
        });
        service.create_order(order("a")).expect("create failed");

        let err = service.warm_up().unwrap_err();

        assert!(matches!(err, DomainError::Unavailable(_)));
        assert_eq!(service.cache().len(), 1);
    }

    #[test]
    fn create_order_is_readable_from_cache() {
        let service = OrderService::new(MemoryRepository::default());

        service.create_order(order("abc123")).expect("create failed");

        assert_eq!(service.get_order("abc123").expect("cached").order_uid, "abc123");
    }

    #[test]
    fn rejected_write_is_not_cached() {
        let service = OrderService::new(MemoryRepository::default());
        service.create_order(order("dup")).expect("create failed");
        let mut second = order("dup");
        second.payment.amount = 1.0;

        let err = service.create_order(second).unwrap_err();

        assert!(matches!(err, DomainError::AlreadyExists(_)));
        assert_eq!(service.get_order("dup").expect("cached").payment.amount, 1817.0);
    }

    #[test]
    fn order_without_items_is_neither_stored_nor_cached() {
        let service = OrderService::new(MemoryRepository::default());

        let err = service.create_order(test_support::order("zero", 0)).unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(matches!(
            service.get_order("zero"),
            Err(DomainError::NotFound(_))
        ));
        assert!(service.repo.load_all().unwrap().is_empty());
        assert_eq!(service.warm_up().unwrap(), 0);
        assert!(service.get_order("zero").is_err());
    }

    #[test]
    fn unknown_order_is_not_found() {
        let service = OrderService::new(MemoryRepository::default());
        assert!(matches!(
            service.get_order("missing"),
            Err(DomainError::NotFound(_))
        ));
    }
}
