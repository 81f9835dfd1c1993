use super::errors::DomainError;
use super::order::Order;

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist the whole aggregate or nothing of it.
    fn insert(&self, order: &Order) -> Result<(), DomainError>;
    /// Rebuild every stored aggregate. Order of the result is unspecified.
    fn load_all(&self) -> Result<Vec<Order>, DomainError>;
}
