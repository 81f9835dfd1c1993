use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// One purchased position of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub track_number: String,
    pub status: i32,
    pub chrt_id: i64,
    pub nm_id: i64,
    pub rid: i64,
    pub brand: String,
    pub name: String,
    pub size: String,
    pub price: f64,
    pub sale: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub transaction_id: String,
    pub request_id: String,
    pub bank: String,
    pub currency: String,
    pub provider: String,
    pub payment_dt: String,
    pub amount: f64,
    pub delivery_cost: f64,
    pub goods_total: f64,
    pub custom_fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
}

/// The order aggregate: header fields plus the items, payment and delivery it owns.
///
/// Owned records carry no identifier of their own; `order_uid` is written into
/// every row persisted for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_uid: String,
    pub track_number: String,
    pub entry: String,
    pub locale: String,
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    /// Kept verbatim, never parsed.
    pub date_created: String,
    pub shardkey: i32,
    pub sm_id: i32,
    pub oof_shard: i32,
    pub items: Vec<Item>,
    pub payment: Payment,
    pub delivery: Delivery,
}

impl Order {
    /// Reject orders the store could not give back whole.
    ///
    /// Reads join every table on `order_uid`, so an order without items would
    /// be written but never loaded again.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.order_uid.is_empty() {
            return Err(DomainError::InvalidInput("empty order_uid".to_string()));
        }
        if self.items.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "order {:?} has no items",
                self.order_uid
            )));
        }
        Ok(())
    }
}
