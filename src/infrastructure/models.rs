use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use diesel::prelude::*;

use crate::domain::order::{Delivery, Item, Order, Payment};
use crate::schema::{deliveries, items, orders, payments};

use super::errors::StoreError;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub order_uid: String,
    pub track_number: String,
    pub entry: String,
    pub locale: String,
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    pub date_created: String,
    pub shardkey: i32,
    pub sm_id: i32,
    pub oof_shard: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub order_uid: &'a str,
    pub track_number: &'a str,
    pub entry: &'a str,
    pub locale: &'a str,
    pub internal_signature: &'a str,
    pub customer_id: &'a str,
    pub delivery_service: &'a str,
    pub date_created: &'a str,
    pub shardkey: i32,
    pub sm_id: i32,
    pub oof_shard: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub order_uid: String,
    pub track_number: String,
    pub status: i32,
    pub chrt_id: i64,
    pub nm_id: i64,
    pub rid: i64,
    pub brand: String,
    pub name: String,
    pub size: String,
    pub price: BigDecimal,
    pub sale: BigDecimal,
    pub total_price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow<'a> {
    pub order_uid: &'a str,
    pub track_number: &'a str,
    pub status: i32,
    pub chrt_id: i64,
    pub nm_id: i64,
    pub rid: i64,
    pub brand: &'a str,
    pub name: &'a str,
    pub size: &'a str,
    pub price: BigDecimal,
    pub sale: BigDecimal,
    pub total_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub order_uid: String,
    pub transaction_id: String,
    pub request_id: String,
    pub bank: String,
    pub currency: String,
    pub provider: String,
    pub payment_dt: String,
    pub amount: BigDecimal,
    pub delivery_cost: BigDecimal,
    pub goods_total: BigDecimal,
    pub custom_fee: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow<'a> {
    pub order_uid: &'a str,
    pub transaction_id: &'a str,
    pub request_id: &'a str,
    pub bank: &'a str,
    pub currency: &'a str,
    pub provider: &'a str,
    pub payment_dt: &'a str,
    pub amount: BigDecimal,
    pub delivery_cost: BigDecimal,
    pub goods_total: BigDecimal,
    pub custom_fee: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeliveryRow {
    pub order_uid: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
}

/// Order, item, payment and delivery columns of one joined row.
pub type JoinedRow = (OrderRow, ItemRow, PaymentRow, DeliveryRow);

// ── Domain → row ─────────────────────────────────────────────────────────────

/// Amounts go in as the shortest decimal that reads back as the same f64.
fn to_decimal(value: f64, order_uid: &str, field: &'static str) -> Result<BigDecimal, StoreError> {
    let invalid = || {
        StoreError::InvalidOrder(format!(
            "order {order_uid:?}: {field} must be finite, got {value}"
        ))
    };
    if !value.is_finite() {
        return Err(invalid());
    }
    BigDecimal::from_str(&value.to_string()).map_err(|_| invalid())
}

fn to_f64(value: &BigDecimal, order_uid: &str, field: &'static str) -> Result<f64, StoreError> {
    value.to_f64().ok_or_else(|| StoreError::Decode {
        order_uid: order_uid.to_string(),
        field,
    })
}

impl<'a> From<&'a Order> for NewOrderRow<'a> {
    fn from(o: &'a Order) -> Self {
        NewOrderRow {
            order_uid: &o.order_uid,
            track_number: &o.track_number,
            entry: &o.entry,
            locale: &o.locale,
            internal_signature: &o.internal_signature,
            customer_id: &o.customer_id,
            delivery_service: &o.delivery_service,
            date_created: &o.date_created,
            shardkey: o.shardkey,
            sm_id: o.sm_id,
            oof_shard: o.oof_shard,
        }
    }
}

impl<'a> NewItemRow<'a> {
    pub fn new(order_uid: &'a str, item: &'a Item) -> Result<Self, StoreError> {
        Ok(NewItemRow {
            order_uid,
            track_number: &item.track_number,
            status: item.status,
            chrt_id: item.chrt_id,
            nm_id: item.nm_id,
            rid: item.rid,
            brand: &item.brand,
            name: &item.name,
            size: &item.size,
            price: to_decimal(item.price, order_uid, "price")?,
            sale: to_decimal(item.sale, order_uid, "sale")?,
            total_price: to_decimal(item.total_price, order_uid, "total_price")?,
        })
    }
}

impl<'a> NewPaymentRow<'a> {
    pub fn new(order_uid: &'a str, p: &'a Payment) -> Result<Self, StoreError> {
        Ok(NewPaymentRow {
            order_uid,
            transaction_id: &p.transaction_id,
            request_id: &p.request_id,
            bank: &p.bank,
            currency: &p.currency,
            provider: &p.provider,
            payment_dt: &p.payment_dt,
            amount: to_decimal(p.amount, order_uid, "amount")?,
            delivery_cost: to_decimal(p.delivery_cost, order_uid, "delivery_cost")?,
            goods_total: to_decimal(p.goods_total, order_uid, "goods_total")?,
            custom_fee: to_decimal(p.custom_fee, order_uid, "custom_fee")?,
        })
    }
}

impl DeliveryRow {
    pub fn new(order_uid: &str, d: &Delivery) -> Self {
        DeliveryRow {
            order_uid: order_uid.to_string(),
            name: d.name.clone(),
            phone: d.phone.clone(),
            email: d.email.clone(),
            zip: d.zip.clone(),
            city: d.city.clone(),
            address: d.address.clone(),
            region: d.region.clone(),
        }
    }
}

// ── Row → domain ─────────────────────────────────────────────────────────────

impl ItemRow {
    pub fn into_item(self) -> Result<Item, StoreError> {
        Ok(Item {
            price: to_f64(&self.price, &self.order_uid, "price")?,
            sale: to_f64(&self.sale, &self.order_uid, "sale")?,
            total_price: to_f64(&self.total_price, &self.order_uid, "total_price")?,
            track_number: self.track_number,
            status: self.status,
            chrt_id: self.chrt_id,
            nm_id: self.nm_id,
            rid: self.rid,
            brand: self.brand,
            name: self.name,
            size: self.size,
        })
    }
}

impl PaymentRow {
    pub fn into_payment(self) -> Result<Payment, StoreError> {
        Ok(Payment {
            amount: to_f64(&self.amount, &self.order_uid, "amount")?,
            delivery_cost: to_f64(&self.delivery_cost, &self.order_uid, "delivery_cost")?,
            goods_total: to_f64(&self.goods_total, &self.order_uid, "goods_total")?,
            custom_fee: to_f64(&self.custom_fee, &self.order_uid, "custom_fee")?,
            transaction_id: self.transaction_id,
            request_id: self.request_id,
            bank: self.bank,
            currency: self.currency,
            provider: self.provider,
            payment_dt: self.payment_dt,
        })
    }
}

impl From<DeliveryRow> for Delivery {
    fn from(d: DeliveryRow) -> Self {
        Delivery {
            name: d.name,
            phone: d.phone,
            email: d.email,
            zip: d.zip,
            city: d.city,
            address: d.address,
            region: d.region,
        }
    }
}

impl OrderRow {
    /// Start an aggregate from the first joined row seen for its `order_uid`.
    pub fn into_order(self, first_item: Item, payment: Payment, delivery: Delivery) -> Order {
        Order {
            order_uid: self.order_uid,
            track_number: self.track_number,
            entry: self.entry,
            locale: self.locale,
            internal_signature: self.internal_signature,
            customer_id: self.customer_id,
            delivery_service: self.delivery_service,
            date_created: self.date_created,
            shardkey: self.shardkey,
            sm_id: self.sm_id,
            oof_shard: self.oof_shard,
            items: vec![first_item],
            payment,
            delivery,
        }
    }
}
