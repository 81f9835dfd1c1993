// Diesel table declarations for the tables created in `migrations/`.

diesel::table! {
    deliveries (order_uid) {
        order_uid -> Text,
        name -> Text,
        phone -> Text,
        email -> Text,
        zip -> Text,
        city -> Text,
        address -> Text,
        region -> Text,
    }
}

diesel::table! {
    // The table has no key column; `(order_uid, rid)` only satisfies Diesel's DSL.
    items (order_uid, rid) {
        order_uid -> Text,
        track_number -> Text,
        status -> Int4,
        chrt_id -> Int8,
        nm_id -> Int8,
        rid -> Int8,
        brand -> Text,
        name -> Text,
        size -> Text,
        price -> Numeric,
        sale -> Numeric,
        total_price -> Numeric,
    }
}

diesel::table! {
    orders (order_uid) {
        order_uid -> Text,
        track_number -> Text,
        entry -> Text,
        locale -> Text,
        internal_signature -> Text,
        customer_id -> Text,
        delivery_service -> Text,
        date_created -> Text,
        shardkey -> Int4,
        sm_id -> Int4,
        oof_shard -> Int4,
    }
}

diesel::table! {
    payments (order_uid) {
        order_uid -> Text,
        transaction_id -> Text,
        request_id -> Text,
        bank -> Text,
        currency -> Text,
        provider -> Text,
        payment_dt -> Text,
        amount -> Numeric,
        delivery_cost -> Numeric,
        goods_total -> Numeric,
        custom_fee -> Numeric,
    }
}

diesel::joinable!(deliveries -> orders (order_uid));
diesel::joinable!(items -> orders (order_uid));
diesel::joinable!(payments -> orders (order_uid));

diesel::allow_tables_to_appear_in_same_query!(deliveries, items, orders, payments,);
