//! Composite key packing for the ordered indexes.
//!
//! Every index in the store is keyed on a single primitive integer. This module
//! packs the natural composite keys (warehouse, district, ...) into that integer
//! such that the packed order matches the natural lexicographic order of the
//! tuple — required so `lower_bound`/range scans over the packed key behave like
//! range scans over the tuple.

/// Upper bound on warehouse ids accepted by the engine.
pub const MAX_WAREHOUSE_ID: i32 = 2_000;
/// Districts per warehouse, fixed by the TPC-C spec.
pub const DISTRICTS_PER_WAREHOUSE: i32 = 10;
/// Customers per district, fixed by the TPC-C spec.
pub const CUSTOMERS_PER_DISTRICT: i32 = 3_000;
/// Upper bound on order ids within a district.
pub const MAX_O_ID: i64 = 10_000_000;
/// Upper bound on order-line numbers within an order.
pub const MAX_OL_NUMBER: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StockKey(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DistrictKey(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerKey(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderLineKey(pub i64);

/// Packs `(w_id, s_id)` into a stock key. `s_id` ranges over `1..=NUM_ITEMS`
/// which comfortably fits below `MAX_WAREHOUSE_ID`'s multiplier.
pub fn stock_key(w_id: i32, s_id: i32) -> StockKey {
    debug_assert!((1..=MAX_WAREHOUSE_ID).contains(&w_id), "w_id out of range");
    StockKey((w_id as i64 * 1_000_000 + s_id as i64) as i32)
}

/// Packs `(w_id, d_id)` into a district key.
pub fn district_key(w_id: i32, d_id: i32) -> DistrictKey {
    debug_assert!((1..=DISTRICTS_PER_WAREHOUSE).contains(&d_id), "d_id out of range");
    DistrictKey(w_id * 100 + d_id)
}

/// Packs `(w_id, d_id, c_id)` into a customer key, order-preserving on
/// `(w_id, d_id, c_id)` lexicographic order.
pub fn customer_key(w_id: i32, d_id: i32, c_id: i32) -> CustomerKey {
    let packed = ((w_id as i64 * DISTRICTS_PER_WAREHOUSE as i64 + d_id as i64)
        * (CUSTOMERS_PER_DISTRICT as i64 * 10))
        + c_id as i64;
    CustomerKey(packed)
}

/// Packs `(w_id, d_id, o_id)` into an order key.
pub fn order_key(w_id: i32, d_id: i32, o_id: i32) -> OrderKey {
    let packed =
        ((w_id as i64 * DISTRICTS_PER_WAREHOUSE as i64 + d_id as i64) * MAX_O_ID) + o_id as i64;
    OrderKey(packed)
}

/// Packs `(w_id, d_id, c_id, o_id)` for the orders-by-customer secondary index.
/// `o_id` is the low-order field so that for a fixed customer, ascending key
/// order is ascending `o_id` order — required to find "the latest order".
pub fn order_by_customer_key(w_id: i32, d_id: i32, c_id: i32, o_id: i32) -> OrderKey {
    let customer_component = customer_key(w_id, d_id, c_id).0;
    OrderKey(customer_component * MAX_O_ID + o_id as i64)
}

/// Packs `(w_id, d_id, o_id, number)` into an order-line key.
pub fn orderline_key(w_id: i32, d_id: i32, o_id: i32, number: i32) -> OrderLineKey {
    let order_component = order_key(w_id, d_id, o_id).0;
    OrderLineKey(order_component * MAX_OL_NUMBER + number as i64)
}

/// Packs `(w_id, d_id, o_id)` for the NewOrder FIFO map — identical layout to
/// `order_key` since NewOrder shares the Order primary key.
pub fn neworder_key(w_id: i32, d_id: i32, o_id: i32) -> OrderKey {
    order_key(w_id, d_id, o_id)
}
