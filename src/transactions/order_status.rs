//! Order-Status: read-only lookup of a customer's most recent order and
//! its order lines, by id or by the last-name tie-break.

use tracing::instrument;

use crate::error::Result;
use crate::model::OrderLine;
use crate::store::Store;

use super::CustomerSelector;

pub struct OrderStatusResult {
    pub c_id: i32,
    pub c_balance: f64,
    pub o_id: i32,
    pub o_entry_d: i64,
    pub o_carrier_id: i32,
    pub lines: Vec<OrderLine>,
}

#[instrument(skip(store, selector), fields(w_id, d_id))]
pub fn order_status(
    store: &mut Store,
    w_id: i32,
    d_id: i32,
    selector: CustomerSelector<'_>,
) -> Result<OrderStatusResult> {
    let c_id = selector.resolve(store, w_id, d_id);
    let c_balance = store.customer_balance(w_id, d_id, c_id)?;

    let order = store
        .find_last_order_by_customer(w_id, d_id, c_id)
        .expect("a customer drawn from the consistent parameter space has placed an order");
    let o_id = order.o_id;
    let o_entry_d = order.o_entry_d;
    let o_carrier_id = order.o_carrier_id;

    let lines = store.load_orderlines(w_id, d_id, o_id)?;

    Ok(OrderStatusResult {
        c_id,
        c_balance,
        o_id,
        o_entry_d,
        o_carrier_id,
        lines,
    })
}
