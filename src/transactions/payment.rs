//! Payment: updates warehouse/district YTD and the customer's balance,
//! optionally selecting the customer by last name.

use tracing::instrument;

use crate::error::Result;
use crate::model::History;
use crate::store::Store;
use crate::undo::UndoBuffer;

use super::CustomerSelector;

const MAX_CUSTOMER_DATA_LEN: usize = 500;

pub struct PaymentResult {
    pub c_id: i32,
    pub c_balance: f64,
    pub w_ytd: f64,
    pub d_ytd: f64,
}

#[instrument(skip(store, selector), fields(w_id, d_id, c_w_id, c_d_id))]
#[allow(clippy::too_many_arguments)]
pub fn payment(
    store: &mut Store,
    w_id: i32,
    d_id: i32,
    c_w_id: i32,
    c_d_id: i32,
    selector: CustomerSelector<'_>,
    h_amount: f64,
    now: i64,
    want_undo: bool,
) -> Result<(PaymentResult, Option<UndoBuffer>)> {
    let mut undo = want_undo.then(UndoBuffer::new);

    let c_id = selector.resolve(store, c_w_id, c_d_id);

    let warehouse_before = store.find_warehouse(w_id).expect("warehouse must exist").clone();
    if let Some(buf) = undo.as_mut() {
        buf.record_warehouse(w_id, warehouse_before.clone());
    }
    store.find_warehouse_mut(w_id).unwrap().w_ytd += h_amount;

    let district_before = store.find_district(w_id, d_id).expect("district must exist").clone();
    if let Some(buf) = undo.as_mut() {
        buf.record_district(w_id, d_id, district_before.clone());
    }
    store.find_district_mut(w_id, d_id).unwrap().d_ytd += h_amount;

    // The customer may be evicted; pin promotes it to resident before the
    // undo snapshot is taken, since the snapshot must be of the owned row.
    let _ = store.pin_customer(c_w_id, c_d_id, c_id)?;
    let customer_before = store
        .customer_handle(c_w_id, c_d_id, c_id)
        .and_then(|h| h.peek())
        .expect("just pinned")
        .clone();
    if let Some(buf) = undo.as_mut() {
        buf.record_customer(c_w_id, c_d_id, c_id, customer_before.clone());
    }

    let customer = store.pin_customer(c_w_id, c_d_id, c_id)?;
    customer.c_balance -= h_amount;
    customer.c_ytd_payment += h_amount;
    customer.c_payment_cnt += 1;
    if customer.is_bad_credit() {
        let mut data = format!(
            "{c_id} {c_d_id} {c_w_id} {d_id} {w_id} {h_amount:.2} | {}",
            customer.c_data
        );
        data.truncate(MAX_CUSTOMER_DATA_LEN);
        customer.c_data = data;
    }
    let c_balance = customer.c_balance;

    store.insert_history(History {
        h_c_id: c_id,
        h_c_d_id: c_d_id,
        h_c_w_id: c_w_id,
        h_d_id: d_id,
        h_w_id: w_id,
        h_date: now,
        h_amount,
        h_data: format!("{}    {}", warehouse_before.w_name, district_before.d_name),
    });

    Ok((
        PaymentResult {
            c_id,
            c_balance,
            w_ytd: warehouse_before.w_ytd + h_amount,
            d_ytd: district_before.d_ytd + h_amount,
        },
        undo,
    ))
}
