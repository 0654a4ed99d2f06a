//! New-Order: the highest-volume transaction, and the only one that can
//! roll back on bad input rather than caller request.

use tracing::{info, instrument};

use crate::error::Result;
use crate::model::{NewOrder, Order, OrderLine};
use crate::store::Store;
use crate::undo::UndoBuffer;

pub struct NewOrderLine {
    pub i_id: i32,
    pub supply_w_id: i32,
    pub quantity: i32,
}

pub struct NewOrderLineResult {
    pub i_name: String,
    pub stock_qty: i32,
    /// `'B'` if both the item and stock `data` fields contain `"ORIGINAL"`,
    /// else `'G'` — the brand/generic marker the original benchmark prints.
    pub brand_generic: char,
    pub price: f64,
    pub amount: f64,
}

pub struct NewOrderResult {
    pub o_id: i32,
    pub o_entry_d: i64,
    pub w_tax: f64,
    pub d_tax: f64,
    pub c_discount: f64,
    pub lines: Vec<NewOrderLineResult>,
    pub total_amount: f64,
}

pub enum NewOrderOutcome {
    Committed(NewOrderResult, Option<UndoBuffer>),
    /// The required ~1% rollback path: an unknown item id. No state was
    /// mutated; there is nothing to undo.
    RolledBack { bad_item: i32 },
}

const MIN_RESTOCK_THRESHOLD: i32 = 10;
const RESTOCK_AMOUNT: i32 = 91;

#[instrument(skip(store, items), fields(w_id, d_id, c_id, n = items.len()))]
pub fn new_order(
    store: &mut Store,
    w_id: i32,
    d_id: i32,
    c_id: i32,
    items: &[NewOrderLine],
    now: i64,
    want_undo: bool,
) -> Result<NewOrderOutcome> {
    for line in items {
        if store.find_item(line.i_id).is_none() {
            info!(bad_item = line.i_id, "new-order rolled back: unknown item");
            return Ok(NewOrderOutcome::RolledBack { bad_item: line.i_id });
        }
    }

    let mut undo = want_undo.then(UndoBuffer::new);

    let w_tax = store
        .find_warehouse(w_id)
        .expect("warehouse must exist for a live transaction")
        .w_tax;

    let district_before = store.find_district(w_id, d_id).expect("district must exist").clone();
    let d_tax = district_before.d_tax;
    let o_id = district_before.d_next_o_id;
    if let Some(buf) = undo.as_mut() {
        buf.record_district(w_id, d_id, district_before.clone());
    }
    store.find_district_mut(w_id, d_id).unwrap().d_next_o_id += 1;

    let c_discount = store
        .customer_handle(w_id, d_id, c_id)
        .and_then(|h| h.peek())
        .map(|c| c.c_discount)
        .unwrap_or(0.0);

    let all_local = items.iter().all(|line| line.supply_w_id == w_id);
    store.insert_order(Order {
        o_id,
        o_d_id: d_id,
        o_w_id: w_id,
        o_c_id: c_id,
        o_entry_d: now,
        o_carrier_id: 0,
        o_ol_cnt: items.len() as i32,
        o_all_local: all_local,
    });
    if let Some(buf) = undo.as_mut() {
        buf.record_order_inserted(w_id, d_id, o_id);
    }

    store.insert_neworder(NewOrder {
        no_o_id: o_id,
        no_d_id: d_id,
        no_w_id: w_id,
    });
    if let Some(buf) = undo.as_mut() {
        buf.record_neworder_inserted(w_id, d_id, o_id);
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut total_amount = 0.0;

    for (idx, line) in items.iter().enumerate() {
        let number = idx as i32 + 1;
        let item = store.find_item(line.i_id).expect("validated above").clone();

        let stock_before = store
            .stock_handle(line.supply_w_id, line.i_id)
            .and_then(|h| h.peek())
            .expect("stock row must exist for every item")
            .clone();
        if let Some(buf) = undo.as_mut() {
            buf.record_stock(line.supply_w_id, line.i_id, stock_before.clone());
        }

        let dist_info = stock_before.dist_info(d_id).to_string();
        let brand_generic = if item.i_data.contains("ORIGINAL") && stock_before.s_data.contains("ORIGINAL") {
            'B'
        } else {
            'G'
        };

        let stock = store.pin_stock(line.supply_w_id, line.i_id)?;
        stock.s_quantity -= line.quantity;
        if stock.s_quantity < MIN_RESTOCK_THRESHOLD {
            stock.s_quantity += RESTOCK_AMOUNT;
        }
        stock.s_ytd += line.quantity as f64;
        stock.s_order_cnt += 1;
        if line.supply_w_id != w_id {
            stock.s_remote_cnt += 1;
        }
        let stock_qty_after = stock.s_quantity;

        let amount = line.quantity as f64 * item.i_price;
        total_amount += amount;

        store.insert_orderline(OrderLine {
            ol_o_id: o_id,
            ol_d_id: d_id,
            ol_w_id: w_id,
            ol_number: number,
            ol_i_id: line.i_id,
            ol_supply_w_id: line.supply_w_id,
            ol_delivery_d: None,
            ol_quantity: line.quantity,
            ol_amount: amount,
            ol_dist_info: dist_info,
        });
        if let Some(buf) = undo.as_mut() {
            buf.record_orderline_inserted(w_id, d_id, o_id, number);
        }

        lines.push(NewOrderLineResult {
            i_name: item.i_name,
            stock_qty: stock_qty_after,
            brand_generic,
            price: item.i_price,
            amount,
        });
    }

    total_amount *= (1.0 - c_discount) * (1.0 + w_tax + d_tax);

    Ok(NewOrderOutcome::Committed(
        NewOrderResult {
            o_id,
            o_entry_d: now,
            w_tax,
            d_tax,
            c_discount,
            lines,
            total_amount,
        },
        undo,
    ))
}
