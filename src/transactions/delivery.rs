//! Delivery: processes the oldest pending order in every district of a
//! warehouse, assigning a carrier and settling the customer's balance.

use tracing::{instrument, warn};

use crate::error::Result;
use crate::keycodec::DISTRICTS_PER_WAREHOUSE;
use crate::store::Store;

pub struct DistrictDelivery {
    pub d_id: i32,
    pub o_id: i32,
}

pub struct DeliveryResult {
    pub delivered: Vec<DistrictDelivery>,
    pub skipped_districts: Vec<i32>,
}

#[instrument(skip(store), fields(w_id, carrier_id))]
pub fn deliver(store: &mut Store, w_id: i32, carrier_id: i32, now: i64) -> Result<DeliveryResult> {
    let mut delivered = Vec::new();
    let mut skipped_districts = Vec::new();

    for d_id in 1..=DISTRICTS_PER_WAREHOUSE {
        let Some(pending) = store.pop_earliest_neworder(w_id, d_id) else {
            warn!(w_id, d_id, "delivery: no pending new-order, skipping district");
            skipped_districts.push(d_id);
            continue;
        };
        let o_id = pending.no_o_id;

        let c_id = {
            let order = store
                .find_order_mut(w_id, d_id, o_id)
                .expect("order must exist for a pending new-order marker");
            order.o_carrier_id = carrier_id;
            order.o_c_id
        };

        let lines = store.load_orderlines(w_id, d_id, o_id)?;
        let total: f64 = lines.iter().map(|l| l.ol_amount).sum();
        for line in &lines {
            let ol = store.pin_orderline(w_id, d_id, o_id, line.ol_number)?;
            ol.ol_delivery_d = Some(now);
        }

        let customer = store.pin_customer(w_id, d_id, c_id)?;
        customer.c_balance += total;
        customer.c_delivery_cnt += 1;

        delivered.push(DistrictDelivery { d_id, o_id });
    }

    Ok(DeliveryResult {
        delivered,
        skipped_districts,
    })
}
