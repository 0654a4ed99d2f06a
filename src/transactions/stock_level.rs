//! Stock-Level: read-only count of distinct items below a quantity
//! threshold among the last 20 orders placed in a district.

use std::collections::HashSet;

use tracing::instrument;

use crate::error::{Result, TpccError};
use crate::store::Store;

const RECENT_ORDERS: i32 = 20;

#[instrument(skip(store), fields(w_id, d_id, threshold))]
pub fn stock_level(store: &mut Store, w_id: i32, d_id: i32, threshold: i32) -> Result<u32> {
    let next_o_id = store
        .find_district(w_id, d_id)
        .ok_or_else(|| TpccError::Argument(format!("no district for ({w_id}, {d_id})")))?
        .d_next_o_id;

    let low = (next_o_id - RECENT_ORDERS).max(1);

    let mut distinct_items: HashSet<i32> = HashSet::new();
    for o_id in low..next_o_id {
        let lines = store.load_orderlines(w_id, d_id, o_id)?;
        distinct_items.extend(lines.iter().map(|line| line.ol_i_id));
    }

    let mut below_threshold = 0u32;
    for i_id in distinct_items {
        if store.stock_quantity(w_id, i_id)? < threshold {
            below_threshold += 1;
        }
    }

    Ok(below_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{District, Item, NewOrder, Order, OrderLine, Stock, Warehouse};

    fn seed(store: &mut Store) {
        store.insert_warehouse(Warehouse {
            w_id: 1,
            w_name: "W1".to_string(),
            w_street_1: String::new(),
            w_street_2: String::new(),
            w_city: String::new(),
            w_state: "NY".to_string(),
            w_zip: "100001111".to_string(),
            w_tax: 0.05,
            w_ytd: 0.0,
        });
        store.insert_district(District {
            d_id: 1,
            d_w_id: 1,
            d_name: "D1".to_string(),
            d_street_1: String::new(),
            d_street_2: String::new(),
            d_city: String::new(),
            d_state: "NY".to_string(),
            d_zip: "100001111".to_string(),
            d_tax: 0.03,
            d_ytd: 0.0,
            d_next_o_id: 3,
        });
        for i_id in 1..=2 {
            store.insert_item(Item {
                i_id,
                i_im_id: 1,
                i_name: format!("item{i_id}"),
                i_price: 10.0,
                i_data: "foo".to_string(),
            });
            store.insert_stock(Stock {
                s_i_id: i_id,
                s_w_id: 1,
                s_quantity: if i_id == 1 { 5 } else { 50 },
                s_dist_01: "a".repeat(24),
                s_dist_02: "a".repeat(24),
                s_dist_03: "a".repeat(24),
                s_dist_04: "a".repeat(24),
                s_dist_05: "a".repeat(24),
                s_dist_06: "a".repeat(24),
                s_dist_07: "a".repeat(24),
                s_dist_08: "a".repeat(24),
                s_dist_09: "a".repeat(24),
                s_dist_10: "a".repeat(24),
                s_ytd: 0.0,
                s_order_cnt: 0,
                s_remote_cnt: 0,
                s_data: "bar".to_string(),
            });
        }
        for o_id in 1..=2 {
            store.insert_order(Order {
                o_id,
                o_d_id: 1,
                o_w_id: 1,
                o_c_id: 1,
                o_entry_d: 0,
                o_carrier_id: 0,
                o_ol_cnt: 1,
                o_all_local: true,
            });
            store.insert_neworder(NewOrder {
                no_o_id: o_id,
                no_d_id: 1,
                no_w_id: 1,
            });
            store.insert_orderline(OrderLine {
                ol_o_id: o_id,
                ol_d_id: 1,
                ol_w_id: 1,
                ol_number: 1,
                ol_i_id: o_id,
                ol_supply_w_id: 1,
                ol_delivery_d: None,
                ol_quantity: 1,
                ol_amount: 10.0,
                ol_dist_info: "a".repeat(24),
            });
        }
    }

    #[test]
    fn counts_items_below_threshold_among_recent_orders() {
        let mut store = Store::new(8);
        seed(&mut store);
        // order 1 references item 1 (qty 5), order 2 references item 2 (qty 50)
        let count = stock_level(&mut store, 1, 1, 10).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn zero_threshold_never_counts_anything() {
        let mut store = Store::new(8);
        seed(&mut store);
        let count = stock_level(&mut store, 1, 1, 0).unwrap();
        assert_eq!(count, 0);
    }

    fn stock_row(i_id: i32, quantity: i32) -> Stock {
        Stock {
            s_i_id: i_id,
            s_w_id: 1,
            s_quantity: quantity,
            s_dist_01: "a".repeat(24),
            s_dist_02: "a".repeat(24),
            s_dist_03: "a".repeat(24),
            s_dist_04: "a".repeat(24),
            s_dist_05: "a".repeat(24),
            s_dist_06: "a".repeat(24),
            s_dist_07: "a".repeat(24),
            s_dist_08: "a".repeat(24),
            s_dist_09: "a".repeat(24),
            s_dist_10: "a".repeat(24),
            s_ytd: 0.0,
            s_order_cnt: 0,
            s_remote_cnt: 0,
            s_data: "bar".to_string(),
        }
    }

    fn order_referencing(o_id: i32, i_id: i32) -> (Order, OrderLine) {
        (
            Order {
                o_id,
                o_d_id: 1,
                o_w_id: 1,
                o_c_id: 1,
                o_entry_d: 0,
                o_carrier_id: 0,
                o_ol_cnt: 1,
                o_all_local: true,
            },
            OrderLine {
                ol_o_id: o_id,
                ol_d_id: 1,
                ol_w_id: 1,
                ol_number: 1,
                ol_i_id: i_id,
                ol_supply_w_id: 1,
                ol_delivery_d: None,
                ol_quantity: 1,
                ol_amount: 10.0,
                ol_dist_info: "a".repeat(24),
            },
        )
    }

    /// Scenario from the boundary spec: 25 orders total, but only the most
    /// recent 20 (o_id 6..=25) fall inside the window. Those reference 20
    /// distinct items with quantities [10, 11, ..., 29]; with threshold=15
    /// exactly the 5 items quantified 10..=14 count. The 5 orders outside
    /// the window (o_id 1..=5) reference separate items stocked at 1, which
    /// would inflate the count to 10 if the window cutoff were not applied.
    #[test]
    fn window_excludes_orders_older_than_the_most_recent_twenty() {
        let mut store = Store::new(8);
        store.insert_warehouse(Warehouse {
            w_id: 1,
            w_name: "W1".to_string(),
            w_street_1: String::new(),
            w_street_2: String::new(),
            w_city: String::new(),
            w_state: "NY".to_string(),
            w_zip: "100001111".to_string(),
            w_tax: 0.05,
            w_ytd: 0.0,
        });
        store.insert_district(District {
            d_id: 1,
            d_w_id: 1,
            d_name: "D1".to_string(),
            d_street_1: String::new(),
            d_street_2: String::new(),
            d_city: String::new(),
            d_state: "NY".to_string(),
            d_zip: "100001111".to_string(),
            d_tax: 0.03,
            d_ytd: 0.0,
            d_next_o_id: 26,
        });

        // Orders outside the window: items 101..=105, stocked well below
        // any threshold used here, so if the window failed to exclude them
        // the count would be wrong.
        for (idx, o_id) in (1..=5).enumerate() {
            let i_id = 101 + idx as i32;
            store.insert_item(Item {
                i_id,
                i_im_id: 1,
                i_name: format!("old-item{i_id}"),
                i_price: 10.0,
                i_data: "foo".to_string(),
            });
            store.insert_stock(stock_row(i_id, 1));
            let (order, line) = order_referencing(o_id, i_id);
            store.insert_order(order);
            store.insert_neworder(NewOrder {
                no_o_id: o_id,
                no_d_id: 1,
                no_w_id: 1,
            });
            store.insert_orderline(line);
        }

        // The 20 orders inside the window: o_id 6..=25, each referencing a
        // distinct item with quantity 10..=29.
        for (idx, o_id) in (6..=25).enumerate() {
            let i_id = idx as i32 + 1;
            let quantity = 10 + idx as i32;
            store.insert_item(Item {
                i_id,
                i_im_id: 1,
                i_name: format!("item{i_id}"),
                i_price: 10.0,
                i_data: "foo".to_string(),
            });
            store.insert_stock(stock_row(i_id, quantity));
            let (order, line) = order_referencing(o_id, i_id);
            store.insert_order(order);
            store.insert_neworder(NewOrder {
                no_o_id: o_id,
                no_d_id: 1,
                no_w_id: 1,
            });
            store.insert_orderline(line);
        }

        let count = stock_level(&mut store, 1, 1, 15).unwrap();
        assert_eq!(count, 5);
    }
}
