//! Deterministic population of the schema for `n` warehouses.
//!
//! Every row is generated from a single seeded RNG so that two runs with the
//! same seed and warehouse count produce byte-identical tables (and,
//! downstream, byte-stable CSV exports).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::keycodec::{CUSTOMERS_PER_DISTRICT, DISTRICTS_PER_WAREHOUSE};
use crate::model::{Customer, District, History, Item, NewOrder, Order, OrderLine, Stock, Warehouse};
use crate::store::Store;

use super::random::{random_alpha_string, random_data_with_original, random_numeric_string, random_zip};

/// Items in the catalog, fixed by the benchmark regardless of warehouse count.
pub const NUM_ITEMS: i32 = 100_000;

/// New-Order's required ~1% invalid-item rate uses this id, one past the
/// last real item.
pub const INVALID_ITEM_ID: i32 = NUM_ITEMS + 1;

pub struct GeneratorConfig {
    pub num_warehouses: i32,
    pub seed: u64,
}

/// Populates `store` with `config.num_warehouses` warehouses' worth of rows,
/// plus the shared item catalog, and returns the RNG's `c_run` constant used
/// for non-uniform last-name selection (the driver client reuses it so
/// lookups land on names that actually exist).
pub fn generate(store: &mut Store, config: &GeneratorConfig) -> i64 {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let c_run = rng.gen_range(0..=999);

    info!(num_items = NUM_ITEMS, "generating item catalog");
    for i_id in 1..=NUM_ITEMS {
        store.insert_item(Item {
            i_id,
            i_im_id: rng.gen_range(1..=10_000),
            i_name: random_alpha_string(&mut rng, 14, 24),
            i_price: (rng.gen_range(100..=10_000) as f64) / 100.0,
            i_data: random_data_with_original(&mut rng, 26, 50),
        });
    }

    for w_id in 1..=config.num_warehouses {
        generate_warehouse(store, &mut rng, w_id, c_run);
        info!(w_id, "warehouse generated");
    }

    c_run
}

fn generate_warehouse(store: &mut Store, rng: &mut StdRng, w_id: i32, c_run: i64) {
    store.insert_warehouse(Warehouse {
        w_id,
        w_name: random_alpha_string(rng, 6, 10),
        w_street_1: random_alpha_string(rng, 10, 20),
        w_street_2: random_alpha_string(rng, 10, 20),
        w_city: random_alpha_string(rng, 10, 20),
        w_state: random_alpha_string(rng, 2, 2),
        w_zip: random_zip(rng),
        w_tax: (rng.gen_range(0..=2000) as f64) / 10_000.0,
        w_ytd: 300_000.0,
    });

    for s_id in 1..=NUM_ITEMS {
        store.insert_stock(Stock {
            s_i_id: s_id,
            s_w_id: w_id,
            s_quantity: rng.gen_range(10..=100),
            s_dist_01: random_alpha_string(rng, 24, 24),
            s_dist_02: random_alpha_string(rng, 24, 24),
            s_dist_03: random_alpha_string(rng, 24, 24),
            s_dist_04: random_alpha_string(rng, 24, 24),
            s_dist_05: random_alpha_string(rng, 24, 24),
            s_dist_06: random_alpha_string(rng, 24, 24),
            s_dist_07: random_alpha_string(rng, 24, 24),
            s_dist_08: random_alpha_string(rng, 24, 24),
            s_dist_09: random_alpha_string(rng, 24, 24),
            s_dist_10: random_alpha_string(rng, 24, 24),
            s_ytd: 0.0,
            s_order_cnt: 0,
            s_remote_cnt: 0,
            s_data: random_data_with_original(rng, 26, 50),
        });
    }

    for d_id in 1..=DISTRICTS_PER_WAREHOUSE {
        store.insert_district(District {
            d_id,
            d_w_id: w_id,
            d_name: random_alpha_string(rng, 6, 10),
            d_street_1: random_alpha_string(rng, 10, 20),
            d_street_2: random_alpha_string(rng, 10, 20),
            d_city: random_alpha_string(rng, 10, 20),
            d_state: random_alpha_string(rng, 2, 2),
            d_zip: random_zip(rng),
            d_tax: (rng.gen_range(0..=2000) as f64) / 10_000.0,
            d_ytd: 30_000.0,
            d_next_o_id: CUSTOMERS_PER_DISTRICT + 1,
        });

        generate_customers_and_orders(store, rng, w_id, d_id, c_run);
    }
}

fn generate_customers_and_orders(store: &mut Store, rng: &mut StdRng, w_id: i32, d_id: i32, c_run: i64) {
    for c_id in 1..=CUSTOMERS_PER_DISTRICT {
        let bad_credit = rng.gen_bool(0.1);
        let last = if c_id <= 1000 {
            super::random::last_name((c_id - 1) as i64)
        } else {
            super::random::random_last_name(rng, c_run)
        };
        store.insert_customer(Customer {
            c_id,
            c_d_id: d_id,
            c_w_id: w_id,
            c_first: random_alpha_string(rng, 8, 16),
            c_middle: "OE".to_string(),
            c_last: last,
            c_street_1: random_alpha_string(rng, 10, 20),
            c_street_2: random_alpha_string(rng, 10, 20),
            c_city: random_alpha_string(rng, 10, 20),
            c_state: random_alpha_string(rng, 2, 2),
            c_zip: random_zip(rng),
            c_phone: random_numeric_string(rng, 16),
            c_since: 0,
            c_credit: if bad_credit { "BC" } else { "GC" }.to_string(),
            c_credit_lim: 50_000.0,
            c_discount: (rng.gen_range(0..=5000) as f64) / 10_000.0,
            c_balance: -10.0,
            c_ytd_payment: 10.0,
            c_payment_cnt: 1,
            c_delivery_cnt: 0,
            c_data: random_alpha_string(rng, 300, 500),
        });

        store.insert_history(History {
            h_c_id: c_id,
            h_c_d_id: d_id,
            h_c_w_id: w_id,
            h_d_id: d_id,
            h_w_id: w_id,
            h_date: 0,
            h_amount: 10.0,
            h_data: random_alpha_string(rng, 12, 24),
        });

        let o_id = c_id;
        let ol_cnt = rng.gen_range(5..=15);
        let delivered = o_id <= (CUSTOMERS_PER_DISTRICT * 3 / 4);
        store.insert_order(Order {
            o_id,
            o_d_id: d_id,
            o_w_id: w_id,
            o_c_id: c_id,
            o_entry_d: 0,
            o_carrier_id: if delivered { rng.gen_range(1..=10) } else { 0 },
            o_ol_cnt: ol_cnt,
            o_all_local: true,
        });
        if !delivered {
            store.insert_neworder(NewOrder {
                no_o_id: o_id,
                no_d_id: d_id,
                no_w_id: w_id,
            });
        }

        for number in 1..=ol_cnt {
            store.insert_orderline(OrderLine {
                ol_o_id: o_id,
                ol_d_id: d_id,
                ol_w_id: w_id,
                ol_number: number,
                ol_i_id: rng.gen_range(1..=NUM_ITEMS),
                ol_supply_w_id: w_id,
                ol_delivery_d: delivered.then_some(0),
                ol_quantity: 5,
                ol_amount: if delivered { 0.0 } else { (rng.gen_range(1..=999_999) as f64) / 100.0 },
                ol_dist_info: random_alpha_string(rng, 24, 24),
            });
        }
    }
}
