//! Integration tests exercising the five TPC-C transactions, eviction, and
//! CSV export together against a hand-seeded `Store` (no generator, so each
//! test controls exactly the rows it needs).

use omendb::model::{Customer, District, Item, Stock, Warehouse};
use omendb::store::Store;
use omendb::transactions::{
    deliver, new_order, order_status, payment, stock_level, CustomerSelector, NewOrderLine,
    NewOrderOutcome,
};

const W1: i32 = 1;
const D1: i32 = 1;

fn warehouse(w_id: i32) -> Warehouse {
    Warehouse {
        w_id,
        w_name: format!("W{w_id}"),
        w_street_1: "street 1".to_string(),
        w_street_2: "street 2".to_string(),
        w_city: "city".to_string(),
        w_state: "NY".to_string(),
        w_zip: "100001111".to_string(),
        w_tax: 0.10,
        w_ytd: 300_000.0,
    }
}

fn district(w_id: i32, d_id: i32) -> District {
    District {
        d_id,
        d_w_id: w_id,
        d_name: format!("D{d_id}"),
        d_street_1: "street 1".to_string(),
        d_street_2: "street 2".to_string(),
        d_city: "city".to_string(),
        d_state: "NY".to_string(),
        d_zip: "100001111".to_string(),
        d_tax: 0.05,
        d_ytd: 30_000.0,
        d_next_o_id: 1,
    }
}

fn customer(w_id: i32, d_id: i32, c_id: i32, last: &str) -> Customer {
    Customer {
        c_id,
        c_d_id: d_id,
        c_w_id: w_id,
        c_first: "First".to_string(),
        c_middle: "OE".to_string(),
        c_last: last.to_string(),
        c_street_1: "street 1".to_string(),
        c_street_2: "street 2".to_string(),
        c_city: "city".to_string(),
        c_state: "NY".to_string(),
        c_zip: "100001111".to_string(),
        c_phone: "5551234567".to_string(),
        c_since: 0,
        c_credit: "GC".to_string(),
        c_credit_lim: 50_000.0,
        c_discount: 0.1,
        c_balance: -10.0,
        c_ytd_payment: 10.0,
        c_payment_cnt: 1,
        c_delivery_cnt: 0,
        c_data: String::new(),
    }
}

fn item(i_id: i32) -> Item {
    Item {
        i_id,
        i_im_id: 1,
        i_name: format!("item{i_id}"),
        i_price: 9.99,
        i_data: "plain item data".to_string(),
    }
}

fn stock(w_id: i32, i_id: i32, quantity: i32) -> Stock {
    Stock {
        s_i_id: i_id,
        s_w_id: w_id,
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
        s_data: "plain stock data".to_string(),
    }
}

/// One warehouse, one district, a handful of items/stock, and `n_customers`
/// customers all sharing `last` as their last name (for the Payment
/// tie-break test).
fn seed_basic(store: &mut Store, n_items: i32, n_customers: i32, last: &str) {
    store.insert_warehouse(warehouse(W1));
    store.insert_district(district(W1, D1));
    for i_id in 1..=n_items {
        store.insert_item(item(i_id));
        store.insert_stock(stock(W1, i_id, 50));
    }
    for c_id in 1..=n_customers {
        store.insert_customer(customer(W1, D1, c_id, last));
    }
}

#[test]
fn new_order_commits_five_lines_for_a_single_warehouse() {
    let mut store = Store::new(8);
    seed_basic(&mut store, 5, 1, "BARBAR");

    let lines: Vec<NewOrderLine> = (1..=5)
        .map(|i_id| NewOrderLine {
            i_id,
            supply_w_id: W1,
            quantity: 3,
        })
        .collect();

    let outcome = new_order(&mut store, W1, D1, 1, &lines, 1, false).unwrap();
    let NewOrderOutcome::Committed(result, undo) = outcome else {
        panic!("expected a committed new-order");
    };
    assert_eq!(result.o_id, 1);
    assert_eq!(result.lines.len(), 5);
    assert!(undo.is_none());

    // next_o_id advanced, and every line debited stock by 3.
    assert_eq!(store.find_district(W1, D1).unwrap().d_next_o_id, 2);
    for i_id in 1..=5 {
        assert_eq!(store.stock_quantity(W1, i_id).unwrap(), 47);
    }
    assert_eq!(store.find_neworder(W1, D1, 1).unwrap().no_o_id, 1);
}

#[test]
fn new_order_rolls_back_on_an_unknown_item_without_mutating_state() {
    let mut store = Store::new(8);
    seed_basic(&mut store, 2, 1, "BARBAR");

    let lines = vec![
        NewOrderLine {
            i_id: 1,
            supply_w_id: W1,
            quantity: 2,
        },
        NewOrderLine {
            i_id: 9_999,
            supply_w_id: W1,
            quantity: 1,
        },
    ];

    let outcome = new_order(&mut store, W1, D1, 1, &lines, 1, false).unwrap();
    match outcome {
        NewOrderOutcome::RolledBack { bad_item } => assert_eq!(bad_item, 9_999),
        NewOrderOutcome::Committed(..) => panic!("expected rollback on unknown item"),
    }

    // Nothing was touched: next_o_id untouched, stock for item 1 untouched.
    assert_eq!(store.find_district(W1, D1).unwrap().d_next_o_id, 1);
    assert_eq!(store.stock_quantity(W1, 1).unwrap(), 50);
    assert!(store.find_neworder(W1, D1, 1).is_none());
}

#[test]
fn payment_by_last_name_picks_the_middle_of_five_matches() {
    let mut store = Store::new(8);
    // Five customers sharing a last name, inserted in ascending c_id so the
    // sorted-by-first-name order is just ascending c_id; ceil(5/2) = 3rd.
    store.insert_warehouse(warehouse(W1));
    store.insert_district(district(W1, D1));
    for c_id in 1..=5 {
        let mut c = customer(W1, D1, c_id, "SAME");
        c.c_first = format!("First{c_id}");
        store.insert_customer(c);
    }

    let (result, undo) = payment(
        &mut store,
        W1,
        D1,
        W1,
        D1,
        CustomerSelector::ByLastName("SAME"),
        50.0,
        1,
        false,
    )
    .unwrap();

    assert_eq!(result.c_id, 3);
    assert!(undo.is_none());
    assert_eq!(result.c_balance, -10.0 - 50.0);
    assert_eq!(store.find_warehouse(W1).unwrap().w_ytd, 300_000.0 + 50.0);
    assert_eq!(store.find_district(W1, D1).unwrap().d_ytd, 30_000.0 + 50.0);
}

#[test]
fn delivery_processes_ten_pending_orders_in_one_district() {
    let mut store = Store::new(8);
    seed_basic(&mut store, 1, 1, "BARBAR");

    for _ in 0..10 {
        let lines = vec![NewOrderLine {
            i_id: 1,
            supply_w_id: W1,
            quantity: 1,
        }];
        let outcome = new_order(&mut store, W1, D1, 1, &lines, 1, false).unwrap();
        assert!(matches!(outcome, NewOrderOutcome::Committed(..)));
    }

    let result = deliver(&mut store, W1, 5, 2).unwrap();
    assert_eq!(result.delivered.len(), 1);
    assert_eq!(result.delivered[0].o_id, 1);
    assert_eq!(result.skipped_districts.len(), 9);

    assert_eq!(store.find_order(W1, D1, 1).unwrap().o_carrier_id, 5);
    assert!(store.find_neworder(W1, D1, 1).is_none());

    let lines = store.load_orderlines(W1, D1, 1).unwrap();
    assert!(lines.iter().all(|l| l.ol_delivery_d == Some(2)));
}

#[test]
fn stock_level_counts_distinct_low_stock_items_over_recent_orders() {
    let mut store = Store::new(8);
    store.insert_warehouse(warehouse(W1));
    store.insert_district(district(W1, D1));
    store.insert_item(item(1));
    store.insert_item(item(2));
    store.insert_stock(stock(W1, 1, 5));
    store.insert_stock(stock(W1, 2, 50));
    store.insert_customer(customer(W1, D1, 1, "BARBAR"));

    for i_id in [1, 2] {
        let outcome = new_order(
            &mut store,
            W1,
            D1,
            1,
            &[NewOrderLine {
                i_id,
                supply_w_id: W1,
                quantity: 1,
            }],
            1,
            false,
        )
        .unwrap();
        assert!(matches!(outcome, NewOrderOutcome::Committed(..)));
    }

    let count = stock_level(&mut store, W1, D1, 15).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn eviction_then_payment_and_order_status_see_the_update_after_reload() {
    let mut store = Store::new(8);
    seed_basic(&mut store, 1, 1, "BARBAR");

    let lines = vec![NewOrderLine {
        i_id: 1,
        supply_w_id: W1,
        quantity: 1,
    }];
    let outcome = new_order(&mut store, W1, D1, 1, &lines, 1, false).unwrap();
    assert!(matches!(outcome, NewOrderOutcome::Committed(..)));

    let data_dir = tempfile::tempdir().unwrap();
    store.mount_cold_tables(data_dir.path(), 4096, 4096).unwrap();

    let mut eviction = omendb::eviction::EvictionEngine::new(0);
    eviction.run(&mut store).unwrap();

    let (result, undo) = payment(
        &mut store,
        W1,
        D1,
        W1,
        D1,
        CustomerSelector::ById(1),
        25.0,
        2,
        false,
    )
    .unwrap();
    assert!(undo.is_none());
    assert_eq!(result.c_balance, -10.0 - 25.0);

    let status = order_status(&mut store, W1, D1, CustomerSelector::ById(1)).unwrap();
    assert_eq!(status.c_balance, -10.0 - 25.0);
    assert_eq!(status.o_id, 1);
    assert_eq!(status.lines.len(), 1);
}
