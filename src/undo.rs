//! Undo buffer for transactions that may need to roll back.
//!
//! Collects typed entries as a transaction mutates the store: a prior-value
//! copy for an updated row, or an insertion marker for a row that must be
//! deleted if the transaction aborts. `apply` replays entries in reverse.
//! Only New-Order allocates one (for its invalid-item rollback path); every
//! other transaction always commits and never needs it.

use crate::model::{Customer, District, Stock, Warehouse};
use crate::store::Store;

enum UndoEntry {
    Warehouse { w_id: i32, prior: Box<Warehouse> },
    District { w_id: i32, d_id: i32, prior: Box<District> },
    Stock { w_id: i32, s_id: i32, prior: Box<Stock> },
    Customer { w_id: i32, d_id: i32, c_id: i32, prior: Box<Customer> },
    OrderInserted { w_id: i32, d_id: i32, o_id: i32 },
    NewOrderInserted { w_id: i32, d_id: i32, o_id: i32 },
    OrderLineInserted { w_id: i32, d_id: i32, o_id: i32, number: i32 },
}

#[derive(Default)]
pub struct UndoBuffer {
    entries: Vec<UndoEntry>,
}

impl UndoBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record_warehouse(&mut self, w_id: i32, prior: Warehouse) {
        self.entries.push(UndoEntry::Warehouse {
            w_id,
            prior: Box::new(prior),
        });
    }

    pub fn record_district(&mut self, w_id: i32, d_id: i32, prior: District) {
        self.entries.push(UndoEntry::District {
            w_id,
            d_id,
            prior: Box::new(prior),
        });
    }

    pub fn record_stock(&mut self, w_id: i32, s_id: i32, prior: Stock) {
        self.entries.push(UndoEntry::Stock {
            w_id,
            s_id,
            prior: Box::new(prior),
        });
    }

    pub fn record_customer(&mut self, w_id: i32, d_id: i32, c_id: i32, prior: Customer) {
        self.entries.push(UndoEntry::Customer {
            w_id,
            d_id,
            c_id,
            prior: Box::new(prior),
        });
    }

    pub fn record_order_inserted(&mut self, w_id: i32, d_id: i32, o_id: i32) {
        self.entries.push(UndoEntry::OrderInserted { w_id, d_id, o_id });
    }

    pub fn record_neworder_inserted(&mut self, w_id: i32, d_id: i32, o_id: i32) {
        self.entries.push(UndoEntry::NewOrderInserted { w_id, d_id, o_id });
    }

    pub fn record_orderline_inserted(&mut self, w_id: i32, d_id: i32, o_id: i32, number: i32) {
        self.entries.push(UndoEntry::OrderLineInserted {
            w_id,
            d_id,
            o_id,
            number,
        });
    }

    /// Restores `store` to its pre-transaction state by replaying entries in
    /// reverse order.
    pub fn apply(self, store: &mut Store) {
        for entry in self.entries.into_iter().rev() {
            match entry {
                UndoEntry::Warehouse { w_id, prior } => {
                    if let Some(slot) = store.find_warehouse_mut(w_id) {
                        *slot = *prior;
                    }
                }
                UndoEntry::District { w_id, d_id, prior } => {
                    if let Some(slot) = store.find_district_mut(w_id, d_id) {
                        *slot = *prior;
                    }
                }
                UndoEntry::Stock { w_id, s_id, prior } => {
                    if let Ok(slot) = store.pin_stock(w_id, s_id) {
                        *slot = *prior;
                    }
                }
                UndoEntry::Customer { w_id, d_id, c_id, prior } => {
                    if let Ok(slot) = store.pin_customer(w_id, d_id, c_id) {
                        *slot = *prior;
                    }
                }
                UndoEntry::OrderInserted { w_id, d_id, o_id } => {
                    store.remove_order(w_id, d_id, o_id);
                }
                UndoEntry::NewOrderInserted { w_id, d_id, o_id } => {
                    store.remove_neworder(w_id, d_id, o_id);
                }
                UndoEntry::OrderLineInserted { w_id, d_id, o_id, number } => {
                    store.remove_orderline(w_id, d_id, o_id, number);
                }
            }
        }
    }

    /// Discards the buffer. A no-op beyond what dropping it would do; kept
    /// as an explicit call so callers mirror the acquire/release shape of
    /// the original commit path instead of relying on scope exit.
    pub fn free(self) {}
}
