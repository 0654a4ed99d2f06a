//! Drives the five transactions against a [`Store`] at the TPC-C mandated
//! mix, using non-uniform parameter selection.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{info, instrument};

use crate::error::Result;
use crate::keycodec::{CUSTOMERS_PER_DISTRICT, DISTRICTS_PER_WAREHOUSE};
use crate::store::Store;
use crate::transactions::{
    deliver, new_order, order_status, payment, stock_level, CustomerSelector, NewOrderLine, NewOrderOutcome,
};

use super::generator::{INVALID_ITEM_ID, NUM_ITEMS};
use super::random::{nu_rand, random_last_name};

/// One randomly chosen transaction type, at the weights TPC-C mandates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    NewOrder,
    Payment,
    OrderStatus,
    Delivery,
    StockLevel,
}

impl TransactionKind {
    fn pick(rng: &mut StdRng) -> Self {
        match rng.gen_range(0..100) {
            0..=44 => TransactionKind::NewOrder,
            45..=87 => TransactionKind::Payment,
            88..=91 => TransactionKind::OrderStatus,
            92..=95 => TransactionKind::Delivery,
            _ => TransactionKind::StockLevel,
        }
    }
}

pub struct Client {
    num_warehouses: i32,
    c_run: i64,
    rng: StdRng,
}

impl Client {
    pub fn new(num_warehouses: i32, c_run: i64, rng: StdRng) -> Self {
        Self {
            num_warehouses,
            c_run,
            rng,
        }
    }

    /// Runs one transaction of a randomly-selected kind, `now` being the
    /// caller-supplied logical clock (threaded explicitly per transaction,
    /// never captured once and reused).
    #[instrument(skip(self, store))]
    pub fn run_one(&mut self, store: &mut Store, now: i64) -> Result<TransactionKind> {
        let kind = TransactionKind::pick(&mut self.rng);
        let w_id = self.rng.gen_range(1..=self.num_warehouses);
        let d_id = self.rng.gen_range(1..=DISTRICTS_PER_WAREHOUSE);

        match kind {
            TransactionKind::NewOrder => self.run_new_order(store, w_id, d_id, now)?,
            TransactionKind::Payment => self.run_payment(store, w_id, d_id, now)?,
            TransactionKind::OrderStatus => self.run_order_status(store, w_id, d_id)?,
            TransactionKind::Delivery => self.run_delivery(store, w_id, now)?,
            TransactionKind::StockLevel => self.run_stock_level(store, w_id, d_id)?,
        }
        Ok(kind)
    }

    fn random_customer_id(&mut self) -> i32 {
        self.rng.gen_range(1..=CUSTOMERS_PER_DISTRICT)
    }

    fn run_new_order(&mut self, store: &mut Store, w_id: i32, d_id: i32, now: i64) -> Result<()> {
        let c_id = self.random_customer_id();
        let ol_cnt = self.rng.gen_range(5..=15);
        let invalid_slot = if self.rng.gen_bool(0.01) {
            Some(self.rng.gen_range(0..ol_cnt))
        } else {
            None
        };

        let mut lines = Vec::with_capacity(ol_cnt as usize);
        for idx in 0..ol_cnt {
            let i_id = if Some(idx) == invalid_slot {
                INVALID_ITEM_ID
            } else {
                nu_rand(&mut self.rng, 8191, 7911, 1, NUM_ITEMS as i64) as i32
            };
            let supply_w_id = if self.num_warehouses > 1 && self.rng.gen_bool(0.01) {
                loop {
                    let candidate = self.rng.gen_range(1..=self.num_warehouses);
                    if candidate != w_id {
                        break candidate;
                    }
                }
            } else {
                w_id
            };
            lines.push(NewOrderLine {
                i_id,
                supply_w_id,
                quantity: self.rng.gen_range(1..=10),
            });
        }

        match new_order(store, w_id, d_id, c_id, &lines, now, false)? {
            NewOrderOutcome::Committed(result, _) => {
                store.stats_mut().record_commit();
                info!(o_id = result.o_id, total = result.total_amount, "new-order committed");
            }
            NewOrderOutcome::RolledBack { bad_item } => {
                store.stats_mut().record_rollback();
                info!(bad_item, "new-order rolled back");
            }
        }
        Ok(())
    }

    fn run_payment(&mut self, store: &mut Store, w_id: i32, d_id: i32, now: i64) -> Result<()> {
        let c_w_id = w_id;
        let c_d_id = d_id;
        let h_amount = (self.rng.gen_range(100..=500_000) as f64) / 100.0;

        let last = random_last_name(&mut self.rng, self.c_run);
        let selector = if self.rng.gen_bool(0.6) {
            CustomerSelector::ByLastName(&last)
        } else {
            CustomerSelector::ById(self.random_customer_id())
        };

        let (result, _) = payment(store, w_id, d_id, c_w_id, c_d_id, selector, h_amount, now, false)?;
        store.stats_mut().record_commit();
        info!(c_id = result.c_id, balance = result.c_balance, "payment committed");
        Ok(())
    }

    fn run_order_status(&mut self, store: &mut Store, w_id: i32, d_id: i32) -> Result<()> {
        let last = random_last_name(&mut self.rng, self.c_run);
        let selector = if self.rng.gen_bool(0.6) {
            CustomerSelector::ByLastName(&last)
        } else {
            CustomerSelector::ById(self.random_customer_id())
        };
        let result = order_status(store, w_id, d_id, selector)?;
        store.stats_mut().record_commit();
        info!(o_id = result.o_id, "order-status committed");
        Ok(())
    }

    fn run_delivery(&mut self, store: &mut Store, w_id: i32, now: i64) -> Result<()> {
        let carrier_id = self.rng.gen_range(1..=10);
        let result = deliver(store, w_id, carrier_id, now)?;
        store.stats_mut().record_commit();
        info!(delivered = result.delivered.len(), "delivery committed");
        Ok(())
    }

    fn run_stock_level(&mut self, store: &mut Store, w_id: i32, d_id: i32) -> Result<()> {
        let threshold = self.rng.gen_range(10..=20);
        let count = stock_level(store, w_id, d_id, threshold)?;
        store.stats_mut().record_commit();
        info!(count, "stock-level committed");
        Ok(())
    }
}
