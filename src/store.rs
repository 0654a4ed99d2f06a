//! The relational store: every table, its indexes, and tuple identity.
//!
//! Item, Warehouse, District, Order, NewOrder, and History stay fully
//! resident — they are either tiny (Item, Warehouse, District) or needed in
//! full for every transaction (Order, NewOrder) or write-mostly (History).
//! Stock, Customer, and OrderLine are the cold tables: their indexes hold
//! [`TupleHandle`]s instead of rows, and [`mount_cold_tables`] trains a
//! compressor and opens a disk tier for each once the table has been fully
//! generated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::btree::BPlusTree;
use crate::compressor::Compressor;
use crate::disktier::DiskTier;
use crate::error::{Result, TpccError};
use crate::keycodec::{
    customer_key, district_key, neworder_key, order_by_customer_key, order_key, orderline_key,
    stock_key, MAX_O_ID,
};
use crate::model::{Customer, District, History, Item, NewOrder, Order, OrderLine, Stock, Warehouse};
use crate::stats::EngineStats;
use crate::tuple::TupleHandle;

const STOCK_SCHEMA_ID: u32 = 1;
const CUSTOMER_SCHEMA_ID: u32 = 2;
const ORDERLINE_SCHEMA_ID: u32 = 3;

fn approx_row_bytes<T: Serialize>(row: &T) -> u64 {
    bincode::serialize(row).map(|bytes| bytes.len() as u64).unwrap_or(0)
}

pub struct Store {
    items: Vec<Item>,
    warehouses: BPlusTree<i32, Warehouse>,
    districts: BPlusTree<i32, District>,

    stock: BPlusTree<i32, TupleHandle<Stock>>,
    stock_disk: Option<DiskTier<Stock>>,

    customers: BPlusTree<i64, TupleHandle<Customer>>,
    customers_disk: Option<DiskTier<Customer>>,
    /// `(w_id, d_id, last, first, c_id)` ordered lexicographically — the last
    /// field breaks ties between same-named customers deterministically.
    customers_by_name: BTreeMap<(i32, i32, String, String, i32), i64>,

    orders: BPlusTree<i64, Order>,
    /// `order_by_customer_key -> o_id`, ascending `o_id` within a customer.
    orders_by_customer: BPlusTree<i64, i32>,

    orderlines: BPlusTree<i64, TupleHandle<OrderLine>>,
    orderlines_disk: Option<DiskTier<OrderLine>>,

    /// Pending-delivery markers. A plain ordered map, not the B+ tree: this
    /// table is churned by every Delivery (insert in New-Order, remove in
    /// Delivery) and never grows past a few pending orders per district, so
    /// it does not need the cold-table machinery the big three get.
    neworders: BTreeMap<i64, NewOrder>,

    history: Vec<History>,

    stats: EngineStats,
    fanout: usize,
}

impl Store {
    pub fn new(fanout: usize) -> Self {
        Self {
            items: Vec::new(),
            warehouses: BPlusTree::with_fanout(fanout, fanout),
            districts: BPlusTree::with_fanout(fanout, fanout),
            stock: BPlusTree::with_fanout(fanout, fanout),
            stock_disk: None,
            customers: BPlusTree::with_fanout(fanout, fanout),
            customers_disk: None,
            customers_by_name: BTreeMap::new(),
            orders: BPlusTree::with_fanout(fanout, fanout),
            orders_by_customer: BPlusTree::with_fanout(fanout, fanout),
            orderlines: BPlusTree::with_fanout(fanout, fanout),
            orderlines_disk: None,
            neworders: BTreeMap::new(),
            history: Vec::new(),
            stats: EngineStats::new(),
            fanout,
        }
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EngineStats {
        &mut self.stats
    }

    // ---- Item ----------------------------------------------------------

    pub fn insert_item(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn find_item(&self, i_id: i32) -> Option<&Item> {
        self.items.get(usize::try_from(i_id - 1).ok()?)
    }

    // ---- Warehouse -------------------------------------------------------

    pub fn insert_warehouse(&mut self, warehouse: Warehouse) {
        self.warehouses.insert(warehouse.w_id, warehouse);
    }

    pub fn has_warehouse(&self, w_id: i32) -> bool {
        self.warehouses.contains(w_id)
    }

    pub fn find_warehouse(&self, w_id: i32) -> Option<&Warehouse> {
        self.warehouses.find(w_id)
    }

    pub fn find_warehouse_mut(&mut self, w_id: i32) -> Option<&mut Warehouse> {
        self.warehouses.find_mut(w_id)
    }

    // ---- District ----------------------------------------------------------

    pub fn insert_district(&mut self, district: District) {
        let key = district_key(district.d_w_id, district.d_id);
        self.districts.insert(key.0, district);
    }

    pub fn find_district(&self, w_id: i32, d_id: i32) -> Option<&District> {
        self.districts.find(district_key(w_id, d_id).0)
    }

    pub fn find_district_mut(&mut self, w_id: i32, d_id: i32) -> Option<&mut District> {
        self.districts.find_mut(district_key(w_id, d_id).0)
    }

    // ---- Stock (cold) ----------------------------------------------------

    pub fn insert_stock(&mut self, stock: Stock) {
        let key = stock_key(stock.s_w_id, stock.s_i_id);
        let bytes = approx_row_bytes(&stock);
        self.stock.insert(key.0, TupleHandle::resident(stock));
        self.stats.table_mut("stock").resident_rows += 1;
        self.stats.table_mut("stock").resident_bytes += bytes;
    }

    pub fn stock_handle(&self, w_id: i32, s_id: i32) -> Option<&TupleHandle<Stock>> {
        self.stock.find(stock_key(w_id, s_id).0)
    }

    /// Promotes the stock row to resident (materializing from disk if
    /// needed) and returns a mutable reference, for New-Order's quantity
    /// update.
    pub fn pin_stock(&mut self, w_id: i32, s_id: i32) -> Result<&mut Stock> {
        let key = stock_key(w_id, s_id).0;
        let handle = self
            .stock
            .find_mut(key)
            .ok_or_else(|| TpccError::Argument(format!("no stock row for ({w_id}, {s_id})")))?;
        if handle.is_evicted() {
            let disk = self
                .stock_disk
                .as_mut()
                .ok_or_else(|| TpccError::Argument("stock cold tier not mounted".to_string()))?;
            let promoted = handle.pin(disk)?;
            let bytes = approx_row_bytes(promoted);
            self.stats.table_mut("stock").resident_rows += 1;
            self.stats.table_mut("stock").evicted_rows -= 1;
            self.stats.table_mut("stock").resident_bytes += bytes;
            return Ok(self.stock.find_mut(key).unwrap().peek_mut().unwrap());
        }
        Ok(handle.peek_mut().unwrap())
    }

    /// Reads `s_quantity` without promoting an evicted row to resident —
    /// Stock-Level's threshold scan has no business pinning rows it only
    /// needs to count.
    pub fn stock_quantity(&mut self, w_id: i32, s_id: i32) -> Result<i32> {
        let key = stock_key(w_id, s_id).0;
        let handle = self
            .stock
            .find(key)
            .ok_or_else(|| TpccError::Argument(format!("no stock row for ({w_id}, {s_id})")))?;
        if let Some(row) = handle.peek() {
            return Ok(row.s_quantity);
        }
        let disk = self
            .stock_disk
            .as_mut()
            .ok_or_else(|| TpccError::Argument("stock cold tier not mounted".to_string()))?;
        let handle = self.stock.find(key).expect("checked above");
        let mut scratch = None;
        Ok(handle.load(disk, &mut scratch)?.s_quantity)
    }

    /// Packed stock keys in ascending order, for CSV export.
    pub fn stock_keys(&self) -> Vec<i32> {
        self.stock.iter().map(|(k, _)| k).collect()
    }

    /// Reads a stock row by its packed key without promoting an evicted
    /// handle to resident.
    pub fn stock_row_for_export(&mut self, key: i32) -> Result<Stock> {
        let handle = self
            .stock
            .find(key)
            .ok_or_else(|| TpccError::Argument(format!("no stock row for key {key}")))?;
        if let Some(row) = handle.peek() {
            return Ok(row.clone());
        }
        let disk = self
            .stock_disk
            .as_mut()
            .ok_or_else(|| TpccError::Argument("stock cold tier not mounted".to_string()))?;
        let handle = self.stock.find(key).expect("checked above");
        let mut scratch = None;
        Ok(handle.load(disk, &mut scratch)?.clone())
    }

    // ---- Customer (cold) --------------------------------------------------

    pub fn insert_customer(&mut self, customer: Customer) {
        let key = customer_key(customer.c_w_id, customer.c_d_id, customer.c_id);
        self.customers_by_name.insert(
            (
                customer.c_w_id,
                customer.c_d_id,
                customer.c_last.clone(),
                customer.c_first.clone(),
                customer.c_id,
            ),
            key.0,
        );
        let bytes = approx_row_bytes(&customer);
        self.customers.insert(key.0, TupleHandle::resident(customer));
        self.stats.table_mut("customer").resident_rows += 1;
        self.stats.table_mut("customer").resident_bytes += bytes;
    }

    pub fn customer_handle(&self, w_id: i32, d_id: i32, c_id: i32) -> Option<&TupleHandle<Customer>> {
        self.customers.find(customer_key(w_id, d_id, c_id).0)
    }

    pub fn pin_customer(&mut self, w_id: i32, d_id: i32, c_id: i32) -> Result<&mut Customer> {
        let key = customer_key(w_id, d_id, c_id).0;
        let handle = self.customers.find_mut(key).ok_or_else(|| {
            TpccError::Argument(format!("no customer row for ({w_id}, {d_id}, {c_id})"))
        })?;
        if handle.is_evicted() {
            let disk = self
                .customers_disk
                .as_mut()
                .ok_or_else(|| TpccError::Argument("customer cold tier not mounted".to_string()))?;
            let promoted = handle.pin(disk)?;
            let bytes = approx_row_bytes(promoted);
            self.stats.table_mut("customer").resident_rows += 1;
            self.stats.table_mut("customer").evicted_rows -= 1;
            self.stats.table_mut("customer").resident_bytes += bytes;
            return Ok(self.customers.find_mut(key).unwrap().peek_mut().unwrap());
        }
        Ok(handle.peek_mut().unwrap())
    }

    /// Finds the customer at the ⌈n/2⌉-th position (1-indexed) among those
    /// sharing `(w_id, d_id, last)`, in ascending first-name order. Mandatory
    /// tie-break for Payment and Order-Status lookups by last name.
    pub fn find_customer_by_name(&self, w_id: i32, d_id: i32, last: &str) -> Option<i32> {
        let matches: Vec<i32> = self
            .customers_by_name
            .range((w_id, d_id, last.to_string(), String::new(), i32::MIN)..)
            .take_while(|((ew, ed, el, _, _), _)| *ew == w_id && *ed == d_id && el == last)
            .map(|((_, _, _, _, c_id), _)| *c_id)
            .collect();
        if matches.is_empty() {
            return None;
        }
        let pick = matches.len().div_ceil(2) - 1;
        Some(matches[pick])
    }

    /// Packed customer keys in ascending order, for CSV export.
    pub fn customer_keys(&self) -> Vec<i64> {
        self.customers.iter().map(|(k, _)| k).collect()
    }

    /// Reads a customer row by its packed key without promoting an evicted
    /// handle to resident.
    pub fn customer_row_for_export(&mut self, key: i64) -> Result<Customer> {
        let handle = self
            .customers
            .find(key)
            .ok_or_else(|| TpccError::Argument(format!("no customer row for key {key}")))?;
        if let Some(row) = handle.peek() {
            return Ok(row.clone());
        }
        let disk = self
            .customers_disk
            .as_mut()
            .ok_or_else(|| TpccError::Argument("customer cold tier not mounted".to_string()))?;
        let handle = self.customers.find(key).expect("checked above");
        let mut scratch = None;
        Ok(handle.load(disk, &mut scratch)?.clone())
    }

    /// Reads `c_balance` without promoting an evicted row to resident —
    /// Order-Status is read-only and must not perturb eviction state.
    pub fn customer_balance(&mut self, w_id: i32, d_id: i32, c_id: i32) -> Result<f64> {
        let key = customer_key(w_id, d_id, c_id).0;
        let handle = self.customers.find(key).ok_or_else(|| {
            TpccError::Argument(format!("no customer row for ({w_id}, {d_id}, {c_id})"))
        })?;
        if let Some(row) = handle.peek() {
            return Ok(row.c_balance);
        }
        let disk = self
            .customers_disk
            .as_mut()
            .ok_or_else(|| TpccError::Argument("customer cold tier not mounted".to_string()))?;
        let handle = self.customers.find(key).expect("checked above");
        let mut scratch = None;
        Ok(handle.load(disk, &mut scratch)?.c_balance)
    }

    // ---- Order -------------------------------------------------------------

    pub fn insert_order(&mut self, order: Order) {
        let key = order_key(order.o_w_id, order.o_d_id, order.o_id);
        let by_customer = order_by_customer_key(order.o_w_id, order.o_d_id, order.o_c_id, order.o_id);
        self.orders_by_customer.insert(by_customer.0, order.o_id);
        self.orders.insert(key.0, order);
    }

    pub fn find_order(&self, w_id: i32, d_id: i32, o_id: i32) -> Option<&Order> {
        self.orders.find(order_key(w_id, d_id, o_id).0)
    }

    pub fn find_order_mut(&mut self, w_id: i32, d_id: i32, o_id: i32) -> Option<&mut Order> {
        self.orders.find_mut(order_key(w_id, d_id, o_id).0)
    }

    /// The customer's most recent order: greatest `o_id` reachable through
    /// the by-customer secondary index.
    pub fn find_last_order_by_customer(&self, w_id: i32, d_id: i32, c_id: i32) -> Option<&Order> {
        let lo = order_by_customer_key(w_id, d_id, c_id, 0).0;
        let hi = order_by_customer_key(w_id, d_id, c_id, MAX_O_ID as i32).0;
        let last_o_id = self.orders_by_customer.range(lo, hi).last().map(|&(_, o_id)| *o_id)?;
        self.find_order(w_id, d_id, last_o_id)
    }

    /// Removes an order and its by-customer index entry. Used only to
    /// unwind an insert on rollback.
    pub fn remove_order(&mut self, w_id: i32, d_id: i32, o_id: i32) {
        let key = order_key(w_id, d_id, o_id).0;
        if let Some(order) = self.orders.erase(key) {
            let by_customer = order_by_customer_key(w_id, d_id, order.o_c_id, o_id);
            self.orders_by_customer.erase(by_customer.0);
        }
    }

    // ---- NewOrder ------------------------------------------------------

    pub fn insert_neworder(&mut self, entry: NewOrder) {
        let key = neworder_key(entry.no_w_id, entry.no_d_id, entry.no_o_id);
        self.neworders.insert(key.0, entry);
    }

    pub fn find_neworder(&self, w_id: i32, d_id: i32, o_id: i32) -> Option<&NewOrder> {
        self.neworders.get(&neworder_key(w_id, d_id, o_id).0)
    }

    /// Removes and returns the lowest-keyed (earliest) pending NewOrder for
    /// `(w_id, d_id)`, the FIFO delivery picks from.
    pub fn pop_earliest_neworder(&mut self, w_id: i32, d_id: i32) -> Option<NewOrder> {
        let lo = neworder_key(w_id, d_id, 0).0;
        let hi = neworder_key(w_id, d_id, MAX_O_ID as i32).0;
        let found_key = self
            .neworders
            .range(lo..=hi)
            .next()
            .map(|(k, _)| *k)?;
        self.neworders.remove(&found_key)
    }

    /// Removes a specific NewOrder marker. Used to unwind an insert on
    /// rollback (Delivery's own pop is via [`Store::pop_earliest_neworder`]).
    pub fn remove_neworder(&mut self, w_id: i32, d_id: i32, o_id: i32) {
        self.neworders.remove(&neworder_key(w_id, d_id, o_id).0);
    }

    // ---- OrderLine (cold) --------------------------------------------------

    pub fn insert_orderline(&mut self, line: OrderLine) {
        let key = orderline_key(line.ol_w_id, line.ol_d_id, line.ol_o_id, line.ol_number);
        let bytes = approx_row_bytes(&line);
        self.orderlines.insert(key.0, TupleHandle::resident(line));
        self.stats.table_mut("orderline").resident_rows += 1;
        self.stats.table_mut("orderline").resident_bytes += bytes;
    }

    pub fn orderline_handle(
        &self,
        w_id: i32,
        d_id: i32,
        o_id: i32,
        number: i32,
    ) -> Option<&TupleHandle<OrderLine>> {
        self.orderlines.find(orderline_key(w_id, d_id, o_id, number).0)
    }

    /// All order lines for `(w_id, d_id, o_id)`, materializing any that are
    /// evicted. Read-only: does not promote handles to resident.
    pub fn load_orderlines(&mut self, w_id: i32, d_id: i32, o_id: i32) -> Result<Vec<OrderLine>> {
        let lo = orderline_key(w_id, d_id, o_id, 1).0;
        let hi = orderline_key(w_id, d_id, o_id, crate::keycodec::MAX_OL_NUMBER as i32).0;
        let keys: Vec<i64> = self.orderlines.range(lo, hi).into_iter().map(|(k, _)| k).collect();
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let handle = self.orderlines.find(key).expect("key just collected from range");
            let row = if handle.is_resident() {
                handle.peek().unwrap().clone()
            } else {
                let disk = self
                    .orderlines_disk
                    .as_mut()
                    .ok_or_else(|| TpccError::Argument("orderline cold tier not mounted".to_string()))?;
                let mut scratch = None;
                handle.load(disk, &mut scratch)?.clone()
            };
            out.push(row);
        }
        Ok(out)
    }

    pub fn pin_orderline(&mut self, w_id: i32, d_id: i32, o_id: i32, number: i32) -> Result<&mut OrderLine> {
        let key = orderline_key(w_id, d_id, o_id, number).0;
        let handle = self
            .orderlines
            .find_mut(key)
            .ok_or_else(|| TpccError::Argument("no such order line".to_string()))?;
        if handle.is_evicted() {
            let disk = self
                .orderlines_disk
                .as_mut()
                .ok_or_else(|| TpccError::Argument("orderline cold tier not mounted".to_string()))?;
            let promoted = handle.pin(disk)?;
            let bytes = approx_row_bytes(promoted);
            self.stats.table_mut("orderline").resident_rows += 1;
            self.stats.table_mut("orderline").evicted_rows -= 1;
            self.stats.table_mut("orderline").resident_bytes += bytes;
            return Ok(self.orderlines.find_mut(key).unwrap().peek_mut().unwrap());
        }
        Ok(handle.peek_mut().unwrap())
    }

    /// Removes an order line. Used to unwind an insert on rollback; the row
    /// is always resident at that point (rollback happens within the same
    /// transaction that inserted it, before any eviction pass can run).
    pub fn remove_orderline(&mut self, w_id: i32, d_id: i32, o_id: i32, number: i32) {
        let key = orderline_key(w_id, d_id, o_id, number).0;
        if let Some(handle) = self.orderlines.erase(key) {
            if handle.is_resident() {
                let stat = self.stats.table_mut("orderline");
                stat.resident_rows = stat.resident_rows.saturating_sub(1);
            }
        }
    }

    /// Packed order-line keys in ascending order, for CSV export.
    pub fn orderline_keys(&self) -> Vec<i64> {
        self.orderlines.iter().map(|(k, _)| k).collect()
    }

    /// Reads an order line by its packed key without promoting an evicted
    /// handle to resident.
    pub fn orderline_row_for_export(&mut self, key: i64) -> Result<OrderLine> {
        let handle = self
            .orderlines
            .find(key)
            .ok_or_else(|| TpccError::Argument(format!("no order line for key {key}")))?;
        if let Some(row) = handle.peek() {
            return Ok(row.clone());
        }
        let disk = self
            .orderlines_disk
            .as_mut()
            .ok_or_else(|| TpccError::Argument("orderline cold tier not mounted".to_string()))?;
        let handle = self.orderlines.find(key).expect("checked above");
        let mut scratch = None;
        Ok(handle.load(disk, &mut scratch)?.clone())
    }

    // ---- History -----------------------------------------------------------

    pub fn insert_history(&mut self, entry: History) {
        self.history.push(entry);
    }

    pub fn history(&self) -> &[History] {
        &self.history
    }

    // ---- Mounting the cold tiers --------------------------------------------

    /// Trains a compressor per cold table from its (fully resident, at this
    /// point) rows and opens its disk tier. Must run once, after data
    /// generation and before the engine starts taking transactions that may
    /// trigger eviction.
    pub fn mount_cold_tables(&mut self, data_dir: &Path, dict_size: usize, block_size: u32) -> Result<()> {
        std::fs::create_dir_all(data_dir).map_err(|source| TpccError::Io {
            path: data_dir.display().to_string(),
            source,
        })?;

        let stock_rows: Vec<Stock> = self.stock.iter().map(|(_, h)| h.peek().unwrap().clone()).collect();
        let stock_compressor = Compressor::learn("stock", stock_rows.iter(), dict_size)?;
        self.stock_disk = Some(DiskTier::create(
            stock_path(data_dir),
            "stock",
            STOCK_SCHEMA_ID,
            block_size,
            stock_compressor,
        )?);

        let customer_rows: Vec<Customer> =
            self.customers.iter().map(|(_, h)| h.peek().unwrap().clone()).collect();
        let customer_compressor = Compressor::learn("customer", customer_rows.iter(), dict_size)?;
        self.customers_disk = Some(DiskTier::create(
            customer_path(data_dir),
            "customer",
            CUSTOMER_SCHEMA_ID,
            block_size,
            customer_compressor,
        )?);

        let orderline_rows: Vec<OrderLine> =
            self.orderlines.iter().map(|(_, h)| h.peek().unwrap().clone()).collect();
        let orderline_compressor = Compressor::learn("orderline", orderline_rows.iter(), dict_size)?;
        self.orderlines_disk = Some(DiskTier::create(
            orderline_path(data_dir),
            "orderline",
            ORDERLINE_SCHEMA_ID,
            block_size,
            orderline_compressor,
        )?);

        Ok(())
    }

    // ---- Accounting, used by the eviction engine ----------------------------

    pub fn total_resident_bytes(&self) -> u64 {
        self.stats.total_resident_bytes()
    }

    pub fn tree_size_bytes(&self) -> u64 {
        self.warehouses.tree_size()
            + self.districts.tree_size()
            + self.stock.tree_size()
            + self.customers.tree_size()
            + self.orders.tree_size()
            + self.orders_by_customer.tree_size()
            + self.orderlines.tree_size()
    }

    /// The stock index and its disk tier, borrowed disjointly so a caller
    /// (the eviction engine) can evict through one while scanning the other
    /// in the same step.
    pub fn stock_parts(
        &mut self,
    ) -> (&mut BPlusTree<i32, TupleHandle<Stock>>, Option<&mut DiskTier<Stock>>) {
        (&mut self.stock, self.stock_disk.as_mut())
    }

    pub fn customer_parts(
        &mut self,
    ) -> (
        &mut BPlusTree<i64, TupleHandle<Customer>>,
        Option<&mut DiskTier<Customer>>,
    ) {
        (&mut self.customers, self.customers_disk.as_mut())
    }

    pub fn orderline_parts(
        &mut self,
    ) -> (
        &mut BPlusTree<i64, TupleHandle<OrderLine>>,
        Option<&mut DiskTier<OrderLine>>,
    ) {
        (&mut self.orderlines, self.orderlines_disk.as_mut())
    }

    pub fn table_stat(&self, table: &'static str) -> crate::stats::TableStat {
        self.stats.table(table)
    }

    /// Updates the stat block after the eviction engine evicts one row
    /// through [`Store::stock_parts`]/[`Store::customer_parts`]/
    /// [`Store::orderline_parts`] directly.
    pub fn record_eviction(&mut self, table: &'static str, freed_bytes: u64, disk_bytes_after: u64) {
        let stat = self.stats.table_mut(table);
        stat.resident_rows = stat.resident_rows.saturating_sub(1);
        stat.evicted_rows += 1;
        stat.resident_bytes = stat.resident_bytes.saturating_sub(freed_bytes);
        stat.disk_bytes = disk_bytes_after;
    }
}

fn stock_path(data_dir: &Path) -> PathBuf {
    data_dir.join("stock.blitz")
}

fn customer_path(data_dir: &Path) -> PathBuf {
    data_dir.join("customer.blitz")
}

fn orderline_path(data_dir: &Path) -> PathBuf {
    data_dir.join("orderline.blitz")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_customer(w_id: i32, d_id: i32, c_id: i32, last: &str, first: &str) -> Customer {
        Customer {
            c_id,
            c_d_id: d_id,
            c_w_id: w_id,
            c_first: first.to_string(),
            c_middle: "OE".to_string(),
            c_last: last.to_string(),
            c_street_1: "1 Main St".to_string(),
            c_street_2: String::new(),
            c_city: "Springfield".to_string(),
            c_state: "NY".to_string(),
            c_zip: "100001111".to_string(),
            c_phone: "5551234567".to_string(),
            c_since: 0,
            c_credit: "GC".to_string(),
            c_credit_lim: 50000.0,
            c_discount: 0.1,
            c_balance: 0.0,
            c_ytd_payment: 0.0,
            c_payment_cnt: 0,
            c_delivery_cnt: 0,
            c_data: String::new(),
        }
    }

    #[test]
    fn insert_and_find_warehouse_district() {
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
        assert!(store.has_warehouse(1));
        assert!(!store.has_warehouse(2));

        store.insert_district(District {
            d_id: 3,
            d_w_id: 1,
            d_name: "D3".to_string(),
            d_street_1: String::new(),
            d_street_2: String::new(),
            d_city: String::new(),
            d_state: "NY".to_string(),
            d_zip: "100001111".to_string(),
            d_tax: 0.03,
            d_ytd: 0.0,
            d_next_o_id: 3001,
        });
        assert_eq!(store.find_district(1, 3).unwrap().d_next_o_id, 3001);
    }

    #[test]
    fn customer_by_name_tie_break_picks_ceil_half() {
        let mut store = Store::new(8);
        for (i, first) in ["Anna", "Barbara", "Carol", "Diane", "Erin"].iter().enumerate() {
            store.insert_customer(sample_customer(1, 1, i as i32 + 1, "Smith", first));
        }
        // 5 matches -> ceil(5/2) = 3rd in ascending first-name order -> Carol
        let picked = store.find_customer_by_name(1, 1, "Smith").unwrap();
        let customer = store.customer_handle(1, 1, picked).unwrap().peek().unwrap();
        assert_eq!(customer.c_first, "Carol");
    }

    #[test]
    fn neworder_fifo_pops_lowest_o_id_first() {
        let mut store = Store::new(8);
        store.insert_neworder(NewOrder {
            no_o_id: 5,
            no_d_id: 1,
            no_w_id: 1,
        });
        store.insert_neworder(NewOrder {
            no_o_id: 2,
            no_d_id: 1,
            no_w_id: 1,
        });
        let popped = store.pop_earliest_neworder(1, 1).unwrap();
        assert_eq!(popped.no_o_id, 2);
        let popped = store.pop_earliest_neworder(1, 1).unwrap();
        assert_eq!(popped.no_o_id, 5);
        assert!(store.pop_earliest_neworder(1, 1).is_none());
    }

    #[test]
    fn stock_mount_then_evict_then_pin_roundtrips() {
        let mut store = Store::new(8);
        for i in 1..=20 {
            store.insert_stock(Stock {
                s_i_id: i,
                s_w_id: 1,
                s_quantity: 50,
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
                s_data: "data".to_string(),
            });
        }
        let dir = tempfile::tempdir().unwrap();
        store.mount_cold_tables(dir.path(), 4096, 4096).unwrap();

        let tuple_id = stock_key(1, 7).0 as u64;
        let row = store.stock_handle(1, 7).unwrap().peek().unwrap().clone();
        {
            let handle = store.stock.find_mut(stock_key(1, 7).0).unwrap();
            let disk = store.stock_disk.as_mut().unwrap();
            handle.evict(tuple_id, disk).unwrap();
        }
        assert!(store.stock_handle(1, 7).unwrap().is_evicted());

        let pinned = store.pin_stock(1, 7).unwrap();
        assert_eq!(pinned.s_i_id, row.s_i_id);
        assert!(store.stock_handle(1, 7).unwrap().is_resident());
    }
}
