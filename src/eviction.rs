//! Memory-budgeted eviction over the three cold tables.
//!
//! Runs after every mutation that can grow resident memory. While the
//! store's resident footprint exceeds the configured budget, picks a
//! victim in round-robin order across {Stock, Customer, OrderLine} and,
//! within a table, the next resident row at or after the last key evicted
//! from it — a deterministic policy, not a recency heuristic, which keeps
//! eviction order reproducible across runs with the same workload.
//!
//! The tuple handle is the identity every secondary index points at, so
//! eviction never touches an index: it serializes the row through the
//! table's compressor, flips the handle in place, and the row is gone from
//! RAM without anyone else needing to know.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::store::Store;

const TABLE_COUNT: usize = 3;
const TABLE_NAMES: [&str; TABLE_COUNT] = ["stock", "customer", "orderline"];

pub struct EvictionEngine {
    memory_budget: u64,
    cursor: usize,
    last_key: [i64; TABLE_COUNT],
}

impl EvictionEngine {
    pub fn new(memory_budget: u64) -> Self {
        Self {
            memory_budget,
            cursor: 0,
            last_key: [0; TABLE_COUNT],
        }
    }

    /// Evicts victims until the store's resident footprint is at or below
    /// budget, or until no table has any resident row left to evict.
    /// Returns the number of rows evicted.
    #[instrument(skip(self, store), fields(budget = self.memory_budget))]
    pub fn run(&mut self, store: &mut Store) -> Result<u32> {
        let mut evicted = 0;
        let mut empty_tables_in_a_row = 0;
        while store.total_resident_bytes() > self.memory_budget {
            if empty_tables_in_a_row >= TABLE_COUNT {
                debug!("no resident rows left in any cold table; stopping short of budget");
                break;
            }
            let did_evict = self.evict_next(store)?;
            self.cursor = (self.cursor + 1) % TABLE_COUNT;
            if did_evict {
                evicted += 1;
                empty_tables_in_a_row = 0;
            } else {
                empty_tables_in_a_row += 1;
            }
        }
        Ok(evicted)
    }

    fn evict_next(&mut self, store: &mut Store) -> Result<bool> {
        match self.cursor {
            0 => evict_one(store, &mut self.last_key[0], Table::Stock),
            1 => evict_one(store, &mut self.last_key[1], Table::Customer),
            _ => evict_one(store, &mut self.last_key[2], Table::OrderLine),
        }
    }
}

enum Table {
    Stock,
    Customer,
    OrderLine,
}

fn evict_one(store: &mut Store, last_key: &mut i64, table: Table) -> Result<bool> {
    match table {
        Table::Stock => evict_one_typed(store, last_key, TABLE_NAMES[0], Store::stock_parts),
        Table::Customer => evict_one_typed(store, last_key, TABLE_NAMES[1], Store::customer_parts),
        Table::OrderLine => evict_one_typed(store, last_key, TABLE_NAMES[2], Store::orderline_parts),
    }
}

/// Generic over the two differently-keyed cold tables (`i32` for Stock,
/// `i64` for Customer/OrderLine): `parts` borrows the table's index and
/// disk tier disjointly off `store` so we can scan one while writing the
/// other in the same call.
fn evict_one_typed<K, T, F>(store: &mut Store, last_key: &mut i64, table_name: &'static str, parts: F) -> Result<bool>
where
    K: Ord + Copy + Into<i64> + TryFrom<i64>,
    T: Serialize + DeserializeOwned + Clone,
    F: for<'a> Fn(
        &'a mut Store,
    ) -> (
        &'a mut crate::btree::BPlusTree<K, crate::tuple::TupleHandle<T>>,
        Option<&'a mut crate::disktier::DiskTier<T>>,
    ),
{
    let (tree, disk) = parts(store);
    let Some(disk) = disk else {
        return Ok(false);
    };

    let resume_from = match K::try_from(last_key.wrapping_add(1)) {
        Ok(k) => k,
        Err(_) => return Ok(false),
    };
    let victim_key = tree
        .lower_bound(resume_from)
        .find(|(_, handle)| handle.is_resident())
        .map(|(k, _)| k)
        .or_else(|| tree.iter().find(|(_, handle)| handle.is_resident()).map(|(k, _)| k));

    let Some(key) = victim_key else {
        return Ok(false);
    };

    let handle = tree.find_mut(key).expect("key just read from the same tree");
    let row = handle.peek().expect("victim selected for residency").clone();
    let freed_bytes = bincode::serialize(&row).map(|b| b.len() as u64).unwrap_or(0);
    let tuple_id: i64 = key.into();
    handle.evict(tuple_id as u64, disk)?;
    let disk_bytes_after = disk.disk_bytes();

    store.record_eviction(table_name, freed_bytes, disk_bytes_after);
    *last_key = tuple_id;
    debug!(table = table_name, key = tuple_id, freed_bytes, "evicted tuple");
    Ok(true)
}
