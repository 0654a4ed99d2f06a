//! The tuple handle: a row that is either resident in RAM or evicted to disk.
//!
//! Every index over a cold table (Stock, Customer, OrderLine) stores one of
//! these per row instead of the row itself, which is what lets the eviction
//! engine shrink memory without touching the index structure. `Resident`
//! holds the row directly; `Evicted` holds only the stable tuple id the disk
//! tier's locator map is keyed on, so the handle stays one pointer wide
//! either way.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::disktier::DiskTier;
use crate::error::Result;

#[derive(Debug)]
pub enum TupleHandle<T> {
    Resident(Box<T>),
    Evicted(u64),
}

impl<T> TupleHandle<T> {
    pub fn resident(row: T) -> Self {
        TupleHandle::Resident(Box::new(row))
    }

    pub fn is_resident(&self) -> bool {
        matches!(self, TupleHandle::Resident(_))
    }

    pub fn is_evicted(&self) -> bool {
        matches!(self, TupleHandle::Evicted(_))
    }

    /// The row, if already resident, without touching the disk tier.
    pub fn peek(&self) -> Option<&T> {
        match self {
            TupleHandle::Resident(row) => Some(row),
            TupleHandle::Evicted(_) => None,
        }
    }

    /// Mutable access to the row, if already resident. Callers that may be
    /// handed an evicted handle should `pin` first.
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        match self {
            TupleHandle::Resident(row) => Some(row),
            TupleHandle::Evicted(_) => None,
        }
    }
}

impl<T: Serialize + DeserializeOwned> TupleHandle<T> {
    /// Returns a borrowed row reference. If the handle is evicted,
    /// materializes it into `scratch` first; the reference is valid until
    /// the next `load` call reusing the same `scratch`.
    pub fn load<'a>(
        &'a self,
        disk: &mut DiskTier<T>,
        scratch: &'a mut Option<T>,
    ) -> Result<&'a T> {
        match self {
            TupleHandle::Resident(row) => Ok(row),
            TupleHandle::Evicted(tuple_id) => {
                *scratch = Some(disk.materialize(*tuple_id)?);
                Ok(scratch.as_ref().expect("just assigned"))
            }
        }
    }

    /// Promotes the handle to resident, decompressing from disk if needed,
    /// and returns a mutable reference. Writes always go through `pin` first:
    /// there is no write path for an evicted tuple.
    pub fn pin(&mut self, disk: &mut DiskTier<T>) -> Result<&mut T> {
        if let TupleHandle::Evicted(tuple_id) = self {
            let row = disk.materialize(*tuple_id)?;
            *self = TupleHandle::Resident(Box::new(row));
        }
        match self {
            TupleHandle::Resident(row) => Ok(row),
            TupleHandle::Evicted(_) => unreachable!("just promoted above"),
        }
    }

    /// Serializes the resident row through `disk` under `tuple_id` and flips
    /// the handle to evicted, dropping the resident buffer. A no-op if the
    /// handle is already evicted.
    pub fn evict(&mut self, tuple_id: u64, disk: &mut DiskTier<T>) -> Result<()> {
        if let TupleHandle::Resident(row) = self {
            disk.evict(tuple_id, row)?;
            *self = TupleHandle::Evicted(tuple_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compressor::Compressor;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        payload: String,
    }

    fn disk_tier(table: &'static str) -> DiskTier<Row> {
        let dir = tempfile::tempdir().unwrap();
        // leak the tempdir so the file outlives this helper; fine in tests.
        let path = dir.into_path().join(format!("{table}.blitz"));
        let compressor: Compressor<Row> = Compressor::learn(table, std::iter::empty(), 4096).unwrap();
        DiskTier::create(path, table, 1, 4096, compressor).unwrap()
    }

    #[test]
    fn resident_load_never_touches_disk() {
        let mut disk = disk_tier("stock");
        let handle = TupleHandle::resident(Row {
            id: 1,
            payload: "hot".to_string(),
        });
        let mut scratch = None;
        let loaded = handle.load(&mut disk, &mut scratch).unwrap();
        assert_eq!(loaded.payload, "hot");
        assert!(scratch.is_none());
    }

    #[test]
    fn evict_then_load_materializes_from_disk() {
        let mut disk = disk_tier("customer");
        let mut handle = TupleHandle::resident(Row {
            id: 7,
            payload: "cold".to_string(),
        });
        handle.evict(7, &mut disk).unwrap();
        assert!(handle.is_evicted());

        let mut scratch = None;
        let loaded = handle.load(&mut disk, &mut scratch).unwrap();
        assert_eq!(loaded.payload, "cold");
    }

    #[test]
    fn pin_promotes_evicted_handle_for_writes() {
        let mut disk = disk_tier("orderline");
        let mut handle = TupleHandle::resident(Row {
            id: 3,
            payload: "before".to_string(),
        });
        handle.evict(3, &mut disk).unwrap();

        let row = handle.pin(&mut disk).unwrap();
        row.payload = "after".to_string();
        assert!(handle.is_resident());
        assert_eq!(handle.peek().unwrap().payload, "after");
    }
}
