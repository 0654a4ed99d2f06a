//! Append-only block files backing the disk tier of a cold table.
//!
//! Each cold table owns one file. The file opens with a small fixed header
//! (magic, schema id, block size) and is then a sequence of length-prefixed
//! compressed blocks, one per evicted row, each preceded by the bincode
//! length the row had before compression (needed by `zstd`'s bulk decompressor,
//! which wants a destination capacity up front). A [`Locator`] records a
//! row's block offset plus both lengths; it is all a resident handle needs to
//! flip to evicted.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::compressor::Compressor;
use crate::error::{Result, TpccError};

const MAGIC: [u8; 4] = *b"TPCB";
const HEADER_LEN: u64 = 4 + 4 + 4; // magic + schema_id + block_size

/// A stable pointer to one compressed row inside a table's block file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Locator {
    offset: u64,
    compressed_len: u32,
    original_len: u32,
}

/// The on-disk half of a cold table: a block file, the compressor used to
/// read and write it, and the tuple-id → locator map the decompressor needs
/// to find a row again. A tuple handle only ever carries the tuple id; this
/// map is where the rest of the addressing detail lives.
pub struct DiskTier<T> {
    table: &'static str,
    path: PathBuf,
    file: File,
    compressor: Compressor<T>,
    next_offset: u64,
    locators: HashMap<u64, Locator>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> DiskTier<T> {
    /// Creates a fresh block file at `path`, writing the header and mounting
    /// `compressor` for subsequent evictions.
    pub fn create(
        path: impl AsRef<Path>,
        table: &'static str,
        schema_id: u32,
        block_size: u32,
        compressor: Compressor<T>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| io_err(&path, source))?;

        file.write_all(&MAGIC).map_err(|source| io_err(&path, source))?;
        file.write_all(&schema_id.to_le_bytes())
            .map_err(|source| io_err(&path, source))?;
        file.write_all(&block_size.to_le_bytes())
            .map_err(|source| io_err(&path, source))?;

        Ok(Self {
            table,
            path,
            file,
            compressor,
            next_offset: HEADER_LEN,
            locators: HashMap::new(),
            _marker: PhantomData,
        })
    }

    /// Opens an existing block file, verifying its header matches what the
    /// caller expects before handing back a tier positioned for further
    /// appends.
    pub fn open(
        path: impl AsRef<Path>,
        table: &'static str,
        expected_schema_id: u32,
        compressor: Compressor<T>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| io_err(&path, source))?;

        let mut header = [0u8; HEADER_LEN as usize];
        file.read_exact(&mut header)
            .map_err(|source| io_err(&path, source))?;
        if header[0..4] != MAGIC {
            return Err(TpccError::CorruptBlock {
                table: table.to_string(),
                reason: "bad magic in block file header".to_string(),
            });
        }
        let schema_id = u32::from_le_bytes(header[4..8].try_into().unwrap());
        if schema_id != expected_schema_id {
            return Err(TpccError::CorruptBlock {
                table: table.to_string(),
                reason: format!(
                    "schema id mismatch: file has {schema_id}, expected {expected_schema_id}"
                ),
            });
        }

        let next_offset = file
            .seek(SeekFrom::End(0))
            .map_err(|source| io_err(&path, source))?;

        Ok(Self {
            table,
            path,
            file,
            compressor,
            next_offset,
            locators: HashMap::new(),
            _marker: PhantomData,
        })
    }

    /// Compresses `row` through the mounted compressor, appends it, and
    /// records `tuple_id`'s locator. The caller flips its handle to evicted
    /// and forgets the resident row; `tuple_id` is the only thing it needs
    /// to keep to materialize it again.
    pub fn evict(&mut self, tuple_id: u64, row: &T) -> Result<()> {
        let original_len = bincode::serialize(row)?.len() as u32;
        let compressed = self.compressor.compress(row)?;
        let compressed_len = compressed.len() as u32;

        let offset = self.next_offset;
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|source| self.io_err(source))?;
        self.file
            .write_all(&(compressed_len).to_le_bytes())
            .map_err(|source| self.io_err(source))?;
        self.file
            .write_all(&original_len.to_le_bytes())
            .map_err(|source| self.io_err(source))?;
        self.file
            .write_all(&compressed)
            .map_err(|source| self.io_err(source))?;

        self.next_offset = offset + 8 + compressed_len as u64;
        self.locators.insert(
            tuple_id,
            Locator {
                offset,
                compressed_len,
                original_len,
            },
        );
        Ok(())
    }

    /// Reconstructs the row stored under `tuple_id`.
    pub fn materialize(&mut self, tuple_id: u64) -> Result<T> {
        let locator = *self.locators.get(&tuple_id).ok_or_else(|| TpccError::CorruptBlock {
            table: self.table.to_string(),
            reason: format!("no locator recorded for tuple id {tuple_id}"),
        })?;
        self.file
            .seek(SeekFrom::Start(locator.offset + 8))
            .map_err(|source| self.io_err(source))?;
        let mut buf = vec![0u8; locator.compressed_len as usize];
        self.file
            .read_exact(&mut buf)
            .map_err(|source| self.io_err(source))?;
        self.compressor.decompress(&buf, locator.original_len as usize)
    }

    pub fn is_evicted(&self, tuple_id: u64) -> bool {
        self.locators.contains_key(&tuple_id)
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Bytes written to the block file so far, for the stat block's disk
    /// byte counters.
    pub fn disk_bytes(&self) -> u64 {
        self.next_offset.saturating_sub(HEADER_LEN)
    }

    fn io_err(&self, source: std::io::Error) -> TpccError {
        io_err(&self.path, source)
    }
}

fn io_err(path: &Path, source: std::io::Error) -> TpccError {
    TpccError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        payload: String,
    }

    fn rows(n: i64) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                id: i,
                payload: format!("payload-{i}-{}", "z".repeat(20)),
            })
            .collect()
    }

    #[test]
    fn evict_then_materialize_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.blitz");
        let training = rows(50);
        let compressor = Compressor::learn("stock", training.iter(), 4096).unwrap();
        let mut tier = DiskTier::create(&path, "stock", 42, 4096, compressor).unwrap();

        for (tuple_id, row) in training.iter().enumerate() {
            tier.evict(tuple_id as u64, row).unwrap();
        }
        for (tuple_id, row) in training.iter().enumerate() {
            let materialized = tier.materialize(tuple_id as u64).unwrap();
            assert_eq!(&materialized, row);
        }
    }

    #[test]
    fn reopen_rejects_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer.blitz");
        let compressor: Compressor<Row> = Compressor::learn("customer", std::iter::empty(), 4096).unwrap();
        DiskTier::create(&path, "customer", 7, 4096, compressor).unwrap();

        let reopen_compressor: Compressor<Row> =
            Compressor::learn("customer", std::iter::empty(), 4096).unwrap();
        let result = DiskTier::<Row>::open(&path, "customer", 8, reopen_compressor);
        assert!(matches!(result, Err(TpccError::CorruptBlock { .. })));
    }

    #[test]
    fn disk_bytes_grows_with_evictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orderline.blitz");
        let training = rows(20);
        let compressor = Compressor::learn("orderline", training.iter(), 4096).unwrap();
        let mut tier = DiskTier::create(&path, "orderline", 1, 4096, compressor).unwrap();
        assert_eq!(tier.disk_bytes(), 0);
        tier.evict(0, &training[0]).unwrap();
        assert!(tier.disk_bytes() > 0);
        assert!(tier.is_evicted(0));
        assert!(!tier.is_evicted(1));
    }
}
