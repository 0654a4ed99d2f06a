//! The disk tier's compressor/decompressor pair.
//!
//! Treated by the rest of the engine as an opaque collaborator: constructed
//! from a schema (implicitly, via `T`) and a configuration, `learn` trains on
//! a first pass over sampled rows, and `compress`/`decompress` must be
//! inverses for every row seen during training (and, empirically, for rows
//! like them). The "model" is a `zstd` dictionary trained with
//! [`zstd::dict::from_continuous`] over a `bincode`-encoded sample stream —
//! later rows in the same table compress far better against that dictionary
//! than they would against an untrained stream, which is the property the
//! eviction engine relies on to keep disk usage low.
//!
//! Neither `Compressor` nor its internal `zstd` contexts are `Sync`; a store
//! owns one instance per cold table and never shares it across threads.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, TpccError};

/// Default compression level. Not exposed as a knob: the spec treats the
/// compressor as opaque, and TPC-C row payloads are small enough that level
/// tuning buys little.
const ZSTD_LEVEL: i32 = 3;

/// Trains and applies a per-table compression model over rows of type `T`.
pub struct Compressor<T> {
    table: &'static str,
    dictionary: Vec<u8>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Compressor<T> {
    /// Trains a dictionary over `samples`, then returns a compressor ready to
    /// `compress`/`decompress` rows of this table. `dict_size` bounds the
    /// trained dictionary in bytes.
    pub fn learn<'a, I>(table: &'static str, samples: I, dict_size: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut buffer = Vec::new();
        let mut sample_sizes = Vec::new();
        for row in samples {
            let encoded = bincode::serialize(row)?;
            sample_sizes.push(encoded.len());
            buffer.extend_from_slice(&encoded);
        }

        if sample_sizes.is_empty() {
            // Nothing to train on: fall back to an empty dictionary, which
            // degrades to plain zstd compression rather than failing mount.
            return Ok(Self {
                table,
                dictionary: Vec::new(),
                _marker: PhantomData,
            });
        }

        let dictionary = zstd::dict::from_continuous(&buffer, &sample_sizes, dict_size)
            .map_err(|source| TpccError::Io {
                path: format!("<{table} dictionary training>"),
                source,
            })?;

        Ok(Self {
            table,
            dictionary,
            _marker: PhantomData,
        })
    }

    /// Encodes `row` to bytes suitable for appending to a block file.
    pub fn compress(&self, row: &T) -> Result<Vec<u8>> {
        let encoded = bincode::serialize(row)?;
        let mut compressor = self.zstd_compressor()?;
        compressor
            .compress(&encoded)
            .map_err(|source| self.io_error(source))
    }

    /// Inverse of [`Compressor::compress`]. `original_len` is the length of
    /// the bincode-encoded row before compression, recorded alongside the
    /// locator at compress time.
    pub fn decompress(&self, bytes: &[u8], original_len: usize) -> Result<T> {
        let mut decompressor = self.zstd_decompressor()?;
        let decoded = decompressor
            .decompress(bytes, original_len)
            .map_err(|source| self.io_error(source))?;
        let row = bincode::deserialize(&decoded)?;
        Ok(row)
    }

    fn zstd_compressor(&self) -> Result<zstd::bulk::Compressor<'_>> {
        zstd::bulk::Compressor::with_dictionary(ZSTD_LEVEL, &self.dictionary)
            .map_err(|source| self.io_error(source))
    }

    fn zstd_decompressor(&self) -> Result<zstd::bulk::Decompressor<'_>> {
        zstd::bulk::Decompressor::with_dictionary(&self.dictionary)
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> TpccError {
        TpccError::Io {
            path: format!("<{} compressor>", self.table),
            source,
        }
    }
}
