//! A TPC-C benchmark engine with hybrid hot/disk storage for its three
//! largest tables.
//!
//! [`store::Store`] holds every table behind ordered [`btree::BPlusTree`]
//! indexes. Stock, Customer, and OrderLine are *cold*: their indexes hold
//! [`tuple::TupleHandle`]s rather than rows, so a row can be serialized
//! through a [`compressor::Compressor`] and pushed to a [`disktier::DiskTier`]
//! block file by [`eviction::EvictionEngine`] once the engine's memory
//! budget is exceeded, and transparently re-materialized on the next read.
//! [`transactions`] implements the five TPC-C operations over the store,
//! with [`undo::UndoBuffer`] backing the ones that can roll back.

pub mod btree;
pub mod compressor;
pub mod config;
pub mod csvexport;
pub mod disktier;
pub mod driver;
pub mod error;
pub mod eviction;
pub mod keycodec;
pub mod logging;
pub mod model;
pub mod stats;
pub mod store;
pub mod transactions;
pub mod tuple;
pub mod undo;

pub use error::{Result, TpccError};
pub use store::Store;
