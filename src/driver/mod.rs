//! The workload driver: deterministic data generation and a transaction
//! mix client. Depends on the core's public API; the core never depends
//! on this module.

mod client;
mod generator;
mod random;

pub use client::{Client, TransactionKind};
pub use generator::{generate, GeneratorConfig, INVALID_ITEM_ID, NUM_ITEMS};
