//! Error types for the TPC-C storage and transaction engine

use thiserror::Error;

/// Errors that can escape the core engine.
///
/// Recoverable, expected-in-normal-operation outcomes (the New-Order invalid-item
/// rollback, a Delivery district with no pending NewOrder) are *not* represented
/// here — they are ordinary return values. This enum is for the failures the spec
/// calls fatal: argument errors, I/O failures on the block files, and compressor
/// contract violations.
#[derive(Error, Debug)]
pub enum TpccError {
    #[error("argument error: {0}")]
    Argument(String),

    #[error("I/O failure on block file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compressor contract violation on table {table}: {reason}")]
    CorruptBlock { table: String, reason: String },

    #[error("serialization failure: {0}")]
    Encoding(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, TpccError>;
