//! CSV dumps of the cold tables plus history, for `mode=1`.
//!
//! One row per line, fields in schema-declaration order, no header, strings
//! unquoted (matching whatever the source value contains) — this is an
//! export for external analysis tools, not a format the engine reads back.

use std::path::Path;

use csv::WriterBuilder;

use crate::error::{Result, TpccError};
use crate::store::Store;

fn open_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    let file = std::fs::File::create(path).map_err(|source| TpccError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(WriterBuilder::new().has_headers(false).from_writer(file))
}

fn map_csv_err(path: &Path, err: csv::Error) -> TpccError {
    TpccError::Io {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, err),
    }
}

/// Dumps orderline, stock, customer, and history to `<dir>/{table}.csv`.
/// Stock and customer rows are read without promoting evicted handles —
/// an export should not perturb the engine's eviction state.
pub fn export_all(store: &mut Store, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| TpccError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    export_stock(store, &dir.join("stock.csv"))?;
    export_customer(store, &dir.join("customer.csv"))?;
    export_orderline(store, &dir.join("orderline.csv"))?;
    export_history(store, &dir.join("history.csv"))?;
    Ok(())
}

fn export_stock(store: &mut Store, path: &Path) -> Result<()> {
    let mut writer = open_writer(path)?;
    let keys: Vec<i32> = store.stock_keys();
    for key in keys {
        let row = store.stock_row_for_export(key)?;
        writer
            .write_record([
                row.s_w_id.to_string(),
                row.s_i_id.to_string(),
                row.s_quantity.to_string(),
                row.s_ytd.to_string(),
                row.s_order_cnt.to_string(),
                row.s_remote_cnt.to_string(),
                row.s_data,
            ])
            .map_err(|e| map_csv_err(path, e))?;
    }
    writer.flush().map_err(|source| TpccError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn export_customer(store: &mut Store, path: &Path) -> Result<()> {
    let mut writer = open_writer(path)?;
    let keys: Vec<i64> = store.customer_keys();
    for key in keys {
        let row = store.customer_row_for_export(key)?;
        writer
            .write_record([
                row.c_w_id.to_string(),
                row.c_d_id.to_string(),
                row.c_id.to_string(),
                row.c_last.clone(),
                row.c_first.clone(),
                row.c_credit.clone(),
                row.c_balance.to_string(),
                row.c_ytd_payment.to_string(),
                row.c_payment_cnt.to_string(),
                row.c_delivery_cnt.to_string(),
            ])
            .map_err(|e| map_csv_err(path, e))?;
    }
    writer.flush().map_err(|source| TpccError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn export_orderline(store: &mut Store, path: &Path) -> Result<()> {
    let mut writer = open_writer(path)?;
    let keys: Vec<i64> = store.orderline_keys();
    for key in keys {
        let row = store.orderline_row_for_export(key)?;
        writer
            .write_record([
                row.ol_w_id.to_string(),
                row.ol_d_id.to_string(),
                row.ol_o_id.to_string(),
                row.ol_number.to_string(),
                row.ol_i_id.to_string(),
                row.ol_supply_w_id.to_string(),
                row.ol_delivery_d.map(|d| d.to_string()).unwrap_or_default(),
                row.ol_quantity.to_string(),
                row.ol_amount.to_string(),
                row.ol_dist_info.clone(),
            ])
            .map_err(|e| map_csv_err(path, e))?;
    }
    writer.flush().map_err(|source| TpccError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn export_history(store: &Store, path: &Path) -> Result<()> {
    let mut writer = open_writer(path)?;
    for row in store.history() {
        writer
            .write_record([
                row.h_w_id.to_string(),
                row.h_d_id.to_string(),
                row.h_c_w_id.to_string(),
                row.h_c_d_id.to_string(),
                row.h_c_id.to_string(),
                row.h_date.to_string(),
                row.h_amount.to_string(),
                row.h_data.clone(),
            ])
            .map_err(|e| map_csv_err(path, e))?;
    }
    writer.flush().map_err(|source| TpccError::Io {
        path: path.display().to_string(),
        source,
    })
}
