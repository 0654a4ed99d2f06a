//! Concrete row types for every table in the benchmark schema.
//!
//! Each struct is exactly the attribute list from the relational schema: no
//! generic `Value` wrapper, no schema-at-runtime machinery. Rows are plain
//! data; everything that knows how to store, index or evict them lives in
//! `crate::store` and `crate::tuple`.

mod customer;
mod district;
mod history;
mod item;
mod neworder;
mod order;
mod orderline;
mod stock;
mod warehouse;

pub use customer::Customer;
pub use district::District;
pub use history::History;
pub use item::Item;
pub use neworder::NewOrder;
pub use order::Order;
pub use orderline::OrderLine;
pub use stock::Stock;
pub use warehouse::Warehouse;
