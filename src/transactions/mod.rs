//! The five TPC-C transactions over [`crate::store::Store`].
//!
//! Each function takes the store, its parameters, and `now`; mutating
//! transactions that can roll back also take a flag saying whether to
//! allocate an [`crate::undo::UndoBuffer`]. A transaction never partially
//! commits: either every write lands, or (New-Order's invalid-item path)
//! nothing does.

mod delivery;
mod new_order;
mod order_status;
mod payment;
mod stock_level;

pub use delivery::{deliver, DeliveryResult, DistrictDelivery};
pub use new_order::{new_order, NewOrderLine, NewOrderLineResult, NewOrderOutcome, NewOrderResult};
pub use order_status::{order_status, OrderStatusResult};
pub use payment::{payment, PaymentResult};
pub use stock_level::stock_level;

/// How Payment and Order-Status locate the target customer: directly by id,
/// or by last name with the mandatory ⌈n/2⌉ tie-break resolved in
/// [`crate::store::Store::find_customer_by_name`].
pub enum CustomerSelector<'a> {
    ById(i32),
    ByLastName(&'a str),
}

impl CustomerSelector<'_> {
    /// Resolves to a customer id. The parameter space a driver draws from is
    /// assumed consistent, so a miss here (an unknown id, or a last name with
    /// no match) is a programming fault, not a caller-recoverable error.
    pub(crate) fn resolve(&self, store: &crate::store::Store, w_id: i32, d_id: i32) -> i32 {
        match self {
            CustomerSelector::ById(c_id) => *c_id,
            CustomerSelector::ByLastName(last) => store
                .find_customer_by_name(w_id, d_id, last)
                .unwrap_or_else(|| panic!("no customer named {last} in ({w_id}, {d_id})")),
        }
    }
}
