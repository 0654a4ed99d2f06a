use serde::{Deserialize, Serialize};

/// A pending-delivery marker. Shares the Order primary key; removed the
/// moment Delivery processes its order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub no_o_id: i32,
    pub no_d_id: i32,
    pub no_w_id: i32,
}
