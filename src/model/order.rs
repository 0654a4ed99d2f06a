use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub o_id: i32,
    pub o_d_id: i32,
    pub o_w_id: i32,
    pub o_c_id: i32,
    /// Seconds since epoch.
    pub o_entry_d: i64,
    /// 0 until Delivery assigns a real carrier.
    pub o_carrier_id: i32,
    pub o_ol_cnt: i32,
    pub o_all_local: bool,
}

impl Order {
    pub fn is_delivered(&self) -> bool {
        self.o_carrier_id != 0
    }
}
