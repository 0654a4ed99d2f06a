use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub ol_o_id: i32,
    pub ol_d_id: i32,
    pub ol_w_id: i32,
    pub ol_number: i32,
    pub ol_i_id: i32,
    pub ol_supply_w_id: i32,
    /// Set by Delivery; `None` until the order ships.
    pub ol_delivery_d: Option<i64>,
    pub ol_quantity: i32,
    pub ol_amount: f64,
    pub ol_dist_info: String,
}
