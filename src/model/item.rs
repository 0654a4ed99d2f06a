use serde::{Deserialize, Serialize};

/// A catalog item. Items are immutable and never evicted: there are only
/// `NUM_ITEMS` of them and every warehouse's stock table references all of
/// them, so they stay resident for the life of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub i_id: i32,
    pub i_im_id: i32,
    pub i_name: String,
    pub i_price: f64,
    pub i_data: String,
}
