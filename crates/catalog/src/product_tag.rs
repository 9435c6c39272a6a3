use serde::{Deserialize, Serialize};

use larder_core::{ProductId, TagId};

/// A product-to-tag association. Pure join row, no timestamps.
///
/// Orders by product then tag, which is the listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductTag {
    pub product_id: ProductId,
    pub tag_id: TagId,
}

/// Attach input; the product comes from the route path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProductTag {
    pub tag_id: TagId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_input_is_tag_id_only() {
        let parsed: NewProductTag =
            serde_json::from_value(serde_json::json!({"tag_id": 7})).unwrap();
        assert_eq!(parsed.tag_id.as_i64(), 7);
    }
}
