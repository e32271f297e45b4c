use crate::domain::model::CellValue;
use serde::{Deserialize, Serialize};

pub const HANDLE: &str = "Handle";
pub const TITLE: &str = "Title";
pub const VENDOR: &str = "Vendor";
pub const PUBLISHED: &str = "Published";
pub const BODY_HTML: &str = "Body (HTML)";
pub const TAGS: &str = "Tags";
pub const IMAGE_SRC: &str = "Image Src";
pub const VARIANT_IMAGE: &str = "Variant Image";
pub const IMAGE_POSITION: &str = "Image Position";
pub const OPTION1_NAME: &str = "Option1 Name";
pub const OPTION1_VALUE: &str = "Option1 Value";
pub const VARIANT_SKU: &str = "Variant SKU";
pub const VARIANT_PRICE: &str = "Variant Price";
pub const VARIANT_GRAMS: &str = "Variant Grams";
pub const VARIANT_INVENTORY_QTY: &str = "Variant Inventory Qty";
pub const VARIANT_REQUIRES_SHIPPING: &str = "Variant Requires Shipping";
pub const VARIANT_TAXABLE: &str = "Variant Taxable";
pub const GIFT_CARD: &str = "Gift Card";

// 不在輸出表頭內，但重新整理模式的預設值表會補上
pub const VARIANT_INVENTORY_POLICY: &str = "Variant Inventory Policy";
pub const VARIANT_FULFILLMENT_SERVICE: &str = "Variant Fulfillment Service";

/// 輸出表頭，順序固定
pub const OUTPUT_HEADERS: [&str; 18] = [
    HANDLE,
    TITLE,
    VENDOR,
    PUBLISHED,
    BODY_HTML,
    TAGS,
    IMAGE_SRC,
    VARIANT_IMAGE,
    IMAGE_POSITION,
    OPTION1_NAME,
    OPTION1_VALUE,
    VARIANT_SKU,
    VARIANT_PRICE,
    VARIANT_GRAMS,
    VARIANT_INVENTORY_QTY,
    VARIANT_REQUIRES_SHIPPING,
    VARIANT_TAXABLE,
    GIFT_CARD,
];

/// 各欄位的預設值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDefaults {
    pub vendor: String,
    pub published: bool,
    pub option1_name: String,
    pub extracted_option1_name: String,
    pub option1_value: String,
    pub variant_grams: i64,
    pub variant_inventory_qty: i64,
    pub variant_price: f64,
    pub variant_requires_shipping: bool,
    pub variant_taxable: bool,
    pub gift_card: bool,
    pub variant_inventory_policy: String,
    pub variant_fulfillment_service: String,
    pub body_html: String,
    pub tags: String,
}

impl Default for ColumnDefaults {
    fn default() -> Self {
        Self {
            vendor: "Default Vendor".to_string(),
            published: true,
            option1_name: "Size".to_string(),
            extracted_option1_name: "Color".to_string(),
            option1_value: "Default Title".to_string(),
            variant_grams: 0,
            variant_inventory_qty: 0,
            variant_price: 0.0,
            variant_requires_shipping: true,
            variant_taxable: true,
            gift_card: false,
            variant_inventory_policy: "deny".to_string(),
            variant_fulfillment_service: "manual".to_string(),
            body_html: String::new(),
            tags: String::new(),
        }
    }
}

impl ColumnDefaults {
    /// 預設值表涵蓋的欄位
    pub const COLUMNS: [&'static str; 14] = [
        VENDOR,
        PUBLISHED,
        OPTION1_NAME,
        OPTION1_VALUE,
        VARIANT_GRAMS,
        VARIANT_INVENTORY_POLICY,
        VARIANT_FULFILLMENT_SERVICE,
        VARIANT_INVENTORY_QTY,
        VARIANT_PRICE,
        VARIANT_REQUIRES_SHIPPING,
        VARIANT_TAXABLE,
        GIFT_CARD,
        BODY_HTML,
        TAGS,
    ];

    pub fn value_for(&self, column: &str) -> Option<CellValue> {
        let value = match column {
            VENDOR => CellValue::text(self.vendor.as_str()),
            PUBLISHED => CellValue::Flag(self.published),
            OPTION1_NAME => CellValue::text(self.option1_name.as_str()),
            OPTION1_VALUE => CellValue::text(self.option1_value.as_str()),
            VARIANT_GRAMS => CellValue::Integer(self.variant_grams),
            VARIANT_INVENTORY_POLICY => CellValue::text(self.variant_inventory_policy.as_str()),
            VARIANT_FULFILLMENT_SERVICE => {
                CellValue::text(self.variant_fulfillment_service.as_str())
            }
            VARIANT_INVENTORY_QTY => CellValue::Integer(self.variant_inventory_qty),
            VARIANT_PRICE => CellValue::Decimal(self.variant_price),
            VARIANT_REQUIRES_SHIPPING => CellValue::Flag(self.variant_requires_shipping),
            VARIANT_TAXABLE => CellValue::Flag(self.variant_taxable),
            GIFT_CARD => CellValue::Flag(self.gift_card),
            BODY_HTML => CellValue::text(self.body_html.as_str()),
            TAGS => CellValue::text(self.tags.as_str()),
            _ => return None,
        };
        Some(value)
    }
}
