use crate::domain::model::{CanonicalProduct, SourceRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 管線關心的標準欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ProductId,
    ProductName,
    Description,
    Caution,
    Material,
    Color,
    Size,
    Fit,
    Vendor,
    MainImage,
    ThumbnailImages,
    Price,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::ProductId,
        Field::ProductName,
        Field::Description,
        Field::Caution,
        Field::Material,
        Field::Color,
        Field::Size,
        Field::Fit,
        Field::Vendor,
        Field::MainImage,
        Field::ThumbnailImages,
        Field::Price,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ProductId => "product_id",
            Field::ProductName => "product_name",
            Field::Description => "description",
            Field::Caution => "caution",
            Field::Material => "material",
            Field::Color => "color",
            Field::Size => "size",
            Field::Fit => "fit",
            Field::Vendor => "vendor",
            Field::MainImage => "main_image",
            Field::ThumbnailImages => "thumbnail_images",
            Field::Price => "price",
        }
    }

    /// 內建別名，依優先順序排列（先符合者勝出）
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::ProductId => &[
                "product_id",
                "productId",
                "productID",
                "ProductID",
                "Product ID",
                "id",
                "ID",
                "sku",
                "SKU",
                "style_no",
                "styleNo",
                "Style No",
                "Variant SKU",
            ],
            Field::ProductName => &[
                "product_name",
                "productName",
                "Product Name",
                "name",
                "Name",
                "title",
                "Title",
            ],
            Field::Description => &[
                "description",
                "Description",
                "product_description",
                "desc",
                "details",
            ],
            Field::Caution => &["caution", "Caution", "care", "careInstructions", "warning"],
            Field::Material => &["material", "Material", "fabric", "composition"],
            Field::Color => &["color", "Color", "colour", "Colour"],
            Field::Size => &["size", "Size", "sizes"],
            Field::Fit => &["fitLevel", "fit_level", "fit", "Fit"],
            Field::Vendor => &[
                "brandName",
                "brand_name",
                "brand",
                "Brand",
                "vendor",
                "Vendor",
            ],
            Field::MainImage => &[
                "mainImage",
                "main_image",
                "image",
                "imageUrl",
                "image_url",
                "Image Src",
            ],
            Field::ThumbnailImages => &[
                "thumbnailImages",
                "thumbnail_images",
                "thumbnails",
                "images",
                "additional_images",
            ],
            Field::Price => &["price", "Price", "variant_price", "Variant Price", "salePrice"],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown canonical field: {}", s))
    }
}

static LIST_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,|]+").unwrap());

/// 以別名表將任意欄位名稱對應到標準欄位
#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    extra_aliases: HashMap<Field, Vec<String>>,
}

impl ColumnResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 額外別名會在內建別名之前比對
    pub fn with_extra_aliases(mut self, extra: HashMap<Field, Vec<String>>) -> Self {
        self.extra_aliases = extra;
        self
    }

    fn candidates(&self, field: Field) -> impl Iterator<Item = &str> {
        self.extra_aliases
            .get(&field)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .chain(field.aliases().iter().copied())
    }

    /// 第一個「存在且去除空白後非空」的別名值；全部落空時回傳 None
    pub fn resolve(&self, record: &SourceRecord, field: Field) -> Option<String> {
        self.candidates(field).find_map(|key| {
            record
                .data
                .get(key)
                .and_then(coerce_to_string)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
    }

    /// 清單欄位：JSON 陣列逐項取值，字串則依逗號、直線或空白切開
    pub fn resolve_list(&self, record: &SourceRecord, field: Field) -> Vec<String> {
        for key in self.candidates(field) {
            let items: Vec<String> = match record.data.get(key) {
                Some(Value::Array(values)) => values
                    .iter()
                    .filter_map(coerce_to_string)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                Some(Value::String(s)) => LIST_SEPARATOR
                    .split(s)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            if !items.is_empty() {
                return items;
            }
        }
        Vec::new()
    }

    /// 解析整筆商品；沒有商品編號時回傳 None
    pub fn resolve_product(&self, record: &SourceRecord) -> Option<CanonicalProduct> {
        let id = self.resolve(record, Field::ProductId)?;
        Some(self.resolve_product_with_id(record, id))
    }

    /// 不要求商品編號的版本，缺編號時 id 為空字串
    pub fn resolve_product_keyless(&self, record: &SourceRecord) -> CanonicalProduct {
        let id = self.resolve(record, Field::ProductId).unwrap_or_default();
        self.resolve_product_with_id(record, id)
    }

    fn resolve_product_with_id(&self, record: &SourceRecord, id: String) -> CanonicalProduct {
        CanonicalProduct {
            id,
            name: self.resolve(record, Field::ProductName),
            description: self.resolve(record, Field::Description),
            caution: self.resolve(record, Field::Caution),
            material: self.resolve(record, Field::Material),
            color: self.resolve(record, Field::Color),
            size: self.resolve(record, Field::Size),
            fit: self.resolve(record, Field::Fit),
            vendor: self.resolve(record, Field::Vendor),
            main_image: self.resolve(record, Field::MainImage),
            thumbnail_images: self.resolve_list(record, Field::ThumbnailImages),
            price: self.resolve(record, Field::Price),
        }
    }
}

fn coerce_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(coerce_to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> SourceRecord {
        match value {
            Value::Object(obj) => SourceRecord::from_object(obj),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_first_alias_wins() {
        let resolver = ColumnResolver::new();
        let rec = record(json!({"productID": "B-2", "product_id": "A-1"}));

        assert_eq!(
            resolver.resolve(&rec, Field::ProductId),
            Some("A-1".to_string())
        );
    }

    #[test]
    fn test_blank_values_fall_through() {
        let resolver = ColumnResolver::new();
        let rec = record(json!({"product_id": "   ", "productId": null, "productID": "X9"}));

        assert_eq!(
            resolver.resolve(&rec, Field::ProductId),
            Some("X9".to_string())
        );
    }

    #[test]
    fn test_missing_field_is_none() {
        let resolver = ColumnResolver::new();
        let rec = record(json!({"unrelated": "value"}));

        assert_eq!(resolver.resolve(&rec, Field::Color), None);
        assert!(resolver
            .resolve_list(&rec, Field::ThumbnailImages)
            .is_empty());
    }

    #[test]
    fn test_numbers_are_coerced() {
        let resolver = ColumnResolver::new();
        let rec = record(json!({"productId": 207, "price": 29.5}));

        assert_eq!(resolver.resolve(&rec, Field::ProductId), Some("207".to_string()));
        assert_eq!(resolver.resolve(&rec, Field::Price), Some("29.5".to_string()));
    }

    #[test]
    fn test_resolve_list_from_array_and_string() {
        let resolver = ColumnResolver::new();
        let from_array = record(json!({"thumbnailImages": ["http://x/1.jpg", "", "http://x/2.jpg"]}));
        let from_string = record(json!({"thumbnail_images": "http://x/1.jpg | http://x/2.jpg,http://x/3.jpg"}));

        assert_eq!(
            resolver.resolve_list(&from_array, Field::ThumbnailImages),
            vec!["http://x/1.jpg", "http://x/2.jpg"]
        );
        assert_eq!(
            resolver.resolve_list(&from_string, Field::ThumbnailImages),
            vec!["http://x/1.jpg", "http://x/2.jpg", "http://x/3.jpg"]
        );
    }

    #[test]
    fn test_extra_aliases_take_priority() {
        let mut extra = HashMap::new();
        extra.insert(Field::ProductId, vec!["Style Code".to_string()]);
        let resolver = ColumnResolver::new().with_extra_aliases(extra);
        let rec = record(json!({"Style Code": "SC-1", "id": "other"}));

        assert_eq!(resolver.resolve(&rec, Field::ProductId), Some("SC-1".to_string()));
    }

    #[test]
    fn test_resolve_product_requires_id() {
        let resolver = ColumnResolver::new();
        let rec = record(json!({"productName": "TUXEDO"}));

        assert!(resolver.resolve_product(&rec).is_none());
        assert_eq!(resolver.resolve_product_keyless(&rec).id, "");
        assert_eq!(
            resolver.resolve_product_keyless(&rec).name.as_deref(),
            Some("TUXEDO")
        );
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("main_image".parse::<Field>(), Ok(Field::MainImage));
        assert!("nope".parse::<Field>().is_err());
    }
}
