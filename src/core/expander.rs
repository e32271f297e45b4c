//! Expansion of one [`CanonicalProduct`] into its output row group.
//!
//! A product with `k` distinct images yields `k` rows: the primary row,
//! which carries every scalar column plus the first image, followed by one
//! continuation row per remaining image. A product without images yields
//! only the primary row.

use crate::core::resolver::Field;
use crate::core::schema::{self, ColumnDefaults};
use crate::domain::model::{CanonicalProduct, CellValue, OutputRow};

/// Handle 與標題，依輸入模式組成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductIdentity {
    pub handle: String,
    pub title: String,
}

/// 各輸入模式之間不同的展開規則
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionProfile {
    pub option1_name: String,
    /// Option1 Value 取自哪個欄位
    pub option_field: Field,
    /// 依序組成 Tags 的欄位
    pub tag_fields: Vec<Field>,
    pub variant_image_on_primary: bool,
}

fn field_value(product: &CanonicalProduct, field: Field) -> Option<&str> {
    let value = match field {
        Field::ProductId => Some(product.id.as_str()),
        Field::ProductName => product.name.as_deref(),
        Field::Description => product.description.as_deref(),
        Field::Caution => product.caution.as_deref(),
        Field::Material => product.material.as_deref(),
        Field::Color => product.color.as_deref(),
        Field::Size => product.size.as_deref(),
        Field::Fit => product.fit.as_deref(),
        Field::Vendor => product.vendor.as_deref(),
        Field::MainImage => product.main_image.as_deref(),
        Field::Price => product.price.as_deref(),
        Field::ThumbnailImages => None,
    };
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 主圖在前、縮圖在後；略過空白與重複的網址
pub fn collect_images(product: &CanonicalProduct) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();
    let candidates = product
        .main_image
        .iter()
        .chain(product.thumbnail_images.iter());

    for url in candidates {
        let url = url.trim();
        if url.is_empty() || images.iter().any(|seen| seen == url) {
            continue;
        }
        images.push(url.to_string());
    }
    images
}

fn html_lines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}

/// 描述、注意事項、材質三段，以 <br> 分隔
pub fn build_body_html(product: &CanonicalProduct) -> String {
    let mut blocks = Vec::new();
    if let Some(description) = field_value(product, Field::Description) {
        blocks.push(html_lines(description));
    }
    if let Some(caution) = field_value(product, Field::Caution) {
        blocks.push(format!("Caution: {}", html_lines(caution)));
    }
    if let Some(material) = field_value(product, Field::Material) {
        blocks.push(format!("Material: {}", html_lines(material)));
    }
    blocks.join("<br>")
}

pub fn build_tags(product: &CanonicalProduct, fields: &[Field]) -> String {
    fields
        .iter()
        .filter_map(|field| field_value(product, *field))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn expand(
    product: &CanonicalProduct,
    identity: &ProductIdentity,
    profile: &ExpansionProfile,
    defaults: &ColumnDefaults,
) -> Vec<OutputRow> {
    let images = collect_images(product);

    let mut primary = OutputRow::new();
    primary.set_text(schema::HANDLE, identity.handle.as_str());
    primary.set_text(schema::TITLE, identity.title.as_str());
    primary.set_text(
        schema::VENDOR,
        field_value(product, Field::Vendor).unwrap_or(defaults.vendor.as_str()),
    );
    primary.set(schema::PUBLISHED, CellValue::Flag(defaults.published));
    primary.set_text(schema::BODY_HTML, build_body_html(product));
    primary.set_text(schema::TAGS, build_tags(product, &profile.tag_fields));

    if let Some(first) = images.first() {
        primary.set_text(schema::IMAGE_SRC, first.as_str());
        primary.set(schema::IMAGE_POSITION, CellValue::Integer(1));
        if profile.variant_image_on_primary {
            primary.set_text(schema::VARIANT_IMAGE, first.as_str());
        }
    }

    primary.set_text(schema::OPTION1_NAME, profile.option1_name.as_str());
    primary.set_text(
        schema::OPTION1_VALUE,
        field_value(product, profile.option_field).unwrap_or(defaults.option1_value.as_str()),
    );
    primary.set_text(schema::VARIANT_SKU, product.id.trim());
    match field_value(product, Field::Price) {
        Some(price) => primary.set_text(schema::VARIANT_PRICE, price),
        None => primary.set(
            schema::VARIANT_PRICE,
            CellValue::Decimal(defaults.variant_price),
        ),
    }
    primary.set(
        schema::VARIANT_GRAMS,
        CellValue::Integer(defaults.variant_grams),
    );
    primary.set(
        schema::VARIANT_INVENTORY_QTY,
        CellValue::Integer(defaults.variant_inventory_qty),
    );
    primary.set(
        schema::VARIANT_REQUIRES_SHIPPING,
        CellValue::Flag(defaults.variant_requires_shipping),
    );
    primary.set(
        schema::VARIANT_TAXABLE,
        CellValue::Flag(defaults.variant_taxable),
    );
    primary.set(schema::GIFT_CARD, CellValue::Flag(defaults.gift_card));

    let mut rows = Vec::with_capacity(images.len().max(1));
    rows.push(primary);

    for (offset, url) in images.iter().enumerate().skip(1) {
        let continuation = OutputRow::new()
            .with(schema::HANDLE, CellValue::text(identity.handle.as_str()))
            .with(schema::IMAGE_SRC, CellValue::text(url.as_str()))
            .with(schema::IMAGE_POSITION, CellValue::Integer(offset as i64 + 1));
        rows.push(continuation);
    }

    rows
}
