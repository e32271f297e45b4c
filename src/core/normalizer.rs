//! Run orchestration: source records in, output rows out.
//!
//! A run ends in exactly one of three ways: `EmptyInput` when no usable
//! record was decoded, `NoProcessableRecords` when every record was
//! rejected, or success with the full row sequence. Per-record problems are
//! collected as [`Diagnostic`]s and never abort the run.

use crate::core::decode;
use crate::core::dedup::{self, HandleRegistry, KeyedRecord, FORWARD_FILL_COLUMNS};
use crate::core::expander::{self, ExpansionProfile, ProductIdentity};
use crate::core::projector;
use crate::core::resolver::{ColumnResolver, Field};
use crate::core::schema::{self, ColumnDefaults};
use crate::core::slug::{slugify, slugify_cjk};
use crate::domain::model::{
    CanonicalProduct, CellValue, Diagnostic, InputMode, OutputRow, SourceRecord,
};
use crate::utils::error::{EmptyStage, ImportError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// 正規化設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeSettings {
    pub defaults: ColumnDefaults,
    /// CSV 模式下主列是否填入 Variant Image
    pub variant_image_in_csv_mode: bool,
    /// 標準欄位名稱 → 額外的來源欄名
    pub extra_aliases: HashMap<String, Vec<String>>,
}

impl NormalizeSettings {
    pub fn resolver(&self) -> Result<ColumnResolver> {
        let mut extra = HashMap::new();
        for (name, aliases) in &self.extra_aliases {
            let field: Field = name.parse().map_err(|message| {
                ImportError::ConfigValidationError {
                    field: format!("aliases.{}", name),
                    message,
                }
            })?;
            extra.insert(field, aliases.clone());
        }
        Ok(ColumnResolver::new().with_extra_aliases(extra))
    }
}

#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub rows: Vec<OutputRow>,
    pub product_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl NormalizeOutcome {
    pub fn to_csv(&self) -> Result<String> {
        projector::project(&self.rows)
    }

    pub fn to_tsv(&self) -> Result<String> {
        projector::project_with_delimiter(&self.rows, b'\t')
    }
}

/// 記錄診斷並寫入日誌
pub(crate) fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    tracing::warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

pub struct Normalizer {
    settings: NormalizeSettings,
    resolver: ColumnResolver,
}

impl Normalizer {
    pub fn new(settings: NormalizeSettings) -> Result<Self> {
        let resolver = settings.resolver()?;
        Ok(Self { settings, resolver })
    }

    pub fn settings(&self) -> &NormalizeSettings {
        &self.settings
    }

    pub fn profile(&self, mode: InputMode) -> ExpansionProfile {
        let defaults = &self.settings.defaults;
        match mode {
            InputMode::Extracted => ExpansionProfile {
                option1_name: defaults.extracted_option1_name.clone(),
                option_field: Field::Color,
                tag_fields: vec![Field::Color, Field::Material, Field::Vendor],
                variant_image_on_primary: true,
            },
            InputMode::FlexibleCsv => ExpansionProfile {
                option1_name: defaults.option1_name.clone(),
                option_field: Field::Size,
                tag_fields: vec![Field::Color, Field::Material, Field::Fit],
                variant_image_on_primary: self.settings.variant_image_in_csv_mode,
            },
            InputMode::StructuredJson | InputMode::Reproject => ExpansionProfile {
                option1_name: defaults.option1_name.clone(),
                option_field: Field::Size,
                tag_fields: vec![Field::Color, Field::Material, Field::Fit],
                variant_image_on_primary: true,
            },
        }
    }

    /// 解碼文字後正規化
    pub fn normalize_text(&self, mode: InputMode, text: &str) -> Result<NormalizeOutcome> {
        let records = decode::decode_records(mode, text)?;
        self.normalize(mode, &records)
    }

    pub fn normalize(&self, mode: InputMode, records: &[SourceRecord]) -> Result<NormalizeOutcome> {
        ensure_not_empty(records)?;
        tracing::info!("🔧 Normalizing {} records in {} mode", records.len(), mode);

        let outcome = match mode {
            InputMode::StructuredJson => self.structured_json(records),
            InputMode::FlexibleCsv => self.flexible_csv(records),
            InputMode::Extracted => self.extracted(records),
            InputMode::Reproject => self.reproject(records),
        };

        if outcome.rows.is_empty() {
            return Err(ImportError::NoProcessableRecords {
                total: records.len(),
            });
        }

        tracing::info!(
            "✅ Produced {} rows for {} products ({} diagnostics)",
            outcome.rows.len(),
            outcome.product_count,
            outcome.diagnostics.len()
        );
        Ok(outcome)
    }

    fn structured_json(&self, records: &[SourceRecord]) -> NormalizeOutcome {
        let profile = self.profile(InputMode::StructuredJson);
        let mut diagnostics = Vec::new();
        let survivors = dedup::dedup_by_key(records, &self.resolver, &mut diagnostics);
        let mut handles = HandleRegistry::new();
        let mut rows = Vec::new();
        let mut product_count = 0;

        for survivor in survivors {
            let product = self.keyed_product(&survivor);

            let title = product.name.clone().unwrap_or_default();
            let slug = slugify(&title);
            let base = if slug.is_empty() {
                survivor.key.clone()
            } else {
                slug
            };
            let handle = handles.claim(base, &survivor.key);

            tracing::debug!("record #{} → handle '{}'", survivor.index + 1, handle);
            rows.extend(expander::expand(
                &product,
                &ProductIdentity { handle, title },
                &profile,
                &self.settings.defaults,
            ));
            product_count += 1;
        }

        NormalizeOutcome {
            rows,
            product_count,
            diagnostics,
        }
    }

    /// 去重後的記錄已帶有商品編號，直接沿用
    fn keyed_product(&self, survivor: &KeyedRecord<'_>) -> CanonicalProduct {
        let mut product = self.resolver.resolve_product_keyless(survivor.record);
        product.id = survivor.key.clone();
        product
    }

    fn flexible_csv(&self, records: &[SourceRecord]) -> NormalizeOutcome {
        let profile = self.profile(InputMode::FlexibleCsv);
        let mut diagnostics = Vec::new();
        let survivors = dedup::dedup_by_key(records, &self.resolver, &mut diagnostics);
        let mut handles = HandleRegistry::new();
        let mut rows = Vec::new();
        let mut product_count = 0;

        for survivor in survivors {
            let product = self.keyed_product(&survivor);

            let title = match product.name.as_deref() {
                Some(name) => format!("{} - {}", name, survivor.key),
                None => survivor.key.clone(),
            };
            let mut handle = slugify(&title);
            if handle.is_empty() {
                handle = slugify(&survivor.key);
            }
            if handle.is_empty() {
                report(
                    &mut diagnostics,
                    Diagnostic::HandleUnavailable {
                        index: survivor.index,
                        key: survivor.key,
                    },
                );
                continue;
            }
            let handle = handles.claim(handle, &survivor.key);

            tracing::debug!("record #{} → handle '{}'", survivor.index + 1, handle);
            rows.extend(expander::expand(
                &product,
                &ProductIdentity { handle, title },
                &profile,
                &self.settings.defaults,
            ));
            product_count += 1;
        }

        NormalizeOutcome {
            rows,
            product_count,
            diagnostics,
        }
    }

    fn extracted(&self, records: &[SourceRecord]) -> NormalizeOutcome {
        let profile = self.profile(InputMode::Extracted);
        let mut rows = Vec::new();
        let mut diagnostics = Vec::new();
        let mut product_count = 0;

        for (index, record) in records.iter().enumerate() {
            let mut product = self.resolver.resolve_product_keyless(record);
            // 擷取結果只有主圖
            product.thumbnail_images.clear();

            let title = format!(
                "{} {}",
                product.name.as_deref().unwrap_or_default(),
                product.color.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string();
            let handle = slugify_cjk(&title);
            if handle.is_empty() {
                report(
                    &mut diagnostics,
                    Diagnostic::HandleUnavailable { index, key: title },
                );
                continue;
            }
            if product.id.is_empty() {
                product.id = handle.clone();
            }

            rows.extend(expander::expand(
                &product,
                &ProductIdentity { handle, title },
                &profile,
                &self.settings.defaults,
            ));
            product_count += 1;
        }

        NormalizeOutcome {
            rows,
            product_count,
            diagnostics,
        }
    }

    fn reproject(&self, records: &[SourceRecord]) -> NormalizeOutcome {
        let mut diagnostics = Vec::new();
        let mut rows: Vec<OutputRow> = records.iter().map(record_to_row).collect();

        dedup::forward_fill(&mut rows, &FORWARD_FILL_COLUMNS);
        let mut rows = dedup::drop_rows_without_handle(rows, &mut diagnostics);
        for row in rows.iter_mut() {
            dedup::apply_defaults(row, &self.settings.defaults);
        }

        let product_count = rows
            .iter()
            .map(|row| row.text(schema::HANDLE))
            .collect::<HashSet<_>>()
            .len();

        NormalizeOutcome {
            rows,
            product_count,
            diagnostics,
        }
    }
}

fn record_to_row(record: &SourceRecord) -> OutputRow {
    let mut row = OutputRow::new();
    for (column, value) in &record.data {
        let text = match value {
            Value::Null => String::new(),
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        row.set(column, CellValue::Text(text));
    }
    row
}

fn ensure_not_empty(records: &[SourceRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(ImportError::EmptyInput {
            stage: EmptyStage::File,
            message: "no records could be read from the input".to_string(),
        });
    }
    if records.iter().all(SourceRecord::is_blank) {
        return Err(ImportError::EmptyInput {
            stage: EmptyStage::Field,
            message: format!("all {} records contain only blank fields", records.len()),
        });
    }
    Ok(())
}
