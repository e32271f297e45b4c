//! Stateful passes over an ordered record sequence.
//!
//! Deduplication (flexible-CSV mode) and forward-fill (re-projection mode)
//! are never combined in one run. Each call owns its state, so concurrent
//! runs cannot observe each other's seen-keys or remembered values.

use crate::core::normalizer::report;
use crate::core::resolver::{ColumnResolver, Field};
use crate::core::schema::{self, ColumnDefaults};
use crate::core::slug::slugify;
use crate::domain::model::{CellValue, Diagnostic, OutputRow, SourceRecord};
use std::collections::HashMap;

/// 匯出檔慣用「空白 = 同上一列」的欄位
pub const FORWARD_FILL_COLUMNS: [&str; 3] = [schema::TITLE, schema::VENDOR, schema::OPTION1_NAME];

/// 通過去重的記錄，附帶原始位置與商品編號
#[derive(Debug, Clone)]
pub struct KeyedRecord<'a> {
    pub index: usize,
    pub key: String,
    pub record: &'a SourceRecord,
}

/// 依商品編號去重：第一筆勝出，之後的重複記錄整筆略過
pub fn dedup_by_key<'a>(
    records: &'a [SourceRecord],
    resolver: &ColumnResolver,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<KeyedRecord<'a>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut survivors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let Some(key) = resolver.resolve(record, Field::ProductId) else {
            report(diagnostics, Diagnostic::MissingBusinessKey { index });
            continue;
        };

        if let Some(first_index) = seen.get(&key) {
            report(
                diagnostics,
                Diagnostic::DuplicateKey {
                    index,
                    key,
                    first_index: *first_index,
                },
            );
            continue;
        }

        seen.insert(key.clone(), index);
        survivors.push(KeyedRecord { index, key, record });
    }

    survivors
}

/// Handle 與商品編號的對應；不同編號不會共用同一個 Handle
#[derive(Debug, Default)]
pub struct HandleRegistry {
    owners: HashMap<String, String>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得 `key` 專屬的 Handle。已被其他編號占用時附加 `-{slug(key)}`，仍衝突再附加序號
    pub fn claim(&mut self, handle: String, key: &str) -> String {
        if self.is_free_for(&handle, key) {
            return self.own(handle, key);
        }

        let suffix = match slugify(key) {
            s if s.is_empty() => key.trim().to_string(),
            s => s,
        };
        let candidate = format!("{}-{}", handle, suffix);
        if self.is_free_for(&candidate, key) {
            tracing::debug!("handle '{}' already taken, using '{}'", handle, candidate);
            return self.own(candidate, key);
        }

        let mut n = 2;
        loop {
            let numbered = format!("{}-{}", candidate, n);
            if self.is_free_for(&numbered, key) {
                tracing::debug!("handle '{}' already taken, using '{}'", handle, numbered);
                return self.own(numbered, key);
            }
            n += 1;
        }
    }

    fn is_free_for(&self, handle: &str, key: &str) -> bool {
        self.owners.get(handle).map_or(true, |owner| owner == key)
    }

    fn own(&mut self, handle: String, key: &str) -> String {
        self.owners.insert(handle.clone(), key.to_string());
        handle
    }
}

/// 空白儲存格沿用上一個非空白值；尚無值時維持空白
pub fn forward_fill(rows: &mut [OutputRow], columns: &[&str]) {
    let mut last: HashMap<&str, CellValue> = HashMap::new();

    for row in rows.iter_mut() {
        for column in columns {
            if row.is_blank(column) {
                if let Some(value) = last.get(column) {
                    row.set(column, value.clone());
                }
            } else if let Some(value) = row.get(column) {
                last.insert(*column, value.clone());
            }
        }
    }
}

/// 丟棄沒有 Handle 的列（無法歸屬任何商品）
pub fn drop_rows_without_handle(
    rows: Vec<OutputRow>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<OutputRow> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            if row.is_blank(schema::HANDLE) {
                report(diagnostics, Diagnostic::MissingHandle { index });
                None
            } else {
                Some(row)
            }
        })
        .collect()
}

pub fn apply_defaults(row: &mut OutputRow, defaults: &ColumnDefaults) {
    for column in ColumnDefaults::COLUMNS {
        if row.is_blank(column) {
            if let Some(value) = defaults.value_for(column) {
                row.set(column, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_row(cells: &[(&str, &str)]) -> OutputRow {
        let mut row = OutputRow::new();
        for (column, value) in cells {
            row.set_text(column, *value);
        }
        row
    }

    #[test]
    fn test_forward_fill_title_and_vendor() {
        let mut rows = vec![
            text_row(&[(schema::TITLE, "A"), (schema::VENDOR, "V")]),
            text_row(&[(schema::TITLE, ""), (schema::VENDOR, "")]),
            text_row(&[(schema::TITLE, "B"), (schema::VENDOR, "")]),
        ];

        forward_fill(&mut rows, &FORWARD_FILL_COLUMNS);

        let filled: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.text(schema::TITLE), r.text(schema::VENDOR)))
            .collect();
        assert_eq!(
            filled,
            vec![
                ("A".to_string(), "V".to_string()),
                ("A".to_string(), "V".to_string()),
                ("B".to_string(), "V".to_string()),
            ]
        );
    }

    #[test]
    fn test_forward_fill_leaves_leading_blanks() {
        let mut rows = vec![
            text_row(&[(schema::VENDOR, "")]),
            text_row(&[(schema::VENDOR, "Acme")]),
        ];

        forward_fill(&mut rows, &FORWARD_FILL_COLUMNS);

        assert!(rows[0].is_blank(schema::VENDOR));
        assert_eq!(rows[1].text(schema::VENDOR), "Acme");
    }

    #[test]
    fn test_rows_without_handle_are_dropped() {
        let rows = vec![
            text_row(&[(schema::HANDLE, "dress"), (schema::TITLE, "Dress")]),
            text_row(&[(schema::HANDLE, "  "), (schema::TITLE, "Orphan")]),
            text_row(&[(schema::TITLE, "No handle column")]),
        ];
        let mut diagnostics = Vec::new();

        let kept = drop_rows_without_handle(rows, &mut diagnostics);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text(schema::HANDLE), "dress");
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::MissingHandle { index: 1 },
                Diagnostic::MissingHandle { index: 2 },
            ]
        );
    }

    #[test]
    fn test_apply_defaults_only_fills_blanks() {
        let mut row = text_row(&[(schema::VENDOR, "Acme"), (schema::TAGS, " ")]);

        apply_defaults(&mut row, &ColumnDefaults::default());

        assert_eq!(row.text(schema::VENDOR), "Acme");
        assert_eq!(row.text(schema::TAGS), "");
        assert_eq!(row.text(schema::PUBLISHED), "TRUE");
        assert_eq!(row.text(schema::VARIANT_INVENTORY_POLICY), "deny");
        assert_eq!(row.text(schema::VARIANT_FULFILLMENT_SERVICE), "manual");
        assert!(row.is_blank(schema::IMAGE_SRC));
    }

    #[test]
    fn test_handle_registry_separates_distinct_keys() {
        let mut handles = HandleRegistry::new();

        assert_eq!(handles.claim("tuxedo".to_string(), "207"), "tuxedo");
        assert_eq!(handles.claim("tuxedo".to_string(), "208"), "tuxedo-208");
        assert_eq!(handles.claim("tuxedo".to_string(), "207"), "tuxedo");
        // slug 相同但編號不同
        assert_eq!(handles.claim("tuxedo".to_string(), "2 0 8"), "tuxedo-2-0-8");
        assert_eq!(handles.claim("tuxedo".to_string(), "2-0-8"), "tuxedo-2-0-8-2");
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let records = vec![
            SourceRecord::from_pairs([("product_id", json!("A1")), ("description", json!("first"))]),
            SourceRecord::from_pairs([("product_id", json!("A1")), ("description", json!("second"))]),
            SourceRecord::from_pairs([("description", json!("no key"))]),
            SourceRecord::from_pairs([("productId", json!("B2"))]),
        ];
        let mut diagnostics = Vec::new();

        let survivors = dedup_by_key(&records, &ColumnResolver::new(), &mut diagnostics);

        let kept: Vec<(usize, &str)> = survivors.iter().map(|s| (s.index, s.key.as_str())).collect();
        assert_eq!(kept, vec![(0, "A1"), (3, "B2")]);
        assert_eq!(
            survivors[0].record.data.get("description"),
            Some(&json!("first"))
        );
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::DuplicateKey {
                    index: 1,
                    key: "A1".to_string(),
                    first_index: 0,
                },
                Diagnostic::MissingBusinessKey { index: 2 },
            ]
        );
    }
}
