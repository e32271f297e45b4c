use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 來源記錄：欄位名稱事先未知的開放式對應
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub data: HashMap<String, serde_json::Value>,
}

impl SourceRecord {
    pub fn from_object(obj: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            data: obj.into_iter().collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        Self {
            data: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 每個欄位都是 null 或空白字串
    pub fn is_blank(&self) -> bool {
        self.data.values().all(value_is_blank)
    }
}

fn value_is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        serde_json::Value::Array(items) => items.iter().all(value_is_blank),
        _ => false,
    }
}

/// 從來源記錄解析出的商品欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalProduct {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub caution: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub fit: Option<String>,
    pub vendor: Option<String>,
    pub main_image: Option<String>,
    pub thumbnail_images: Vec<String>,
    pub price: Option<String>,
}

/// 輸入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// 結構化 JSON 陣列
    StructuredJson,
    /// 欄位名稱不固定的 CSV 匯出
    FlexibleCsv,
    /// 單筆擷取結果
    Extracted,
    /// 重新整理既有的匯入檔
    Reproject,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputMode::StructuredJson => "structured_json",
            InputMode::FlexibleCsv => "flexible_csv",
            InputMode::Extracted => "extracted",
            InputMode::Reproject => "reproject",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Flag(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.trim().is_empty())
    }

    /// 轉成表格文字；布林值固定輸出 TRUE / FALSE
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Flag(true) => "TRUE".to_string(),
            CellValue::Flag(false) => "FALSE".to_string(),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Decimal(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// 一列輸出。投影時只輸出固定表頭中的欄位，其餘欄位輸出空白
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputRow {
    cells: HashMap<String, CellValue>,
}

impl OutputRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &str, value: CellValue) {
        self.cells.insert(column.to_string(), value);
    }

    pub fn set_text(&mut self, column: &str, value: impl Into<String>) {
        self.set(column, CellValue::Text(value.into()));
    }

    pub fn with(mut self, column: &str, value: CellValue) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// 欄位的文字值，不存在時為空字串
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(CellValue::to_field).unwrap_or_default()
    }

    pub fn is_blank(&self, column: &str) -> bool {
        self.get(column).map(CellValue::is_blank).unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// 單筆記錄層級的診斷；不會中斷整批處理
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    MissingBusinessKey { index: usize },
    DuplicateKey {
        index: usize,
        key: String,
        first_index: usize,
    },
    HandleUnavailable { index: usize, key: String },
    MissingHandle { index: usize },
}

impl Diagnostic {
    pub fn index(&self) -> usize {
        match self {
            Diagnostic::MissingBusinessKey { index }
            | Diagnostic::DuplicateKey { index, .. }
            | Diagnostic::HandleUnavailable { index, .. }
            | Diagnostic::MissingHandle { index } => *index,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingBusinessKey { index } => {
                write!(f, "record #{}: no product id, skipped", index + 1)
            }
            Diagnostic::DuplicateKey {
                index,
                key,
                first_index,
            } => write!(
                f,
                "record #{}: product id '{}' already seen at record #{}, skipped",
                index + 1,
                key,
                first_index + 1
            ),
            Diagnostic::HandleUnavailable { index, key } => write!(
                f,
                "record #{}: could not build a handle for '{}', skipped",
                index + 1,
                key
            ),
            Diagnostic::MissingHandle { index } => {
                write!(f, "row #{}: blank Handle, dropped", index + 1)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows: Vec<OutputRow>,
    pub product_count: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub csv_output: String,
    pub tsv_output: String,
}
