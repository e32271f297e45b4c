use crate::domain::model::{InputMode, SourceRecord};
use crate::utils::error::{ImportError, Result};
use csv::{ReaderBuilder, Trim};
use serde_json::Value;

const BOM: char = '\u{feff}';

/// 位元組轉成文字；非 UTF-8 視為格式錯誤，並去除開頭的 BOM
pub fn decode_text(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes).map_err(|e| ImportError::MalformedInput {
        message: format!("input is not valid UTF-8: {}", e),
    })?;
    Ok(text.trim_start_matches(BOM))
}

pub fn decode_records(mode: InputMode, text: &str) -> Result<Vec<SourceRecord>> {
    match mode {
        InputMode::StructuredJson | InputMode::Extracted => decode_json(text),
        InputMode::FlexibleCsv | InputMode::Reproject => decode_csv(text),
    }
}

/// JSON 陣列、單一物件，或 `{"products": [...]}` 包裝
pub fn decode_json(text: &str) -> Result<Vec<SourceRecord>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(text).map_err(|e| ImportError::MalformedInput {
        message: format!("invalid JSON: {}", e),
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("products") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                obj.insert("products".to_string(), other);
                vec![Value::Object(obj)]
            }
            None => vec![Value::Object(obj)],
        },
        other => {
            return Err(ImportError::MalformedInput {
                message: format!("expected a JSON array or object, found {}", json_kind(&other)),
            })
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(obj) => SourceRecord::from_object(obj),
            other => {
                // 非物件元素保留為空記錄，由後續步驟回報缺少商品編號
                tracing::debug!("element #{} is a JSON {}, not an object", index + 1, json_kind(&other));
                SourceRecord::default()
            }
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 從表頭列判斷分隔符號（tab 或逗號）
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.matches('\t').count() > header.matches(',').count() {
        b'\t'
    } else {
        b','
    }
}

/// 表格轉記錄；整列空白的資料列略過
pub fn decode_csv(text: &str) -> Result<Vec<SourceRecord>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ImportError::MalformedInput {
            message: format!("failed to read table header: {}", e),
        })?
        .clone();

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = result.map_err(|e| ImportError::MalformedInput {
            message: format!("failed to parse table row {}: {}", index + 1, e),
        })?;

        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut record = SourceRecord::default();
        for (header, field) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            // 重複的欄名：保留第一個非空白值
            let keep_existing = record
                .data
                .get(header)
                .and_then(Value::as_str)
                .is_some_and(|existing| !existing.trim().is_empty());
            if !keep_existing {
                record
                    .data
                    .insert(header.to_string(), Value::String(field.to_string()));
            }
        }
        records.push(record);
    }

    Ok(records)
}
