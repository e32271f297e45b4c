use crate::core::decode;
use crate::domain::model::SourceRecord;
use crate::domain::ports::Extractor;
use crate::utils::error::{EmptyStage, ImportError, Result};
use async_trait::async_trait;

/// 讀取已經擷取完成的 JSON 物件（例如辨識服務回傳後存下的結果）
#[derive(Debug, Clone, Default)]
pub struct JsonRecordExtractor;

impl JsonRecordExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for JsonRecordExtractor {
    async fn extract(&self, raw_input: &[u8]) -> Result<SourceRecord> {
        let text = decode::decode_text(raw_input)?;
        let mut records = decode::decode_json(text)?;

        match records.len() {
            0 => Err(ImportError::EmptyInput {
                stage: EmptyStage::File,
                message: "extraction result is empty".to_string(),
            }),
            1 => Ok(records.remove(0)),
            n => Err(ImportError::ExtractionError {
                message: format!("expected a single extracted record, found {}", n),
            }),
        }
    }
}
