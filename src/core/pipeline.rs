pub use crate::app::pipelines::import_pipeline::{ImportPipeline, CSV_FILE, REPORT_FILE, TSV_FILE};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::NormalizeSettings;
    use crate::core::{ConfigProvider, Extractor, Pipeline, SourceRecord, Storage};
    use crate::domain::model::InputMode;
    use crate::utils::error::{ImportError, Result};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ImportError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        mode: InputMode,
        output_formats: Vec<String>,
    }

    impl MockConfig {
        fn new(mode: InputMode, formats: &[&str]) -> Self {
            Self {
                input_path: "input".to_string(),
                mode,
                output_formats: formats.iter().map(|f| f.to_string()).collect(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn input_mode(&self) -> InputMode {
            self.mode
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn settings(&self) -> NormalizeSettings {
            NormalizeSettings::default()
        }
    }

    struct FixedExtractor {
        record: SourceRecord,
    }

    #[async_trait::async_trait]
    impl Extractor for FixedExtractor {
        async fn extract(&self, _raw_input: &[u8]) -> Result<SourceRecord> {
            Ok(self.record.clone())
        }
    }

    struct FailingExtractor;

    #[async_trait::async_trait]
    impl Extractor for FailingExtractor {
        async fn extract(&self, _raw_input: &[u8]) -> Result<SourceRecord> {
            Err(ImportError::ExtractionError {
                message: "service unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_extract_structured_json() {
        let storage = MockStorage::new();
        storage
            .put_file("input", br#"[{"productId": "1"}, {"productId": "2"}]"#)
            .await;
        let pipeline = ImportPipeline::new(
            storage,
            MockConfig::new(InputMode::StructuredJson, &["csv"]),
        );

        let records = pipeline.extract().await.unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let pipeline = ImportPipeline::new(
            MockStorage::new(),
            MockConfig::new(InputMode::FlexibleCsv, &["csv"]),
        );

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, ImportError::IoError(_)));
    }

    #[tokio::test]
    async fn test_extract_uses_extractor_in_extracted_mode() {
        let storage = MockStorage::new();
        storage.put_file("input", b"\x89PNG raw image bytes").await;
        let pipeline = ImportPipeline::new(storage, MockConfig::new(InputMode::Extracted, &["csv"]))
            .with_extractor(FixedExtractor {
                record: SourceRecord::from_pairs([
                    ("productName", json!("Blazer")),
                    ("color", json!("Black")),
                ]),
            });

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        assert_eq!(result.rows.len(), 1);
        assert!(result.csv_output.contains("blazer-black"));
        assert!(result.csv_output.contains("Blazer Black"));
    }

    #[tokio::test]
    async fn test_extractor_failure_aborts_run() {
        let storage = MockStorage::new();
        storage.put_file("input", b"raw").await;
        let pipeline = ImportPipeline::new(storage, MockConfig::new(InputMode::Extracted, &["csv"]))
            .with_extractor(FailingExtractor);

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, ImportError::ExtractionError { .. }));
    }

    #[tokio::test]
    async fn test_transform_builds_csv_and_optional_tsv() {
        let records = vec![SourceRecord::from_pairs([
            ("product_id", json!("A1")),
            ("name", json!("Shirt")),
        ])];

        let csv_only = ImportPipeline::new(
            MockStorage::new(),
            MockConfig::new(InputMode::FlexibleCsv, &["csv"]),
        );
        let result = csv_only.transform(records.clone()).await.unwrap();
        assert!(result.csv_output.starts_with("Handle,Title,Vendor"));
        assert!(result.tsv_output.is_empty());

        let with_tsv = ImportPipeline::new(
            MockStorage::new(),
            MockConfig::new(InputMode::FlexibleCsv, &["csv", "tsv"]),
        );
        let result = with_tsv.transform(records).await.unwrap();
        assert!(result.tsv_output.starts_with("Handle\tTitle\tVendor"));
        assert_eq!(result.product_count, 1);
    }

    #[tokio::test]
    async fn test_load_writes_requested_formats() {
        let storage = MockStorage::new();
        storage
            .put_file(
                "input",
                b"product_id,name\nA1,Shirt\nA1,Shirt again\n,No key\n",
            )
            .await;
        let pipeline = ImportPipeline::new(
            storage.clone(),
            MockConfig::new(InputMode::FlexibleCsv, &["csv", "json"]),
        );

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        let output_path = pipeline.load(result).await.unwrap();

        assert_eq!(output_path, "test_output");
        assert!(storage.get_file(CSV_FILE).await.is_some());
        assert!(storage.get_file(TSV_FILE).await.is_none());

        let report_bytes = storage.get_file(REPORT_FILE).await.unwrap();
        let report: serde_json::Value = serde_json::from_slice(&report_bytes).unwrap();
        assert_eq!(report["mode"], "flexible_csv");
        assert_eq!(report["product_count"], 1);
        assert_eq!(report["row_count"], 1);
        assert_eq!(report["diagnostics"].as_array().unwrap().len(), 2);
        assert_eq!(report["diagnostics"][0]["kind"], "duplicate_key");
        assert!(report["generated_at"].is_string());
    }
}
