use crate::adapters::JsonRecordExtractor;
use crate::core::decode;
use crate::core::normalizer::Normalizer;
use crate::core::{ConfigProvider, Extractor, Pipeline, SourceRecord, Storage, TransformResult};
use crate::domain::model::{Diagnostic, InputMode};
use crate::utils::error::Result;
use serde::Serialize;

pub const CSV_FILE: &str = "products.csv";
pub const TSV_FILE: &str = "products.tsv";
pub const REPORT_FILE: &str = "import_report.json";

/// 寫在輸出旁邊的匯入報告
#[derive(Debug, Serialize)]
struct ImportReport<'a> {
    mode: InputMode,
    product_count: usize,
    row_count: usize,
    diagnostics: &'a [Diagnostic],
    generated_at: String,
}

/// 讀取輸入檔 → 正規化 → 寫出匯入用表格
pub struct ImportPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) extractor: Box<dyn Extractor>,
}

impl<S: Storage, C: ConfigProvider> ImportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            extractor: Box::new(JsonRecordExtractor::new()),
        }
    }

    /// 替換擷取模式使用的擷取器
    pub fn with_extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    fn wants(&self, format: &str) -> bool {
        self.config
            .output_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ImportPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceRecord>> {
        let mode = self.config.input_mode();
        let path = self.config.input_path();
        tracing::debug!("Reading {} input from: {}", mode, path);

        let bytes = self.storage.read_file(path).await?;
        tracing::debug!("Read {} bytes", bytes.len());

        match mode {
            InputMode::Extracted => {
                // 外部擷取在這裡等待，正規化核心本身保持同步
                let record = self.extractor.extract(&bytes).await?;
                Ok(vec![record])
            }
            other => {
                let text = decode::decode_text(&bytes)?;
                decode::decode_records(other, text)
            }
        }
    }

    async fn transform(&self, data: Vec<SourceRecord>) -> Result<TransformResult> {
        let normalizer = Normalizer::new(self.config.settings())?;
        let outcome = normalizer.normalize(self.config.input_mode(), &data)?;

        let csv_output = outcome.to_csv()?;
        let tsv_output = if self.wants("tsv") {
            outcome.to_tsv()?
        } else {
            String::new()
        };

        Ok(TransformResult {
            rows: outcome.rows,
            product_count: outcome.product_count,
            diagnostics: outcome.diagnostics,
            csv_output,
            tsv_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path().trim_end_matches('/');

        if self.wants("csv") {
            self.storage
                .write_file(CSV_FILE, result.csv_output.as_bytes())
                .await?;
            tracing::debug!("Wrote {}", CSV_FILE);
        }

        if self.wants("tsv") {
            self.storage
                .write_file(TSV_FILE, result.tsv_output.as_bytes())
                .await?;
            tracing::debug!("Wrote {}", TSV_FILE);
        }

        if self.wants("json") {
            let report = ImportReport {
                mode: self.config.input_mode(),
                product_count: result.product_count,
                row_count: result.rows.len(),
                diagnostics: &result.diagnostics,
                generated_at: chrono::Utc::now().to_rfc3339(),
            };
            let json_data = serde_json::to_string_pretty(&report)?;
            self.storage
                .write_file(REPORT_FILE, json_data.as_bytes())
                .await?;
            tracing::debug!("Wrote {}", REPORT_FILE);
        }

        tracing::info!("💾 Import files saved under: {}", output_path);
        Ok(output_path.to_string())
    }
}
