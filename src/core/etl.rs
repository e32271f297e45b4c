use crate::core::Pipeline;
use crate::utils::error::Result;

/// 一次匯入執行的摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub output_path: String,
    pub product_count: usize,
    pub row_count: usize,
    pub diagnostic_count: usize,
}

pub struct ImportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ImportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<ImportSummary> {
        tracing::info!("Starting import...");

        // Extract
        let records = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", records.len());

        // Transform
        let result = self.pipeline.transform(records).await?;
        let product_count = result.product_count;
        let row_count = result.rows.len();
        let diagnostic_count = result.diagnostics.len();
        tracing::info!(
            "🔧 Normalized {} products into {} rows",
            product_count,
            row_count
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("📁 Output saved to: {}", output_path);

        Ok(ImportSummary {
            output_path,
            product_count,
            row_count,
            diagnostic_count,
        })
    }
}
