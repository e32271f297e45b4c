use crate::core::normalizer::NormalizeSettings;
use crate::domain::model::{InputMode, SourceRecord, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn input_mode(&self) -> InputMode;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn settings(&self) -> NormalizeSettings;
}

/// 外部擷取服務（例如影像/文字辨識）的邊界。重試與提示詞都屬於實作方
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, raw_input: &[u8]) -> Result<SourceRecord>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceRecord>>;
    async fn transform(&self, data: Vec<SourceRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
