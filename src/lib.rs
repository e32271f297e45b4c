pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::adapters::JsonRecordExtractor;
pub use crate::core::{
    etl::{ImportEngine, ImportSummary},
    normalizer::{NormalizeOutcome, NormalizeSettings, Normalizer},
    pipeline::ImportPipeline,
};
pub use crate::domain::model::{
    CanonicalProduct, CellValue, Diagnostic, InputMode, OutputRow, SourceRecord, TransformResult,
};
pub use crate::utils::error::{ImportError, Result};
