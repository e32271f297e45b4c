use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 空輸入是在哪一層被發現的
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyStage {
    /// 輸入解碼後沒有任何記錄
    File,
    /// 有記錄，但所有欄位都是空白
    Field,
}

impl fmt::Display for EmptyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyStage::File => write!(f, "file"),
            EmptyStage::Field => write!(f, "field"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Empty input ({stage} level): {message}")]
    EmptyInput { stage: EmptyStage, message: String },

    #[error("No processable records: all {total} input records were rejected")]
    NoProcessableRecords { total: usize },

    #[error("Extraction failed: {message}")]
    ExtractionError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Processing,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::MalformedInput { .. }
            | ImportError::EmptyInput { .. }
            | ImportError::CsvError(_)
            | ImportError::SerializationError(_) => ErrorCategory::Input,
            ImportError::NoProcessableRecords { .. } | ImportError::ExtractionError { .. } => {
                ErrorCategory::Processing
            }
            ImportError::ConfigError { .. }
            | ImportError::ConfigValidationError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ImportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ImportError::EmptyInput { .. } | ImportError::NoProcessableRecords { .. } => {
                ErrorSeverity::Medium
            }
            ImportError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ImportError::MalformedInput { .. } => {
                "Check that the file is UTF-8 and matches the selected input mode"
            }
            ImportError::EmptyInput {
                stage: EmptyStage::File,
                ..
            } => "The input contains no records; export the data again",
            ImportError::EmptyInput {
                stage: EmptyStage::Field,
                ..
            } => "Every field in the input is blank; check the column headers",
            ImportError::NoProcessableRecords { .. } => {
                "Make sure each record has a product id (SKU / style number) column"
            }
            ImportError::ExtractionError { .. } => {
                "Retry the extraction or supply an already-extracted JSON record"
            }
            ImportError::CsvError(_) => "Check the delimiter and quoting of the CSV file",
            ImportError::IoError(_) => "Check that the paths exist and are writable",
            ImportError::SerializationError(_) => "Check that the JSON input is well formed",
            ImportError::ConfigError { .. }
            | ImportError::ConfigValidationError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => {
                "Review the configuration file or command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::EmptyInput { stage, .. } => {
                format!("No product data was found in the input ({} level)", stage)
            }
            ImportError::NoProcessableRecords { total } => format!(
                "None of the {} records could be imported (missing or duplicate product ids)",
                total
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
