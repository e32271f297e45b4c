use crate::domain::model::InputMode;
use crate::utils::error::{ImportError, Result};
use std::collections::HashSet;

pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(field_name: &str, files: &[String], allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<String> = allowed_extensions.iter().map(|e| e.to_ascii_lowercase()).collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(&extension.to_ascii_lowercase()) {
                return Err(ImportError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(ImportError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

/// 依輸入模式檢查副檔名；擷取模式的原始輸入不限格式
pub fn validate_input_extension(field_name: &str, path: &str, mode: InputMode) -> Result<()> {
    let allowed: &[&str] = match mode {
        InputMode::StructuredJson => &["json"],
        InputMode::FlexibleCsv | InputMode::Reproject => &["csv", "tsv", "txt"],
        InputMode::Extracted => return Ok(()),
    };
    validate_file_extensions(field_name, &[path.to_string()], allowed)
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(ImportError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    for format in formats {
        if !OUTPUT_FORMATS.contains(&format.to_ascii_lowercase().as_str()) {
            return Err(ImportError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    OUTPUT_FORMATS.join(", ")
                ),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ImportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", "data/export.csv").is_ok());
        assert!(validate_path("input", "").is_err());
        assert!(validate_path("input", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["data.csv".to_string(), "lookup.TSV".to_string()];
        assert!(validate_file_extensions("input", &files, &["csv", "tsv"]).is_ok());

        let invalid_files = vec!["data.xlsx".to_string()];
        assert!(validate_file_extensions("input", &invalid_files, &["csv", "tsv"]).is_err());
    }

    #[test]
    fn test_validate_input_extension_per_mode() {
        assert!(validate_input_extension("input", "a.json", InputMode::StructuredJson).is_ok());
        assert!(validate_input_extension("input", "a.csv", InputMode::StructuredJson).is_err());
        assert!(validate_input_extension("input", "a.tsv", InputMode::Reproject).is_ok());
        assert!(validate_input_extension("input", "photo.jpg", InputMode::Extracted).is_ok());
    }

    #[test]
    fn test_validate_output_formats() {
        assert!(validate_output_formats("formats", &["csv".to_string(), "JSON".to_string()]).is_ok());
        assert!(validate_output_formats("formats", &["xml".to_string()]).is_err());
        assert!(matches!(
            validate_output_formats("formats", &[]),
            Err(ImportError::MissingConfigError { .. })
        ));
    }
}
