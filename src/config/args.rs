use crate::core::normalizer::NormalizeSettings;
use crate::core::ConfigProvider;
use crate::domain::model::InputMode;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "product-normalizer")]
#[command(about = "Normalize product exports into a bulk-import table")]
pub struct CliConfig {
    #[arg(long, help = "Input file (JSON, CSV/TSV, or raw input for extraction)")]
    pub input: String,

    #[arg(long, value_enum, default_value = "structured-json")]
    pub mode: InputMode,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub formats: Vec<String>,

    #[arg(long, help = "Fill Variant Image on primary rows in flexible-csv mode")]
    pub variant_image_in_csv_mode: bool,

    #[arg(long, help = "Vendor used when a record has none")]
    pub vendor: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn input_mode(&self) -> InputMode {
        self.mode
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn settings(&self) -> NormalizeSettings {
        let mut settings = NormalizeSettings {
            variant_image_in_csv_mode: self.variant_image_in_csv_mode,
            ..Default::default()
        };
        if let Some(vendor) = &self.vendor {
            settings.defaults.vendor = vendor.clone();
        }
        settings
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("formats", &self.formats)?;
        validation::validate_input_extension("input", &self.input, self.mode)?;
        if let Some(vendor) = &self.vendor {
            validation::validate_non_empty_string("vendor", vendor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_flags() {
        let config = CliConfig::parse_from([
            "product-normalizer",
            "--input",
            "export.csv",
            "--mode",
            "flexible-csv",
            "--formats",
            "csv,tsv",
            "--vendor",
            "Acme",
        ]);

        assert_eq!(config.input_mode(), InputMode::FlexibleCsv);
        assert_eq!(config.output_formats(), &["csv".to_string(), "tsv".to_string()]);
        assert_eq!(config.settings().defaults.vendor, "Acme");
        assert!(!config.settings().variant_image_in_csv_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_extension() {
        let config = CliConfig::parse_from([
            "product-normalizer",
            "--input",
            "export.csv",
            "--mode",
            "structured-json",
        ]);

        assert!(config.validate().is_err());
    }
}
