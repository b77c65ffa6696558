// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{ReportError, Result};
use crate::models::SpecCategory;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub links: LinkConfig,
    pub render: RenderConfig,
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Base URLs used when synthesizing links for parts, brands and images.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkConfig {
    pub brand_base_url: String,
    pub part_search_url: String,
    pub image_base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    pub template_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub parallel_workers: usize,
    pub max_file_size_mb: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Replaces the built-in spec keyword sets when non-empty. Order is priority.
    #[serde(default)]
    pub spec_rules: Vec<SpecRule>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpecRule {
    pub category: SpecCategory,
    pub keywords: Vec<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            brand_base_url: "https://eeuroparts.com/".to_string(),
            part_search_url: "https://eeuroparts.com/parts/search?q=".to_string(),
            image_base_url: "https://admin.eeuroparts.com/var/theme/images/".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GUIDE_REPORT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ReportError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ReportError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            links: LinkConfig::default(),
            render: RenderConfig {
                template_path: None,
                output_dir: PathBuf::from("."),
            },
            pipeline: PipelineConfig {
                parallel_workers: 4,
                max_file_size_mb: 16,
            },
            extraction: ExtractionConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pipeline.parallel_workers == 0 {
            return Err(ReportError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.max_file_size_mb == 0 {
            return Err(ReportError::Config(
                "max_file_size_mb must be greater than 0".to_string(),
            ));
        }

        for (name, url) in [
            ("brand_base_url", &self.links.brand_base_url),
            ("part_search_url", &self.links.part_search_url),
            ("image_base_url", &self.links.image_base_url),
        ] {
            Validator::validate_url(url).map_err(|_| {
                ReportError::Config(format!("{} must be an http(s) URL, got {:?}", name, url))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert!(config.extraction.spec_rules.is_empty());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default_config();
        config.pipeline.parallel_workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let mut config = Config::default_config();
        config.links.brand_base_url = "eeuroparts.com/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.toml");
        fs::write(
            &path,
            r#"
[links]
brand_base_url = "https://brands.example.com/"
part_search_url = "https://parts.example.com/search?q="
image_base_url = "https://img.example.com/"

[render]
output_dir = "out"

[pipeline]
parallel_workers = 2
max_file_size_mb = 8

[[extraction.spec_rules]]
category = "VehicleWeight"
keywords = ["weight", "towing"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.links.brand_base_url, "https://brands.example.com/");
        assert_eq!(config.pipeline.parallel_workers, 2);
        assert!(config.render.template_path.is_none());
        assert_eq!(config.extraction.spec_rules.len(), 1);
        assert_eq!(
            config.extraction.spec_rules[0].category,
            SpecCategory::VehicleWeight
        );
    }
}
