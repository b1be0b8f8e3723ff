use crate::core::ConfigProvider;
use crate::domain::model::CachePolicy;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub datasets: DatasetFiles,
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Per-endpoint overrides keyed by route name, e.g. `[cache.park-coverage]`.
    #[serde(default)]
    pub cache: HashMap<String, CachePolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Local,
    Http,
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    pub base_url: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub prefix: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Local,
            data_dir: default_data_dir(),
            base_url: None,
            bucket: None,
            region: None,
            prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetFiles {
    pub school: String,
    pub hospital: String,
    pub park: String,
    pub housing_road: String,
    pub ai_planning: String,
    pub sustainability: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            school: "school_coverage_predictions.csv".to_string(),
            hospital: "hospital_coverage_predictions.csv".to_string(),
            park: "park_coverage_predictions.csv".to_string(),
            housing_road: "housing_road_analysis.csv".to_string(),
            ai_planning: "ai_planning_impact.csv".to_string(),
            sustainability: "sustainable_resources.csv".to_string(),
        }
    }
}

impl DatasetFiles {
    pub fn all(&self) -> [&str; 6] {
        [
            self.school.as_str(),
            self.hospital.as_str(),
            self.park.as_str(),
            self.housing_road.as_str(),
            self.ai_planning.as_str(),
            self.sustainability.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub target_year: i32,
    pub milestone_year: i32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            target_year: 2030,
            milestone_year: 2027,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Built-in `Cache-Control` windows per endpoint.
pub fn default_cache_policy(endpoint: &str) -> CachePolicy {
    match endpoint {
        "ai-planning-impact" => CachePolicy::new(120, 300),
        "sustainable-resources" => CachePolicy::new(60, 300),
        "infrastructure-totals" => CachePolicy::new(300, 300),
        _ => CachePolicy::new(300, 600),
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForecastError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ForecastError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ForecastError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("server.bind", &self.server.bind)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;

        match self.storage.kind {
            StorageKind::Local => {
                validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
            }
            StorageKind::Http => {
                let base_url =
                    validation::validate_required_field("storage.base_url", &self.storage.base_url)?;
                validation::validate_url("storage.base_url", base_url)?;
            }
            StorageKind::S3 => {
                let bucket =
                    validation::validate_required_field("storage.bucket", &self.storage.bucket)?;
                validation::validate_s3_bucket_name("storage.bucket", bucket)?;
                let region =
                    validation::validate_required_field("storage.region", &self.storage.region)?;
                validation::validate_aws_region("storage.region", region)?;
            }
        }

        let files = self.datasets.all();
        for file in files {
            validation::validate_object_key("datasets", file)?;
        }
        validation::validate_file_extensions("datasets", &files, &["csv"])?;

        validation::validate_range("forecast.target_year", self.forecast.target_year, 2000, 2100)?;
        validation::validate_range(
            "forecast.milestone_year",
            self.forecast.milestone_year,
            2000,
            self.forecast.target_year,
        )?;

        for (endpoint, policy) in &self.cache {
            validation::validate_range(&format!("cache.{}.max_age", endpoint), policy.max_age, 0, 86_400)?;
            validation::validate_range(
                &format!("cache.{}.stale_while_revalidate", endpoint),
                policy.stale_while_revalidate,
                0,
                86_400,
            )?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn target_year(&self) -> i32 {
        self.forecast.target_year
    }

    fn milestone_year(&self) -> i32 {
        self.forecast.milestone_year
    }

    fn cache_policy(&self, endpoint: &str) -> CachePolicy {
        self.cache
            .get(endpoint)
            .copied()
            .unwrap_or_else(|| default_cache_policy(endpoint))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
