use crate::core::assembler::AssemblyOptions;
use crate::core::emitter::DEFAULT_OUTPUT_FILENAME;
use crate::core::filter::CircuitFilter;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaperConfig {
    pub splynx: SplynxConfig,
    #[serde(default)]
    pub shaping: ShapingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplynxConfig {
    pub api_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapingConfig {
    #[serde(default)]
    pub allowed_subnets: Vec<String>,
    #[serde(default)]
    pub ignore_subnets: Vec<String>,
    #[serde(default)]
    pub exclude_sites: Vec<String>,
    #[serde(default = "default_overhead_factor")]
    pub bandwidth_overhead_factor: f64,
    #[serde(default)]
    pub find_ipv6_using_mikrotik: bool,
    #[serde(default)]
    pub apply_subnet_filter: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_filename")]
    pub filename: String,
}

fn default_overhead_factor() -> f64 {
    1.0
}

fn default_output_path() -> String {
    ".".to_string()
}

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

impl Default for ShapingConfig {
    fn default() -> Self {
        Self {
            allowed_subnets: Vec::new(),
            ignore_subnets: Vec::new(),
            exclude_sites: Vec::new(),
            bandwidth_overhead_factor: default_overhead_factor(),
            find_ipv6_using_mikrotik: false,
            apply_subnet_filter: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            filename: default_output_filename(),
        }
    }
}

impl ShaperConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SPLYNX_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("splynx.api_url", &self.splynx.api_url)?;

        for (field, value) in [
            ("splynx.api_key", &self.splynx.api_key),
            ("splynx.api_secret", &self.splynx.api_secret),
        ] {
            validation::validate_non_empty_string(field, value)?;
            if value.contains("${") {
                return Err(EtlError::ConfigValidationError {
                    field: field.to_string(),
                    message: "environment variable placeholder was not resolved".to_string(),
                });
            }
        }

        if let Some(timeout) = self.splynx.timeout_seconds {
            if timeout == 0 {
                return Err(EtlError::InvalidConfigValueError {
                    field: "splynx.timeout_seconds".to_string(),
                    value: timeout.to_string(),
                    reason: "Timeout must be at least 1 second".to_string(),
                });
            }
        }

        validation::validate_positive_factor(
            "shaping.bandwidth_overhead_factor",
            self.shaping.bandwidth_overhead_factor,
        )?;
        validation::parse_subnets("shaping.allowed_subnets", &self.shaping.allowed_subnets)?;
        validation::parse_subnets("shaping.ignore_subnets", &self.shaping.ignore_subnets)?;

        if self.shaping.apply_subnet_filter && self.shaping.allowed_subnets.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "shaping.allowed_subnets".to_string(),
                message: "apply_subnet_filter is enabled but no allowed subnets are listed"
                    .to_string(),
            });
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_path("output.filename", &self.output.filename)?;

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.splynx.timeout_seconds.map(Duration::from_secs)
    }

    pub fn assembly_options(&self) -> Result<AssemblyOptions> {
        let filter = if self.shaping.apply_subnet_filter {
            Some(CircuitFilter::new(
                validation::parse_subnets(
                    "shaping.allowed_subnets",
                    &self.shaping.allowed_subnets,
                )?,
                validation::parse_subnets("shaping.ignore_subnets", &self.shaping.ignore_subnets)?,
                self.shaping.exclude_sites.clone(),
            ))
        } else {
            None
        };

        Ok(AssemblyOptions {
            bandwidth_overhead_factor: self.shaping.bandwidth_overhead_factor,
            filter,
        })
    }
}

impl ConfigProvider for ShaperConfig {
    fn api_url(&self) -> &str {
        &self.splynx.api_url
    }

    fn api_key(&self) -> &str {
        &self.splynx.api_key
    }

    fn api_secret(&self) -> &str {
        &self.splynx.api_secret
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_filename(&self) -> &str {
        &self.output.filename
    }
}

impl Validate for ShaperConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[splynx]
api_url = "https://splynx.example.net"
api_key = "key"
api_secret = "secret"
"#;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = ShaperConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.api_url(), "https://splynx.example.net");
        assert_eq!(config.output_path(), ".");
        assert_eq!(config.output_filename(), "ShapedDevices.csv");
        assert_eq!(config.shaping.bandwidth_overhead_factor, 1.0);
        assert!(!config.shaping.apply_subnet_filter);
        assert!(config.timeout().is_none());
        assert!(config.validate().is_ok());

        let options = config.assembly_options().unwrap();
        assert!(options.filter.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[splynx]
api_url = "https://splynx.example.net"
api_key = "key"
api_secret = "secret"
timeout_seconds = 30

[shaping]
allowed_subnets = ["100.64.0.0/10", "192.168.0.0/16"]
ignore_subnets = ["192.168.99.0/24"]
exclude_sites = ["Lab"]
bandwidth_overhead_factor = 1.15
find_ipv6_using_mikrotik = false
apply_subnet_filter = true

[output]
output_path = "/opt/libreqos/src"
filename = "ShapedDevices.csv"
"#;

        let config = ShaperConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.output_path(), "/opt/libreqos/src");

        let options = config.assembly_options().unwrap();
        assert_eq!(options.bandwidth_overhead_factor, 1.15);
        let filter = options.filter.unwrap();
        assert!(filter.is_in_allowed_subnets("100.64.3.4"));
        assert!(filter.is_in_ignored_subnets("192.168.99.10"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SHAPER_TEST_API_SECRET", "from-env");

        let toml_content = r#"
[splynx]
api_url = "https://splynx.example.net"
api_key = "key"
api_secret = "${SHAPER_TEST_API_SECRET}"
"#;

        let config = ShaperConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_secret(), "from-env");

        std::env::remove_var("SHAPER_TEST_API_SECRET");
    }

    #[test]
    fn test_unresolved_placeholder_fails_validation() {
        let toml_content = r#"
[splynx]
api_url = "https://splynx.example.net"
api_key = "${SHAPER_TEST_UNSET_KEY}"
api_secret = "secret"
"#;

        let config = ShaperConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let bad_url = MINIMAL.replace("https://splynx.example.net", "invalid-url");
        assert!(ShaperConfig::from_toml_str(&bad_url).unwrap().validate().is_err());

        let bad_subnet = format!("{}\n[shaping]\nallowed_subnets = [\"10.0.0.0/33\"]\n", MINIMAL);
        assert!(ShaperConfig::from_toml_str(&bad_subnet).unwrap().validate().is_err());

        let filter_without_subnets = format!("{}\n[shaping]\napply_subnet_filter = true\n", MINIMAL);
        assert!(ShaperConfig::from_toml_str(&filter_without_subnets)
            .unwrap()
            .validate()
            .is_err());

        let bad_factor = format!("{}\n[shaping]\nbandwidth_overhead_factor = 0.0\n", MINIMAL);
        assert!(ShaperConfig::from_toml_str(&bad_factor).unwrap().validate().is_err());
    }

    #[test]
    fn test_missing_splynx_section_is_an_error() {
        assert!(ShaperConfig::from_toml_str("[output]\noutput_path = \".\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = ShaperConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_key(), "key");
    }
}
