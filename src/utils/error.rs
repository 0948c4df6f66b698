use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Unexpected response shape from {resource}: {source}")]
    SchemaError {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Service {service_id} references unknown router {router_id}")]
    MissingRouterError {
        service_id: String,
        router_id: String,
    },

    #[error("Service {service_id} references unknown tariff {tariff_id}")]
    MissingTariffError {
        service_id: String,
        tariff_id: String,
    },

    #[error("Customer {customer_id} is not in the customer directory")]
    MissingCustomerError { customer_id: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
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
    Network,
    Schema,
    Integrity,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Network,
            EtlError::SchemaError { .. } | EtlError::SerializationError(_) => {
                ErrorCategory::Schema
            }
            EtlError::MissingRouterError { .. }
            | EtlError::MissingTariffError { .. }
            | EtlError::MissingCustomerError { .. } => ErrorCategory::Integrity,
            EtlError::CsvError(_) | EtlError::IoError(_) => ErrorCategory::Output,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重跑即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Schema | ErrorCategory::Integrity => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::HttpStatusError { status: 401, .. }
            | EtlError::HttpStatusError { status: 403, .. } => {
                "Check the Splynx API key/secret and that the key has admin read access".to_string()
            }
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => {
                "Check that the Splynx API URL is reachable and re-run the export".to_string()
            }
            EtlError::SchemaError { resource, .. } => format!(
                "The Splynx response for '{}' is missing expected fields; check the API version",
                resource
            ),
            EtlError::SerializationError(_) => {
                "Inspect the API response body for malformed JSON".to_string()
            }
            EtlError::MissingRouterError { router_id, .. } => format!(
                "Add router {} in Splynx or reassign the service to an existing router",
                router_id
            ),
            EtlError::MissingTariffError { tariff_id, .. } => format!(
                "Tariff {} is not in the internet tariff catalog; fix the service's tariff",
                tariff_id
            ),
            EtlError::MissingCustomerError { .. } => {
                "Customer list changed while exporting; re-run the export".to_string()
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the configuration file and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch data from Splynx: {}", self),
            ErrorCategory::Schema => format!("Splynx returned unexpected data: {}", self),
            ErrorCategory::Integrity => format!("Splynx data is inconsistent: {}", self),
            ErrorCategory::Output => format!("Could not write ShapedDevices.csv: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
