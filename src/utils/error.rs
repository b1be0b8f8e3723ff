use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Data file not found: {path}")]
    DataNotFound { path: String },

    #[error("No data rows in {source_name}")]
    NoRows { source_name: String },

    #[error("No numeric values for field '{field}'")]
    NoUsableValues { field: String },

    #[error("Missing column '{column}'")]
    MissingColumn { column: String },

    #[error("Value {value} for '{field}' is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: i64,
        max: i64,
    },

    #[error("Regression needs at least {needed} points, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    #[error("Regression inputs differ in length: {x} x-values, {y} y-values")]
    LengthMismatch { x: usize, y: usize },

    #[error("Regression input has no variance in the independent variable")]
    DegenerateInput,

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Object store error: {message}")]
    ObjectStoreError { message: String },

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

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Compute,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ForecastError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DataNotFound { .. }
            | Self::NoRows { .. }
            | Self::NoUsableValues { .. }
            | Self::MissingColumn { .. }
            | Self::OutOfRange { .. }
            | Self::CsvError(_) => ErrorCategory::Data,
            Self::InsufficientPoints { .. }
            | Self::LengthMismatch { .. }
            | Self::DegenerateInput
            | Self::SerializationError(_) => ErrorCategory::Compute,
            Self::IoError(_) | Self::HttpError(_) | Self::ObjectStoreError { .. } => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Compute => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// HTTP status for this error. Every route maps errors through here.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::DataNotFound { .. } => 404,
            _ => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DataNotFound { .. } => "Check that the dataset CSV exists under the data directory",
            Self::NoRows { .. } | Self::NoUsableValues { .. } | Self::MissingColumn { .. } => {
                "Regenerate the dataset; it is empty or missing expected columns"
            }
            Self::OutOfRange { .. } => "Check the dataset for mistyped values",
            Self::CsvError(_) => "Check the CSV file for malformed lines",
            Self::InsufficientPoints { .. } | Self::DegenerateInput => {
                "The series needs at least two distinct years"
            }
            Self::LengthMismatch { .. } | Self::SerializationError(_) => {
                "This is an internal error; please report it"
            }
            Self::IoError(_) => "Check file permissions and disk state",
            Self::HttpError(_) | Self::ObjectStoreError { .. } => {
                "Check object store connectivity and credentials"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or command-line flags",
        }
    }

    /// Short message safe to show to API clients.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DataNotFound { .. } => "Data file not found".to_string(),
            Self::NoRows { .. } => "No data available".to_string(),
            e if e.category() == ErrorCategory::Configuration => {
                format!("Configuration problem: {}", e)
            }
            _ => "Failed to process data".to_string(),
        }
    }
}
