use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Lead store request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid state code '{value}': {reason}")]
    InvalidStateCode { value: String, reason: String },

    #[error("Office dataset error: {message}")]
    DatasetError { message: String },

    #[error("Lead store returned status {status} for tracking '{tracking}'")]
    LeadStoreStatus { status: u16, tracking: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

impl ResolverError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ResolverError::ApiError(_) | ResolverError::LeadStoreStatus { .. } => {
                ErrorCategory::Network
            }
            ResolverError::CsvError(_)
            | ResolverError::SerializationError(_)
            | ResolverError::InvalidStateCode { .. }
            | ResolverError::DatasetError { .. } => ErrorCategory::Data,
            ResolverError::ConfigValidationError { .. }
            | ResolverError::InvalidConfigValueError { .. }
            | ResolverError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ResolverError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the lead store: {}", self),
            ErrorCategory::Data => format!("Invalid data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ResolverError::ApiError(_) | ResolverError::LeadStoreStatus { .. } => {
                "Check that lead_store.endpoint is reachable, or switch lead_store.type to csv/memory"
            }
            ResolverError::CsvError(_) => {
                "Check that the leads CSV has a header row with tracking,name,email,telephone,cpf,city,state"
            }
            ResolverError::SerializationError(_) => "Check the JSON returned by the lead store",
            ResolverError::InvalidStateCode { .. } => "Use a two-letter state code such as SP or RJ",
            ResolverError::DatasetError { .. } => {
                "Check the offices dataset: one entry per state, default_state must be listed"
            }
            ResolverError::ConfigValidationError { .. }
            | ResolverError::InvalidConfigValueError { .. }
            | ResolverError::MissingConfigError { .. } => {
                "Fix the configuration file and run again"
            }
            ResolverError::IoError(_) => "Check that the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
