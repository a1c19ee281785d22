use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IBS file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("No intercept records to convert")]
    EmptyRecordSet,

    #[error("IBS report contains {count} intercepts, expected exactly 1")]
    MultipleIntercepts { count: usize },

    #[error("Failed to parse IBS report {}: {message}", .path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {}", .fields.join(", "))]
    MissingConfigError { fields: Vec<String> },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to write SG5302 report {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SG5302 report already exists: {}", .path.display())]
    OutputCollision { path: PathBuf },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputNotFound { .. }
            | Self::EmptyRecordSet
            | Self::MultipleIntercepts { .. }
            | Self::ParseError { .. }
            | Self::SerializationError(_) => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::WriteError { .. } | Self::OutputCollision { .. } => ErrorCategory::Output,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyRecordSet => ErrorSeverity::Medium,
            Self::WriteError { .. } | Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 程式結束碼，與 severity 對應
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InputNotFound { .. } => {
                "Check that the IBS report path is correct and points to a regular file".to_string()
            }
            Self::EmptyRecordSet => {
                "Verify the IBS report contains data for one intercept".to_string()
            }
            Self::MultipleIntercepts { .. } => {
                "Split the IBS report so each file describes a single intercept".to_string()
            }
            Self::ParseError { .. } | Self::SerializationError(_) => {
                "Make sure the IBS report is valid JSON".to_string()
            }
            Self::MissingConfigError { fields } => format!(
                "Add {} to the [parameters] table or set the SG5302_* environment variables",
                fields.join(", ")
            ),
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
            Self::ConfigError { .. } | Self::TomlError(_) => {
                "Make sure the config file exists and is valid TOML format".to_string()
            }
            Self::WriteError { .. } => {
                "Check that the output directory exists and is writable".to_string()
            }
            Self::OutputCollision { .. } => {
                "Wait a second and run again, or choose another output directory".to_string()
            }
            Self::IoError(_) => "Check file permissions and free disk space".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read IBS report: {}", self),
            ErrorCategory::Configuration => format!("Invalid report configuration: {}", self),
            ErrorCategory::Output => format!("Could not create SG5302 report: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
