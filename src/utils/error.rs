use thiserror::Error;

#[derive(Error, Debug)]
pub enum CasError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("casparser failed with code {code}: {diagnostics}", code = render_exit_code(.exit_code))]
    ProcessError {
        exit_code: Option<i32>,
        diagnostics: String,
    },

    #[error("casparser did not finish within {seconds} seconds and was terminated")]
    TimeoutError { seconds: u64 },

    #[error("Failed to parse casparser output: {message}")]
    DataError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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

pub type Result<T> = std::result::Result<T, CasError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    ExternalTool,
    Data,
    System,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

fn render_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

impl CasError {
    pub fn validation(message: impl Into<String>) -> Self {
        CasError::ValidationError {
            message: message.into(),
        }
    }

    pub fn data(message: impl Into<String>) -> Self {
        CasError::DataError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CasError::ValidationError { .. } => ErrorCategory::Request,
            CasError::ProcessError { .. } | CasError::TimeoutError { .. } => {
                ErrorCategory::ExternalTool
            }
            CasError::DataError { .. } => ErrorCategory::Data,
            CasError::IoError(_) => ErrorCategory::System,
            CasError::ConfigError { .. }
            | CasError::ConfigValidationError { .. }
            | CasError::InvalidConfigValueError { .. }
            | CasError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::ExternalTool => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於呼叫端的輸入錯誤 (對應 HTTP 400)
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Request
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CasError::ValidationError { message } => message.clone(),
            CasError::ProcessError { .. } => {
                format!("The statement could not be decrypted or parsed ({})", self)
            }
            CasError::TimeoutError { seconds } => {
                format!("Parsing the statement took longer than {} seconds", seconds)
            }
            CasError::DataError { .. } => {
                "The parser produced output that could not be read".to_string()
            }
            CasError::IoError(e) => format!("A file system error occurred: {}", e),
            _ => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CasError::ValidationError { .. } => "Send both the pdfFile and password form fields",
            CasError::ProcessError { .. } => {
                "Check the statement password and that the document is a supported CAS PDF"
            }
            CasError::TimeoutError { .. } => {
                "Retry later or raise tool.timeout_seconds in the configuration"
            }
            CasError::DataError { .. } => {
                "Verify the installed casparser version writes JSON output"
            }
            CasError::IoError(_) => "Check permissions and free space of tool.work_dir",
            CasError::MissingConfigError { .. } => "Add the missing field to the configuration",
            _ => "Review the configuration file and command line flags",
        }
    }
}
