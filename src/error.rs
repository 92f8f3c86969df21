use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("No project selected")]
    NoProject { hint: String },
    #[error("Generation failed: {reason}")]
    JobFailed { reason: String },
    #[error("Gave up waiting after {attempts} status checks")]
    WatchTimedOut { attempts: u32 },
}

/// Failure of a single request to the storyboard service.
///
/// Network errors, non-2xx responses and malformed bodies all collapse into
/// this one kind; they differ only by `message`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    pub endpoint: String,
    /// HTTP status when a response was received at all
    pub status: Option<u16>,
    /// Server-supplied error code, if the body carried one
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn new(endpoint: &str, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// True for 4xx responses that will not change on retry
    pub fn is_permanent(&self) -> bool {
        matches!(self.status, Some(400..=499)) && !matches!(self.status, Some(408 | 429))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("File is too large. Maximum size is 16MB.")]
    FileTooLarge { size: u64, max: u64 },
    #[error("Invalid file type. Please upload PDF, TXT, or Fountain files.")]
    InvalidFileType { extension: String },
    #[error("Please fill in all required fields")]
    MissingFields { fields: Vec<String> },
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration save failed: {message}")]
    ConfigSaveFailed { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
    #[error("Session data is corrupt: {message}")]
    SessionCorrupt { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error.status {
                None => ErrorSeverity::High,
                Some(status) if status >= 500 => ErrorSeverity::High,
                Some(_) => ErrorSeverity::Medium,
            },
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(StorageError::ConfigDirNotFound) => ErrorSeverity::Critical,
            AppError::Storage(_) => ErrorSeverity::Medium,
        }
    }

    /// Message suitable for a toast, without the layer prefix
    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Api(e) => e.message.clone(),
            AppError::Validation(e) => e.to_string(),
            AppError::Cli(CliError::NoProject { .. }) => "No project selected".to_string(),
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Cli(CliError::NoProject { hint }) => Some(hint.clone()),
            AppError::Cli(CliError::WatchTimedOut { .. }) => {
                Some("'sbc watch' again later, or raise --timeout-secs".to_string())
            }
            AppError::Api(ApiError { status: None, .. }) => Some(
                "Check that the storyboard server is running and --base-url is correct".to_string(),
            ),
            AppError::Api(ApiError {
                status: Some(404), ..
            }) => Some("'sbc upload <file>' to create a new project".to_string()),
            AppError::Validation(ValidationError::FileTooLarge { .. }) => {
                Some("Split the screenplay or export it as plain text".to_string())
            }
            _ => None,
        }
    }
}
