use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("invalid app id: {0}")]
    InvalidAppId(String),

    #[error("failed to read input list at {path}: {message}")]
    InputRead { path: Utf8PathBuf, message: String },

    #[error("malformed input row {row}: {message}")]
    InputParse { row: u64, message: String },

    #[error("config file not found: {0}")]
    MissingConfig(Utf8PathBuf),

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid config value: {0}")]
    InvalidConfig(String),

    #[error("store request failed: {0}")]
    StoreHttp(String),

    #[error("store returned status {status}: {message}")]
    StoreStatus { status: u16, message: String },

    #[error("store response for app {app_id} is unusable: {message}")]
    StorePayload { app_id: u32, message: String },

    #[error("failed to read API key: {0}")]
    Credential(String),

    #[error("failed to write report: {0}")]
    ReportWrite(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl ReportError {
    /// True for the errors that abort a run before any fetching starts.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ReportError::InvalidAppId(_)
                | ReportError::InputRead { .. }
                | ReportError::InputParse { .. }
        )
    }
}
