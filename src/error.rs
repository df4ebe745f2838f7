use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuardError>;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Platform query failed ({query}): {message}")]
    Platform { query: String, message: String },

    #[error("Snapshot error in {file}: {message}")]
    Snapshot { file: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GuardError {
    pub fn platform(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Platform {
            query: query.into(),
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        2
    }
}
