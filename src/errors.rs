use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Image fetch failed: {status}")]
    Fetch { status: u16 },

    #[error("Upload failed: {status}")]
    Upload { status: u16 },

    #[error("Media creation failed: {status}")]
    MediaCreation { status: u16 },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Menu registration error: {0}")]
    MenuRegistration(String),
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn auth(message: &str) -> Self {
        Self::Auth(message.to_string())
    }

    pub fn config(message: &str) -> Self {
        Self::Config(message.to_string())
    }

    /// HTTP status carried by the API-call variants, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            AppError::Fetch { status }
            | AppError::Upload { status }
            | AppError::MediaCreation { status } => Some(*status),
            _ => None,
        }
    }

    /// True when the remote photo API rejected our bearer token. Only the
    /// two authenticated calls count; a 401 from the image's own host is
    /// not a reason to re-authenticate with the API.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::Upload { status: 401 } | AppError::MediaCreation { status: 401 }
        )
    }
}
