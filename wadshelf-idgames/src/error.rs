use wadshelf_core::RemoteError;

/// Errors that can occur while talking to the idgames API.
#[derive(Debug, thiserror::Error)]
pub enum IdGamesError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<IdGamesError> for RemoteError {
    fn from(e: IdGamesError) -> Self {
        match e {
            IdGamesError::Http(_) | IdGamesError::ServerError { .. } => {
                RemoteError::Unreachable(e.to_string())
            }
            IdGamesError::Api(_) | IdGamesError::Json(_) => RemoteError::Malformed(e.to_string()),
        }
    }
}
