use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Remote metadata source error
    #[error("idgames error: {0}")]
    Remote(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<wadshelf_lib::SettingsError> for CliError {
    fn from(e: wadshelf_lib::SettingsError) -> Self {
        Self::config(e.to_string())
    }
}

impl From<wadshelf_db::SchemaError> for CliError {
    fn from(e: wadshelf_db::SchemaError) -> Self {
        Self::database(format!("Failed to open catalog database: {}", e))
    }
}

impl From<wadshelf_core::StoreError> for CliError {
    fn from(e: wadshelf_core::StoreError) -> Self {
        Self::database(e.to_string())
    }
}

impl From<wadshelf_db::OperationError> for CliError {
    fn from(e: wadshelf_db::OperationError) -> Self {
        Self::database(e.to_string())
    }
}

impl From<wadshelf_lib::CacheError> for CliError {
    fn from(e: wadshelf_lib::CacheError) -> Self {
        Self::other(e.to_string())
    }
}

impl From<wadshelf_import::ReconcileError> for CliError {
    fn from(e: wadshelf_import::ReconcileError) -> Self {
        Self::remote(e.to_string())
    }
}

impl From<wadshelf_idgames::IdGamesError> for CliError {
    fn from(e: wadshelf_idgames::IdGamesError) -> Self {
        Self::remote(e.to_string())
    }
}
