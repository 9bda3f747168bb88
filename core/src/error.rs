use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Graph API call failed ({status}): {message}")]
    GraphApi { status: u16, message: String },

    #[error("Document library '{name}' not found")]
    LibraryNotFound { name: String },

    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(String),

    #[error("Data source '{name}' is not connected")]
    NotConnected { name: String },

    #[error("Data source '{name}' unavailable: {reason}")]
    SourceUnavailable { name: String, reason: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No active session")]
    NotSignedIn,

    #[error("Invalid month key '{0}': expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("Invalid quarter '{0}': expected Q1..Q4")]
    InvalidQuarter(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashResult<T> = Result<T, DashError>;
