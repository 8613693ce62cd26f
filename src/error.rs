use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Jira API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode Jira response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for 401/403 responses, which usually mean bad credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Api { status: 401 | 403, .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
