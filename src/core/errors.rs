use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnkifyError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Reqwest(Box<reqwest::Error>),

    /// Non-success HTTP response. Displays the body verbatim since that is what the
    /// backend wants the user to read.
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from server.")]
    UnexpectedResponse,

    #[error("{0}")]
    Validation(String),

    #[error("AnkifyError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for AnkifyError {
    fn from(error: std::io::Error) -> Self {
        AnkifyError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for AnkifyError {
    fn from(error: reqwest::Error) -> Self {
        AnkifyError::Reqwest(Box::new(error))
    }
}
