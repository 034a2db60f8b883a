use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("no active course")]
    NoActiveCourse,
    #[error("unknown user `{0}`")]
    UnknownUser(String),
    #[error("{0} is required")]
    MissingId(&'static str),
    #[error("user set {user_set_id:?} references missing {missing}")]
    Dangling {
        user_set_id: Option<i64>,
        missing: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// The server-provided message for non-2xx responses.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            StoreError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
