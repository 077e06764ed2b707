use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The backend could not be reached within the server-selection timeout.
    #[error("store connection failed: {0}")]
    ConnectionFailure(String),

    /// Payload rejected before reaching the backend.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required argument was absent.
    #[error("missing arguments: {0}")]
    MissingArguments(&'static str),

    /// The backend failed while executing a read/insert/update/delete.
    #[error("query failed: {0}")]
    QueryFailure(String),

    #[error("config: {0}")]
    Config(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<shelterdash_core::Error> for Error {
    fn from(e: shelterdash_core::Error) -> Self {
        match e {
            shelterdash_core::Error::Config(msg) => Error::Config(msg),
            other => Error::InvalidInput(other.to_string()),
        }
    }
}
