use reqwest::StatusCode;
use thiserror::Error;
pub use url::ParseError as UrlParseError;

/// Error types for the OpenVox client.
#[derive(Error, Debug)]
pub enum OpenVoxError {
    /// The server answered with an error envelope or a non-success status.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status of the failed response.
        status: StatusCode,
        /// Message taken from the `Error` field, or the status reason.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error parsing URL.
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] UrlParseError),

    /// The API endpoint/path string is invalid.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Error serializing or deserializing JSON.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A success body carried neither `Data` nor `Error`.
    #[error("Response body is not a recognized envelope")]
    MissingEnvelope,

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    /// The CA has no certificate with this name.
    #[error("Certificate {0} not found")]
    CertificateNotFound(String),

    /// The CA answered with a status the operation does not accept.
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),

    /// Reading TLS material from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for OpenVox client operations.
pub type OpenVoxResult<T> = Result<T, OpenVoxError>;
