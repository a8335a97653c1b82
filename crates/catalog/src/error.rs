//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, same as every other crate in the workspace.

use crate::models::CatalogId;
use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The catalog holds no record for the identifier.
    #[display("no catalog record for id {_0}")]
    NotFound(#[error(not(source))] CatalogId),
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The catalog answered with a status code we don't know how to handle.
    #[display("catalog responded with HTTP {status}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
    },
    /// The response body did not match the expected shape.
    #[display("invalid catalog response")]
    InvalidResponse,
    /// The configured API URL could not be used as a base URL.
    #[display("invalid catalog URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status } => *status >= 500,
            _ => false,
        }
    }
}
