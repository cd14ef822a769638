//! Error types for the ORCID resolver.

/// Errors that can occur while resolving an ORCID.
#[derive(Debug, thiserror::Error)]
pub enum OrcidError {
    /// Caller passed a blank last name or no DOIs. No request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// ORCID API returned an error status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The configured base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Failed to parse the XML response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The service answered outside the at-most-one-match contract.
    #[error("Unexpected response from ORCID service: {0}")]
    UnexpectedResponse(String),

    /// The service returned an identifier that fails the checksum.
    #[error("Invalid ORCID returned by service: {0}")]
    InvalidOrcid(String),
}

impl OrcidError {
    /// Whether this is an I/O-class failure (network, HTTP status or an
    /// unreadable body) as opposed to a caller or contract error.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            OrcidError::Http(_) | OrcidError::Api { .. } | OrcidError::Parse(_)
        )
    }
}

/// Convenience alias for Results using [`OrcidError`].
pub type Result<T> = std::result::Result<T, OrcidError>;
