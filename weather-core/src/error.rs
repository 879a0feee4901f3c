use thiserror::Error;

/// Failure of a single provider request.
///
/// Every provider operation surfaces one of these kinds; nothing is retried.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Transport-level failure or a non-success HTTP status.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// A successful response lacked an expected field or could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Coordinates outside the WGS84 ranges.
    #[error(
        "Invalid coordinates ({latitude}, {longitude}): latitude must be within -90..=90, \
         longitude within -180..=180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl RetrievalError {
    pub(crate) fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure(message.into())
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}
