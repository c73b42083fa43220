//! Internal failure classification for gateway calls.

/// Failure of a single GitHub API call.
///
/// Classified for logging and tests; public gateway methods convert these
/// into `Option`/[`MutationOutcome`](crate::MutationOutcome) values before
/// returning, per the gateway's no-propagation rule.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: connection, TLS, or timeout.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// GitHub answered with a non-2xx status.
    #[error("GitHub returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded as the expected JSON shape.
    #[error("Response decoding failed: {message}")]
    Decode { message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
