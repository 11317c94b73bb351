//! Error types for the NLx402 HTTP client.

use reqwest::StatusCode;

/// Errors that can occur while driving the NLx402 payment flow.
///
/// The first two variants are raised before any network call is made;
/// the rest map one HTTP round trip's failure modes. Individual missing
/// or mistyped JSON fields are not errors (they decode to zero values,
/// see the `nlx402` crate), but an unparsable document always is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required caller input was missing or unusable. No request was sent.
    #[error("{context}")]
    InvalidArgument {
        /// Which input was rejected and by which operation.
        context: &'static str,
    },

    /// The operation needs an API key but none is set. No request was sent.
    #[error("API key is required but not set")]
    AuthRequired,

    /// The request failed at the transport level (DNS, connect, TLS,
    /// timeout, or reading the response body).
    #[error("HTTP error: {context}: {source}")]
    Transport {
        /// Human-readable request context (e.g. `"GET /protected"`).
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("request failed with status {status}: {context}: {body}")]
    Api {
        /// Human-readable request context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body, preserved for diagnostics.
        body: String,
    },

    /// A JSON body could not be decoded (or, rarely, a request payload
    /// could not be serialized).
    #[error("JSON error: {context}: {source}")]
    Decode {
        /// Human-readable request context.
        context: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
