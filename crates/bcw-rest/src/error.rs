use thiserror::Error;

/// Errors returned by the REST gateway client.
#[derive(Debug, Error)]
pub enum RestError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status. `body` carries its error
    /// payload verbatim (usually `{"code", "message", "details", "hint"}`).
    #[error("{method} {table} returned {status}: {body}")]
    Status {
        method: String,
        table: String,
        status: u16,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A count request came back without a usable `Content-Range` header.
    #[error("missing or malformed Content-Range for {table}: {value:?}")]
    MissingCount { table: String, value: Option<String> },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
