use reqwest::StatusCode;
use serde_json::Value;

/// Errors returned by the Tomorrow.io client.
///
/// Variants that originate from an API response carry the decoded response
/// body so callers can inspect the upstream error message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API rejected the request as malformed (HTTP 400).
    #[error("malformed request: {body}")]
    MalformedRequest { body: Value },

    /// The API key was missing, invalid or unauthorized (HTTP 401/403).
    #[error("invalid or unauthorized API key: {body}")]
    InvalidApiKey { body: Value },

    /// The per-hour or per-second request quota was exceeded (HTTP 429).
    #[error("rate limit exceeded: {body}")]
    RateLimited { body: Value },

    /// The API returned a status code outside the documented set.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: Value },

    /// The request never reached the API.
    #[error("could not connect to the Tomorrow.io API")]
    CantConnect(#[source] reqwest::Error),

    /// A successful response could not be decoded into the timeline model.
    #[error("failed to decode API response")]
    Decode(#[source] reqwest::Error),

    /// The requested timestep is not valid for the endpoint.
    #[error("invalid timestep: {0}")]
    InvalidTimestep(String),

    /// The unit system string was not one of `metric`, `imperial`, `si`, `us`.
    #[error("unit system must be `metric` or `imperial`, got `{0}`")]
    InvalidUnitSystem(String),

    /// The blocking facade could not start its runtime.
    #[error("failed to start blocking runtime")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
