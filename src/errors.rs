//! Errors for this crate.
//!
//! VIP does not signal failures through HTTP status codes. Instead, the body of
//! a failed request is a JSON object with exactly two keys, `errorCode` and
//! `errorMessage`. Anything else, including bodies which are not JSON at all,
//! counts as success.

use serde::Deserialize;
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum InvalidApiUrl {
    #[error("Given URL does not start with \"http://\" or \"https://\": {0}")]
    Protocol(String),

    #[error("Given URL does not end with \"/\": {0}")]
    TrailingSlash(String),
}

aliri_braid::from_infallible!(InvalidApiUrl);

/// Errors representing failed interactions with VIP.
#[derive(thiserror::Error, Debug)]
pub enum CarminError {
    /// Error envelope sent by VIP.
    #[error("Error {code} from VIP : {message}")]
    Vip { code: i64, message: String },

    /// Connection or protocol failure (badness 100000).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Response body does not have the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Unexpected response from VIP: {0}")]
    UnexpectedResponse(String),

    #[error("API key cannot be sent as an HTTP header")]
    InvalidApiKey(#[source] reqwest::header::InvalidHeaderValue),

    #[error(transparent)]
    InvalidUrl(#[from] InvalidApiUrl),
}

impl CarminError {
    /// The VIP error code, if this error came from an error envelope.
    pub fn code(&self) -> Option<i64> {
        match self {
            CarminError::Vip { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// The error document VIP answers with when a request fails.
#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ErrorEnvelope {
    pub error_code: i64,
    pub error_message: String,
}

impl From<ErrorEnvelope> for CarminError {
    fn from(e: ErrorEnvelope) -> Self {
        CarminError::Vip {
            code: e.error_code,
            message: e.error_message,
        }
    }
}

/// Look for an error envelope in a response body.
///
/// Never fails: undecodable bodies simply are not errors.
pub fn detect_error(body: &[u8]) -> Option<ErrorEnvelope> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// Produce [CarminError::Vip] if the response body is an error envelope.
pub fn check(body: &[u8]) -> Result<(), CarminError> {
    match detect_error(body) {
        Some(envelope) => Err(envelope.into()),
        None => Ok(()),
    }
}
