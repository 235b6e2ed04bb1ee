//! Error types for the API client.

/// Errors that can occur when requesting data from Alpha Vantage.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No API key was configured, so no request was sent.
    #[error("Alpha Vantage API key is not configured")]
    MissingApiKey,
    /// The provider rejected the credential.
    #[error("Invalid API key (HTTP {status})")]
    InvalidApiKey { status: u16 },
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The request could not be sent or the response could not be read.
    #[error("Network error")]
    Network(#[from] reqwest::Error),
    /// The base URL plus path did not form a valid URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A success response whose body is not a JSON object.
    #[error("Failed to parse response: {0}")]
    InvalidJson(String),
}

impl Error {
    /// True when the failure is about the credential rather than provider availability.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::InvalidApiKey { .. })
    }

    /// True when the provider answered 2xx but the body was unusable.
    pub fn is_payload(&self) -> bool {
        matches!(self, Self::InvalidJson(_))
    }
}
