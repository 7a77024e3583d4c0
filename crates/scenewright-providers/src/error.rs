//! Provider errors.
//!
//! Unlike engine replies, a failed model call is not something the model can
//! recover from, so these propagate and end the run.

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("request to model API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode model API response: {0}")]
    Parse(String),
    #[error("model API returned no choices")]
    NoChoices,
    #[error("no API key configured")]
    MissingApiKey,
}

impl ProviderError {
    /// Rate limits and server-side failures; surfaced in the progress stream
    /// so the user knows a retry may help.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
