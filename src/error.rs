use thiserror::Error;

use crate::types::RepoError;

pub type Result<T, E = DigestError> = std::result::Result<T, E>;

/// Failures a digest run can hit, grouped by where they originate.
#[derive(Debug, Error)]
pub enum DigestError {
    /// A required setting is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The hosting API could not be reached or answered with an error status.
    #[error("GitHub request failed: {route}")]
    Transport {
        route: String,
        #[source]
        source: octocrab::Error,
    },

    /// An item returned by the API does not have the expected shape.
    #[error("malformed {kind} #{number}: {reason}")]
    Mapping {
        kind: &'static str,
        number: u64,
        reason: String,
    },
}

impl DigestError {
    pub fn configuration(message: impl Into<String>) -> Self {
        DigestError::Configuration(message.into())
    }

    pub fn mapping(kind: &'static str, number: u64, reason: impl Into<String>) -> Self {
        DigestError::Mapping {
            kind,
            number,
            reason: reason.into(),
        }
    }
}

impl From<RepoError> for DigestError {
    fn from(err: RepoError) -> Self {
        DigestError::Configuration(err.to_string())
    }
}
