use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("Version must start with 'v': {0}")]
    MissingPrefix(String),

    #[error("Invalid version number in {token}: {segment:?}")]
    InvalidNumber { token: String, segment: String },

    #[error("Too many version segments: {0}")]
    TooManySegments(String),
}
