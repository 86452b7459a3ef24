use thiserror::Error;

/// Failures reported by the forge, classified by what went wrong rather than
/// by which endpoint was called.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The credential was rejected (bad key, expired token, revoked app).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The installation, organization, or repository does not exist or is
    /// not visible to the credential.
    #[error("not found: {0}")]
    NotFound(String),

    /// The credential is valid but lacks scope for the action.
    #[error("permission denied: {0}")]
    Permission(String),

    /// The request was rejected as malformed, e.g. an unassignable login.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Anything else: connection failures, timeouts, unexpected statuses,
    /// undecodable responses.
    #[error("request failed: {0}")]
    Transport(String),
}

impl ForgeError {
    /// Maps an HTTP status code to the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => ForgeError::Auth(message),
            403 => ForgeError::Permission(message),
            404 => ForgeError::NotFound(message),
            422 => ForgeError::Validation(message),
            other => ForgeError::Transport(format!("HTTP {other}: {message}")),
        }
    }
}

impl From<octocrab::Error> for ForgeError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => {
                ForgeError::from_status(source.status_code.as_u16(), source.message.clone())
            }
            _ => ForgeError::Transport(err.to_string()),
        }
    }
}
