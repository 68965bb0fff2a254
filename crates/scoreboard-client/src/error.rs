/// Failures seen by the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("admin role required")]
    AdminRoleRequired,

    /// Non-success response; message is the server's `error` field when present.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
