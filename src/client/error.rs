//! Error taxonomy for calls against the wake backend

/// Exchanging a PIN for a token failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Please enter a PIN")]
    EmptyPin,

    #[error("Invalid PIN")]
    InvalidPin,

    #[error("Too many authentication attempts. Please wait.")]
    RateLimited,

    #[error("Session expired, please authenticate again")]
    Unauthorized,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Cannot connect to server: {0}")]
    Transport(String),
}

impl AuthError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Unauthorized)
    }
}

/// A status poll failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Cannot connect to server: {0}")]
    Transport(String),
}

impl PollError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PollError::Unauthorized)
    }
}

/// A wake or unlock request failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    InvalidPassphrase(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Cannot connect to server: {0}")]
    Transport(String),
}

impl ActionError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ActionError::Unauthorized)
    }
}

impl From<PollError> for AuthError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::Unauthorized => AuthError::Unauthorized,
            PollError::Server { status, message } => AuthError::Server { status, message },
            PollError::Transport(msg) => AuthError::Transport(msg),
        }
    }
}
