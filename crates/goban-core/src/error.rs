//! Error types for the Goban load-test harness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that can occur while driving the remote game service
#[derive(Error, Debug, Clone)]
pub enum HarnessError {
    // === Account operations ===
    /// Encryption public key could not be fetched
    #[error("encryption public key unavailable")]
    KeyUnavailable,

    /// Password encryption failed
    #[error("password encryption failed: {0}")]
    Encryption(String),

    // === Transport / envelope ===
    /// Connection, timeout or HTTP-level failure
    #[error("transport failure: {0}")]
    Transport(String),

    /// Response body was not the expected envelope
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Business-level rejection carried in the success envelope
    #[error("rejected by service: [{code:?}] {message}")]
    Rejected {
        code: Option<i64>,
        message: String,
    },

    // === Orchestration ===
    /// Neither observed player id matched a local participant
    #[error("cannot bind colors: observed black={black:?} white={white:?}")]
    RoleResolution {
        black: Option<String>,
        white: Option<String>,
    },

    /// Polled condition never held within the attempt budget
    #[error("condition not met after {attempts} polls")]
    PollTimeout { attempts: u32 },

    /// Game still in progress after the round budget
    #[error("game not finished after {rounds} rounds")]
    RoundLimit { rounds: u32 },

    // === General ===
    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl HarnessError {
    /// Stable key used when tallying failures by type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::KeyUnavailable => "key_unavailable",
            Self::Encryption(_) => "encryption",
            Self::Transport(_) => "transport",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Rejected { .. } => "rejected",
            Self::RoleResolution { .. } => "role_resolution",
            Self::PollTimeout { .. } => "poll_timeout",
            Self::RoundLimit { .. } => "round_limit",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }

    /// Check if a later iteration could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::PollTimeout { .. } | Self::RoundLimit { .. }
        )
    }
}
