use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure taxonomy shared by every client operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// No usable response: connection failure, timeout, or a 2xx body that
    /// could not be decoded.
    #[error("network or transport failure: {0}")]
    Transport(String),

    /// The server rejected the request with a non-2xx status other than 401.
    #[error("request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The server answered 401. The local session has already been cleared
    /// by the time this error is returned.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// Composite-key resolution found no matching showtime in a freshly
    /// fetched collection (e.g. it was deleted by someone else meanwhile).
    #[error("no showtime for play {play_id} at {date_and_time}")]
    NotFoundLocally {
        play_id: i64,
        date_and_time: DateTime<Utc>,
    },

    /// A client-side pre-submit check failed; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl ClientError {
    /// True when the server turned down a booking because the seat was taken
    /// in the meantime. The caller should re-fetch availability and let the
    /// user pick another seat rather than retry the same one.
    pub fn is_booking_conflict(&self) -> bool {
        matches!(
            self,
            ClientError::RequestFailed { status, .. } if *status == 400 || *status == 409
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
