use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::play::Play;

/// A scheduled performance of a play.
///
/// Showtimes have no surrogate id: identity is the `(play_id, date_and_time)`
/// pair. The instant is parsed into `DateTime<Utc>` on deserialization, so
/// two representations of the same moment with different offsets compare
/// equal. Comparing the raw strings instead would be wrong.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Showtime {
    pub play_id: i64,
    pub date_and_time: DateTime<Utc>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub available_seats: Option<i64>,
    // Denormalized play record, present on list responses
    #[serde(default)]
    pub play: Option<Play>,
}

impl Showtime {
    pub fn key(&self) -> ShowtimeKey {
        ShowtimeKey {
            play_id: self.play_id,
            date_and_time: self.date_and_time,
        }
    }
}

/// Composite identity of a showtime. Also serializes to the body of the
/// keyed `DELETE /showtimes/` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowtimeKey {
    pub play_id: i64,
    pub date_and_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowtimeDraft {
    pub play_id: i64,
    pub date_and_time: DateTime<Utc>,
    pub venue: String,
}

/// Body of the keyed update; the original identity travels in the query
/// string, only the replacement instant goes here.
#[derive(Debug, Clone, Serialize)]
pub struct ShowtimeUpdate {
    pub date_and_time: DateTime<Utc>,
}
