//! showtimes.rs
//!
//! Showtime listing plus the composite-key edit and delete flows.
//!
//! Showtimes have no surrogate id, so every edit or delete first resolves
//! its target by `(play_id, instant)` against a freshly fetched collection.
//! Instants are compared after parsing; the same moment can arrive as
//! `...T18:00:00Z` from the server and `...T20:00:00+02:00` from a form, and
//! the two must match.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::info;

use crate::api_client::ApiClient;
use crate::error::ClientError;
use crate::models::{SeatAvailability, Showtime, ShowtimeDraft, ShowtimeKey, ShowtimeUpdate};

/// Combines separately entered date and time fields into one UTC instant.
pub fn combine_date_time(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Finds the showtime matching `key` in a fetched collection. A miss is
/// `NotFoundLocally`, e.g. when another admin deleted the showtime between
/// the fetch and the edit; callers surface it distinctly from network
/// failures.
pub fn resolve<'a>(
    showtimes: &'a [Showtime],
    key: &ShowtimeKey,
) -> Result<&'a Showtime, ClientError> {
    showtimes
        .iter()
        .find(|st| st.key() == *key)
        .ok_or(ClientError::NotFoundLocally {
            play_id: key.play_id,
            date_and_time: key.date_and_time,
        })
}

#[derive(Clone)]
pub struct ShowtimeService {
    api: ApiClient,
}

impl ShowtimeService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Showtime>, ClientError> {
        self.api.get(self.api.endpoint(&["showtimes", ""])).await
    }

    pub async fn list_for_play(&self, play_id: i64) -> Result<Vec<Showtime>, ClientError> {
        let url = self.api.endpoint(&["showtimes", &play_id.to_string()]);
        self.api.get(url).await
    }

    pub async fn create(&self, draft: &ShowtimeDraft) -> Result<Showtime, ClientError> {
        let url = self.api.endpoint(&["showtimes", ""]);
        let created: Showtime = self.api.post(url, draft).await?;
        info!(play_id = created.play_id, "showtime created");
        Ok(created)
    }

    /// Seat availability for one showtime; the timestamp travels inside the
    /// request path.
    pub async fn available_seats(
        &self,
        key: &ShowtimeKey,
    ) -> Result<Vec<SeatAvailability>, ClientError> {
        let url = self.api.endpoint(&[
            "showtimes",
            &key.play_id.to_string(),
            &key.date_and_time.to_rfc3339(),
            "available-seats",
        ]);
        self.api.get(url).await
    }

    /// Keyed update: the original identity rides in the query string so the
    /// server can locate the row, and the body carries only the replacement
    /// instant. The new value plays no part in identifying the target.
    pub async fn update(
        &self,
        original: &ShowtimeKey,
        new_date: NaiveDate,
        new_time: NaiveTime,
    ) -> Result<Showtime, ClientError> {
        let mut url = self.api.endpoint(&["showtimes", "update"]);
        url.query_pairs_mut()
            .append_pair("play_id", &original.play_id.to_string())
            .append_pair("original_date_time", &original.date_and_time.to_rfc3339());
        let body = ShowtimeUpdate {
            date_and_time: combine_date_time(new_date, new_time),
        };
        let updated: Showtime = self.api.put(url, &body).await?;
        info!(
            play_id = original.play_id,
            from = %original.date_and_time,
            to = %body.date_and_time,
            "showtime rescheduled"
        );
        Ok(updated)
    }

    /// Deletes by composite key. Callers must have collected explicit user
    /// confirmation before invoking this; the service itself never prompts.
    pub async fn delete(&self, key: &ShowtimeKey) -> Result<(), ClientError> {
        let url = self.api.endpoint(&["showtimes", ""]);
        self.api.delete(url, Some(key)).await?;
        info!(play_id = key.play_id, at = %key.date_and_time, "showtime deleted");
        Ok(())
    }
}
