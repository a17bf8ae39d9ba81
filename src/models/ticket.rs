use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A confirmed booking of one seat for one showtime.
///
/// Like showtimes, tickets carry no surrogate id: identity is the full
/// `(row_no, seat_no, showtime_play_id, showtime_date_and_time)` tuple.
/// `ticket_no` is a display reference only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ticket {
    pub row_no: i32,
    pub seat_no: i32,
    pub showtime_date_and_time: DateTime<Utc>,
    pub showtime_play_id: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub ticket_no: Option<String>,
}

impl Ticket {
    pub fn key(&self) -> TicketKey {
        TicketKey {
            row_no: self.row_no,
            seat_no: self.seat_no,
            showtime_date_and_time: self.showtime_date_and_time,
            showtime_play_id: self.showtime_play_id,
        }
    }

    /// Upcoming or past relative to `now`. The API never reports a
    /// cancelled state; cancellation deletes the ticket outright.
    pub fn status_at(&self, now: DateTime<Utc>) -> TicketStatus {
        if self.showtime_date_and_time < now {
            TicketStatus::Past
        } else {
            TicketStatus::Upcoming
        }
    }
}

/// Booking request body for `POST /tickets/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketCreate {
    pub showtime_play_id: i64,
    pub showtime_date_and_time: DateTime<Utc>,
    pub row_no: i32,
    pub seat_no: i32,
}

/// Composite identity used as the body of the keyed `DELETE /tickets/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketKey {
    pub row_no: i32,
    pub seat_no: i32,
    pub showtime_date_and_time: DateTime<Utc>,
    pub showtime_play_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Upcoming,
    Past,
}
