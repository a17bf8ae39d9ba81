use serde::{Deserialize, Serialize};

/// A physical seat in the hall inventory, identified by (row, seat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub row_no: i32,
    pub seat_no: i32,
}

/// One seat's booking status relative to a single showtime. The same
/// physical seat can be free for one showtime and booked for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAvailability {
    pub row_no: i32,
    pub seat_no: i32,
    pub is_booked: bool,
}
