pub mod actor;
pub mod customer;
pub mod director;
pub mod play;
pub mod seat;
pub mod showtime;
pub mod ticket;

pub use actor::{Actor, ActorDraft};
pub use customer::{Customer, CustomerDraft};
pub use director::{Director, DirectorDraft};
pub use play::{Play, PlayDraft};
pub use seat::{Seat, SeatAvailability};
pub use showtime::{Showtime, ShowtimeDraft, ShowtimeKey, ShowtimeUpdate};
pub use ticket::{Ticket, TicketCreate, TicketKey, TicketStatus};

use serde::Deserialize;

/// Plain `{"message": ...}` acknowledgement some bulk endpoints return.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerMessage {
    pub message: String,
}
