pub mod auth;
pub mod booking;
pub mod catalog;
pub mod showtimes;
pub mod tickets;

pub use auth::AuthService;
pub use booking::{BookingFlow, BookingService, BookingState, SeatGrid};
pub use catalog::{CatalogService, SeatBlockSummary};
pub use showtimes::ShowtimeService;
pub use tickets::{TicketPartition, TicketService};
