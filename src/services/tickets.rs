//! Ticket listing and cancellation for the signed-in customer.
//!
//! The server scopes `GET /tickets/` to the bearer of the token, so the
//! service never filters by customer id itself. Status is a purely local
//! notion derived from the showtime instant.

use chrono::Utc;
use tracing::info;

use crate::api_client::ApiClient;
use crate::error::ClientError;
use crate::models::{Ticket, TicketKey, TicketStatus};

/// Tickets split into upcoming and past relative to one observation time,
/// each group ordered soonest-first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TicketPartition {
    pub upcoming: Vec<Ticket>,
    pub past: Vec<Ticket>,
}

pub fn partition_by_status(mut tickets: Vec<Ticket>) -> TicketPartition {
    let now = Utc::now();
    tickets.sort_by_key(|t| t.showtime_date_and_time);
    let mut partition = TicketPartition::default();
    for ticket in tickets {
        match ticket.status_at(now) {
            TicketStatus::Upcoming => partition.upcoming.push(ticket),
            TicketStatus::Past => partition.past.push(ticket),
        }
    }
    partition
}

#[derive(Clone)]
pub struct TicketService {
    api: ApiClient,
}

impl TicketService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// The current customer's tickets, as scoped by the server.
    pub async fn list_mine(&self) -> Result<Vec<Ticket>, ClientError> {
        self.api.get(self.api.endpoint(&["tickets", ""])).await
    }

    /// Cancels by composite key. Callers must have collected explicit user
    /// confirmation first; a cancelled ticket is gone, not archived.
    pub async fn cancel(&self, key: &TicketKey) -> Result<(), ClientError> {
        let url = self.api.endpoint(&["tickets", ""]);
        self.api.delete(url, Some(key)).await?;
        info!(
            play_id = key.showtime_play_id,
            row_no = key.row_no,
            seat_no = key.seat_no,
            "ticket cancelled"
        );
        Ok(())
    }
}
