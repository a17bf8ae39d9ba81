//! booking.rs
//!
//! Seat availability and booking flow for a single showtime.
//!
//! One `BookingFlow` instance covers one booking attempt and moves through
//! `Idle → LoadingSeats → {SeatsReady | NoSeats | Failed}` and
//! `SeatsReady → SeatSelected → Submitting → {Booked | Failed}`.
//!
//! The machine itself is synchronous and owns every invariant: numeric grid
//! ordering, the single-selection rule, the duplicate-submit lock, and the
//! stale-fetch guard. `BookingService` drives it against the HTTP API, so
//! the transitions stay testable without a network.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::api_client::ApiClient;
use crate::error::ClientError;
use crate::models::{SeatAvailability, ShowtimeKey, Ticket, TicketCreate};

/// One rendered hall row: seats ascending by seat number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRow {
    pub row_no: i32,
    pub seats: Vec<SeatAvailability>,
}

/// Row/seat grid derived from one availability snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatGrid {
    rows: Vec<SeatRow>,
}

impl SeatGrid {
    /// Groups a sparse availability list by row. Rows and seats sort
    /// ascending by numeric value; row 10 comes after row 9, which a
    /// lexical sort would get wrong.
    pub fn build(seats: Vec<SeatAvailability>) -> Self {
        let mut by_row: BTreeMap<i32, Vec<SeatAvailability>> = BTreeMap::new();
        for seat in seats {
            by_row.entry(seat.row_no).or_default().push(seat);
        }
        let rows = by_row
            .into_iter()
            .map(|(row_no, mut seats)| {
                seats.sort_by_key(|s| s.seat_no);
                SeatRow { row_no, seats }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[SeatRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn seat(&self, row_no: i32, seat_no: i32) -> Option<&SeatAvailability> {
        self.rows
            .iter()
            .find(|row| row.row_no == row_no)?
            .seats
            .iter()
            .find(|seat| seat.seat_no == seat_no)
    }
}

/// States of one booking attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingState {
    Idle,
    LoadingSeats,
    /// Availability fetched; nothing picked yet.
    SeatsReady(SeatGrid),
    /// Exactly one unbooked seat picked; picking another replaces it.
    SeatSelected {
        grid: SeatGrid,
        seat: SeatAvailability,
    },
    /// The confirm request is in flight; selection and re-submission are
    /// locked out until it resolves.
    Submitting { seat: SeatAvailability },
    Booked(Ticket),
    /// Terminal for this attempt, carrying the server-reported reason.
    /// Reopening the flow re-fetches and retries.
    Failed(String),
    /// The showtime has no seats at all: terminal, but not a failure.
    NoSeats,
}

#[derive(Debug, Default)]
pub struct BookingFlow {
    target: Option<ShowtimeKey>,
    state: BookingState,
}

impl Default for BookingState {
    fn default() -> Self {
        BookingState::Idle
    }
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn target(&self) -> Option<&ShowtimeKey> {
        self.target.as_ref()
    }

    /// Opens the flow for a showtime. Any previous grid or selection is
    /// discarded, even if a fetch for the old target is still in flight.
    pub fn open(&mut self, key: ShowtimeKey) {
        self.target = Some(key);
        self.state = BookingState::LoadingSeats;
    }

    /// Applies a seat fetch that was issued for `key`. A result tagged with
    /// anything other than the currently open target is stale (the user
    /// closed and reopened before it resolved) and is dropped on the floor.
    pub fn seats_loaded(
        &mut self,
        key: &ShowtimeKey,
        result: Result<Vec<SeatAvailability>, ClientError>,
    ) {
        if self.target.as_ref() != Some(key) {
            debug!(play_id = key.play_id, "discarding seat list for a superseded target");
            return;
        }
        if !matches!(self.state, BookingState::LoadingSeats) {
            return;
        }
        self.state = match result {
            Ok(seats) if seats.is_empty() => BookingState::NoSeats,
            Ok(seats) => BookingState::SeatsReady(SeatGrid::build(seats)),
            Err(err) => BookingState::Failed(err.to_string()),
        };
    }

    /// Picks an unbooked seat, replacing any prior selection. At most one
    /// seat is selected per flow instance at any time.
    pub fn select(&mut self, row_no: i32, seat_no: i32) -> Result<(), ClientError> {
        let grid = match &self.state {
            BookingState::SeatsReady(grid) => grid,
            BookingState::SeatSelected { grid, .. } => grid,
            BookingState::Submitting { .. } => {
                return Err(ClientError::Validation(
                    "a booking is already being submitted".to_string(),
                ))
            }
            _ => {
                return Err(ClientError::Validation(
                    "no seat list is open".to_string(),
                ))
            }
        };
        let seat = *grid.seat(row_no, seat_no).ok_or_else(|| {
            ClientError::Validation(format!("Row {row_no}, Seat {seat_no} does not exist"))
        })?;
        if seat.is_booked {
            return Err(ClientError::Validation(format!(
                "Row {row_no}, Seat {seat_no} is already booked"
            )));
        }
        let grid = grid.clone();
        self.state = BookingState::SeatSelected { grid, seat };
        Ok(())
    }

    /// What the confirmation surface shows, e.g. "Row 1, Seat 1".
    pub fn selection_label(&self) -> Option<String> {
        match &self.state {
            BookingState::SeatSelected { seat, .. } | BookingState::Submitting { seat } => {
                Some(format!("Row {}, Seat {}", seat.row_no, seat.seat_no))
            }
            _ => None,
        }
    }

    /// Whether the confirm action is enabled.
    pub fn can_confirm(&self) -> bool {
        matches!(self.state, BookingState::SeatSelected { .. })
    }

    /// Locks the flow and yields the booking request for the selection.
    /// While `Submitting`, a second call fails, which is what keeps a
    /// double-click from producing two POSTs for the same seat.
    pub fn begin_submit(&mut self) -> Result<TicketCreate, ClientError> {
        let key = self
            .target
            .clone()
            .ok_or_else(|| ClientError::Validation("no showtime is open".to_string()))?;
        match std::mem::take(&mut self.state) {
            BookingState::SeatSelected { seat, .. } => {
                let request = TicketCreate {
                    showtime_play_id: key.play_id,
                    showtime_date_and_time: key.date_and_time,
                    row_no: seat.row_no,
                    seat_no: seat.seat_no,
                };
                self.state = BookingState::Submitting { seat };
                Ok(request)
            }
            other => {
                self.state = other;
                Err(ClientError::Validation("no seat is selected".to_string()))
            }
        }
    }

    /// Applies the booking response. Success clears the selection and keeps
    /// the created ticket; rejection keeps the server's reason. A rejected
    /// seat is never marked taken locally; the user reopens to re-fetch
    /// the real availability.
    pub fn submit_resolved(&mut self, result: Result<Ticket, ClientError>) {
        if !matches!(self.state, BookingState::Submitting { .. }) {
            return;
        }
        self.state = match result {
            Ok(ticket) => BookingState::Booked(ticket),
            Err(err) => BookingState::Failed(err.to_string()),
        };
    }

    /// Closes the view: target, grid, and selection are all dropped.
    pub fn close(&mut self) {
        self.target = None;
        self.state = BookingState::Idle;
    }
}

#[derive(Clone)]
pub struct BookingService {
    api: ApiClient,
}

impl BookingService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Opens the flow for `key` and fetches availability, feeding the result
    /// through the stale-fetch guard. Fetch failures are recorded in the
    /// flow rather than returned, because they are non-fatal to the page;
    /// only session expiry propagates so the caller can force re-auth.
    pub async fn open(
        &self,
        flow: &mut BookingFlow,
        key: ShowtimeKey,
    ) -> Result<(), ClientError> {
        flow.open(key.clone());
        let url = self.api.endpoint(&[
            "showtimes",
            &key.play_id.to_string(),
            &key.date_and_time.to_rfc3339(),
            "available-seats",
        ]);
        let result: Result<Vec<SeatAvailability>, ClientError> = self.api.get(url).await;
        let expired = matches!(result, Err(ClientError::SessionExpired));
        flow.seats_loaded(&key, result);
        if expired {
            return Err(ClientError::SessionExpired);
        }
        Ok(())
    }

    /// Submits the current selection. The flow stays locked for the whole
    /// round trip, so a second confirm cannot double-book.
    pub async fn confirm(&self, flow: &mut BookingFlow) -> Result<Ticket, ClientError> {
        let request = flow.begin_submit()?;
        let url = self.api.endpoint(&["tickets", ""]);
        match self.api.post::<_, Ticket>(url, &request).await {
            Ok(ticket) => {
                info!(
                    row = request.row_no,
                    seat = request.seat_no,
                    play_id = request.showtime_play_id,
                    "ticket booked"
                );
                flow.submit_resolved(Ok(ticket.clone()));
                Ok(ticket)
            }
            Err(err) => {
                flow.submit_resolved(Err(err.clone()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    fn seat(row_no: i32, seat_no: i32, is_booked: bool) -> SeatAvailability {
        SeatAvailability {
            row_no,
            seat_no,
            is_booked,
        }
    }

    fn key(play_id: i64, iso: &str) -> ShowtimeKey {
        ShowtimeKey {
            play_id,
            date_and_time: DateTime::parse_from_rfc3339(iso)
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn ready_flow(seats: Vec<SeatAvailability>) -> BookingFlow {
        let mut flow = BookingFlow::new();
        let k = key(3, "2024-05-01T18:00:00Z");
        flow.open(k.clone());
        flow.seats_loaded(&k, Ok(seats));
        flow
    }

    #[test]
    fn rows_sort_numerically_not_lexically() {
        let seats = vec![
            seat(10, 1, false),
            seat(2, 1, false),
            seat(11, 1, false),
            seat(1, 1, false),
            seat(9, 1, false),
        ];
        let grid = SeatGrid::build(seats);
        let order: Vec<i32> = grid.rows().iter().map(|r| r.row_no).collect();
        assert_eq!(order, vec![1, 2, 9, 10, 11]);
    }

    #[test]
    fn seats_within_a_row_sort_numerically() {
        let seats = vec![seat(1, 10, false), seat(1, 2, false), seat(1, 9, false)];
        let grid = SeatGrid::build(seats);
        let order: Vec<i32> = grid.rows()[0].seats.iter().map(|s| s.seat_no).collect();
        assert_eq!(order, vec![2, 9, 10]);
    }

    #[test]
    fn only_unbooked_seats_are_selectable() {
        let mut flow = ready_flow(vec![seat(1, 1, false), seat(1, 2, true)]);
        assert!(flow.select(1, 2).is_err());
        assert!(flow.select(1, 3).is_err());

        flow.select(1, 1).unwrap();
        assert_eq!(flow.selection_label().as_deref(), Some("Row 1, Seat 1"));
        assert!(flow.can_confirm());
    }

    #[test]
    fn selecting_a_second_seat_replaces_the_first() {
        let mut flow = ready_flow(vec![seat(1, 1, false), seat(2, 4, false)]);
        flow.select(1, 1).unwrap();
        flow.select(2, 4).unwrap();
        assert_eq!(flow.selection_label().as_deref(), Some("Row 2, Seat 4"));
        match flow.state() {
            BookingState::SeatSelected { seat, .. } => {
                assert_eq!((seat.row_no, seat.seat_no), (2, 4));
            }
            other => panic!("expected SeatSelected, got {other:?}"),
        }
    }

    #[test]
    fn empty_availability_is_not_a_failure() {
        let mut flow = BookingFlow::new();
        let k = key(3, "2024-05-01T18:00:00Z");
        flow.open(k.clone());
        flow.seats_loaded(&k, Ok(vec![]));
        assert_eq!(flow.state(), &BookingState::NoSeats);
    }

    #[test]
    fn fetch_error_ends_in_failed() {
        let mut flow = BookingFlow::new();
        let k = key(3, "2024-05-01T18:00:00Z");
        flow.open(k.clone());
        flow.seats_loaded(&k, Err(ClientError::Transport("connection refused".into())));
        assert!(matches!(flow.state(), BookingState::Failed(_)));
    }

    #[test]
    fn stale_fetch_result_is_discarded() {
        let mut flow = BookingFlow::new();
        let first = key(3, "2024-05-01T18:00:00Z");
        let second = key(7, "2024-06-01T20:00:00Z");

        flow.open(first.clone());
        // User closes and reopens for another showtime before the first
        // fetch resolves
        flow.open(second.clone());
        flow.seats_loaded(&first, Ok(vec![seat(1, 1, false)]));
        assert_eq!(flow.state(), &BookingState::LoadingSeats);

        flow.seats_loaded(&second, Ok(vec![seat(5, 5, false)]));
        match flow.state() {
            BookingState::SeatsReady(grid) => assert!(grid.seat(5, 5).is_some()),
            other => panic!("expected SeatsReady, got {other:?}"),
        }
    }

    #[test]
    fn reopening_discards_the_previous_selection() {
        let mut flow = ready_flow(vec![seat(1, 1, false)]);
        flow.select(1, 1).unwrap();

        let k = key(9, "2024-07-01T18:00:00Z");
        flow.open(k);
        assert_eq!(flow.selection_label(), None);
        assert_eq!(flow.state(), &BookingState::LoadingSeats);
    }

    #[test]
    fn begin_submit_builds_the_composite_request_and_locks() {
        let mut flow = ready_flow(vec![seat(4, 7, false)]);
        flow.select(4, 7).unwrap();

        let request = flow.begin_submit().unwrap();
        assert_eq!(request.showtime_play_id, 3);
        assert_eq!(
            request.showtime_date_and_time.to_rfc3339(),
            "2024-05-01T18:00:00+00:00"
        );
        assert_eq!((request.row_no, request.seat_no), (4, 7));

        // Locked: no duplicate submission, no selection change
        assert!(flow.begin_submit().is_err());
        assert!(flow.select(4, 7).is_err());
        assert!(!flow.can_confirm());
    }

    #[test]
    fn successful_submission_ends_in_booked() {
        let mut flow = ready_flow(vec![seat(1, 1, false)]);
        flow.select(1, 1).unwrap();
        let request = flow.begin_submit().unwrap();

        let ticket = Ticket {
            row_no: request.row_no,
            seat_no: request.seat_no,
            showtime_date_and_time: request.showtime_date_and_time,
            showtime_play_id: request.showtime_play_id,
            customer_id: Some(12),
            ticket_no: Some("T-0001".to_string()),
        };
        flow.submit_resolved(Ok(ticket.clone()));
        assert_eq!(flow.state(), &BookingState::Booked(ticket));
        assert_eq!(flow.selection_label(), None);
    }

    #[test]
    fn rejected_submission_keeps_the_server_reason() {
        let mut flow = ready_flow(vec![seat(1, 1, false)]);
        flow.select(1, 1).unwrap();
        flow.begin_submit().unwrap();

        flow.submit_resolved(Err(ClientError::RequestFailed {
            status: 400,
            message: "This seat is already booked for this showtime".to_string(),
        }));
        match flow.state() {
            BookingState::Failed(reason) => {
                assert!(reason.contains("already booked"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn grid_rows_and_seats_always_ascend(
            seats in proptest::collection::vec((1i32..=40, 1i32..=60, any::<bool>()), 0..200)
        ) {
            let seats: Vec<SeatAvailability> = seats
                .into_iter()
                .map(|(r, s, b)| seat(r, s, b))
                .collect();
            let grid = SeatGrid::build(seats);
            let rows: Vec<i32> = grid.rows().iter().map(|r| r.row_no).collect();
            let mut sorted_rows = rows.clone();
            sorted_rows.sort_unstable();
            prop_assert_eq!(&rows, &sorted_rows);
            for row in grid.rows() {
                let nos: Vec<i32> = row.seats.iter().map(|s| s.seat_no).collect();
                let mut sorted = nos.clone();
                sorted.sort_unstable();
                prop_assert_eq!(nos, sorted);
            }
        }
    }
}
