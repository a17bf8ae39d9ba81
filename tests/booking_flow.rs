//! End-to-end booking and showtime-editing flows against a mock server.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use theater_client::api_client::ApiClient;
use theater_client::error::ClientError;
use theater_client::models::{ShowtimeKey, ShowtimeUpdate};
use theater_client::services::showtimes::combine_date_time;
use theater_client::services::{BookingFlow, BookingService, BookingState, ShowtimeService};
use theater_client::session::SessionStore;

fn api(base_url: &str) -> ApiClient {
    ApiClient::new(
        base_url,
        Duration::from_secs(5),
        Arc::new(SessionStore::new()),
    )
    .unwrap()
}

fn showtime_key(play_id: i64, iso: &str) -> ShowtimeKey {
    ShowtimeKey {
        play_id,
        date_and_time: DateTime::parse_from_rfc3339(iso)
            .unwrap()
            .with_timezone(&Utc),
    }
}

#[tokio::test]
async fn open_select_confirm_ends_in_booked() {
    let server = MockServer::start().await;
    let service = BookingService::new(api(&server.uri()));
    let key = showtime_key(3, "2024-05-01T18:00:00Z");

    Mock::given(method("GET"))
        .and(path("/showtimes/3/2024-05-01T18:00:00+00:00/available-seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"row_no": 1, "seat_no": 1, "is_booked": true},
            {"row_no": 1, "seat_no": 2, "is_booked": false},
            {"row_no": 2, "seat_no": 1, "is_booked": false}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tickets/"))
        .and(body_json(json!({
            "showtime_play_id": 3,
            "showtime_date_and_time": "2024-05-01T18:00:00Z",
            "row_no": 1,
            "seat_no": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "row_no": 1,
            "seat_no": 2,
            "showtime_date_and_time": "2024-05-01T18:00:00Z",
            "showtime_play_id": 3,
            "customer_id": 12,
            "ticket_no": "T-0042"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = BookingFlow::new();
    service.open(&mut flow, key).await.unwrap();

    match flow.state() {
        BookingState::SeatsReady(grid) => {
            assert_eq!(grid.rows().len(), 2);
            assert!(grid.seat(1, 1).unwrap().is_booked);
        }
        other => panic!("expected SeatsReady, got {other:?}"),
    }

    flow.select(1, 2).unwrap();
    let ticket = service.confirm(&mut flow).await.unwrap();
    assert_eq!(ticket.ticket_no.as_deref(), Some("T-0042"));
    assert!(matches!(flow.state(), BookingState::Booked(_)));
}

#[tokio::test]
async fn booking_conflict_fails_the_flow_with_the_server_reason() {
    let server = MockServer::start().await;
    let service = BookingService::new(api(&server.uri()));
    let key = showtime_key(3, "2024-05-01T18:00:00Z");

    Mock::given(method("GET"))
        .and(path("/showtimes/3/2024-05-01T18:00:00+00:00/available-seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"row_no": 1, "seat_no": 1, "is_booked": false}
        ])))
        .mount(&server)
        .await;

    // Someone else books the seat between the fetch and the confirm
    Mock::given(method("POST"))
        .and(path("/tickets/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "This seat is already booked for this showtime"
        })))
        .mount(&server)
        .await;

    let mut flow = BookingFlow::new();
    service.open(&mut flow, key).await.unwrap();
    flow.select(1, 1).unwrap();

    let err = service.confirm(&mut flow).await.unwrap_err();
    assert!(err.is_booking_conflict());
    assert!(matches!(
        err,
        ClientError::RequestFailed { status: 400, .. }
    ));
    match flow.state() {
        BookingState::Failed(reason) => assert!(reason.contains("already booked")),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_seat_list_means_no_seats_not_failure() {
    let server = MockServer::start().await;
    let service = BookingService::new(api(&server.uri()));
    let key = showtime_key(5, "2024-06-01T20:00:00Z");

    Mock::given(method("GET"))
        .and(path("/showtimes/5/2024-06-01T20:00:00+00:00/available-seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut flow = BookingFlow::new();
    service.open(&mut flow, key).await.unwrap();
    assert_eq!(flow.state(), &BookingState::NoSeats);
}

#[tokio::test]
async fn reschedule_sends_the_original_identity_in_the_query() {
    let server = MockServer::start().await;
    let service = ShowtimeService::new(api(&server.uri()));
    let original = showtime_key(3, "2024-05-01T18:00:00Z");

    let new_date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let new_time = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
    let expected_body = serde_json::to_value(ShowtimeUpdate {
        date_and_time: combine_date_time(new_date, new_time),
    })
    .unwrap();

    Mock::given(method("PUT"))
        .and(path("/showtimes/update"))
        .and(query_param("play_id", "3"))
        .and(query_param("original_date_time", "2024-05-01T18:00:00+00:00"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "play_id": 3,
            "date_and_time": "2024-05-02T19:30:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = service.update(&original, new_date, new_time).await.unwrap();
    assert_eq!(updated.play_id, 3);
    assert_eq!(
        updated.date_and_time,
        combine_date_time(new_date, new_time)
    );
}

#[tokio::test]
async fn delete_carries_the_composite_key_in_the_body() {
    let server = MockServer::start().await;
    let service = ShowtimeService::new(api(&server.uri()));
    let key = showtime_key(3, "2024-05-01T18:00:00Z");
    let expected_body = serde_json::to_value(&key).unwrap();

    Mock::given(method("DELETE"))
        .and(path("/showtimes/"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Showtime deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    service.delete(&key).await.unwrap();
}
