use anyhow::Context;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use theater_client::{
    config::Config,
    models::ShowtimeKey,
    services::{BookingFlow, BookingState},
    AppContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting theater booking demo");

    let ctx = AppContext::new(config).context("failed to set up the API client")?;

    // Optional login; anonymous browsing still works for the read endpoints
    match (env::var("THEATER_EMAIL"), env::var("THEATER_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            let role = ctx
                .auth()
                .login(&email, &password)
                .await
                .context("login failed")?;
            info!(?role, "authenticated");
        }
        _ => warn!("THEATER_EMAIL/THEATER_PASSWORD not set, browsing anonymously"),
    }

    let mut showtimes = ctx
        .showtimes()
        .list()
        .await
        .context("failed to fetch showtimes")?;
    showtimes.sort_by_key(|st| st.date_and_time);
    if showtimes.is_empty() {
        println!("No showtimes scheduled.");
        return Ok(());
    }

    println!("Showtimes:");
    for st in &showtimes {
        let title = st
            .play
            .as_ref()
            .map(|p| p.title.as_str())
            .unwrap_or("(unknown play)");
        println!("  play {:>3}  {}  {}", st.play_id, st.date_and_time, title);
    }

    // Walk the seat map of the soonest showtime, read-only
    let target: ShowtimeKey = showtimes[0].key();
    let mut flow = BookingFlow::new();
    ctx.booking().open(&mut flow, target.clone()).await?;

    match flow.state() {
        BookingState::SeatsReady(grid) => {
            println!(
                "\nSeat map for play {} at {}:",
                target.play_id, target.date_and_time
            );
            for row in grid.rows() {
                let marks: String = row
                    .seats
                    .iter()
                    .map(|s| if s.is_booked { " x" } else { " o" })
                    .collect();
                println!("  row {:>2}:{marks}", row.row_no);
            }
        }
        BookingState::NoSeats => println!("\nThat showtime has no seats configured."),
        BookingState::Failed(reason) => println!("\nCould not load seats: {reason}"),
        other => println!("\nUnexpected booking state: {other:?}"),
    }

    Ok(())
}
