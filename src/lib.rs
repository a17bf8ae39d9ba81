pub mod api_client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use api_client::ApiClient;
use error::ClientError;
use services::{AuthService, BookingService, CatalogService, ShowtimeService, TicketService};
use session::SessionStore;

// Shared state for the whole application
#[derive(Clone)]
pub struct AppContext {
    pub config: config::Config,
    pub session: Arc<session::SessionStore>,
    pub api: api_client::ApiClient,
}

impl AppContext {
    pub fn new(config: config::Config) -> Result<Arc<Self>, ClientError> {
        let session = Arc::new(SessionStore::new());
        let api = ApiClient::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_seconds),
            session.clone(),
        )?;
        Ok(Arc::new(Self {
            config,
            session,
            api,
        }))
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }

    pub fn showtimes(&self) -> ShowtimeService {
        ShowtimeService::new(self.api.clone())
    }

    pub fn booking(&self) -> BookingService {
        BookingService::new(self.api.clone())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.api.clone())
    }

    pub fn tickets(&self) -> TicketService {
        TicketService::new(self.api.clone())
    }
}
