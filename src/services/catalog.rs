//! Thin CRUD over the catalog endpoints (plays, actors, directors,
//! customers, seat inventory). No client-side state is kept; callers
//! re-fetch lists after mutations.

use tracing::{debug, info};

use crate::api_client::ApiClient;
use crate::error::ClientError;
use crate::models::{
    Actor, ActorDraft, Customer, CustomerDraft, Director, DirectorDraft, Play, PlayDraft, Seat,
    ServerMessage,
};

/// Outcome of a bulk seat-block creation: how many seats were newly
/// created vs. already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatBlockSummary {
    pub created: usize,
    pub existing: usize,
}

#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
}

impl CatalogService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /* ---------- plays ---------- */

    pub async fn plays(&self) -> Result<Vec<Play>, ClientError> {
        self.api.get(self.api.endpoint(&["plays", ""])).await
    }

    pub async fn play(&self, id: i64) -> Result<Play, ClientError> {
        self.api.get(self.api.endpoint(&["plays", &id.to_string()])).await
    }

    pub async fn create_play(&self, draft: &PlayDraft) -> Result<Play, ClientError> {
        self.api.post(self.api.endpoint(&["plays", ""]), draft).await
    }

    pub async fn update_play(&self, id: i64, draft: &PlayDraft) -> Result<Play, ClientError> {
        self.api
            .put(self.api.endpoint(&["plays", &id.to_string()]), draft)
            .await
    }

    pub async fn delete_play(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<()>(self.api.endpoint(&["plays", &id.to_string()]), None)
            .await
    }

    /* ---------- actors ---------- */

    pub async fn actors(&self) -> Result<Vec<Actor>, ClientError> {
        self.api.get(self.api.endpoint(&["actors", ""])).await
    }

    pub async fn actor(&self, id: i64) -> Result<Actor, ClientError> {
        self.api.get(self.api.endpoint(&["actors", &id.to_string()])).await
    }

    pub async fn create_actor(&self, draft: &ActorDraft) -> Result<Actor, ClientError> {
        self.api.post(self.api.endpoint(&["actors", ""]), draft).await
    }

    pub async fn update_actor(&self, id: i64, draft: &ActorDraft) -> Result<Actor, ClientError> {
        self.api
            .put(self.api.endpoint(&["actors", &id.to_string()]), draft)
            .await
    }

    pub async fn delete_actor(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<()>(self.api.endpoint(&["actors", &id.to_string()]), None)
            .await
    }

    /* ---------- directors ---------- */

    pub async fn directors(&self) -> Result<Vec<Director>, ClientError> {
        self.api.get(self.api.endpoint(&["directors", ""])).await
    }

    pub async fn director(&self, id: i64) -> Result<Director, ClientError> {
        self.api
            .get(self.api.endpoint(&["directors", &id.to_string()]))
            .await
    }

    pub async fn create_director(&self, draft: &DirectorDraft) -> Result<Director, ClientError> {
        self.api.post(self.api.endpoint(&["directors", ""]), draft).await
    }

    pub async fn update_director(
        &self,
        id: i64,
        draft: &DirectorDraft,
    ) -> Result<Director, ClientError> {
        self.api
            .put(self.api.endpoint(&["directors", &id.to_string()]), draft)
            .await
    }

    pub async fn delete_director(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<()>(self.api.endpoint(&["directors", &id.to_string()]), None)
            .await
    }

    /* ---------- customers ---------- */

    pub async fn customers(&self) -> Result<Vec<Customer>, ClientError> {
        self.api.get(self.api.endpoint(&["customers", ""])).await
    }

    pub async fn customer(&self, id: i64) -> Result<Customer, ClientError> {
        self.api
            .get(self.api.endpoint(&["customers", &id.to_string()]))
            .await
    }

    pub async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, ClientError> {
        self.api.post(self.api.endpoint(&["customers", ""]), draft).await
    }

    pub async fn update_customer(
        &self,
        id: i64,
        draft: &CustomerDraft,
    ) -> Result<Customer, ClientError> {
        self.api
            .put(self.api.endpoint(&["customers", &id.to_string()]), draft)
            .await
    }

    pub async fn delete_customer(&self, id: i64) -> Result<(), ClientError> {
        self.api
            .delete::<()>(self.api.endpoint(&["customers", &id.to_string()]), None)
            .await
    }

    /* ---------- seat inventory ---------- */

    pub async fn seats(&self) -> Result<Vec<Seat>, ClientError> {
        self.api.get(self.api.endpoint(&["seats", ""])).await
    }

    pub async fn create_seat(&self, seat: &Seat) -> Result<Seat, ClientError> {
        self.api.post(self.api.endpoint(&["seats", ""]), seat).await
    }

    /// Re-keys an existing seat; the old identity lives in the path.
    pub async fn update_seat(&self, row_no: i32, seat_no: i32, seat: &Seat) -> Result<Seat, ClientError> {
        let url = self
            .api
            .endpoint(&["seats", &row_no.to_string(), &seat_no.to_string()]);
        self.api.put(url, seat).await
    }

    /// Keyed delete; callers must have collected user confirmation first.
    pub async fn delete_seat(&self, seat: &Seat) -> Result<(), ClientError> {
        self.api
            .delete(self.api.endpoint(&["seats", ""]), Some(seat))
            .await
    }

    pub async fn delete_all_seats(&self) -> Result<String, ClientError> {
        let url = self.api.endpoint(&["seats", "all"]);
        let ack: ServerMessage = self.api.delete_with_body(url).await?;
        Ok(ack.message)
    }

    /// Creates a rectangular block of seats one at a time, the way the
    /// admin surface does. Seats the server rejects as duplicates are
    /// counted as existing rather than surfaced individually; session
    /// expiry and transport failures abort the whole run.
    pub async fn create_seat_block(
        &self,
        start_row: i32,
        end_row: i32,
        seats_per_row: i32,
    ) -> Result<SeatBlockSummary, ClientError> {
        if start_row > end_row {
            return Err(ClientError::Validation(
                "start row cannot be greater than end row".to_string(),
            ));
        }
        if seats_per_row < 1 {
            return Err(ClientError::Validation(
                "seats per row must be at least 1".to_string(),
            ));
        }

        let mut summary = SeatBlockSummary {
            created: 0,
            existing: 0,
        };
        for row_no in start_row..=end_row {
            for seat_no in 1..=seats_per_row {
                let seat = Seat { row_no, seat_no };
                match self.create_seat(&seat).await {
                    Ok(_) => summary.created += 1,
                    Err(ClientError::RequestFailed { .. }) => {
                        debug!(row_no, seat_no, "seat already exists, skipping");
                        summary.existing += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        info!(
            created = summary.created,
            existing = summary.existing,
            "seat block finished"
        );
        Ok(summary)
    }
}
