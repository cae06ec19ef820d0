//! Delivery occurrence codes (`/ocorrencias`)

use super::{EntityService, segment};
use crate::error::Result;
use crate::model::Envelope;

entity_service!(OccurrenceService, "/ocorrencias");

impl OccurrenceService {
    /// Codes that close a delivery
    pub async fn finalizing(&self) -> Result<Envelope> {
        self.manager().client().get(&self.path("finalizadoras")).await
    }

    /// Codes exposed to carrier integrations
    pub async fn api_active(&self) -> Result<Envelope> {
        self.manager().client().get(&self.path("ativas-api")).await
    }

    pub async fn toggle_api(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .patch_json(
                &self.path(&format!("{}/toggle-api", segment(id))),
                &serde_json::json!({}),
            )
            .await
    }

    pub async fn toggle_finalizing(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .patch_json(
                &self.path(&format!("{}/toggle-finalizadora", segment(id))),
                &serde_json::json!({}),
            )
            .await
    }
}
