//! Manifests (`/romaneios`)

use serde_json::json;

use super::{EntityService, segment};
use crate::error::Result;
use crate::model::Envelope;

entity_service!(
    /// Load manifests grouping invoices for one trip
    ManifestService,
    "/romaneios"
);

impl ManifestService {
    pub async fn by_status(&self, status: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("status/{}", segment(status))))
            .await
    }

    pub async fn finalize(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .post(&self.path(&format!("{}/finalizar", segment(id))))
            .await
    }

    pub async fn cancel(&self, id: &str, reason: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .post_json(
                &self.path(&format!("{}/cancelar", segment(id))),
                &json!({ "motivo": reason }),
            )
            .await
    }

    pub async fn report(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("{}/relatorio", segment(id))))
            .await
    }
}
