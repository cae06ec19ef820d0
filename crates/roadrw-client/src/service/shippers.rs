//! Shippers (`/embarcadores`)

use super::{EntityService, segment};
use crate::error::Result;
use crate::model::Envelope;

entity_service!(ShipperService, "/embarcadores");

impl ShipperService {
    pub async fn by_document(&self, document: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("documento/{}", segment(document))))
            .await
    }

    pub async fn with_depots(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("{}/depositos", segment(id))))
            .await
    }
}
