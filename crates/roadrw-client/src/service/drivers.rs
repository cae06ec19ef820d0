//! Drivers (`/motoristas`)

use super::{EntityService, segment};
use crate::error::Result;
use crate::model::Envelope;

entity_service!(DriverService, "/motoristas");

impl DriverService {
    pub async fn by_cpf(&self, cpf: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("cpf/{}", segment(cpf))))
            .await
    }

    /// Drivers that accept outbound messages
    pub async fn active_for_messages(&self) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path("active-messages"))
            .await
    }

    /// Driver with working-hours record
    pub async fn with_schedule(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("{}/jornada", segment(id))))
            .await
    }
}
