//! Clients (`/clientes`)

use super::{EntityService, segment};
use crate::error::Result;
use crate::model::Envelope;

entity_service!(
    /// Shipment recipients
    ClientService,
    "/clientes"
);

impl ClientService {
    pub async fn active(&self) -> Result<Envelope> {
        self.manager().client().get(&self.path("ativos")).await
    }

    /// Lookup by CPF/CNPJ
    pub async fn by_document(&self, document: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("documento/{}", segment(document))))
            .await
    }

    pub async fn by_code(&self, code: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("codigo/{}", segment(code))))
            .await
    }

    pub async fn by_state(&self, uf: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("uf/{}", segment(uf))))
            .await
    }

    pub async fn by_city(&self, city: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("cidade/{}", segment(city))))
            .await
    }
}
