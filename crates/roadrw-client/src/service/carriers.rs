//! Carriers (`/transportadoras`)

use super::{EntityService, segment};
use crate::error::Result;
use crate::model::Envelope;

entity_service!(
    /// Transport companies
    CarrierService,
    "/transportadoras"
);

impl CarrierService {
    pub async fn by_cnpj(&self, cnpj: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("cnpj/{}", segment(cnpj))))
            .await
    }

    /// Carriers with tracking integration enabled
    pub async fn for_integration(&self) -> Result<Envelope> {
        self.manager().client().get(&self.path("integration")).await
    }
}
