//! Invoices (`/notas-fiscais`)

use serde::Serialize;
use serde_json::json;

use super::{EntityService, segment};
use crate::error::Result;
use crate::model::Envelope;

entity_service!(
    /// Fiscal invoices and their link to manifests
    InvoiceService,
    "/notas-fiscais"
);

/// Query parameters accepted by the invoice listing
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chave_nf: Option<String>,
    #[serde(rename = "nro", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transportadora_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_nf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalizada: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_inicio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_fim: Option<String>,
}

impl InvoiceFilter {
    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Period<'a> {
    data_inicio: &'a str,
    data_fim: &'a str,
}

impl InvoiceService {
    pub async fn list_filtered(&self, filter: &InvoiceFilter) -> Result<Envelope> {
        self.list(filter).await
    }

    /// Lookup by the 44-digit NF-e access key
    pub async fn by_nf_key(&self, key: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("chave-nf/{}", segment(key))))
            .await
    }

    pub async fn by_cte_key(&self, key: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("chave-cte/{}", segment(key))))
            .await
    }

    pub async fn by_number_series(&self, number: &str, series: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!(
                "numero/{}/serie/{}",
                segment(number),
                segment(series)
            )))
            .await
    }

    pub async fn by_client(&self, client_id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("cliente/{}", segment(client_id))))
            .await
    }

    pub async fn by_carrier(&self, carrier_id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("transportadora/{}", segment(carrier_id))))
            .await
    }

    pub async fn by_manifest(&self, manifest_id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("romaneio/{}", segment(manifest_id))))
            .await
    }

    pub async fn stats_by_period(&self, start: &str, end: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get_with_query(
                &self.path("stats"),
                &Period {
                    data_inicio: start,
                    data_fim: end,
                },
            )
            .await
    }

    /// Invoices not yet attached to a manifest, optionally for one carrier
    pub async fn pending_manifest(&self, carrier_id: Option<&str>) -> Result<Envelope> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Query<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            transportadora_id: Option<&'a str>,
        }

        self.manager()
            .client()
            .get_with_query(
                &self.path("pendentes-romaneio"),
                &Query {
                    transportadora_id: carrier_id,
                },
            )
            .await
    }

    pub async fn delayed(&self) -> Result<Envelope> {
        self.manager().client().get(&self.path("com-atraso")).await
    }

    pub async fn update_status(&self, id: &str, status: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .patch_json(
                &self.path(&format!("{}/status", segment(id))),
                &json!({ "status": status }),
            )
            .await
    }

    pub async fn finalize(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .patch_json(
                &self.path(&format!("{}/finalizar", segment(id))),
                &json!({}),
            )
            .await
    }

    pub async fn associate_manifest(&self, manifest_id: &str, invoice_ids: &[&str]) -> Result<Envelope> {
        self.manager()
            .client()
            .post_json(
                &self.path(&format!("romaneio/{}/associar", segment(manifest_id))),
                &json!({ "notaIds": invoice_ids }),
            )
            .await
    }

    pub async fn dissociate_manifest(&self, invoice_ids: &[&str]) -> Result<Envelope> {
        self.manager()
            .client()
            .post_json(
                &self.path("romaneio/desassociar"),
                &json!({ "notaIds": invoice_ids }),
            )
            .await
    }

    /// Undeletes a soft-deleted invoice
    pub async fn restore(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .post(&self.path(&format!("{}/restore", segment(id))))
            .await
    }

    pub async fn tracking(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .get(&self.path(&format!("{}/rastreamento", segment(id))))
            .await
    }

    pub async fn export(&self, filter: &InvoiceFilter) -> Result<Envelope> {
        self.manager()
            .client()
            .get_with_query(&self.path("export"), filter)
            .await
    }

    /// Bulk import of already-parsed invoice records
    pub async fn import(&self, invoices: &serde_json::Value) -> Result<Envelope> {
        self.manager()
            .client()
            .post_json(&self.path("import"), invoices)
            .await
    }
}
