//! Per-entity services over the shared request client
//!
//! Each service is bound to one backend collection and only supplies paths,
//! query strings and bodies. The transport always comes from
//! [`ConfigManager::client`], fetched again for every call.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::manager::ConfigManager;
use crate::model::Envelope;

/// Declares a service struct bound to `$endpoint` implementing
/// [`EntityService`].
macro_rules! entity_service {
    ($(#[$meta:meta])* $name:ident, $endpoint:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            manager: std::sync::Arc<$crate::manager::ConfigManager>,
        }

        impl $name {
            pub const ENDPOINT: &'static str = $endpoint;

            pub fn new(manager: std::sync::Arc<$crate::manager::ConfigManager>) -> Self {
                Self { manager }
            }
        }

        impl $crate::service::EntityService for $name {
            fn manager(&self) -> &$crate::manager::ConfigManager {
                &self.manager
            }

            fn endpoint(&self) -> &'static str {
                Self::ENDPOINT
            }
        }
    };
}

pub mod carriers;
pub mod clients;
pub mod drivers;
pub mod invoices;
pub mod manifests;
pub mod occurrences;
pub mod shippers;

pub use carriers::CarrierService;
pub use clients::ClientService;
pub use drivers::DriverService;
pub use invoices::{InvoiceFilter, InvoiceService};
pub use manifests::ManifestService;
pub use occurrences::OccurrenceService;
pub use shippers::ShipperService;

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// CRUD surface shared by every backend collection
#[async_trait]
pub trait EntityService: Send + Sync {
    fn manager(&self) -> &ConfigManager;

    /// Collection path, e.g. `/clientes`
    fn endpoint(&self) -> &'static str;

    /// `<endpoint>/<suffix>`
    fn path(&self, suffix: &str) -> String {
        format!("{}/{}", self.endpoint(), suffix.trim_start_matches('/'))
    }

    async fn list<Q: Serialize + ?Sized + Sync>(&self, query: &Q) -> Result<Envelope> {
        self.manager()
            .client()
            .get_with_query(self.endpoint(), query)
            .await
    }

    async fn get(&self, id: &str) -> Result<Envelope> {
        self.manager().client().get(&self.path(&segment(id))).await
    }

    async fn create<B: Serialize + ?Sized + Sync>(&self, body: &B) -> Result<Envelope> {
        self.manager()
            .client()
            .post_json(self.endpoint(), body)
            .await
    }

    async fn update<B: Serialize + ?Sized + Sync>(&self, id: &str, body: &B) -> Result<Envelope> {
        self.manager()
            .client()
            .put_json(&self.path(&segment(id)), body)
            .await
    }

    async fn delete(&self, id: &str) -> Result<Envelope> {
        self.manager()
            .client()
            .delete(&self.path(&segment(id)))
            .await
    }

    async fn search(&self, term: &str, limit: u32) -> Result<Envelope> {
        #[derive(Serialize)]
        struct Query<'a> {
            q: &'a str,
            limit: u32,
        }

        self.manager()
            .client()
            .get_with_query(&self.path("search"), &Query { q: term, limit })
            .await
    }

    async fn stats(&self) -> Result<Envelope> {
        self.manager().client().get(&self.path("stats")).await
    }
}

/// Percent-encodes a value for use as one path segment.
pub(crate) fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
