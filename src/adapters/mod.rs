// Adapters layer: concrete lead stores (memory, csv, http).

pub mod csv_store;
pub mod http;
pub mod memory;

pub use csv_store::CsvLeadStore;
pub use http::HttpLeadStore;
pub use memory::InMemoryLeadStore;

use crate::domain::model::Lead;
use crate::domain::ports::LeadStore;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Lead store selected by `[lead_store] type` in the configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredLeadStore {
    Memory(InMemoryLeadStore),
    Csv(CsvLeadStore),
    Http(HttpLeadStore),
}

#[async_trait]
impl LeadStore for ConfiguredLeadStore {
    async fn find_by_tracking(&self, tracking: &str) -> Result<Option<Lead>> {
        match self {
            ConfiguredLeadStore::Memory(store) => store.find_by_tracking(tracking).await,
            ConfiguredLeadStore::Csv(store) => store.find_by_tracking(tracking).await,
            ConfiguredLeadStore::Http(store) => store.find_by_tracking(tracking).await,
        }
    }
}
