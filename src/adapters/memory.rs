use crate::domain::model::Lead;
use crate::domain::ports::LeadStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct InMemoryLeadStore {
    leads: HashMap<String, Lead>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later leads with the same tracking code replace earlier ones.
    pub fn from_leads(leads: impl IntoIterator<Item = Lead>) -> Self {
        let leads = leads
            .into_iter()
            .map(|lead| (lead.tracking.trim().to_string(), lead))
            .collect();
        Self { leads }
    }

    pub fn insert(&mut self, lead: Lead) {
        self.leads.insert(lead.tracking.trim().to_string(), lead);
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn find_by_tracking(&self, tracking: &str) -> Result<Option<Lead>> {
        Ok(self.leads.get(tracking.trim()).cloned())
    }
}
