use crate::domain::model::{Lead, TrackingCode};
use crate::domain::ports::{LeadStore, StateHintSource};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Derives the state from shipment metadata: the lead stored under the tracking code.
pub struct LeadStateHint<L: LeadStore> {
    store: L,
}

impl<L: LeadStore> LeadStateHint<L> {
    pub fn new(store: L) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &L {
        &self.store
    }

    /// The lead stored under the tracking code, `-EXPRESS` stripped.
    pub async fn find_lead(&self, tracking: &TrackingCode) -> Result<Option<Lead>> {
        // 加購快遞時追蹤碼會帶 -EXPRESS，客戶資料仍以原始追蹤碼儲存
        let key = tracking.base();
        if key.is_empty() {
            return Ok(None);
        }

        let lead = self.store.find_by_tracking(key).await?;
        tracing::debug!("Lead lookup for {}: found={}", key, lead.is_some());
        Ok(lead)
    }
}

/// The lead's state, trimmed; blank counts as absent.
pub fn lead_state(lead: Option<&Lead>) -> Option<String> {
    lead.and_then(|lead| lead.state.as_deref())
        .map(str::trim)
        .filter(|state| !state.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<L: LeadStore> StateHintSource for LeadStateHint<L> {
    async fn state_hint(&self, tracking: &TrackingCode) -> Result<Option<String>> {
        let lead = self.find_lead(tracking).await?;
        Ok(lead_state(lead.as_ref()))
    }
}

/// Never yields a hint; every resolution goes to the default office.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHint;

#[async_trait]
impl StateHintSource for NoHint {
    async fn state_hint(&self, _tracking: &TrackingCode) -> Result<Option<String>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLeadStore;
    use crate::domain::model::Lead;

    fn lead(tracking: &str, state: Option<&str>) -> Lead {
        Lead {
            tracking: tracking.to_string(),
            name: "Maria Silva".to_string(),
            email: "maria@example.com".to_string(),
            telephone: "11999990000".to_string(),
            cpf: "12345678909".to_string(),
            city: Some("Campinas".to_string()),
            state: state.map(str::to_string),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_lead_state_hint_returns_lead_state() {
        let store = InMemoryLeadStore::from_leads(vec![lead("BR1", Some(" rj "))]);
        let hint = LeadStateHint::new(store);

        let result = hint.state_hint(&TrackingCode::new("BR1")).await.unwrap();
        assert_eq!(result.as_deref(), Some("rj"));
    }

    #[tokio::test]
    async fn test_lead_state_hint_strips_express_suffix() {
        let store = InMemoryLeadStore::from_leads(vec![lead("BR1", Some("MG"))]);
        let hint = LeadStateHint::new(store);

        let result = hint.state_hint(&TrackingCode::new("BR1-EXPRESS")).await.unwrap();
        assert_eq!(result.as_deref(), Some("MG"));
    }

    #[tokio::test]
    async fn test_lead_state_hint_none_for_missing_lead_or_state() {
        let store = InMemoryLeadStore::from_leads(vec![lead("BR1", None), lead("BR2", Some("  "))]);
        let hint = LeadStateHint::new(store);

        assert_eq!(hint.state_hint(&TrackingCode::new("BR1")).await.unwrap(), None);
        assert_eq!(hint.state_hint(&TrackingCode::new("BR2")).await.unwrap(), None);
        assert_eq!(hint.state_hint(&TrackingCode::new("BR9")).await.unwrap(), None);
        assert_eq!(hint.state_hint(&TrackingCode::default()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_lead_uses_base_code() {
        let store = InMemoryLeadStore::from_leads(vec![lead("BR1", Some("SC"))]);
        let hint = LeadStateHint::new(store);

        let found = hint.find_lead(&TrackingCode::new("BR1-EXPRESS")).await.unwrap();
        assert_eq!(found.map(|lead| lead.tracking).as_deref(), Some("BR1"));
        assert!(hint.find_lead(&TrackingCode::new("-EXPRESS")).await.unwrap().is_none());
    }

    #[test]
    fn test_lead_state_trims_and_skips_blank() {
        assert_eq!(lead_state(Some(&lead("BR1", Some(" pr ")))).as_deref(), Some("pr"));
        assert_eq!(lead_state(Some(&lead("BR1", Some("   ")))), None);
        assert_eq!(lead_state(Some(&lead("BR1", None))), None);
        assert_eq!(lead_state(None), None);
    }

    #[tokio::test]
    async fn test_no_hint() {
        assert_eq!(NoHint.state_hint(&TrackingCode::new("BR1")).await.unwrap(), None);
    }
}
