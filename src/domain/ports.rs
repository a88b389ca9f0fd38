use crate::domain::model::{Lead, TrackingCode};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Customer records keyed by tracking code.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn find_by_tracking(&self, tracking: &str) -> Result<Option<Lead>>;
}

/// Derives a raw state hint from a tracking code.
///
/// `Ok(None)` means the code carries no usable hint. The returned string is not
/// validated; the resolver decides whether it names a known state.
#[async_trait]
pub trait StateHintSource: Send + Sync {
    async fn state_hint(&self, tracking: &TrackingCode) -> Result<Option<String>>;
}

pub trait ConfigProvider: Send + Sync {
    fn default_state(&self) -> &str;
    fn dataset_path(&self) -> Option<&str>;
    fn upsell_amounts(&self) -> &[u32];
}
