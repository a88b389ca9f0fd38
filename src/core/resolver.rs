use crate::core::dataset::OfficeDataset;
use crate::core::hint::{lead_state, LeadStateHint};
use crate::domain::model::{
    FallbackReason, Lead, OfficeRecord, Resolution, ResolutionOutcome, StateCode, TrackingCode,
};
use crate::domain::ports::{LeadStore, StateHintSource};
use crate::utils::error::Result;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Maps tracking codes to customs offices.
///
/// Resolution is total: a missing hint, a hint naming no known state, or any
/// failure inside the hint source (error or panic) ends at the dataset's
/// default office. Nothing is surfaced to the caller as an error, and no
/// particular async runtime is required to drive it.
pub struct OfficeResolver<H: StateHintSource> {
    dataset: Arc<OfficeDataset>,
    hint_source: Arc<H>,
}

impl<H: StateHintSource> Clone for OfficeResolver<H> {
    fn clone(&self) -> Self {
        Self {
            dataset: Arc::clone(&self.dataset),
            hint_source: Arc::clone(&self.hint_source),
        }
    }
}

impl<H: StateHintSource> OfficeResolver<H> {
    pub fn new(dataset: Arc<OfficeDataset>, hint_source: H) -> Self {
        Self::with_shared_source(dataset, Arc::new(hint_source))
    }

    pub fn with_shared_source(dataset: Arc<OfficeDataset>, hint_source: Arc<H>) -> Self {
        Self {
            dataset,
            hint_source,
        }
    }

    pub fn dataset(&self) -> &OfficeDataset {
        &self.dataset
    }

    pub fn hint_source(&self) -> &H {
        &self.hint_source
    }

    /// Resolve and return only the office.
    pub async fn resolve_office_for_tracking(&self, tracking: impl Into<TrackingCode>) -> OfficeRecord {
        self.resolve(&tracking.into()).await.into_office()
    }

    /// Resolve, keeping the matched/fallback marker.
    pub async fn resolve(&self, tracking: &TrackingCode) -> Resolution {
        let derived = match guarded(tracking, self.hint_source.state_hint(tracking)).await {
            Ok(hint) => self.classify(tracking, hint),
            Err(reason) => Err(reason),
        };
        self.settle(tracking, derived)
    }

    /// Exact match on the state code, or the default office.
    pub fn nearest_office_for_state(&self, state: &str) -> OfficeRecord {
        self.dataset.nearest(state).clone()
    }

    fn classify(
        &self,
        tracking: &TrackingCode,
        hint: Option<String>,
    ) -> std::result::Result<StateCode, FallbackReason> {
        let hint = hint.ok_or(FallbackReason::NoHint)?;
        tracing::debug!("Derived state hint '{}' for '{}'", hint, tracking);

        match StateCode::parse(&hint) {
            Ok(state) if self.dataset.get(&state).is_some() => Ok(state),
            _ => Err(FallbackReason::UnknownState(hint)),
        }
    }

    fn settle(
        &self,
        tracking: &TrackingCode,
        derived: std::result::Result<StateCode, FallbackReason>,
    ) -> Resolution {
        let (office, outcome) = match derived {
            Ok(state) => {
                tracing::info!("Tracking '{}' resolved to state {}", tracking, state);
                let office = self
                    .dataset
                    .get(&state)
                    .unwrap_or_else(|| self.dataset.default_office());
                (office, ResolutionOutcome::Matched { state })
            }
            Err(reason) => {
                tracing::info!(
                    "Tracking '{}' resolved to default state {} ({})",
                    tracking,
                    self.dataset.default_state(),
                    reason
                );
                (self.dataset.default_office(), ResolutionOutcome::Fallback { reason })
            }
        };

        Resolution {
            office: office.clone(),
            outcome,
        }
    }
}

impl<L: LeadStore> OfficeResolver<LeadStateHint<L>> {
    /// Resolve and hand back the lead the state was derived from.
    ///
    /// The lead store is queried once; callers that also need the customer
    /// record (e.g. for the express upsell) should use this instead of a
    /// second `find_by_tracking`.
    pub async fn resolve_with_lead(&self, tracking: &TrackingCode) -> (Resolution, Option<Lead>) {
        let (derived, lead) = match guarded(tracking, self.hint_source.find_lead(tracking)).await {
            Ok(lead) => (self.classify(tracking, lead_state(lead.as_ref())), lead),
            Err(reason) => (Err(reason), None),
        };
        (self.settle(tracking, derived), lead)
    }
}

/// Drive a hint lookup, turning both errors and panics into `HintFault`.
async fn guarded<T, F>(tracking: &TrackingCode, lookup: F) -> std::result::Result<T, FallbackReason>
where
    F: Future<Output = Result<T>>,
{
    match AssertUnwindSafe(lookup).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::warn!("State hint lookup failed for '{}': {}", tracking, e);
            Err(FallbackReason::HintFault(e.to_string()))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("State hint source panicked for '{}': {}", tracking, message);
            Err(FallbackReason::HintFault(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned());
    match detail {
        Some(detail) => format!("hint source panicked: {}", detail),
        None => "hint source panicked".to_string(),
    }
}

/// Standalone lookup against the built-in dataset.
pub fn nearest_office_for_state(state: &str) -> OfficeRecord {
    OfficeDataset::builtin().nearest(state).clone()
}
