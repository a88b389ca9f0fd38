pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, OutputFormat};

pub use crate::config::TomlConfig;
pub use crate::core::{
    dataset::{OfficeDataset, DEFAULT_STATE_CODE},
    hint::{LeadStateHint, NoHint},
    resolver::{nearest_office_for_state, OfficeResolver},
    slot::{OfficeSlot, SlotTicket},
};
pub use crate::domain::model::{
    FallbackReason, Lead, OfficeRecord, Resolution, ResolutionOutcome, StateCode, TrackingCode,
};
pub use crate::utils::error::{ResolverError, Result};
