pub mod dataset;
pub mod hint;
pub mod resolver;
pub mod slot;

pub use crate::domain::model::{OfficeRecord, Resolution, StateCode, TrackingCode};
pub use crate::domain::ports::{ConfigProvider, LeadStore, StateHintSource};
pub use crate::utils::error::Result;
