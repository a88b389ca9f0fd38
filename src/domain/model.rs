use crate::utils::error::{ResolverError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static STATE_CODE_REG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

/// Suffix the express-delivery checkout appends to the original tracking code.
pub const EXPRESS_SUFFIX: &str = "-EXPRESS";

/// Two-letter state code (UF), always uppercase ASCII.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    pub fn parse(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        if !STATE_CODE_REG.is_match(&normalized) {
            return Err(ResolverError::InvalidStateCode {
                value: value.to_string(),
                reason: "expected exactly two ASCII letters".to_string(),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StateCode {
    type Error = ResolverError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shipment tracking code. Opaque to callers; empty is a valid value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TrackingCode(String);

impl TrackingCode {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() == value.len() {
            Self(value)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Absent query parameter is treated as the empty code.
    pub fn from_optional(value: Option<&str>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_express(&self) -> bool {
        self.0.ends_with(EXPRESS_SUFFIX)
    }

    /// The code without the express suffix, i.e. the code the lead was stored under.
    pub fn base(&self) -> &str {
        self.0.strip_suffix(EXPRESS_SUFFIX).unwrap_or(&self.0)
    }

    pub fn with_express_suffix(&self) -> Self {
        Self(format!("{}{}", self.base(), EXPRESS_SUFFIX))
    }
}

impl From<String> for TrackingCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for TrackingCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<TrackingCode> for String {
    fn from(code: TrackingCode) -> Self {
        code.0
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One customs office (alfândega).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeRecord {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub state: StateCode,
}

impl Validate for OfficeRecord {
    fn validate(&self) -> Result<()> {
        let field = |name: &str| format!("offices.{}.{}", self.state, name);
        validate_non_empty_string(&field("name"), &self.name)?;
        validate_non_empty_string(&field("phone"), &self.phone)?;
        validate_non_empty_string(&field("address"), &self.address)?;
        Ok(())
    }
}

/// Customer record as kept by the lead store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub tracking: String,
    pub name: String,
    pub email: String,
    pub telephone: String,
    pub cpf: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The tracking code carried no usable state hint.
    NoHint,
    /// A hint was derived but it is not a state in the dataset.
    UnknownState(String),
    /// The hint source failed or panicked.
    HintFault(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoHint => write!(f, "no state hint"),
            FallbackReason::UnknownState(state) => write!(f, "unknown state '{}'", state),
            FallbackReason::HintFault(message) => write!(f, "hint source fault: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Matched { state: StateCode },
    Fallback { reason: FallbackReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub office: OfficeRecord,
    pub outcome: ResolutionOutcome,
}

impl Resolution {
    pub fn used_fallback(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::Fallback { .. })
    }

    pub fn into_office(self) -> OfficeRecord {
        self.office
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code_normalizes_case_and_whitespace() {
        let code = StateCode::parse(" sp ").unwrap();
        assert_eq!(code.as_str(), "SP");
        assert_eq!(code.to_string(), "SP");
    }

    #[test]
    fn test_state_code_rejects_malformed_values() {
        for value in ["", "S", "SPX", "S1", "ÃO", "--"] {
            assert!(StateCode::parse(value).is_err(), "accepted {:?}", value);
        }
    }

    #[test]
    fn test_state_code_deserializes_through_validation() {
        let code: StateCode = serde_json::from_str("\"rj\"").unwrap();
        assert_eq!(code.as_str(), "RJ");
        assert!(serde_json::from_str::<StateCode>("\"RIO\"").is_err());
    }

    #[test]
    fn test_tracking_code_express_helpers() {
        let code = TrackingCode::new("  BR123456789SP-EXPRESS ");
        assert_eq!(code.as_str(), "BR123456789SP-EXPRESS");
        assert!(code.is_express());
        assert_eq!(code.base(), "BR123456789SP");
        assert_eq!(code.with_express_suffix().as_str(), "BR123456789SP-EXPRESS");

        let plain = TrackingCode::new("BR123456789SP");
        assert!(!plain.is_express());
        assert_eq!(plain.base(), "BR123456789SP");
        assert_eq!(plain.with_express_suffix().as_str(), "BR123456789SP-EXPRESS");
    }

    #[test]
    fn test_tracking_code_from_absent_value_is_empty() {
        assert!(TrackingCode::from_optional(None).is_empty());
        assert!(TrackingCode::new("   ").is_empty());
    }

    #[test]
    fn test_office_record_validation() {
        let office = OfficeRecord {
            name: "Alfândega".to_string(),
            phone: "".to_string(),
            address: "Rua X".to_string(),
            state: StateCode::parse("SP").unwrap(),
        };
        assert!(office.validate().is_err());
    }
}
