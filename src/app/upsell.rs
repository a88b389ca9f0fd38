use crate::domain::model::{Lead, TrackingCode};
use crate::utils::error::{ResolverError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Upsell prices offered for express delivery, in BRL.
pub const DEFAULT_UPSELL_AMOUNTS: &[u32] = &[12, 15];

/// Input of the external payment widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub amount: u32,
    pub tracking_code: String,
    pub customer: Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: CustomerDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDocument {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Cpf,
}

#[derive(Debug, Clone)]
pub struct ExpressUpsell {
    amounts: Vec<u32>,
}

impl ExpressUpsell {
    pub fn new(amounts: &[u32]) -> Result<Self> {
        if amounts.is_empty() || amounts.contains(&0) {
            return Err(ResolverError::InvalidConfigValueError {
                field: "upsell.amounts".to_string(),
                value: format!("{:?}", amounts),
                reason: "At least one amount is required and amounts must be positive".to_string(),
            });
        }
        Ok(Self {
            amounts: amounts.to_vec(),
        })
    }

    pub fn amounts(&self) -> &[u32] {
        &self.amounts
    }

    /// One amount per page view, chosen uniformly.
    pub fn pick_amount(&self) -> u32 {
        self.pick_amount_with(&mut rand::thread_rng())
    }

    pub fn pick_amount_with<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        // new() 保證 amounts 非空
        self.amounts.choose(rng).copied().unwrap_or_default()
    }

    pub fn checkout_request(&self, lead: &Lead, tracking: &TrackingCode, amount: u32) -> CheckoutRequest {
        CheckoutRequest {
            amount,
            tracking_code: tracking.with_express_suffix().into(),
            customer: Customer {
                name: lead.name.clone(),
                email: lead.email.clone(),
                phone: lead.telephone.clone(),
                document: CustomerDocument {
                    kind: DocumentKind::Cpf,
                    number: lead.cpf.clone(),
                },
            },
        }
    }
}

impl Default for ExpressUpsell {
    fn default() -> Self {
        Self {
            amounts: DEFAULT_UPSELL_AMOUNTS.to_vec(),
        }
    }
}
