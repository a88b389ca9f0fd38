use crate::domain::model::{Lead, TrackingCode};
use crate::utils::error::{ResolverError, Result};
use url::Url;

const PLACEHOLDER: &str = "—";

/// Query parameters of the payment confirmation page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageParams {
    pub tracking: TrackingCode,
    pub amount: Option<f64>,
    pub express: Option<String>,
}

impl PageParams {
    /// Parse `tracking=...&amount=...&express=...`; a leading `?` is allowed.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "tracking" => params.tracking = TrackingCode::new(value.into_owned()),
                "amount" => params.amount = parse_amount(&value),
                "express" => params.express = Some(value.trim().to_string()),
                _ => {}
            }
        }
        params
    }

    pub fn from_url(page_url: &str) -> Result<Self> {
        let url = Url::parse(page_url).map_err(|e| ResolverError::InvalidConfigValueError {
            field: "url".to_string(),
            value: page_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        Ok(Self::from_query(url.query().unwrap_or("")))
    }

    /// Express delivery already paid: the checkout code carries `-EXPRESS`, or `express=paid`.
    pub fn express_paid(&self) -> bool {
        self.tracking.is_express() || self.express.as_deref() == Some("paid")
    }

    pub fn formatted_amount(&self) -> Option<String> {
        self.amount.map(format_brl)
    }
}

fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

pub fn format_brl(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}

/// Title-case a city name; two-letter values are treated as state codes.
pub fn format_place(value: &str) -> String {
    let value = value.trim();
    if value.chars().count() == 2 {
        return value.to_uppercase();
    }

    value
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            if matches!(lower.as_str(), "de" | "da" | "do" | "das" | "dos" | "e") {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "City, UF" line of the express-delivery offer.
pub fn delivery_destination(lead: Option<&Lead>) -> String {
    let part = |value: Option<&String>| {
        value
            .map(|v| format_place(v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };
    let city = part(lead.and_then(|l| l.city.as_ref()));
    let state = part(lead.and_then(|l| l.state.as_ref()));
    format!("{}, {}", city, state)
}
