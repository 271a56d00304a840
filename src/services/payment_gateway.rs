//! Payment intents through Stripe.
//!
//! The gateway only authorizes a charge; the client completes it out of band
//! with the returned client secret.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway rejected request: HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to parse gateway response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// `amount` is in minor currency units (cents)
    async fn create_payment_intent(&self, amount: i64) -> Result<PaymentIntent, GatewayError>;
}

/// Body of `POST /create-payment-intent`; price may be a number or a numeric string
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PaymentIntentRequest {
    #[schema(value_type = String, example = "19.99")]
    pub price: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// Converts a decimal price into minor units, rounding to the nearest cent.
///
/// Returns `None` for anything that is not a finite positive number.
pub fn amount_in_minor_units(price: &serde_json::Value) -> Option<i64> {
    let value = match price {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let cents = (value * 100.0).round();
    if cents < 1.0 || cents > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
    currency: String,
}

impl StripeGateway {
    pub fn new(secret_key: String, api_base: String, currency: String) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            client,
            secret_key,
            api_base,
            currency,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(&self, amount: i64) -> Result<PaymentIntent, GatewayError> {
        log::info!("💳 Creating payment intent: {} {}", amount, self.currency);

        let url = format!("{}/v1/payment_intents", self.api_base);
        let idempotency_key = uuid::Uuid::new_v4().to_string();

        let form = [
            ("amount", amount.to_string()),
            ("currency", self.currency.clone()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .header("Idempotency-Key", idempotency_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent =
            serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))?;

        log::info!("✅ Payment intent created: {}", intent.id);

        Ok(intent)
    }
}
