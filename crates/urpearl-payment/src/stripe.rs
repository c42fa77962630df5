//! Stripe-backed payment provider.
//!
//! Talks to the payment intents API with form-encoded requests, the
//! wire format Stripe expects. Responses are mapped into the shared
//! [`PaymentIntent`] type so nothing above this file knows Stripe.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use urpearl_core::config::PaymentConfig;
use urpearl_core::result::AppResult;
use urpearl_core::{AppError, ErrorKind};

use crate::intent::{CreateIntent, IntentStatus, PaymentIntent};
use crate::provider::PaymentProvider;

/// Payment provider backed by the Stripe payment intents API.
#[derive(Clone)]
pub struct StripeProvider {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl std::fmt::Debug for StripeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Intent document as returned by the API.
#[derive(Debug, Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: Option<String>,
    amount: i64,
    currency: String,
    status: String,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

impl StripeProvider {
    /// Build a provider from payment configuration.
    pub fn new(config: &PaymentConfig) -> AppResult<Self> {
        if config.secret_key.is_empty() {
            return Err(AppError::configuration(
                "Stripe provider selected but payment.secret_key is empty",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build payment HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    /// Send a form-encoded request and decode the intent from the
    /// response, mapping API rejections to payment errors.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        action: &str,
    ) -> AppResult<PaymentIntent> {
        let response = request
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Payment provider unreachable while trying to {action}"),
                    e,
                )
            })?;

        let status = response.status();
        if status.is_success() {
            let intent: StripeIntent = response.json().await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Payment provider returned an unreadable response",
                    e,
                )
            })?;
            debug!(intent_id = %intent.id, status = %intent.status, "Stripe {action} succeeded");
            return Ok(map_intent(intent));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<StripeErrorEnvelope>(&body)
            .ok()
            .and_then(|env| env.error.message.or(env.error.error_type))
            .unwrap_or_else(|| format!("HTTP {status}"));
        warn!(%status, %message, "Stripe {action} rejected");

        if status.is_server_error() {
            return Err(AppError::external_service(format!(
                "Payment provider error during {action}: {message}"
            )));
        }
        Err(AppError::payment(format!(
            "Payment {action} rejected: {message}"
        )))
    }
}

fn map_intent(intent: StripeIntent) -> PaymentIntent {
    PaymentIntent {
        status: IntentStatus::from_provider(&intent.status),
        id: intent.id,
        client_secret: intent.client_secret,
        amount_minor: intent.amount,
        currency: intent.currency,
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_intent(&self, request: &CreateIntent) -> AppResult<PaymentIntent> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".into(), request.amount_minor.to_string()),
            ("currency".into(), request.currency.clone()),
            ("automatic_payment_methods[enabled]".into(), "true".into()),
        ];
        for (key, value) in &request.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        let url = format!("{}/payment_intents", self.api_base);
        self.send(self.client.post(&url).form(&form), "create intent")
            .await
    }

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        let url = format!("{}/payment_intents/{intent_id}", self.api_base);
        self.send(self.client.get(&url), "retrieve intent").await
    }

    async fn confirm_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        let url = format!("{}/payment_intents/{intent_id}/confirm", self.api_base);
        self.send(self.client.post(&url), "confirm intent").await
    }

    async fn cancel_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        let url = format!("{}/payment_intents/{intent_id}/cancel", self.api_base);
        self.send(self.client.post(&url), "cancel intent").await
    }
}
