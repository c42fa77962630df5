//! Payment provider configuration.

use serde::{Deserialize, Serialize};

/// Payment provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Provider backend: `"stripe"` or `"mock"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Secret API key for the hosted provider.
    #[serde(default)]
    pub secret_key: String,
    /// Base URL of the provider API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// ISO currency code used for all charges.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Request timeout in seconds for provider calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            secret_key: String::new(),
            api_base: default_api_base(),
            currency: default_currency(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_provider() -> String {
    "mock".to_string()
}

fn default_api_base() -> String {
    "https://api.stripe.com/v1".to_string()
}

fn default_currency() -> String {
    "php".to_string()
}

fn default_request_timeout() -> u64 {
    15
}
