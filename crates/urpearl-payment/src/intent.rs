//! Payment intent types shared by all provider backends.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-side state of a payment intent.
///
/// Checkout accepts [`IntentStatus::Succeeded`] and
/// [`IntentStatus::Processing`]; every other state is treated as a
/// failed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    Succeeded,
    Canceled,
    Failed,
}

impl IntentStatus {
    /// Parse a provider status string, treating anything unknown as a
    /// failure rather than erroring out.
    pub fn from_provider(s: &str) -> Self {
        match s {
            "requires_payment_method" => IntentStatus::RequiresPaymentMethod,
            "requires_confirmation" => IntentStatus::RequiresConfirmation,
            "requires_action" => IntentStatus::RequiresAction,
            "processing" => IntentStatus::Processing,
            "succeeded" => IntentStatus::Succeeded,
            "canceled" => IntentStatus::Canceled,
            _ => IntentStatus::Failed,
        }
    }

    /// Payment has settled; the order may be marked paid.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, IntentStatus::Succeeded)
    }

    /// Payment is in flight; neither settled nor failed yet.
    pub fn is_processing(&self) -> bool {
        matches!(self, IntentStatus::Processing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::RequiresPaymentMethod => "requires_payment_method",
            IntentStatus::RequiresConfirmation => "requires_confirmation",
            IntentStatus::RequiresAction => "requires_action",
            IntentStatus::Processing => "processing",
            IntentStatus::Succeeded => "succeeded",
            IntentStatus::Canceled => "canceled",
            IntentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment intent as seen by the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider-issued intent identifier.
    pub id: String,
    /// Secret handed to the browser to complete the payment.
    pub client_secret: Option<String>,
    /// Amount in minor currency units (centavos).
    pub amount_minor: i64,
    /// Lowercase ISO currency code, e.g. `php`.
    pub currency: String,
    pub status: IntentStatus,
}

/// Request to open a new payment intent.
#[derive(Debug, Clone)]
pub struct CreateIntent {
    /// Amount in minor currency units (centavos).
    pub amount_minor: i64,
    /// Lowercase ISO currency code.
    pub currency: String,
    /// Free-form metadata attached provider-side (order id, user id).
    pub metadata: HashMap<String, String>,
}
