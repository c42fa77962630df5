//! Payment provider trait.

use async_trait::async_trait;

use urpearl_core::result::AppResult;

use crate::intent::{CreateIntent, PaymentIntent};

/// Trait for payment backends (Stripe, or in-memory mock).
///
/// Implementations map provider-side failures to
/// `ErrorKind::ExternalService` when the provider is unreachable and
/// `ErrorKind::Payment` when it answers with a rejection.
#[async_trait]
pub trait PaymentProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Open a new payment intent for the given amount.
    async fn create_intent(&self, request: &CreateIntent) -> AppResult<PaymentIntent>;

    /// Fetch the current state of an intent.
    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent>;

    /// Ask the provider to confirm an intent. Returns the post-confirm
    /// state; callers inspect the status rather than relying on an Err.
    async fn confirm_intent(&self, intent_id: &str) -> AppResult<PaymentIntent>;

    /// Cancel an intent that will not be completed.
    async fn cancel_intent(&self, intent_id: &str) -> AppResult<PaymentIntent>;
}
