//! In-memory payment provider for development and tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use rand::distr::{Alphanumeric, SampleString};
use tracing::debug;
use uuid::Uuid;

use urpearl_core::result::AppResult;
use urpearl_core::AppError;

use crate::intent::{CreateIntent, IntentStatus, PaymentIntent};
use crate::provider::PaymentProvider;

/// What the mock does when an intent is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Confirmation settles the intent.
    Succeed,
    /// Confirmation leaves the intent in flight.
    Processing,
    /// Confirmation is rejected like a declined card.
    Decline,
}

/// Payment provider that keeps intents in process memory.
///
/// Confirmation outcome is steered by [`MockBehavior`], so tests can
/// drive the success, pending and failure branches of checkout without
/// a network.
#[derive(Debug, Clone)]
pub struct MockPaymentProvider {
    intents: Arc<DashMap<String, PaymentIntent>>,
    behavior: Arc<Mutex<MockBehavior>>,
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentProvider {
    /// Mock that settles every confirmation.
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Succeed)
    }

    /// Mock with an explicit confirmation outcome.
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            intents: Arc::new(DashMap::new()),
            behavior: Arc::new(Mutex::new(behavior)),
        }
    }

    /// Change the confirmation outcome for subsequent confirms.
    pub fn set_behavior(&self, behavior: MockBehavior) {
        if let Ok(mut guard) = self.behavior.lock() {
            *guard = behavior;
        }
    }

    fn current_behavior(&self) -> MockBehavior {
        self.behavior
            .lock()
            .map(|guard| *guard)
            .unwrap_or(MockBehavior::Succeed)
    }

    fn get(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        self.intents
            .get(intent_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::payment(format!("No such payment intent: {intent_id}")))
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(&self, request: &CreateIntent) -> AppResult<PaymentIntent> {
        let id = format!("pi_mock_{}", Uuid::new_v4().simple());
        let secret_suffix = Alphanumeric.sample_string(&mut rand::rng(), 16);
        let intent = PaymentIntent {
            client_secret: Some(format!("{id}_secret_{secret_suffix}")),
            id: id.clone(),
            amount_minor: request.amount_minor,
            currency: request.currency.clone(),
            status: IntentStatus::RequiresConfirmation,
        };
        self.intents.insert(id.clone(), intent.clone());
        debug!(intent_id = %id, amount_minor = request.amount_minor, "Mock intent created");
        Ok(intent)
    }

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        self.get(intent_id)
    }

    async fn confirm_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        let mut intent = self.get(intent_id)?;
        match self.current_behavior() {
            MockBehavior::Succeed => intent.status = IntentStatus::Succeeded,
            MockBehavior::Processing => intent.status = IntentStatus::Processing,
            MockBehavior::Decline => {
                intent.status = IntentStatus::RequiresPaymentMethod;
                self.intents.insert(intent.id.clone(), intent);
                return Err(AppError::payment("Card declined"));
            }
        }
        self.intents.insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }

    async fn cancel_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        let mut intent = self.get(intent_id)?;
        intent.status = IntentStatus::Canceled;
        self.intents.insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use urpearl_core::ErrorKind;

    use super::*;

    fn request(amount_minor: i64) -> CreateIntent {
        CreateIntent {
            amount_minor,
            currency: "php".into(),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn confirm_settles_by_default() {
        let provider = MockPaymentProvider::new();
        let intent = provider.create_intent(&request(129_900)).await.unwrap();
        assert_eq!(intent.status, IntentStatus::RequiresConfirmation);
        assert_eq!(intent.amount_minor, 129_900);

        let confirmed = provider.confirm_intent(&intent.id).await.unwrap();
        assert!(confirmed.status.is_succeeded());

        let fetched = provider.retrieve_intent(&intent.id).await.unwrap();
        assert!(fetched.status.is_succeeded());
    }

    #[tokio::test]
    async fn decline_behavior_surfaces_as_payment_error() {
        let provider = MockPaymentProvider::with_behavior(MockBehavior::Decline);
        let intent = provider.create_intent(&request(500)).await.unwrap();

        let err = provider.confirm_intent(&intent.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Payment);

        let fetched = provider.retrieve_intent(&intent.id).await.unwrap();
        assert_eq!(fetched.status, IntentStatus::RequiresPaymentMethod);
    }

    #[tokio::test]
    async fn processing_behavior_keeps_intent_in_flight() {
        let provider = MockPaymentProvider::with_behavior(MockBehavior::Processing);
        let intent = provider.create_intent(&request(500)).await.unwrap();

        let confirmed = provider.confirm_intent(&intent.id).await.unwrap();
        assert!(confirmed.status.is_processing());

        provider.set_behavior(MockBehavior::Succeed);
        let confirmed = provider.confirm_intent(&intent.id).await.unwrap();
        assert!(confirmed.status.is_succeeded());
    }

    #[tokio::test]
    async fn unknown_intent_is_a_payment_error() {
        let provider = MockPaymentProvider::new();
        let err = provider.retrieve_intent("pi_missing").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Payment);
    }
}
