//! # urpearl-payment
//!
//! Payment intent handling behind a provider trait. The Stripe backend
//! talks to the real API; the mock backend keeps intents in memory for
//! development and tests.
//!
//! All amounts at this boundary are integer minor units (centavos).
//! Conversion from decimal pesos happens before calls enter this crate.

pub mod intent;
pub mod mock;
pub mod provider;
pub mod stripe;

pub use intent::{CreateIntent, IntentStatus, PaymentIntent};
pub use mock::{MockBehavior, MockPaymentProvider};
pub use provider::PaymentProvider;
pub use stripe::StripeProvider;
