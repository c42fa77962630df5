//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl and response body live in `urpearl-core`
//! next to `AppError` (the orphan rule forbids implementing axum's
//! trait for a foreign type here); this module re-exports the body.

pub use urpearl_core::error::ApiErrorResponse;
