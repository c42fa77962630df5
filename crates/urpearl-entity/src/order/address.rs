//! Shipping address snapshot.

use serde::{Deserialize, Serialize};

/// Destination captured at checkout and stored verbatim on the order.
///
/// Kept as a JSON document rather than normalized columns; the order
/// owns its copy even if the user later changes their details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient full name.
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
}
