//! # urpearl-auth
//!
//! JWT issuance and validation for the UrPearl SHOP API.
//!
//! Identity verification happens at the OAuth boundary upstream; this
//! crate only mints and checks the bearer tokens the API trusts.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
