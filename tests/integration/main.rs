//! Integration test suite for the UrPearl SHOP API.
//!
//! Tests built on [`helpers::TestApp::without_database`] run against a
//! router whose pool never connects and pass on any machine. Tests
//! built on [`helpers::TestApp::new`] need a live Postgres instance
//! (`URPEARL_TEST_DATABASE_URL`) and are `#[ignore]`d by default.

mod helpers;

mod admin_test;
mod auth_test;
mod cart_test;
mod catalog_test;
mod checkout_test;
mod rating_test;
