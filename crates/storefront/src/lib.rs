//! Storefront backend library.
//!
//! The interesting part lives in [`ratings`]: an inference service that turns
//! shopper interaction events into persisted per-(client, product) ratings
//! under an upgrade-only merge policy. [`catalog`] provides the client and
//! product directories the service validates events against.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ratings;
pub mod telemetry;
