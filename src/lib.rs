//! Vitrina: storefront backend for a medical-equipment catalog.
//!
//! The service fronts a remote catalog API with a request-coalescing TTL
//! object cache, session/JWT authentication, and a transfer-state bootstrap
//! so server-rendered pages hand their fetched data to the hydrating client.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
