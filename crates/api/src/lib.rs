//! HTTP API layer for atelier.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: artworks, engagement, accounts, moderation
//! - **Extractors**: authentication
//! - **Middleware**: bearer token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::router;
