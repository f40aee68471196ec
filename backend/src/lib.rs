//! Clinic backend library.
//!
//! Patient contact and medical fields are sealed by [`domain::cipher`]
//! before storage; every handler is gated by [`domain::access`] policies.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
