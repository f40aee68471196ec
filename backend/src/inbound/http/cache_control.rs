//! Cache-control policies for HTTP handlers.

use actix_web::http::header::{CACHE_CONTROL, HeaderName};

/// Responses that must never be written to any cache.
pub const NO_STORE: &str = "no-store";

/// Header tuple for probe responses and decrypted patient data.
pub const fn no_store_header() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, NO_STORE)
}
