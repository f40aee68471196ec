//! Outbound adapters implementing domain ports for storage.
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic.
//!
//! - **memory**: process-local tables used by the server and the tests.

pub mod memory;
