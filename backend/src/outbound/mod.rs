//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local repositories used by default and in tests
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic.

pub mod memory;
pub mod persistence;
