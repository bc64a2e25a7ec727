//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: JSON flat-file and in-memory stores for records and
//!   undo history.
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

pub mod persistence;
