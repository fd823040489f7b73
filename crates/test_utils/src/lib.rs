//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the billing core
//! test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `memory`: In-memory implementations of the storage ports
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;
pub mod memory;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use generators::*;
pub use memory::*;
