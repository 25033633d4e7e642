//! Application layer - Use cases and orchestration.
//!
//! Services here orchestrate domain logic through the domain ports rather
//! than concrete provider implementations.

pub mod services;

pub use services::{DocumentService, QaService, SearchService};
