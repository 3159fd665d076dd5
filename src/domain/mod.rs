//! Domain layer for the scheduling engine
//!
//! This module contains core business logic, domain models and the port
//! traits that storage adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, ErrorKind};
