//! Certhub Core - Shared domain records and service infrastructure
//!
//! This crate provides:
//! - Domain record types (certificates, skills) and their validation
//! - Error taxonomy shared by every service
//! - Environment configuration helpers
//! - Standard microservice runtime (startup, signals, shutdown)

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

pub use error::{CerthubError, Result};
pub use service::{CerthubService, MicroserviceRuntime};
