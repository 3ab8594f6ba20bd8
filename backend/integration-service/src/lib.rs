//! Integration Service Library
//!
//! The integration catalog: user-owned entries with a unique slug, public
//! community listings, and an `integration_created` event for file-based
//! entries.

pub mod config;
pub mod grpc;
pub mod models;

pub use grpc::{IntegrationServiceImpl, INTEGRATION_CREATED_TOPIC};
pub use models::Integration;
