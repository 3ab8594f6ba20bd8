//! Workflow Service Library
//!
//! Projects and the workflows filed under them.

pub mod config;
pub mod grpc;
pub mod models;

pub use grpc::WorkflowServiceImpl;
pub use models::{Project, Workflow};
