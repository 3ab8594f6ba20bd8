/// Identity Service Library
///
/// Registration, login and self-service profile management for Flowgrid.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `grpc`: gRPC server implementation
/// - `models`: Stored user record
/// - `security`: Password hashing
/// - `validators`: Input validation
pub mod config;
pub mod grpc;
pub mod models;
pub mod security;
pub mod validators;

pub use grpc::IdentityServiceServer;
pub use models::User;
