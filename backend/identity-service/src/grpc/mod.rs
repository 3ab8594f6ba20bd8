/// gRPC server module for identity-service
///
/// Exports:
/// - IdentityServiceServer: AuthService implementation
pub mod server;

pub use server::IdentityServiceServer;
