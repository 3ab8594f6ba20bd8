/// API Gateway Library
///
/// The single public HTTP entry point. Verifies bearer tokens at the edge,
/// then forwards each request to the identity, integration or workflow
/// service over gRPC with the caller's identity attached.
///
/// ## Modules
///
/// - `config`: Environment configuration
/// - `error`: HTTP rendering of backend and gateway failures
/// - `middleware`: Bearer token authentication
/// - `rest_api`: Route table and handlers
/// - `state`: Shared handles passed to handlers
/// - `storage`: Object storage behind `/docs`
pub mod config;
pub mod error;
pub mod middleware;
pub mod rest_api;
pub mod state;
pub mod storage;

pub use config::Config;
pub use error::GatewayError;
pub use state::AppState;
