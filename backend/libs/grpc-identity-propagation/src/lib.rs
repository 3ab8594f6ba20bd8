//! Caller Identity Propagation for gRPC Backends
//!
//! The gateway authenticates each HTTP request once, at the edge. This
//! library carries the resulting caller identifier across the gRPC hop as an
//! out-of-band metadata pair, so backend services can recover it without
//! holding the signing secret or re-verifying the bearer token.
//!
//! ## Core Components
//!
//! - **CallerId**: validated, non-blank caller identifier
//! - **IdentityInterceptor**: client side, writes `userid` (and the optional
//!   internal API key) onto every outgoing call
//! - **IdentityServerInterceptor**: server side, checks the internal API key
//!   and lifts a present `userid` into request extensions
//! - **CallerIdentityExt**: request extension trait used by handlers
//!
//! ## Design
//!
//! - **Identity is out-of-band**: never part of the request message, so a
//!   client cannot spoof ownership through a body field
//! - **Absence is a hard failure**: handlers that need a caller get
//!   `Status::unauthenticated` when the pair is missing, never an
//!   anonymous default
//! - **Defense in depth**: the gateway rejects unauthenticated requests, and
//!   every backend operation still checks for the identity itself
//!
//! ## Usage Example
//!
//! ### Client Side (API Gateway)
//!
//! ```rust,no_run
//! use grpc_identity_propagation::{CallerId, IdentityInterceptor};
//!
//! # fn example() -> Result<(), tonic::Status> {
//! let caller = CallerId::parse("8f9c0c1e-3a56-4f0e-9b1a-8d7f2f6f3c11")?;
//! let interceptor = IdentityInterceptor::new(&caller)?;
//! // let client = WorkflowServiceClient::with_interceptor(channel, interceptor);
//! # Ok(())
//! # }
//! ```
//!
//! ### Server Side (Backend Service)
//!
//! ```rust,no_run
//! use grpc_identity_propagation::CallerIdentityExt;
//! use tonic::{Request, Response, Status};
//!
//! async fn delete_workflow(request: Request<()>) -> Result<Response<()>, Status> {
//!     let caller = request.caller_id()?;
//!     // load the record, compare its owner with `caller`, then mutate
//!     Ok(Response::new(()))
//! }
//! ```

mod client;
mod extensions;
mod identity;
mod server;

pub use client::{attach_identity, IdentityInterceptor};
pub use extensions::CallerIdentityExt;
pub use identity::CallerId;
pub use server::IdentityServerInterceptor;

/// Metadata key carrying the caller identifier. gRPC metadata keys are
/// lowercase on the wire, so this is the transport form of `userID`.
pub const USER_ID_METADATA_KEY: &str = "userid";

/// Metadata key carrying the optional shared internal API key
pub const INTERNAL_API_KEY_METADATA_KEY: &str = "x-internal-api-key";

// Re-export tonic Status for convenience
pub use tonic::Status;
