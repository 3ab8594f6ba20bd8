//! Request extension trait for recovering the caller

use tonic::{Request, Status};
use tracing::warn;

use crate::server::IdentityServerInterceptor;
use crate::CallerId;

/// Extension trait for recovering the propagated caller inside handlers
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_identity_propagation::CallerIdentityExt;
/// use tonic::{Request, Response, Status};
///
/// async fn get_user(request: Request<()>) -> Result<Response<()>, Status> {
///     let caller = request.caller_id()?;
///     println!("caller: {caller}");
///     Ok(Response::new(()))
/// }
/// ```
pub trait CallerIdentityExt {
    /// The propagated caller, or `Status::unauthenticated` when the call
    /// carries none.
    ///
    /// Reads the value stored by [`IdentityServerInterceptor`]; services
    /// mounted without the interceptor fall back to parsing metadata.
    fn caller_id(&self) -> Result<CallerId, Status>;
}

impl<T> CallerIdentityExt for Request<T> {
    fn caller_id(&self) -> Result<CallerId, Status> {
        if let Some(caller) = self.extensions().get::<CallerId>() {
            return Ok(caller.clone());
        }

        IdentityServerInterceptor::extract_caller(self.metadata())?.ok_or_else(|| {
            warn!("call is missing propagated caller identity");
            Status::unauthenticated("missing caller identity")
        })
    }
}
