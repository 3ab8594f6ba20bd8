//! Server-side identity interceptor
//!
//! Guards backend services with the optional shared internal API key and
//! lifts a propagated caller identifier into request extensions.

use tonic::metadata::{AsciiMetadataValue, MetadataMap};
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::{debug, warn};

use crate::{CallerId, INTERNAL_API_KEY_METADATA_KEY, USER_ID_METADATA_KEY};

/// Server-side interceptor attached to every backend gRPC service
///
/// This interceptor:
/// 1. Rejects the call if an internal API key is configured and the caller
///    did not present it
/// 2. Parses `userid` when present and stores the [`CallerId`] in request
///    extensions
///
/// A missing `userid` is not an error here: registration, login and the
/// public listings legitimately carry no identity. Operations that need one
/// fail through [`crate::CallerIdentityExt::caller_id`].
#[derive(Clone, Debug, Default)]
pub struct IdentityServerInterceptor {
    internal_key: Option<AsciiMetadataValue>,
}

impl IdentityServerInterceptor {
    pub fn new(internal_key: Option<&str>) -> Result<Self, Status> {
        let internal_key = internal_key
            .filter(|k| !k.is_empty())
            .map(|k| {
                AsciiMetadataValue::try_from(k)
                    .map_err(|_| Status::internal("internal api key is not valid metadata"))
            })
            .transpose()?;
        Ok(Self { internal_key })
    }

    fn check_internal_key(&self, metadata: &MetadataMap) -> Result<(), Status> {
        let Some(expected) = &self.internal_key else {
            return Ok(());
        };

        match metadata.get(INTERNAL_API_KEY_METADATA_KEY) {
            Some(presented) if presented == expected => Ok(()),
            _ => {
                warn!("rejected call with missing or invalid internal api key");
                Err(Status::unauthenticated("invalid internal api key"))
            }
        }
    }

    pub(crate) fn extract_caller(metadata: &MetadataMap) -> Result<Option<CallerId>, Status> {
        let Some(raw) = metadata.get(USER_ID_METADATA_KEY) else {
            return Ok(None);
        };

        let raw = raw.to_str().map_err(|e| {
            warn!("invalid userid metadata encoding: {}", e);
            Status::unauthenticated("invalid caller identity")
        })?;

        CallerId::parse(raw).map(Some)
    }
}

impl Interceptor for IdentityServerInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        self.check_internal_key(request.metadata())?;

        if let Some(caller) = Self::extract_caller(request.metadata())? {
            debug!(caller = %caller, "propagated identity accepted");
            request.extensions_mut().insert(caller);
        }

        Ok(request)
    }
}
