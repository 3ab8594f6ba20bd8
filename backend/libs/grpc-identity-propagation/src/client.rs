//! Client-side identity interceptor
//!
//! Writes the caller identifier onto every outgoing gRPC request.

use tonic::metadata::{AsciiMetadataValue, MetadataMap};
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::{CallerId, INTERNAL_API_KEY_METADATA_KEY, USER_ID_METADATA_KEY};

/// Write `userid: <caller>` into a metadata map, replacing any existing value.
pub fn attach_identity(metadata: &mut MetadataMap, caller: &CallerId) -> Result<(), Status> {
    let value = AsciiMetadataValue::try_from(caller.as_str())
        .map_err(|_| Status::internal("caller identity is not valid metadata"))?;
    metadata.insert(USER_ID_METADATA_KEY, value);
    Ok(())
}

/// Client-side interceptor that propagates the authenticated caller
///
/// One interceptor is built per inbound request from that request's
/// authenticated identity, then attached to a cheap clone of the shared
/// channel. Calls that must not carry an identity (login, registration,
/// public listings) use [`IdentityInterceptor::anonymous`], which still
/// presents the internal API key.
///
/// ## Design
///
/// - **Fail at construction**: identifiers are converted to metadata once;
///   `call` never fails
/// - **Cloneable**: tonic clones the interceptor into each request future
#[derive(Clone, Debug)]
pub struct IdentityInterceptor {
    user_id: Option<AsciiMetadataValue>,
    internal_key: Option<AsciiMetadataValue>,
}

impl IdentityInterceptor {
    pub fn new(caller: &CallerId) -> Result<Self, Status> {
        let user_id = AsciiMetadataValue::try_from(caller.as_str())
            .map_err(|_| Status::internal("caller identity is not valid metadata"))?;

        Ok(Self {
            user_id: Some(user_id),
            internal_key: None,
        })
    }

    /// An interceptor that propagates no caller.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            internal_key: None,
        }
    }

    /// Also send the shared internal API key expected by backends that
    /// have one configured.
    pub fn with_internal_key(mut self, key: Option<&str>) -> Result<Self, Status> {
        self.internal_key = key
            .map(|k| {
                AsciiMetadataValue::try_from(k)
                    .map_err(|_| Status::internal("internal api key is not valid metadata"))
            })
            .transpose()?;
        Ok(self)
    }
}

impl Interceptor for IdentityInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let metadata = request.metadata_mut();
        match &self.user_id {
            Some(user_id) => {
                metadata.insert(USER_ID_METADATA_KEY, user_id.clone());
            }
            None => {
                metadata.remove(USER_ID_METADATA_KEY);
            }
        }
        if let Some(key) = &self.internal_key {
            metadata.insert(INTERNAL_API_KEY_METADATA_KEY, key.clone());
        }
        Ok(request)
    }
}
