use std::sync::Arc;

use futures::future::BoxFuture;

use crate::body::ResponseBody;
use crate::types::Invocation;
use crate::Result;

/// Anything that can forward an [`Invocation`] to an agent runtime.
///
/// Implementations own the shape sniffing: whatever the transport hands
/// back is turned into a [`ResponseBody`] variant before it leaves here.
/// Object-safe so the server can hold an `Arc<dyn AgentInvoker>`.
pub trait AgentInvoker: Send + Sync {
    fn invoke(&self, invocation: Invocation) -> BoxFuture<'_, Result<ResponseBody>>;
}

impl<T: AgentInvoker + ?Sized> AgentInvoker for Arc<T> {
    fn invoke(&self, invocation: Invocation) -> BoxFuture<'_, Result<ResponseBody>> {
        (**self).invoke(invocation)
    }
}
