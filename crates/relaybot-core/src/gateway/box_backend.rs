//! BoxModelBackend -- object-safe dynamic dispatch wrapper for ModelBackend.
//!
//! 1. Define an object-safe `ModelBackendDyn` trait with boxed futures
//! 2. Blanket-impl `ModelBackendDyn` for all `T: ModelBackend`
//! 3. `BoxModelBackend` wraps `Box<dyn ModelBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use relaybot_types::error::GatewayError;
use relaybot_types::llm::{ModelReply, PromptRequest};

use super::backend::ModelBackend;

/// Object-safe version of [`ModelBackend`] with boxed futures.
pub trait ModelBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a PromptRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ModelReply, GatewayError>> + Send + 'a>>;
}

impl<T: ModelBackend> ModelBackendDyn for T {
    fn name(&self) -> &str {
        ModelBackend::name(self)
    }

    fn model(&self) -> &str {
        ModelBackend::model(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a PromptRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ModelReply, GatewayError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased model backend, chosen at startup from configuration.
///
/// `ModelBackend` uses RPITIT and cannot be a trait object directly;
/// this wrapper provides the same methods over a `dyn ModelBackendDyn`.
pub struct BoxModelBackend {
    inner: Box<dyn ModelBackendDyn + Send + Sync>,
}

impl BoxModelBackend {
    pub fn new<T: ModelBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    pub async fn complete(&self, request: &PromptRequest) -> Result<ModelReply, GatewayError> {
        self.inner.complete_boxed(request).await
    }
}

impl std::fmt::Debug for BoxModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxModelBackend")
            .field("name", &self.name())
            .field("model", &self.model())
            .finish()
    }
}
