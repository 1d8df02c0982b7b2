//! The seam between kernel operations and the transport.

use futures::future::BoxFuture;

use crate::error::KernelError;
use crate::{GenerateContentRequest, GenerateContentResponse};

/// Anything that can answer a `generateContent` request.
///
/// [`GeminiClient`](crate::GeminiClient) is the production implementation.
/// Each call is independent; implementations must not assume calls are
/// serialized.
pub trait GenerativeBackend: Send + Sync {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        request: &'a GenerateContentRequest,
    ) -> BoxFuture<'a, Result<GenerateContentResponse, KernelError>>;
}

impl<B: GenerativeBackend + ?Sized> GenerativeBackend for std::sync::Arc<B> {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        request: &'a GenerateContentRequest,
    ) -> BoxFuture<'a, Result<GenerateContentResponse, KernelError>> {
        (**self).generate(model, request)
    }
}
