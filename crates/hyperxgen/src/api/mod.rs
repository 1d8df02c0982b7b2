//! Remote-call layer: the backend seam and the reliable executor.
//!
//! - [`backend`]: [`GenerativeBackend`], the trait kernel operations call
//!   through. Implemented by [`GeminiClient`](crate::GeminiClient).
//! - [`retry`]: error classification ([`ErrorClass`]), backoff schedule
//!   ([`RetryConfig`]) and [`ReliableExecutor`] with optional
//!   [`CredentialReselector`].

pub mod backend;
pub mod retry;

pub use backend::GenerativeBackend;
pub use retry::{
    CredentialReselector, ErrorClass, ReliableExecutor, RetryConfig, classify_error, classify_text,
};
