//! Convenience re-exports for common `hyperxgen` types.
//!
//! ```ignore
//! use hyperxgen::prelude::*;
//! ```
//!
//! Covers the client, the kernel and its configuration, the retry executor
//! and the prompt compiler. Preset tables and data-URL helpers stay in their
//! modules.

// ── Core types ──────────────────────────────────────────────────────
pub use crate::{ApiKey, GeminiClient, GenerateContentRequest, GenerateContentResponse, Part};
pub use crate::{KernelError, Mode};

// ── Kernel ──────────────────────────────────────────────────────────
pub use crate::config::{KernelConfig, Settings};
pub use crate::dna::{Domain, ExtractionResult, StyleParameters};
pub use crate::kernel::DesignKernel;

// ── Execution ───────────────────────────────────────────────────────
pub use crate::api::backend::GenerativeBackend;
pub use crate::api::retry::{CredentialReselector, ErrorClass, ReliableExecutor, RetryConfig};

// ── Prompts ─────────────────────────────────────────────────────────
pub use crate::directives::{
    MonogramDirectives, TypoDirectives, VectorDirectives, effective_subject,
};
pub use crate::prompt::{PassThrough, PromptCompiler, PromptRewriter, TermRewriter};
