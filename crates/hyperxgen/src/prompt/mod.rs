//! Prompt compilation: constant tables, the compiler, and the rewrite pass.
//!
//! - [`locks`]: per-mode global constraint blocks, job directives and
//!   system directives.
//! - [`compiler`]: [`compile_visual_prompt`] and [`PromptCompiler`].
//! - [`rewrite`]: the [`PromptRewriter`] seam applied to every compiled
//!   prompt.

pub mod compiler;
pub mod locks;
pub mod rewrite;

pub use compiler::{PromptCompiler, compile_visual_prompt, dna_injection_block};
pub use rewrite::{PassThrough, PromptRewriter, TermRewriter};
