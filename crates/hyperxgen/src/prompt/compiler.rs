//! Deterministic visual prompt assembly.
//!
//! [`compile_visual_prompt`] builds the single text prompt sent with every
//! synthesis request. Blocks are emitted in a fixed order and empty blocks
//! are skipped entirely:
//!
//! 1. global constraint block for the mode
//! 2. job directive
//! 3. `[DNA_INJECTION]` block (only with style DNA)
//! 4. `[ARCHITECT_DIRECTIVES]` block (only with non-blank directives)
//! 5. `[SUBJECT_DATA]` line
//!
//! The joined text is trimmed and handed to a [`PromptRewriter`].

use super::locks::{DEFAULT_SUBJECT, STROKE_SKIN_LOCK, global_lock, job_directive};
use super::rewrite::{PassThrough, PromptRewriter};
use crate::dna::{ExtractionResult, percent};
use crate::mode::Mode;

/// Ordered list of prompt blocks. Blank blocks are dropped on push.
#[derive(Debug, Default)]
struct PromptBlocks {
    blocks: Vec<String>,
}

impl PromptBlocks {
    fn push(mut self, block: impl Into<String>) -> Self {
        let block = block.into();
        if !block.trim().is_empty() {
            self.blocks.push(block);
        }
        self
    }

    fn push_opt(self, block: Option<String>) -> Self {
        match block {
            Some(b) => self.push(b),
            None => self,
        }
    }

    fn build(self) -> String {
        self.blocks.join("\n").trim().to_string()
    }
}

/// Render the DNA-injection block for `dna`.
pub fn dna_injection_block(dna: &ExtractionResult) -> String {
    let palette = if dna.palette.is_empty() {
        "SOURCE_DEFAULT".to_string()
    } else {
        dna.palette.join(", ")
    };
    format!(
        "[DNA_INJECTION]:\n\
         - DOMAIN: {}\n\
         - SMOOTHING: {}%\n\
         - DETAIL: {}%\n\
         - STROKE_SKIN: {STROKE_SKIN_LOCK}\n\
         - PALETTE: {palette}",
        dna.domain,
        percent(dna.parameters.smoothing),
        percent(dna.parameters.detail),
    )
}

/// Compile a synthesis prompt.
///
/// Pure: inputs are only borrowed, and the result depends solely on the
/// arguments and the (deterministic) rewriter. Never returns an empty
/// string; a blank subject renders as [`DEFAULT_SUBJECT`].
pub fn compile_visual_prompt(
    subject: &str,
    mode: Mode,
    dna: Option<&ExtractionResult>,
    extra_directives: Option<&str>,
    has_image: bool,
    rewriter: &dyn PromptRewriter,
) -> String {
    let subject_text = match subject.trim() {
        "" => DEFAULT_SUBJECT,
        s => s,
    };
    let directives = extra_directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| format!("[ARCHITECT_DIRECTIVES]: {d}"));

    let combined = PromptBlocks::default()
        .push(global_lock(mode))
        .push(job_directive(mode, subject, has_image))
        .push_opt(dna.map(dna_injection_block))
        .push_opt(directives)
        .push(format!("[SUBJECT_DATA]: {subject_text}"))
        .build();

    rewriter.rewrite(&combined)
}

/// Compiler bound to one rewriter. Cheap to share behind an `Arc`.
pub struct PromptCompiler {
    rewriter: Box<dyn PromptRewriter>,
}

impl Default for PromptCompiler {
    fn default() -> Self {
        Self::new(PassThrough)
    }
}

impl PromptCompiler {
    pub fn new(rewriter: impl PromptRewriter + 'static) -> Self {
        Self {
            rewriter: Box::new(rewriter),
        }
    }

    pub fn compile(
        &self,
        subject: &str,
        mode: Mode,
        dna: Option<&ExtractionResult>,
        extra_directives: Option<&str>,
        has_image: bool,
    ) -> String {
        compile_visual_prompt(
            subject,
            mode,
            dna,
            extra_directives,
            has_image,
            self.rewriter.as_ref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna::{Domain, StyleParameters};
    use crate::prompt::locks::{GLOBAL_MONO_LOCK, GLOBAL_TYPO_LOCK, GLOBAL_VECTOR_LOCK};
    use crate::prompt::rewrite::TermRewriter;

    fn sample_dna() -> ExtractionResult {
        ExtractionResult {
            domain: Domain::Vector,
            category: "Geometric Core".into(),
            name: "Vector_Apex_Grid".into(),
            description: "Sharp shards.".into(),
            confidence: 0.9,
            style_authenticity_score: 80.0,
            palette: vec!["#fff".into(), "#000".into()],
            parameters: StyleParameters {
                smoothing: 0.5,
                detail: 0.72,
                edge: 0.3,
            },
        }
    }

    fn compile(
        subject: &str,
        mode: Mode,
        dna: Option<&ExtractionResult>,
        extra: Option<&str>,
        has_image: bool,
    ) -> String {
        compile_visual_prompt(subject, mode, dna, extra, has_image, &PassThrough)
    }

    #[test]
    fn deterministic_for_every_mode() {
        for mode in Mode::ALL {
            for subject in ["", "HX", "fox in a lattice"] {
                assert_eq!(
                    compile(subject, mode, None, None, false),
                    compile(subject, mode, None, None, false)
                );
            }
        }
    }

    #[test]
    fn monogram_scenario() {
        let out = compile("HX", Mode::Monogram, None, None, false);
        assert!(out.contains(GLOBAL_MONO_LOCK));
        assert!(out.contains("Construct monogram: \"HX\""));
        assert!(!out.contains("[DNA_INJECTION]"));
        assert!(!out.contains("[ARCHITECT_DIRECTIVES]"));
        assert!(out.ends_with("[SUBJECT_DATA]: HX"));
    }

    #[test]
    fn vector_with_dna_directives_and_image() {
        let dna = sample_dna();
        let out = compile("", Mode::Vector, Some(&dna), Some("LAYOUT_MODE: stacked"), true);
        assert!(out.contains("[DNA_INJECTION]"));
        assert!(out.contains("#fff, #000"));
        assert!(out.contains("LAYOUT_MODE: stacked"));
        assert!(out.contains("VECTORIZE_SOURCE"));
        assert!(!out.contains("VECTOR_SYNTHESIS"));
        assert!(out.contains("SMOOTHING: 50%"));
        assert!(out.contains("DETAIL: 72%"));
        assert!(out.contains("STROKE_SKIN: SOURCE_MATCH_LOCKED"));
        assert!(out.contains("DOMAIN: Vector"));
    }

    #[test]
    fn vector_without_image_synthesizes() {
        let out = compile("a fox", Mode::Vector, None, None, false);
        assert!(out.contains("VECTOR_SYNTHESIS"));
        assert!(!out.contains("VECTORIZE_SOURCE"));
        assert!(out.starts_with(GLOBAL_VECTOR_LOCK));
    }

    #[test]
    fn dna_block_present_iff_dna_given() {
        let dna = sample_dna();
        for mode in Mode::ALL {
            assert!(compile("s", mode, Some(&dna), None, false).contains("[DNA_INJECTION]"));
            let bare = compile("s", mode, None, None, false);
            assert!(!bare.contains("DNA_INJECTION"));
            assert!(!bare.contains("PALETTE"));
        }
    }

    #[test]
    fn blank_directives_are_omitted() {
        for extra in [None, Some(""), Some("   \n ")] {
            let out = compile("s", Mode::Typo, None, extra, false);
            assert!(!out.contains("[ARCHITECT_DIRECTIVES]"));
        }
        let out = compile("s", Mode::Typo, None, Some("CAP_HEIGHT: 80"), false);
        assert!(out.contains("[ARCHITECT_DIRECTIVES]: CAP_HEIGHT: 80"));
    }

    #[test]
    fn blocks_follow_fixed_order() {
        let dna = sample_dna();
        let out = compile("HYPER", Mode::Typo, Some(&dna), Some("FONT_WEIGHT: 900"), false);
        let lock = out.find(GLOBAL_TYPO_LOCK).unwrap();
        let job = out.find("[JOB:").unwrap();
        let dna_at = out.find("[DNA_INJECTION]").unwrap();
        let extra = out.find("[ARCHITECT_DIRECTIVES]").unwrap();
        let subject = out.find("[SUBJECT_DATA]").unwrap();
        assert!(lock < job && job < dna_at && dna_at < extra && extra < subject);
    }

    #[test]
    fn blank_subject_uses_default_line() {
        let out = compile("   ", Mode::Vector, None, None, false);
        assert!(out.ends_with(&format!("[SUBJECT_DATA]: {DEFAULT_SUBJECT}")));
    }

    #[test]
    fn empty_palette_renders_source_default() {
        let mut dna = sample_dna();
        dna.palette.clear();
        assert!(dna_injection_block(&dna).contains("PALETTE: SOURCE_DEFAULT"));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let dna = sample_dna();
        let before = dna.clone();
        let _ = compile("x", Mode::Vector, Some(&dna), Some("A: 1"), true);
        assert_eq!(dna, before);
    }

    #[test]
    fn rewriter_is_applied_last() {
        let compiler = PromptCompiler::new(TermRewriter::new().replace("[SUBJECT_DATA]", "[S]"));
        let out = compiler.compile("fox", Mode::Vector, None, None, false);
        assert!(out.ends_with("[S]: fox"));
    }
}
