//! Design operations: style extraction, synthesis, and refinement.
//!
//! [`DesignKernel`] owns a [`GenerativeBackend`], a read-only
//! [`KernelConfig`], a [`ReliableExecutor`] and a [`PromptCompiler`]. Every
//! operation builds its request up front, then sends it through
//! [`ReliableExecutor::run`] so quota backoff and credential recovery apply
//! uniformly.

use tracing::{debug, info};

use crate::api::backend::GenerativeBackend;
use crate::api::retry::ReliableExecutor;
use crate::config::{KernelConfig, Settings};
use crate::dna::{ExtractionResult, extraction_response_schema};
use crate::error::KernelError;
use crate::media::inline_part;
use crate::mode::Mode;
use crate::prompt::locks::{
    BASE_SYSTEM_DIRECTIVE, COMPOSITION_PROMPT, EXTRACTION_PROMPT, EXTRACTION_ROLE,
    IMAGE_GEN_SYSTEM_DIRECTIVE,
};
use crate::prompt::{PromptCompiler, PromptRewriter};
use crate::{Content, DEFAULT_TEXT_MODEL, GenerateContentRequest, GenerateContentResponse, Part};

/// Temperature for composition refinement, which should stay close to the
/// input.
pub const COMPOSITION_TEMPERATURE: f32 = 0.2;

/// Error message when a synthesis answer carries no image.
pub fn synthesis_failure_message(mode: Mode) -> &'static str {
    match mode {
        Mode::Vector => {
            "Lattice synthesis failed. The model may have refused the prompt due to safety filters."
        }
        Mode::Typo => {
            "Typo synthesis failed. The model may have refused the prompt due to safety filters."
        }
        Mode::Monogram => {
            "Monogram synthesis failed. The model may have refused the prompt due to safety filters."
        }
    }
}

/// Build the request for an image-in, image-out or text-in, image-out call.
fn image_request(
    prompt: String,
    image: Option<Part>,
    system: Option<Content>,
    config: &KernelConfig,
    temperature: f32,
) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    parts.extend(image);
    parts.push(Part::text(prompt));
    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        system_instruction: system,
        generation_config: Some(config.generation_config(temperature)),
    }
}

fn refine_prompt_text(prompt: &str, mode: Mode, dna: Option<&ExtractionResult>) -> String {
    let dna_line = dna
        .map(|d| format!("\nSTYLE_DNA: {}", d.summary()))
        .unwrap_or_default();
    format!(
        "[PROTOCOL: PROMPT_REFINE]\n\
         Rewrite the following {} prompt into a precise, geometric, production-ready design brief. \
         Keep the original subject and intent. Return only the refined prompt text, without quotes or commentary.{dna_line}\n\
         PROMPT: {}",
        mode.discipline(),
        prompt.trim()
    )
}

/// Extraction, synthesis, and refinement operations over one backend.
pub struct DesignKernel<B> {
    backend: B,
    config: KernelConfig,
    text_model: String,
    executor: ReliableExecutor,
    compiler: PromptCompiler,
}

impl<B: GenerativeBackend> DesignKernel<B> {
    /// Kernel with the default executor (5 quota retries, no reselector),
    /// pass-through rewriter and default text model.
    pub fn new(backend: B, config: KernelConfig) -> Self {
        Self {
            backend,
            config,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            executor: ReliableExecutor::default(),
            compiler: PromptCompiler::default(),
        }
    }

    /// Kernel configured from loaded [`Settings`].
    pub fn from_settings(backend: B, settings: &Settings) -> Self {
        Self::new(backend, settings.kernel.clone())
            .with_text_model(settings.text_model.clone())
            .with_executor(ReliableExecutor::new(settings.retry_config()))
    }

    pub fn with_executor(mut self, executor: ReliableExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_rewriter(mut self, rewriter: impl PromptRewriter + 'static) -> Self {
        self.compiler = PromptCompiler::new(rewriter);
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn executor(&self) -> &ReliableExecutor {
        &self.executor
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Compile a synthesis prompt with this kernel's rewriter.
    pub fn compile(
        &self,
        subject: &str,
        mode: Mode,
        dna: Option<&ExtractionResult>,
        extra_directives: Option<&str>,
        has_image: bool,
    ) -> String {
        self.compiler
            .compile(subject, mode, dna, extra_directives, has_image)
    }

    async fn send(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, KernelError> {
        self.executor
            .run(|| self.backend.generate(model, request))
            .await
    }

    /// Classify a source image and extract its style DNA.
    pub async fn extract_style(&self, image: &str) -> Result<ExtractionResult, KernelError> {
        let image_part = inline_part(image).ok_or(KernelError::EmptyBuffer("Empty buffer."))?;

        let mut request = image_request(
            EXTRACTION_PROMPT.to_string(),
            Some(image_part),
            Some(Content::system(format!(
                "{BASE_SYSTEM_DIRECTIVE}\n{EXTRACTION_ROLE}"
            ))),
            &self.config,
            self.config.temperature,
        );
        if let Some(gc) = request.generation_config.as_mut() {
            gc.response_mime_type = Some("application/json".to_string());
            gc.response_schema = Some(extraction_response_schema());
        }

        info!("extracting style DNA (model={})", self.text_model);
        let response = self.send(&self.text_model, &request).await?;
        let dna = ExtractionResult::from_model_json(&response.text())?;
        debug!(
            "extracted {} '{}' (confidence {:.2})",
            dna.domain, dna.name, dna.confidence
        );
        Ok(dna)
    }

    /// Synthesize an image for `mode`. Returns a `data:` URL.
    ///
    /// `subject` is compiled as given; apply
    /// [`effective_subject`](crate::directives::effective_subject) first for
    /// per-mode fallbacks. A `source_image` that is not a usable data URL
    /// is ignored, and the prompt is compiled as if none were attached.
    pub async fn synthesize(
        &self,
        mode: Mode,
        subject: &str,
        source_image: Option<&str>,
        dna: Option<&ExtractionResult>,
        extra_directives: Option<&str>,
    ) -> Result<String, KernelError> {
        let image_part = source_image.and_then(inline_part);
        let prompt = self.compile(subject, mode, dna, extra_directives, image_part.is_some());
        let request = image_request(
            prompt,
            image_part,
            Some(Content::system(IMAGE_GEN_SYSTEM_DIRECTIVE)),
            &self.config,
            self.config.temperature,
        );

        info!(
            "synthesizing {mode} (model={}, dna={}, device={})",
            self.config.model,
            dna.is_some(),
            self.config.device_context
        );
        let response = self.send(&self.config.model, &request).await?;
        response
            .first_inline_data()
            .map(|d| d.to_data_url())
            .ok_or_else(|| KernelError::NoImage(synthesis_failure_message(mode).to_string()))
    }

    /// Ask the text model to tighten a user prompt for `mode`.
    ///
    /// A blank answer returns the original prompt unchanged.
    pub async fn refine_text_prompt(
        &self,
        prompt: &str,
        mode: Mode,
        dna: Option<&ExtractionResult>,
    ) -> Result<String, KernelError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(refine_prompt_text(
                prompt, mode, dna,
            ))])],
            system_instruction: Some(Content::system(BASE_SYSTEM_DIRECTIVE)),
            generation_config: Some(self.config.generation_config(self.config.temperature)),
        };

        let response = self.send(&self.text_model, &request).await?;
        let refined = response.text();
        let refined = refined.trim();
        if refined.is_empty() {
            debug!("refinement returned no text; keeping original prompt");
            Ok(prompt.to_string())
        } else {
            Ok(refined.to_string())
        }
    }

    /// Rebalance an existing composition without adding or removing
    /// elements. Returns a `data:` URL.
    pub async fn refine_composition(&self, image: &str) -> Result<String, KernelError> {
        let image_part = inline_part(image)
            .ok_or(KernelError::EmptyBuffer("Empty buffer for refinement."))?;
        let request = image_request(
            COMPOSITION_PROMPT.to_string(),
            Some(image_part),
            None,
            &self.config,
            COMPOSITION_TEMPERATURE,
        );

        info!("refining composition (model={})", self.config.model);
        let response = self.send(&self.config.model, &request).await?;
        response
            .first_inline_data()
            .map(|d| d.to_data_url())
            .ok_or_else(|| KernelError::NoImage("Composition refinement failed.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna::StyleParameters;

    #[test]
    fn image_part_comes_before_text() {
        let req = image_request(
            "draw".into(),
            Some(Part::inline("image/png", "AAAA")),
            None,
            &KernelConfig::default(),
            0.4,
        );
        let parts = &req.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert!(parts[0].inline_data.is_some());
        assert_eq!(parts[1].text.as_deref(), Some("draw"));
    }

    #[test]
    fn text_only_request_has_one_part() {
        let req = image_request("draw".into(), None, None, &KernelConfig::default(), 0.4);
        assert_eq!(req.contents[0].parts.len(), 1);
        assert_eq!(req.generation_config.unwrap().temperature, Some(0.4));
    }

    #[test]
    fn refine_prompt_mentions_discipline_and_dna() {
        let dna = ExtractionResult {
            domain: crate::dna::Domain::Typography,
            category: "Urban".into(),
            name: "Typography_Fat_Cap".into(),
            description: String::new(),
            confidence: 0.8,
            style_authenticity_score: 70.0,
            palette: vec!["#0f0".into()],
            parameters: StyleParameters::default(),
        };
        let text = refine_prompt_text(" neon tag ", Mode::Typo, Some(&dna));
        assert!(text.contains("typographic wordmark"));
        assert!(text.contains("STYLE_DNA: Typography 'Typography_Fat_Cap'"));
        assert!(text.ends_with("PROMPT: neon tag"));

        let bare = refine_prompt_text("owl", Mode::Vector, None);
        assert!(!bare.contains("STYLE_DNA"));
    }

    #[test]
    fn failure_messages_are_mode_specific() {
        assert!(synthesis_failure_message(Mode::Vector).starts_with("Lattice"));
        assert!(synthesis_failure_message(Mode::Typo).starts_with("Typo"));
        assert!(synthesis_failure_message(Mode::Monogram).starts_with("Monogram"));
    }
}
