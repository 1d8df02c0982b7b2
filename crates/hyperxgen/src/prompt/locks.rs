//! Constant prompt tables.
//!
//! Each mode owns one global constraint block and one job directive
//! template. These are plain `&'static str` data, never mutated.

use crate::mode::Mode;

pub const GLOBAL_VECTOR_LOCK: &str = "\
[PROTOCOL: VECTOR_LOCK]
1. PRIMITIVE GEOMETRY: Build every form from clean geometric primitives (circles, triangles, rectangles).
2. STROKE PARITY: Uniform stroke weights across all paths.
3. FLAT COLOR: Use solid fills. Gradients are strictly forbidden.
4. SUBJECT PURITY: Isolate the primary subject against a 100% white or transparent background. No environmental noise.
5. SYMMETRY ENFORCEMENT: Prioritize radial or bilateral symmetry where applicable.
[OUTPUT]: High-contrast vector-style synthesis. Minimalist. Deterministic.";

pub const GLOBAL_TYPO_LOCK: &str = "\
[PROTOCOL: KINETIC_TYPE_LOCK] Render bold, aggressive, and expressive forms, reflecting urban calligraphy and graffiti art.
1. KINETIC FLOW: Favor hand-drawn kinetics and intentional overlaps between glyphs. Avoid strict grid-locked alignment if it restricts dynamic movement.
2. STROKE VARIATION: Use tapered strokes, sharp calligraphic terminals, and dynamic sweeps to convey energy. Uniformity is secondary to expressive form.
3. NEGATIVE SPACE: Keep the background a flat void, but allow for implied depth and motion through character placement.
4. SPRAY-PAINT AESTHETICS: The wordmark keeps its high-energy impact and maintains its street art aesthetic across various scales.
[OUTPUT]: High-contrast kinetic, urban, hand-styled wordmark. Expressive. Aggressive.";

pub const GLOBAL_MONO_LOCK: &str = "\
[PROTOCOL: SEAL_LOCK]
1. CHARACTER FUSION: Interlock all characters into a single unified mark.
2. CONTAINMENT: Enclose the mark in one geometric frame (Circle, Hexagon, or Square).
3. SYMMETRY LATTICE: Enforce symmetry along 2, 4, or 8 axes.
4. STROKE RATIO: Maintain a 1:1 ratio between stroke weight and inner negative space.
[OUTPUT]: Geometric signet/seal. Symmetric. Totemic.";

pub const VECTORIZE_SOURCE_DIRECTIVE: &str = "[JOB: VECTORIZE_SOURCE] -> Render SOURCE_BUFFER as geometric vector lattice. Maintain silhouette integrity.";

pub const VECTOR_SYNTHESIS_DIRECTIVE: &str =
    "[JOB: VECTOR_SYNTHESIS] -> Synthesize new geometric subject from prompt.";

/// Fixed marker emitted in every DNA-injection block.
pub const STROKE_SKIN_LOCK: &str = "SOURCE_MATCH_LOCKED";

/// Subject line content when the caller passes a blank subject.
pub const DEFAULT_SUBJECT: &str = "Abstract geometric synthesis.";

pub const BASE_SYSTEM_DIRECTIVE: &str = "\
You are a high-density computation and design analysis engine.
All operations must be geometric, precise, and deterministic.
Maintain absolute architectural consistency across the lattice.";

pub const IMAGE_GEN_SYSTEM_DIRECTIVE: &str = "\
You are a specialized image generation engine focused on geometric purity and industrial precision. Your output must be abstract, safe-for-work, and adhere to strict design principles.
1. STRICT VISUAL ONLY: Return an image. Do not render captions, labels, or metadata.
2. HIGH CONTRAST & PRECISION: Favor sharp edges, mathematical accuracy, and clean vector aesthetics.
3. CONTENT SAFETY LOCK: Produce only abstract designs, logos, typographic art, or technical illustrations. Strictly avoid generating photorealistic images, people, faces, or any potentially sensitive or controversial content. Adherence to this rule is mandatory.";

pub const EXTRACTION_ROLE: &str = "ROLE: AUTONOMOUS_FORENSIC_AUTHENTICATOR.";

pub const EXTRACTION_PROMPT: &str = "\
[PROTOCOL: FORENSIC_AUDIT_V3]
1. DOMAIN CLASSIFICATION: Classify the source image as 'Vector', 'Typography', or 'Monogram'.
    - Monogram Logic: Interlocked, overlapping characters with high spatial complexity.
    - Typography Logic: Words, single-stroke lines or rhythmic handwriting.
    - Vector Logic: Illustrations, icons, or geometric shapes with no text-intent.

2. AUTONOMOUS EXTRACTION: For the detected domain, apply the corresponding precision parameters from FORENSIC_AUDIT_V3 and extract the style DNA.

3. GENERATE NAME, DESCRIPTION & CATEGORY:
    - name: A 2-word stylistic name for the extracted design signature (e.g., 'Apex_Grid', 'Kinetic_Handstyle'). The name MUST NOT include the detected domain ('Vector', 'Typography', 'Monogram') prefix.
    - description: One sentence describing the visual signature.
    - category: A descriptive category for the style (e.g., 'Geometric Core', 'Kinetic Typography', 'Urban Handstyle').
    - styleAuthenticityScore: 0-100. Judge the \"Skeleton\" (letter structure) and \"Skin\" (stroke pressure). Analyze terminal angles and stroke velocity.
    - palette: Dominant colors as hex strings.
    - parameters: smoothing, detail and edge, each between 0 and 1.";

pub const COMPOSITION_PROMPT: &str = "\
[PROTOCOL: COMPOSITION_REFINE]
1. ANALYZE: Study the input vector composition, element placement, and scale.
2. REFINE: Rebalance the layout using classical proportion systems, specifically the golden ratio.
3. CONSTRAINTS:
    - Preserve all original colors, stroke weights, and geometric primitives.
    - Do not add or remove any elements. Only reposition and rescale existing elements.
    - The output must be a visually refined version of the input image.
[OUTPUT]: High-fidelity raster image of the refined vector composition.";

/// Global constraint block for `mode`.
pub fn global_lock(mode: Mode) -> &'static str {
    match mode {
        Mode::Vector => GLOBAL_VECTOR_LOCK,
        Mode::Typo => GLOBAL_TYPO_LOCK,
        Mode::Monogram => GLOBAL_MONO_LOCK,
    }
}

/// Job directive line for `mode`.
///
/// Vector mode branches on whether a source image is attached; the text
/// modes embed the subject verbatim.
pub fn job_directive(mode: Mode, subject: &str, has_image: bool) -> String {
    match mode {
        Mode::Vector if has_image => VECTORIZE_SOURCE_DIRECTIVE.to_string(),
        Mode::Vector => VECTOR_SYNTHESIS_DIRECTIVE.to_string(),
        Mode::Typo => format!(
            "[JOB: TYPOGRAPHIC_STYLE_TRANSFER] -> Content: \"{subject}\". Apply DNA Skeleton/Skin logic."
        ),
        Mode::Monogram => format!(
            "[JOB: SEAL_ARCHITECT] -> Construct monogram: \"{subject}\". Radial symmetry required."
        ),
    }
}
