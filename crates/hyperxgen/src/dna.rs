//! Style DNA: the structured record produced by style extraction.
//!
//! An [`ExtractionResult`] is created once from the model's JSON answer and
//! is read-only afterwards. The compiler renders it into the DNA-injection
//! block; callers persist it however they like (it serializes with the same
//! camelCase keys the extraction schema uses).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

use crate::error::KernelError;

/// Design domain the extractor classified the source image into.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Domain {
    #[default]
    Vector,
    Typography,
    Monogram,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Vector => "Vector",
            Domain::Typography => "Typography",
            Domain::Monogram => "Monogram",
        }
    }

    /// Lenient parse used on model output. Unknown labels fall back to
    /// [`Domain::Vector`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "typography" | "typo" => Domain::Typography,
            "monogram" => Domain::Monogram,
            _ => Domain::Vector,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric precision parameters, each in `[0, 1]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct StyleParameters {
    pub smoothing: f64,
    pub detail: f64,
    pub edge: f64,
}

impl Default for StyleParameters {
    fn default() -> Self {
        Self {
            smoothing: 0.5,
            detail: 0.5,
            edge: 0.5,
        }
    }
}

/// Extracted style signature ("style DNA").
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub domain: Domain,
    pub category: String,
    pub name: String,
    pub description: String,
    pub confidence: f64,
    pub style_authenticity_score: f64,
    pub palette: Vec<String>,
    pub parameters: StyleParameters,
}

/// What the model actually returns. Every field is optional so a partial
/// answer still yields a usable record.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RawExtraction {
    domain: Option<String>,
    category: Option<String>,
    name: Option<String>,
    description: Option<String>,
    confidence: Option<f64>,
    style_authenticity_score: Option<f64>,
    palette: Option<Vec<String>>,
    parameters: Option<RawParameters>,
}

#[derive(Deserialize, Debug, Default)]
struct RawParameters {
    smoothing: Option<f64>,
    detail: Option<f64>,
    edge: Option<f64>,
}

fn unit(v: Option<f64>, default: f64) -> f64 {
    match v {
        Some(x) if x.is_finite() => x.clamp(0.0, 1.0),
        _ => default,
    }
}

impl ExtractionResult {
    /// Parse and normalize the JSON text returned by the extraction call.
    ///
    /// Blank text is treated as `{}`. Unknown domains become `Vector`,
    /// missing parameters default to 0.5, numeric values are clamped, and a
    /// blank name is replaced by [`fallback_style_name`]. The stored name is
    /// prefixed with the domain (`Vector_Apex_Grid`).
    pub fn from_model_json(text: &str) -> Result<Self, KernelError> {
        let text = text.trim();
        let raw: RawExtraction = if text.is_empty() {
            RawExtraction::default()
        } else {
            serde_json::from_str(text)?
        };

        let domain = raw.domain.as_deref().map_or(Domain::Vector, Domain::from_label);
        let description = raw.description.unwrap_or_default().trim().to_string();
        let base_name = match raw.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => fallback_style_name(&description),
        };
        let params = raw.parameters.unwrap_or_default();
        let defaults = StyleParameters::default();

        Ok(Self {
            domain,
            category: raw
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "Uncategorized".to_string()),
            name: format!("{domain}_{base_name}"),
            description,
            confidence: unit(raw.confidence, 0.0),
            style_authenticity_score: raw
                .style_authenticity_score
                .filter(|s| s.is_finite())
                .map_or(0.0, |s| s.clamp(0.0, 100.0)),
            palette: raw
                .palette
                .unwrap_or_default()
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            parameters: StyleParameters {
                smoothing: unit(params.smoothing, defaults.smoothing),
                detail: unit(params.detail, defaults.detail),
                edge: unit(params.edge, defaults.edge),
            },
        })
    }

    /// One-line summary used when DNA context is handed to a text model.
    pub fn summary(&self) -> String {
        format!(
            "{} '{}' (smoothing {}%, detail {}%, edge {}%, palette {})",
            self.domain,
            self.name,
            percent(self.parameters.smoothing),
            percent(self.parameters.detail),
            percent(self.parameters.edge),
            if self.palette.is_empty() {
                "unspecified".to_string()
            } else {
                self.palette.join(", ")
            }
        )
    }
}

/// Format a `[0, 1]` ratio as a whole percentage.
pub(crate) fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

const NAME_ADJECTIVES: &[&str] = &[
    "Apex", "Vector", "Neural", "Cyber", "Void", "Omega", "Lattice", "Prism", "Aero", "Core",
    "Hyper", "Nova", "Flux", "Static", "Quantum",
];
const NAME_NOUNS: &[&str] = &[
    "Grid", "Crest", "Splicer", "Matrix", "Engine", "Vortex", "Pulse", "Node", "Fragment", "Axis",
    "Signet", "Vault", "Flow", "Unit",
];
const NAME_SUFFIXES: &[&str] = &["V1", "X", "Prime", "Delta", "Beta", "Alpha", "Pro"];

/// Stylistic `Adjective-Noun Suffix` name derived from `seed`.
///
/// Deterministic so that re-parsing the same answer yields the same name.
pub fn fallback_style_name(seed: &str) -> String {
    // FNV-1a
    let hash = seed.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    });
    let pick = |parts: &[&'static str], shift: u32| -> &'static str {
        parts[((hash >> shift) % parts.len() as u64) as usize]
    };
    format!(
        "{}-{} {}",
        pick(NAME_ADJECTIVES, 0),
        pick(NAME_NOUNS, 16),
        pick(NAME_SUFFIXES, 32)
    )
}

/// Structured-output schema sent with the extraction request.
pub fn extraction_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "domain": { "type": "STRING", "enum": ["Vector", "Typography", "Monogram"] },
            "category": { "type": "STRING" },
            "name": { "type": "STRING" },
            "description": { "type": "STRING" },
            "confidence": { "type": "NUMBER" },
            "styleAuthenticityScore": { "type": "NUMBER" },
            "palette": { "type": "ARRAY", "items": { "type": "STRING" } },
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "smoothing": { "type": "NUMBER" },
                    "detail": { "type": "NUMBER" },
                    "edge": { "type": "NUMBER" }
                },
                "required": ["smoothing", "detail", "edge"]
            }
        },
        "required": [
            "domain", "category", "name", "description", "confidence",
            "styleAuthenticityScore", "palette", "parameters"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_answer() {
        let text = r##"{
            "domain": "Monogram",
            "category": "Geometric Core",
            "name": "Apex_Grid",
            "description": "Interlocked seal.",
            "confidence": 0.91,
            "styleAuthenticityScore": 88,
            "palette": ["#111111", " #eeeeee "],
            "parameters": {"smoothing": 0.25, "detail": 0.8, "edge": 0.6}
        }"##;
        let dna = ExtractionResult::from_model_json(text).unwrap();
        assert_eq!(dna.domain, Domain::Monogram);
        assert_eq!(dna.name, "Monogram_Apex_Grid");
        assert_eq!(dna.palette, vec!["#111111", "#eeeeee"]);
        assert_eq!(dna.parameters.detail, 0.8);
        assert_eq!(dna.style_authenticity_score, 88.0);
    }

    #[test]
    fn empty_answer_is_normalized() {
        let dna = ExtractionResult::from_model_json("").unwrap();
        assert_eq!(dna.domain, Domain::Vector);
        assert_eq!(dna.category, "Uncategorized");
        assert!(dna.palette.is_empty());
        assert_eq!(dna.parameters, StyleParameters::default());
        assert!(dna.name.starts_with("Vector_"));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let text = r#"{"domain":"weird","confidence":3.0,"styleAuthenticityScore":-4,
                       "parameters":{"smoothing":1.7,"detail":-0.2}}"#;
        let dna = ExtractionResult::from_model_json(text).unwrap();
        assert_eq!(dna.domain, Domain::Vector);
        assert_eq!(dna.confidence, 1.0);
        assert_eq!(dna.style_authenticity_score, 0.0);
        assert_eq!(dna.parameters.smoothing, 1.0);
        assert_eq!(dna.parameters.detail, 0.0);
        assert_eq!(dna.parameters.edge, 0.5);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ExtractionResult::from_model_json("{not json").unwrap_err();
        assert!(matches!(err, KernelError::Parse(_)));
    }

    #[test]
    fn fallback_name_is_deterministic() {
        let a = fallback_style_name("sharp seal");
        assert_eq!(a, fallback_style_name("sharp seal"));
        assert!(a.contains('-'));
        assert!(a.contains(' '));
    }

    #[test]
    fn serde_round_trip_uses_camel_case() {
        let dna = ExtractionResult::from_model_json(r#"{"styleAuthenticityScore": 42}"#).unwrap();
        let json = serde_json::to_value(&dna).unwrap();
        assert_eq!(json["styleAuthenticityScore"], 42.0);
        assert_eq!(json["domain"], "Vector");
    }

    #[test]
    fn summary_mentions_palette_and_percentages() {
        let mut dna = ExtractionResult::from_model_json("{}").unwrap();
        dna.palette = vec!["#fff".into(), "#000".into()];
        let s = dna.summary();
        assert!(s.contains("smoothing 50%"));
        assert!(s.contains("#fff, #000"));
    }
}
