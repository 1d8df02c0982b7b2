//! Per-mode parameter directives and caller-side subject fallbacks.
//!
//! Each builder renders newline-separated `KEY: value` lines that are passed
//! to the compiler as its `extra_directives` argument.
//!
//! ```
//! use hyperxgen::directives::MonogramDirectives;
//!
//! let text = MonogramDirectives { layout_mode: "stacked".into(), ..Default::default() }.render();
//! assert!(text.starts_with("LAYOUT_MODE: stacked"));
//! ```

use crate::media::inline_part;
use crate::mode::Mode;

fn render_lines(lines: &[(&str, String)]) -> String {
    lines
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorDirectives {
    pub geometry_engine: String,
    pub primitive_lock: bool,
    /// Node complexity, 0-100.
    pub node_complexity: u8,
    /// Negative space ratio, 0-100.
    pub negative_space_ratio: u8,
}

impl Default for VectorDirectives {
    fn default() -> Self {
        Self {
            geometry_engine: "bezier".to_string(),
            primitive_lock: true,
            node_complexity: 50,
            negative_space_ratio: 40,
        }
    }
}

impl VectorDirectives {
    pub fn render(&self) -> String {
        render_lines(&[
            ("GEOMETRY_ENGINE", self.geometry_engine.to_uppercase()),
            (
                "PRIMITIVE_LOCK",
                if self.primitive_lock { "ENABLED" } else { "DISABLED" }.to_string(),
            ),
            ("NODE_COMPLEXITY", format!("{}%", self.node_complexity.min(100))),
            (
                "NEGATIVE_SPACE_RATIO",
                format!("{}%", self.negative_space_ratio.min(100)),
            ),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypoDirectives {
    /// Cap height, 0-100.
    pub cap_height: u8,
    /// CSS-style weight, 100-900.
    pub font_weight: u16,
    /// Glyph splicing intensity, 0-100.
    pub splicing_intensity: u8,
}

impl Default for TypoDirectives {
    fn default() -> Self {
        Self {
            cap_height: 70,
            font_weight: 700,
            splicing_intensity: 30,
        }
    }
}

impl TypoDirectives {
    pub fn render(&self) -> String {
        render_lines(&[
            ("CAP_HEIGHT", format!("{}%", self.cap_height.min(100))),
            ("FONT_WEIGHT", self.font_weight.clamp(100, 900).to_string()),
            (
                "SPLICING_INTENSITY",
                format!("{}%", self.splicing_intensity.min(100)),
            ),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonogramDirectives {
    /// `interlocked`, `stacked`, or `side-by-side`.
    pub layout_mode: String,
    pub character_count: u8,
    /// Gap at stroke intersections in pixels.
    pub intersection_gap: u8,
    /// `sharp`, `rounded`, or `flared`.
    pub terminal_shape: String,
    /// Corner radius, 0-100.
    pub corner_radius: u8,
    /// `circle`, `hexagon`, `square`, or `none`.
    pub geometric_frame: String,
    pub optical_kerning: bool,
}

impl Default for MonogramDirectives {
    fn default() -> Self {
        Self {
            layout_mode: "interlocked".to_string(),
            character_count: 2,
            intersection_gap: 4,
            terminal_shape: "sharp".to_string(),
            corner_radius: 0,
            geometric_frame: "circle".to_string(),
            optical_kerning: true,
        }
    }
}

impl MonogramDirectives {
    pub fn render(&self) -> String {
        render_lines(&[
            ("LAYOUT_MODE", self.layout_mode.clone()),
            ("CHARACTER_COUNT", self.character_count.max(1).to_string()),
            ("INTERSECTION_GAP", format!("{}px", self.intersection_gap)),
            ("TERMINAL_SHAPE", self.terminal_shape.to_uppercase()),
            ("CORNER_RADIUS", format!("{}%", self.corner_radius.min(100))),
            ("GEOMETRIC_FRAME", self.geometric_frame.to_uppercase()),
            (
                "OPTICAL_KERNING",
                if self.optical_kerning { "ON" } else { "OFF" }.to_string(),
            ),
        ])
    }
}

/// Default directives for `mode`.
pub fn default_directives(mode: Mode) -> String {
    match mode {
        Mode::Vector => VectorDirectives::default().render(),
        Mode::Typo => TypoDirectives::default().render(),
        Mode::Monogram => MonogramDirectives::default().render(),
    }
}

/// Join free-form `KEY: value` directives into one block, skipping blanks.
pub fn join_directives<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let joined = lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if joined.is_empty() { None } else { Some(joined) }
}

/// Subject text a caller should compile with, applying the per-mode
/// fallback when `subject` is blank.
///
/// Vector: `"Refine silhouette into geometric paths."` with a source image,
/// `"Abstract geometric synthesis."` without. Typo: `"HYPER"`. Monogram:
/// `"X"`.
pub fn effective_subject(mode: Mode, subject: &str, has_image: bool) -> String {
    let trimmed = subject.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    match mode {
        Mode::Vector if has_image => "Refine silhouette into geometric paths.",
        Mode::Vector => "Abstract geometric synthesis.",
        Mode::Typo => "HYPER",
        Mode::Monogram => "X",
    }
    .to_string()
}

/// [`effective_subject`] for a source image given as a data URL.
///
/// The image only counts when it carries a payload, matching what
/// [`DesignKernel::synthesize`](crate::kernel::DesignKernel::synthesize)
/// actually attaches.
pub fn subject_for_source(mode: Mode, subject: &str, source_image: Option<&str>) -> String {
    effective_subject(mode, subject, source_image.and_then(inline_part).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_render() {
        let text = VectorDirectives::default().render();
        assert_eq!(
            text,
            "GEOMETRY_ENGINE: BEZIER\nPRIMITIVE_LOCK: ENABLED\nNODE_COMPLEXITY: 50%\nNEGATIVE_SPACE_RATIO: 40%"
        );
    }

    #[test]
    fn typo_render_clamps() {
        let text = TypoDirectives {
            cap_height: 250,
            font_weight: 1200,
            splicing_intensity: 10,
        }
        .render();
        assert!(text.contains("CAP_HEIGHT: 100%"));
        assert!(text.contains("FONT_WEIGHT: 900"));
    }

    #[test]
    fn monogram_render_has_all_keys() {
        let text = MonogramDirectives::default().render();
        for key in [
            "LAYOUT_MODE",
            "CHARACTER_COUNT",
            "INTERSECTION_GAP",
            "TERMINAL_SHAPE",
            "CORNER_RADIUS",
            "GEOMETRIC_FRAME",
            "OPTICAL_KERNING",
        ] {
            assert!(text.contains(key), "missing {key}");
        }
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn default_directives_differ_per_mode() {
        assert!(default_directives(Mode::Vector).contains("GEOMETRY_ENGINE"));
        assert!(default_directives(Mode::Typo).contains("FONT_WEIGHT"));
        assert!(default_directives(Mode::Monogram).contains("LAYOUT_MODE"));
    }

    #[test]
    fn join_skips_blank_lines() {
        assert_eq!(join_directives::<&str>(&[]), None);
        assert_eq!(join_directives(&["  ", ""]), None);
        assert_eq!(
            join_directives(&["A: 1", " ", " B: 2 "]).as_deref(),
            Some("A: 1\nB: 2")
        );
    }

    #[test]
    fn fallbacks_per_mode() {
        assert_eq!(
            effective_subject(Mode::Vector, "", true),
            "Refine silhouette into geometric paths."
        );
        assert_eq!(
            effective_subject(Mode::Vector, " ", false),
            "Abstract geometric synthesis."
        );
        assert_eq!(effective_subject(Mode::Typo, "", false), "HYPER");
        assert_eq!(effective_subject(Mode::Monogram, "", true), "X");
        assert_eq!(effective_subject(Mode::Monogram, " HX ", false), "HX");
    }

    #[test]
    fn empty_source_image_counts_as_absent() {
        assert_eq!(
            subject_for_source(Mode::Vector, "", Some("data:image/png;base64,")),
            "Abstract geometric synthesis."
        );
        assert_eq!(
            subject_for_source(Mode::Vector, "", Some("data:image/png;base64,QUJD")),
            "Refine silhouette into geometric paths."
        );
        assert_eq!(subject_for_source(Mode::Vector, "", None), "Abstract geometric synthesis.");
    }
}
