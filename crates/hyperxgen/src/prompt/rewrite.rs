//! Final text-to-text pass applied to every compiled prompt.

/// Rewrites an assembled prompt before submission.
///
/// Implementations must be deterministic: the same input always yields the
/// same output, which keeps [`compile_visual_prompt`](super::compile_visual_prompt)
/// a pure function.
pub trait PromptRewriter: Send + Sync {
    fn rewrite(&self, prompt: &str) -> String;
}

/// Returns the prompt unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl PromptRewriter for PassThrough {
    fn rewrite(&self, prompt: &str) -> String {
        prompt.to_string()
    }
}

/// Ordered, case-insensitive term substitution followed by collapsing runs
/// of spaces inside each line.
///
/// ```
/// use hyperxgen::prompt::{PromptRewriter, TermRewriter};
///
/// let rw = TermRewriter::new().replace("photo", "illustration");
/// assert_eq!(rw.rewrite("A  Photo of a fox"), "A illustration of a fox");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TermRewriter {
    rules: Vec<(String, String)>,
}

impl TermRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a substitution. Rules apply in insertion order.
    pub fn replace(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        if !from.is_empty() {
            self.rules.push((from.to_lowercase(), to.into()));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Replace every case-insensitive occurrence of `needle` (already
/// lower-cased) in `haystack`.
///
/// Lower-casing can change the byte length of individual characters, so
/// matches are found in the lower-cased text and mapped back through the
/// character boundaries of both strings. A match that does not start and
/// end on an original character boundary is left alone.
fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    // (offset in `lower`, offset in `haystack`) at every character start,
    // plus the end of both strings.
    let mut bounds: Vec<(usize, usize)> = Vec::with_capacity(haystack.len() + 1);
    let mut lower = String::with_capacity(haystack.len());
    for (idx, c) in haystack.char_indices() {
        bounds.push((lower.len(), idx));
        lower.extend(c.to_lowercase());
    }
    bounds.push((lower.len(), haystack.len()));

    let original_offset = |lower_idx: usize| {
        bounds
            .binary_search_by_key(&lower_idx, |&(l, _)| l)
            .ok()
            .map(|i| bounds[i].1)
    };

    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for (idx, _) in lower.match_indices(needle) {
        let (Some(start), Some(end)) = (original_offset(idx), original_offset(idx + needle.len()))
        else {
            continue;
        };
        if start < last {
            continue;
        }
        out.push_str(haystack.get(last..start).unwrap_or_default());
        out.push_str(replacement);
        last = end;
    }
    out.push_str(haystack.get(last..).unwrap_or_default());
    out
}

impl PromptRewriter for TermRewriter {
    fn rewrite(&self, prompt: &str) -> String {
        let mut text = prompt.to_string();
        for (from, to) in &self.rules {
            text = replace_ignore_case(&text, from, to);
        }
        text.lines()
            .map(|line| line.split(' ').filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_is_identity() {
        let text = "[SUBJECT_DATA]:  keep   spacing";
        assert_eq!(PassThrough.rewrite(text), text);
    }

    #[test]
    fn rules_apply_in_order_and_ignore_case() {
        let rw = TermRewriter::new()
            .replace("Portrait", "silhouette")
            .replace("silhouette", "outline");
        assert_eq!(rw.rewrite("PORTRAIT study"), "outline study");
        assert_eq!(rw.len(), 2);
    }

    #[test]
    fn empty_rules_are_ignored() {
        let rw = TermRewriter::new().replace("", "x");
        assert!(rw.is_empty());
    }

    #[test]
    fn collapses_spaces_but_keeps_lines() {
        let rw = TermRewriter::new();
        assert_eq!(rw.rewrite("a   b\n  c  d "), "a b\nc d");
    }

    #[test]
    fn deterministic() {
        let rw = TermRewriter::new().replace("x", "y");
        assert_eq!(rw.rewrite("xXx"), rw.rewrite("xXx"));
        assert_eq!(rw.rewrite("xXx"), "yyy");
    }

    #[test]
    fn length_changing_case_folds_keep_char_boundaries() {
        // 'İ' lower-cases to two chars (one byte longer); the Kelvin sign
        // lower-cases to ASCII 'k' (two bytes shorter).
        let rw = TermRewriter::new().replace("k", "c");
        assert_eq!(rw.rewrite("İİ\u{212A}ite"), "İİcite");
        assert_eq!(rw.rewrite("Kite İ kite"), "cite İ cite");

        let rw = TermRewriter::new().replace("straße", "street");
        assert_eq!(rw.rewrite("Ärger STRAßE İ"), "Ärger street İ");
    }

    #[test]
    fn compiler_survives_non_ascii_subjects() {
        use crate::mode::Mode;
        use crate::prompt::compile_visual_prompt;

        let rw = TermRewriter::new().replace("k", "c");
        let out = compile_visual_prompt("İİ\u{212A}ite", Mode::Monogram, None, None, false, &rw);
        assert!(out.contains("[SUBJECT_DATA]: İİcite"));
    }
}
