//! Design-generation modes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The discipline a synthesis request targets. Selects the global
/// constraint block and the job directive the compiler emits.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Vector,
    #[serde(alias = "typography")]
    Typo,
    Monogram,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Vector, Mode::Typo, Mode::Monogram];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Vector => "vector",
            Mode::Typo => "typo",
            Mode::Monogram => "monogram",
        }
    }

    /// Human-facing discipline name used inside refinement prompts.
    pub fn discipline(self) -> &'static str {
        match self {
            Mode::Vector => "vector illustration",
            Mode::Typo => "typographic wordmark",
            Mode::Monogram => "geometric monogram",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vector" => Ok(Mode::Vector),
            "typo" | "typography" => Ok(Mode::Typo),
            "monogram" => Ok(Mode::Monogram),
            other => Err(format!(
                "unknown mode '{other}' (expected vector, typo, or monogram)"
            )),
        }
    }
}
