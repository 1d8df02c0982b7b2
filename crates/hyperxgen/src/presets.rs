//! Built-in preset library.
//!
//! Presets are static prompt fragments grouped by kind and category. A
//! synthesis caller prepends the preset prompt to its subject with
//! [`combine_with_preset`]. Filter presets carry a CSS-style filter string
//! instead of targeting a synthesis mode.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::mode::Mode;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    Vector,
    Typography,
    Monogram,
    Filter,
}

impl PresetKind {
    pub const ALL: [PresetKind; 4] = [
        PresetKind::Vector,
        PresetKind::Typography,
        PresetKind::Monogram,
        PresetKind::Filter,
    ];

    /// Synthesis mode the preset feeds, `None` for filters.
    pub fn mode(self) -> Option<Mode> {
        match self {
            PresetKind::Vector => Some(Mode::Vector),
            PresetKind::Typography => Some(Mode::Typo),
            PresetKind::Monogram => Some(Mode::Monogram),
            PresetKind::Filter => None,
        }
    }
}

impl From<Mode> for PresetKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Vector => PresetKind::Vector,
            Mode::Typo => PresetKind::Typography,
            Mode::Monogram => PresetKind::Monogram,
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PresetKind::Vector => "vector",
            PresetKind::Typography => "typography",
            PresetKind::Monogram => "monogram",
            PresetKind::Filter => "filter",
        };
        f.write_str(s)
    }
}

impl FromStr for PresetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filter" | "filters" => Ok(PresetKind::Filter),
            other => other
                .parse::<Mode>()
                .map(PresetKind::from)
                .map_err(|_| format!("unknown preset kind '{other}'")),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub kind: PresetKind,
    pub category: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'static str>,
}

/// Presets of one kind sharing a category, in table order.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PresetCategory {
    pub title: &'static str,
    pub items: Vec<&'static Preset>,
}

pub static ENGINE_PRESETS: &[Preset] = &[
    Preset {
        id: "sig-vec-01",
        kind: PresetKind::Vector,
        category: "Vector Core",
        name: "Omega Lattice Alpha",
        description: "The peak of recursive geometric interconnection. High-frequency detail.",
        prompt: "Recursive geometric lattice structure. Intricate interconnected pathways forming a complex architectural subject. Flat solid fills, high-contrast industrial palette. Absolute subject isolation.",
        filter: None,
    },
    Preset {
        id: "sig-vec-02",
        kind: PresetKind::Vector,
        category: "Vector Core",
        name: "Prism Void Delta",
        description: "Refractive geometric deconstruction. Spectral light dispersion blocks.",
        prompt: "Refractive deconstruction of a subject into geometric shards. Hard-edged color blocks with sharp directional offsets. Prism logic. Flat vector execution.",
        filter: None,
    },
    Preset {
        id: "sig-vec-08",
        kind: PresetKind::Vector,
        category: "Vector Core",
        name: "Geometric Bauhaus",
        description: "Primary shape synthesis. Balanced compositional tension and primary colors.",
        prompt: "Bauhaus geometric synthesis. Primary shapes (circle, triangle, square) in balanced compositional tension. Primary color palette (Red, Blue, Yellow) on white. Grid-aligned, clean, minimalist abstraction.",
        filter: None,
    },
    Preset {
        id: "sig-vec-10",
        kind: PresetKind::Vector,
        category: "Illustrated Vector",
        name: "Retrowave Horizon",
        description: "Synthwave aesthetic with neon vector strokes and 80s grid logic.",
        prompt: "80s synthwave vector illustration. Subject rendered with vibrant neon outlines, magenta and cyan highlights. Distant geometric sun, horizontal scanlines, high-contrast digital retro aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-vec-11",
        kind: PresetKind::Vector,
        category: "Illustrated Vector",
        name: "Cyberpunk Iso-Core",
        description: "Detailed isometric cyberpunk architecture. Clean vector line-work.",
        prompt: "Isometric cyberpunk vector art. High-density urban machinery, mechanical pipes, and glowing nodes. Industrial charcoal and electric yellow palette. Sharp geometric perspective.",
        filter: None,
    },
    Preset {
        id: "sig-vec-15",
        kind: PresetKind::Vector,
        category: "Illustrated Vector",
        name: "Neo-Mecha Blueprint",
        description: "High-density mechanical parts and technical drafted lines.",
        prompt: "High-density mecha-style vector illustration. Intricate mechanical components, pistons, and wiring diagrams rendered vector paths. Technical blueprint aesthetic, cyan and white lines on dark navy background.",
        filter: None,
    },
    Preset {
        id: "sig-vec-16",
        kind: PresetKind::Vector,
        category: "Illustrated Vector",
        name: "Organic Fluidity",
        description: "Liquid geometric blobs and flowing abstract paths.",
        prompt: "Abstract organic vector synthesis. Flowing, liquid-like geometric blobs interlocked in a complex arrangement. Smooth bezier curves, high-contrast vibrant palette, minimalist subject isolation.",
        filter: None,
    },
    Preset {
        id: "sig-vec-17",
        kind: PresetKind::Vector,
        category: "Illustrated Vector",
        name: "Memphis Neo-Pop",
        description: "Playful geometric patterns and squiggles with high contrast.",
        prompt: "Memphis-style geometric illustration. Randomly placed primitive shapes (dots, squiggles, triangles, circles) forming an abstract subject. High-contrast pastel and black palette, flat vector execution.",
        filter: None,
    },
    Preset {
        id: "sig-vec-18",
        kind: PresetKind::Vector,
        category: "Illustrated Vector",
        name: "Single-Line Zen",
        description: "Continuous path minimalist line-art.",
        prompt: "Minimalist continuous single-line vector art. The entire subject is drawn with one unbroken path of uniform weight. Elegant, minimalist, white background, single accent color.",
        filter: None,
    },
    Preset {
        id: "sig-vec-19",
        kind: PresetKind::Vector,
        category: "Illustrated Vector",
        name: "Geometric Mosaic",
        description: "Stained-glass style geometric fragmentation.",
        prompt: "Geometric mosaic vector art. Subject divided into a strict grid of triangles and quadrilaterals. Uniform thin outlines between shapes. Stained-glass aesthetic but with flat industrial colors.",
        filter: None,
    },
    Preset {
        id: "sig-ty-01",
        kind: PresetKind::Typography,
        category: "Typography Core",
        name: "Kinetic Pulse Pro",
        description: "High-contrast dynamic wordmark with speed lines.",
        prompt: "Dynamic motion wordmark. Sharp terminal slices, parallel speed lines, high-contrast geometry. Geometric display type with zero kerning errors.",
        filter: None,
    },
    Preset {
        id: "sig-ty-03",
        kind: PresetKind::Typography,
        category: "Typography Core",
        name: "Liquid-Steel Slab",
        description: "Viscous metallic forms with razor-sharp curves.",
        prompt: "Viscous liquid letterforms rendered with absolute sharp geometric precision. Mercury-like flow but with strictly defined paths. High-contrast chrome logic, flat vector shading.",
        filter: None,
    },
    Preset {
        id: "sig-ty-05",
        kind: PresetKind::Typography,
        category: "Street Art / Graffiti",
        name: "Wildstyle Apex",
        description: "Interlocking graffiti letters with arrow terminals.",
        prompt: "Aggressive wildstyle graffiti typography. Interlocking 3D character forms, sharp arrow extensions, explosive energy. High-contrast urban palette, sharp vector outlines.",
        filter: None,
    },
    Preset {
        id: "sig-ty-06",
        kind: PresetKind::Typography,
        category: "Street Art / Graffiti",
        name: "Brooklyn Throw-up",
        description: "Rounded bubble letters with bold outlines.",
        prompt: "Street art bubble typography. Bold, rounded, high-volume letterforms. Thick black outlines, vibrant fill, subtle vector highlights. Traditional graffiti throw-up aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-ty-11",
        kind: PresetKind::Typography,
        category: "Street Art / Graffiti",
        name: "Fat Cap Handstyle",
        description: "Fluid marker-style tag with high-pressure drip artifacts.",
        prompt: "High-pressure fat cap graffiti handstyle. Fluid, kinetic letterforms with intentional stroke weight variation. Minimalist drips primitives. Raw street calligraphy aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-ty-12",
        kind: PresetKind::Typography,
        category: "Street Art / Graffiti",
        name: "Acid-Chisel Calligraphy",
        description: "Warped calligraphic forms with jagged, sharp edges.",
        prompt: "Aggressive acid-style calligraphic typography. Sharp jagged terminals, extreme warping, and liquid-sharp intersections. High-contrast neon green on black palette. Kinetic energy.",
        filter: None,
    },
    Preset {
        id: "sig-ty-13",
        kind: PresetKind::Typography,
        category: "Street Art / Graffiti",
        name: "Stencil Guerilla",
        description: "Raw industrial stencil type with bridge cutouts.",
        prompt: "Urban stencil wordmark. Bold industrial letterforms with geometric bridge cutouts. Sharp clean edges with subtle vector splatter artifacts. Brutalist street aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-ty-14",
        kind: PresetKind::Typography,
        category: "Street Art / Graffiti",
        name: "Vandal-Chrome 3D",
        description: "High-shine 3D graffiti with sharp geometric shadow blocks.",
        prompt: "3D chrome graffiti typography. Volumetric letterforms with sharp geometric shadow blocks. High-contrast metallic reflection logic. Urban luxury aesthetic, sharp vector outlines.",
        filter: None,
    },
    Preset {
        id: "sig-ty-15",
        kind: PresetKind::Typography,
        category: "Experimental Typography",
        name: "Brutalist Monolith",
        description: "Heavy block typography with zero contrast.",
        prompt: "Monolithic block typography. Heavy vertical blocks, jagged brutalist terminals, zero-kerning grid alignment. High visual mass, architectural typography aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-ty-16",
        kind: PresetKind::Typography,
        category: "Experimental Typography",
        name: "Warp-Core Kinetic",
        description: "Stretched characters with fluid geometric distortion.",
        prompt: "Distorted kinetic typography. Characters appear stretched and warped through a central vortex. Sharp vector paths, high-frequency motion lines, spectral color offsets.",
        filter: None,
    },
    Preset {
        id: "sig-mo-01",
        kind: PresetKind::Monogram,
        category: "Monogram Core",
        name: "Nano Seal Omega",
        description: "Micro-etched signet with nested circular frames.",
        prompt: "Precision geometric seal. Interlocking character geometry, nested circular frames, perfect radial symmetry. High-density signet detail.",
        filter: None,
    },
    Preset {
        id: "sig-mo-03",
        kind: PresetKind::Monogram,
        category: "Monogram Core",
        name: "Totem Axis Prime",
        description: "Vertical mirrored character stacking.",
        prompt: "Symmetrical vertical totem monogram. Mirrored character DNA stacked into a unified geometric pillar. Central axis dominance, high-impact silhouette.",
        filter: None,
    },
    Preset {
        id: "sig-mo-05",
        kind: PresetKind::Monogram,
        category: "Elite Monogram",
        name: "Imperial Interlock",
        description: "Sophisticated serif-style interlocking character fusion.",
        prompt: "High-fashion luxury monogram. Characters interlocked with sophisticated serif-style curves and sharp terminal junctions. Perfectly balanced negative space, high-end signature aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-mo-06",
        kind: PresetKind::Monogram,
        category: "Elite Monogram",
        name: "Hex-Logic Circuit",
        description: "Characters fused into a rigid hexagonal circuit grid.",
        prompt: "Cyber-industrial monogram. Characters integrated into a rigid hexagonal boundary with circuit-style 45-degree junctions. Uniform line weights, technical signet aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-mo-07",
        kind: PresetKind::Monogram,
        category: "Elite Monogram",
        name: "Sacred Geometry Mandala",
        description: "Complex radial symmetry with interlocking character paths.",
        prompt: "Mandala-style geometric monogram. Characters fused into a complex radial lattice with concentric geometric rings. Perfect symmetry, high-frequency detail, totemic presence.",
        filter: None,
    },
    Preset {
        id: "sig-mo-08",
        kind: PresetKind::Monogram,
        category: "Elite Monogram",
        name: "Impossible Loop Duo",
        description: "Characters forming an infinite M.C. Escher-style loop.",
        prompt: "M.C. Escher inspired geometric monogram. Two characters interweave to form a single continuous impossible loop. Sharp geometric shading, flat vector fills, high-contrast silhouette.",
        filter: None,
    },
    Preset {
        id: "sig-mo-09",
        kind: PresetKind::Monogram,
        category: "Elite Monogram",
        name: "Architectural Signet",
        description: "Clean-line drafted monogram with geometric boundary frames.",
        prompt: "Modern architectural monogram. Characters constructed from clean drafted lines within a minimalist geometric square frame. Precision spacing, uniform strokes, minimalist industrial aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-mo-10",
        kind: PresetKind::Monogram,
        category: "Elite Monogram",
        name: "Blackletter Seal",
        description: "Aggressive medieval blackletter forms reduced to block primitives.",
        prompt: "Neo-Gothic monogram seal. Traditional blackletter character DNA reconstructed using rigid geometric block primitives. Sharp angular intersections, high visual weight, aggressive signet aesthetic.",
        filter: None,
    },
    Preset {
        id: "sig-fi-01",
        kind: PresetKind::Filter,
        category: "Filters Core",
        name: "Spectral-V",
        description: "High-frequency silver luminance with aggressive edge contrast.",
        prompt: "Filter synthesis: silver luminance, aggressive edge contrast.",
        filter: Some("grayscale(100%) contrast(180%) brightness(105%) saturate(0%)"),
    },
    Preset {
        id: "sig-fi-02",
        kind: PresetKind::Filter,
        category: "Filters Core",
        name: "Cobalt-Trace",
        description: "Deep industrial blue shadows with electric highlight clarity.",
        prompt: "Filter synthesis: cobalt shadows, electric highlight clarity.",
        filter: Some("hue-rotate(200deg) saturate(180%) contrast(140%) brightness(90%)"),
    },
    Preset {
        id: "gd-vec-01",
        kind: PresetKind::Vector,
        category: "Historic Art Styles",
        name: "Art Deco Grandeur",
        description: "Bold geometric forms and symmetrical patterns of the 1920s.",
        prompt: "Art Deco architectural illustration. Subject rendered with bold geometric shapes, sharp symmetrical lines, and repeating patterns. Luxurious gold, black, and deep blue palette. Elegant, opulent, and precise vector lines.",
        filter: None,
    },
    Preset {
        id: "gd-vec-02",
        kind: PresetKind::Vector,
        category: "Historic Art Styles",
        name: "Pop Art Comic",
        description: "High-impact comic book aesthetic with thick lines and dot patterns.",
        prompt: "Pop Art comic book style vector. Subject rendered with thick black outlines, bold primary colors, and Ben-Day dot patterns for shading. Dynamic, graphic, and high-impact.",
        filter: None,
    },
    Preset {
        id: "gd-vec-03",
        kind: PresetKind::Vector,
        category: "Historic Art Styles",
        name: "Psychedelic Swirl",
        description: "Flowing, distorted, and vibrant visuals of 1960s art.",
        prompt: "1960s psychedelic art vector. Subject deconstructed into swirling, fluid, and distorted organic shapes. Vibrant, high-saturation clashing color palette. Hypnotic, flowing, and mind-bending.",
        filter: None,
    },
    Preset {
        id: "gd-vec-04",
        kind: PresetKind::Vector,
        category: "Historic Art Styles",
        name: "Ukiyo-e Flow",
        description: "Elegant lines and flat color of Japanese woodblock prints.",
        prompt: "Japanese Ukiyo-e woodblock print style vector. Subject rendered with flowing, elegant outlines of varying thickness, and flat blocks of color. Minimalist composition, inspired by nature and traditional Japanese art.",
        filter: None,
    },
    Preset {
        id: "gd-ty-01",
        kind: PresetKind::Typography,
        category: "Classic & Script",
        name: "Art Nouveau Bloom",
        description: "Ornate, flowing, and nature-inspired letterforms.",
        prompt: "Art Nouveau typographic style. Ornate, flowing letterforms with whiplash curves inspired by natural forms like plants and flowers. Elegant, decorative, and highly stylized.",
        filter: None,
    },
    Preset {
        id: "gd-ty-02",
        kind: PresetKind::Typography,
        category: "Classic & Script",
        name: "Didone Elegance",
        description: "High-fashion serifs with extreme stroke contrast.",
        prompt: "High-fashion Didone serif typography. Extreme contrast between thick and thin strokes, hairline serifs, and a strong vertical axis. Elegant, classic, and luxurious.",
        filter: None,
    },
    Preset {
        id: "gd-ty-03",
        kind: PresetKind::Typography,
        category: "Digital & Retro",
        name: "Retro Pixel Block",
        description: "Blocky, 8-bit style lettering from retro video games.",
        prompt: "8-bit pixel art typography. Characters constructed from a rigid grid of large, visible square pixels. Retro video game aesthetic, blocky, and digital.",
        filter: None,
    },
    Preset {
        id: "gd-ty-04",
        kind: PresetKind::Typography,
        category: "Experimental Typography",
        name: "Psychedelic Melt",
        description: "Warped, fluid, and groovy 70s style lettering.",
        prompt: "1970s psychedelic liquid typography. Letterforms appear to be melting, dripping, or flowing. Warped, bubbly, and distorted shapes. Groovy and hypnotic aesthetic.",
        filter: None,
    },
    Preset {
        id: "gd-mo-01",
        kind: PresetKind::Monogram,
        category: "Ornate & Historic",
        name: "Victorian Flourish",
        description: "Intricate, decorative monograms with floral filigree.",
        prompt: "Ornate Victorian-style monogram. Intricate, decorative, and flowing letterforms intertwined with floral flourishes and filigree. Elegant, detailed, and classic.",
        filter: None,
    },
    Preset {
        id: "gd-mo-02",
        kind: PresetKind::Monogram,
        category: "Ornate & Historic",
        name: "Art Deco Geometric",
        description: "Sleek, symmetrical, and luxurious 1920s style.",
        prompt: "Symmetrical Art Deco monogram. Clean, geometric letterforms with sharp angles and repeating lines, often enclosed in a hexagonal or circular frame. Luxurious, elegant, and modern.",
        filter: None,
    },
    Preset {
        id: "gd-mo-03",
        kind: PresetKind::Monogram,
        category: "Modern & Minimal",
        name: "Minimalist Line",
        description: "Clean, simple, sans-serif forms with a focus on space.",
        prompt: "Modern minimalist monogram. Clean, single-weight sans-serif letterforms, constructed with absolute geometric simplicity. Focus on negative space and balanced composition.",
        filter: None,
    },
    Preset {
        id: "gd-mo-04",
        kind: PresetKind::Monogram,
        category: "Modern & Minimal",
        name: "Brushstroke Seal",
        description: "Expressive, textured characters with a hand-painted feel.",
        prompt: "Expressive brush script monogram. Characters appear hand-painted with a thick brush, showing texture and stroke variation. Enclosed in a rough circular seal. Dynamic and personal.",
        filter: None,
    },];

/// All presets of `kind`, in table order.
pub fn presets_for(kind: PresetKind) -> impl Iterator<Item = &'static Preset> {
    ENGINE_PRESETS.iter().filter(move |p| p.kind == kind)
}

pub fn find_preset(id: &str) -> Option<&'static Preset> {
    ENGINE_PRESETS.iter().find(|p| p.id == id)
}

/// Presets of `kind` grouped by category, categories in first-appearance
/// order.
pub fn group_by_category(kind: PresetKind) -> Vec<PresetCategory> {
    let mut groups: Vec<PresetCategory> = Vec::new();
    for preset in presets_for(kind) {
        match groups.iter().position(|g| g.title == preset.category) {
            Some(idx) => groups[idx].items.push(preset),
            None => groups.push(PresetCategory {
                title: preset.category,
                items: vec![preset],
            }),
        }
    }
    groups
}

/// Join the preset prompt and the subject with `". "`, skipping empty
/// pieces.
pub fn combine_with_preset(preset: Option<&Preset>, subject: &str) -> String {
    [preset.map(|p| p.prompt.trim()), Some(subject.trim())]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(". ")
}
