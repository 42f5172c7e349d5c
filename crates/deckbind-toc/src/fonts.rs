//! Font fallback resolution
//!
//! A [`FontSession`] lives for one rendering run. The first call to
//! [`FontSession::resolve`] probes the candidates in order; every later
//! call returns the cached result.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use deckbind_layout::metrics::helvetica_text_width;

/// A font the session may try to register
#[derive(Debug, Clone)]
pub enum FontCandidate {
    /// TrueType/OpenType file on disk (collections use face 0)
    File(PathBuf),
    /// Font data already in memory
    Memory { name: String, data: Arc<Vec<u8>> },
}

impl FontCandidate {
    pub fn name(&self) -> String {
        match self {
            FontCandidate::File(path) => path.display().to_string(),
            FontCandidate::Memory { name, .. } => name.clone(),
        }
    }
}

/// A registered font with its metrics source
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    pub name: String,
    pub data: Arc<Vec<u8>>,
    pub units_per_em: u16,
}

/// The font a session settled on
#[derive(Debug, Clone)]
pub enum ResolvedFont {
    /// Built-in Helvetica, always available
    Builtin,
    Embedded(EmbeddedFont),
}

impl ResolvedFont {
    pub fn name(&self) -> &str {
        match self {
            ResolvedFont::Builtin => "Helvetica",
            ResolvedFont::Embedded(font) => &font.name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, ResolvedFont::Builtin)
    }

    /// Width of `text` at `font_size` points, measured with this font
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match self {
            ResolvedFont::Builtin => helvetica_text_width(text, font_size),
            ResolvedFont::Embedded(font) => font.text_width(text, font_size),
        }
    }
}

impl EmbeddedFont {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let Ok(face) = ttf_parser::Face::parse(&self.data, 0) else {
            return helvetica_text_width(text, font_size);
        };
        // Characters without a glyph render as .notdef; half an em is close
        let missing = self.units_per_em / 2;
        let units: u32 = text
            .chars()
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .unwrap_or(missing) as u32
            })
            .sum();
        units as f32 * font_size / self.units_per_em as f32
    }
}

/// Per-run font cache
#[derive(Debug, Default)]
pub struct FontSession {
    candidates: Vec<FontCandidate>,
    resolved: OnceLock<Arc<ResolvedFont>>,
    probes: AtomicUsize,
}

impl FontSession {
    pub fn new(candidates: Vec<FontCandidate>) -> Self {
        Self {
            candidates,
            resolved: OnceLock::new(),
            probes: AtomicUsize::new(0),
        }
    }

    /// Session over font files, tried in the given order
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self::new(paths.into_iter().map(FontCandidate::File).collect())
    }

    /// Session that always uses the built-in font
    pub fn builtin() -> Self {
        Self::new(Vec::new())
    }

    /// The session font, probing candidates on first use only
    pub fn resolve(&self) -> Arc<ResolvedFont> {
        self.resolved
            .get_or_init(|| {
                self.probes.fetch_add(1, Ordering::Relaxed);
                Arc::new(self.probe())
            })
            .clone()
    }

    /// How many times the candidate list has been probed
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    fn probe(&self) -> ResolvedFont {
        for candidate in &self.candidates {
            match register(candidate) {
                Ok(font) => {
                    log::info!("Using font {}", font.name);
                    return ResolvedFont::Embedded(font);
                }
                Err(reason) => log::debug!("Skipping font {}: {}", candidate.name(), reason),
            }
        }
        if !self.candidates.is_empty() {
            log::warn!("No candidate font could be registered, falling back to Helvetica");
        }
        ResolvedFont::Builtin
    }
}

fn register(candidate: &FontCandidate) -> std::result::Result<EmbeddedFont, String> {
    let (name, data) = match candidate {
        FontCandidate::File(path) => {
            let data = std::fs::read(path).map_err(|e| e.to_string())?;
            (path.display().to_string(), Arc::new(data))
        }
        FontCandidate::Memory { name, data } => (name.clone(), data.clone()),
    };

    let face = ttf_parser::Face::parse(&data, 0).map_err(|e| e.to_string())?;
    let units_per_em = face.units_per_em();
    if units_per_em == 0 {
        return Err("font reports zero units per em".to_string());
    }

    // The PDF writer has to accept it too
    let mut warnings = Vec::new();
    printpdf::ParsedFont::from_bytes(&data, 0, &mut warnings)
        .ok_or_else(|| "font could not be parsed for embedding".to_string())?;

    Ok(EmbeddedFont {
        name,
        data,
        units_per_em,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_is_builtin() {
        let session = FontSession::builtin();
        assert!(session.resolve().is_builtin());
    }

    #[test]
    fn test_bad_candidates_fall_back() {
        let session = FontSession::new(vec![
            FontCandidate::File(PathBuf::from("/nonexistent/font.ttf")),
            FontCandidate::Memory {
                name: "garbage".to_string(),
                data: Arc::new(b"not a font".to_vec()),
            },
        ]);
        let font = session.resolve();
        assert!(font.is_builtin());
        assert_eq!(font.name(), "Helvetica");
    }

    #[test]
    fn test_resolution_is_cached() {
        let session = FontSession::from_paths(vec![PathBuf::from("/nonexistent/font.ttf")]);
        for _ in 0..5 {
            session.resolve();
        }
        assert_eq!(session.probe_count(), 1);
    }

    #[test]
    fn test_builtin_measurement() {
        let font = ResolvedFont::Builtin;
        assert!((font.text_width("Page 2", 12.0) - helvetica_text_width("Page 2", 12.0)).abs() < 0.001);
    }
}
