use std::path::PathBuf;

use deckbind_layout::GridOptions;
use deckbind_toc::TocOptions;

use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Running page-number footer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FooterOptions {
    /// `{}` is replaced by the 1-based page number. Drawn in built-in
    /// Helvetica, so it must be ASCII.
    pub template: String,
    pub font_size: f32,
    /// Baseline distance from the bottom edge, in points
    pub offset_from_bottom_pt: f32,
}

impl Default for FooterOptions {
    fn default() -> Self {
        Self {
            template: "- {} -".to_string(),
            font_size: 10.0,
            offset_from_bottom_pt: 40.0,
        }
    }
}

impl FooterOptions {
    pub fn format(&self, page: usize) -> String {
        self.template.replace("{}", &page.to_string())
    }
}

/// Document information written into the output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    /// `{count}` is replaced by the number of merged documents
    pub subject: String,
    pub keywords: String,
    pub generator: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "Merged Handbook".to_string(),
            author: "deckbind".to_string(),
            subject: "Handbook merged from {count} documents".to_string(),
            keywords: "slides, PDF, handbook, merge".to_string(),
            generator: format!("deckbind {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DocumentMetadata {
    pub fn subject_for(&self, count: usize) -> String {
        self.subject.replace("{count}", &count.to_string())
    }
}

/// Everything one bind run needs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BindOptions {
    pub grid: GridOptions,
    pub toc: TocOptions,
    pub footer: FooterOptions,
    pub metadata: DocumentMetadata,
    /// Fonts for contents text, tried in order before the built-in font
    pub font_candidates: Vec<PathBuf>,
    /// Run the compaction pass
    pub optimize: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            grid: GridOptions::default(),
            toc: TocOptions::default(),
            footer: FooterOptions::default(),
            metadata: DocumentMetadata::default(),
            font_candidates: default_font_candidates(),
            optimize: true,
        }
    }
}

/// Common locations of fonts with wide script coverage
pub fn default_font_candidates() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
        "/System/Library/Fonts/PingFang.ttc",
        "/Library/Fonts/Arial Unicode.ttf",
        "C:\\Windows\\Fonts\\msyh.ttc",
        "C:\\Windows\\Fonts\\simhei.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

impl BindOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| MergeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MergeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.toc.validate()?;

        if !self.footer.template.contains("{}") {
            return Err(MergeError::Config(
                "Footer template must contain {} for the page number".to_string(),
            ));
        }
        if !self.footer.template.is_ascii() {
            return Err(MergeError::Config(
                "Footer template must be ASCII".to_string(),
            ));
        }
        if self.footer.font_size <= 0.0 {
            return Err(MergeError::Config(
                "Footer font size must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(BindOptions::default().validate().is_ok());
    }

    #[test]
    fn test_footer_format() {
        assert_eq!(FooterOptions::default().format(7), "- 7 -");
    }

    #[test]
    fn test_subject_count() {
        let metadata = DocumentMetadata::default();
        assert_eq!(metadata.subject_for(3), "Handbook merged from 3 documents");
    }

    #[test]
    fn test_footer_without_placeholder_rejected() {
        let mut options = BindOptions::default();
        options.footer.template = "page".to_string();
        assert!(matches!(options.validate(), Err(MergeError::Config(_))));
    }

    #[test]
    fn test_non_ascii_footer_rejected() {
        let mut options = BindOptions::default();
        options.footer.template = "第 {} 页".to_string();
        assert!(matches!(options.validate(), Err(MergeError::Config(_))));
    }

    #[test]
    fn test_grid_errors_propagate() {
        let mut options = BindOptions::default();
        options.grid.columns = 0;
        assert!(matches!(options.validate(), Err(MergeError::Layout(_))));
    }
}
