use std::path::PathBuf;

use deckbind_layout::{PageImage, SourceKind};

/// What an input contributes to the output
#[derive(Debug, Clone)]
pub enum InputContent {
    /// Rasterized pages to lay out on grid pages
    Images {
        kind: SourceKind,
        pages: Vec<PageImage>,
    },
    /// A finished PDF, concatenated as is. It must not already carry a
    /// running page-number footer.
    Document(PathBuf),
}

/// One logical unit of the bound output
#[derive(Debug, Clone)]
pub struct BindInput {
    /// Shown in the contents and the outline
    pub title: String,
    /// Position in the output; ties keep insertion order
    pub order: i64,
    pub content: InputContent,
}

impl BindInput {
    pub fn images(
        title: impl Into<String>,
        order: i64,
        kind: SourceKind,
        pages: Vec<PageImage>,
    ) -> Self {
        Self {
            title: title.into(),
            order,
            content: InputContent::Images { kind, pages },
        }
    }

    pub fn document(title: impl Into<String>, order: i64, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            order,
            content: InputContent::Document(path.into()),
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self.content, InputContent::Document(_))
    }
}

/// Sort by ordering key, keeping insertion order among equal keys
pub fn sort_inputs(inputs: &mut [BindInput]) {
    inputs.sort_by_key(|input| input.order);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_is_stable() {
        let mut inputs = vec![
            BindInput::document("c", 2, "c.pdf"),
            BindInput::document("a1", 1, "a1.pdf"),
            BindInput::document("b", -5, "b.pdf"),
            BindInput::document("a2", 1, "a2.pdf"),
        ];
        sort_inputs(&mut inputs);
        let titles: Vec<_> = inputs.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a1", "a2", "c"]);
    }

    #[test]
    fn test_pass_through() {
        assert!(BindInput::document("x", 0, "x.pdf").is_pass_through());
        assert!(!BindInput::images("y", 0, SourceKind::Slides, Vec::new()).is_pass_through());
    }
}
