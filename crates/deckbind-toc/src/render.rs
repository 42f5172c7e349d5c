use std::sync::Arc;

use deckbind_layout::constants::pt_to_mm;
use printpdf::*;

use crate::fonts::ResolvedFont;
use crate::options::TocOptions;
use crate::plan::{PaginationPlan, TocEntry, TocLayout};
use crate::types::{Result, TocError};

/// A rendered contents document
#[derive(Debug, Clone)]
pub struct RenderedToc {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Shorten `title` to `max_chars` characters, ending in `ellipsis`
pub fn truncate_title(title: &str, max_chars: usize, ellipsis: &str) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let keep = max_chars.saturating_sub(ellipsis.chars().count());
    let mut truncated: String = title.chars().take(keep).collect();
    truncated.push_str(ellipsis);
    truncated
}

/// Left-hand text of the entry at 1-based `position`
pub fn entry_text(position: usize, title: &str, options: &TocOptions) -> String {
    format!(
        "{position}. {}",
        truncate_title(title, options.title_max_chars, &options.ellipsis)
    )
}

pub async fn render_toc(
    plan: &PaginationPlan,
    options: &TocOptions,
    font: Arc<ResolvedFont>,
) -> Result<RenderedToc> {
    let entries = plan.toc_entries();
    let planned = plan.toc_pages;
    let options = options.clone();

    tokio::task::spawn_blocking(move || render_toc_sync(&entries, planned, &options, &font))
        .await?
}

/// Render the contents pages and check they match the planned count.
pub fn render_toc_sync(
    entries: &[TocEntry],
    planned_pages: usize,
    options: &TocOptions,
    font: &ResolvedFont,
) -> Result<RenderedToc> {
    options.validate()?;

    let mut doc = PdfDocument::new(&options.heading);
    let writer = TextWriter::new(&mut doc, font)?;

    let (page_width, page_height) = options.page_size_pt();
    let layout = TocLayout::from_options(options);

    let mut pages: Vec<Vec<Op>> = Vec::new();
    let mut ops = Vec::new();

    // Heading, centred in the heading block
    let heading_width = font.text_width(&options.heading, options.heading_font_size);
    writer.write(
        &mut ops,
        &options.heading,
        options.heading_font_size,
        (page_width - heading_width) / 2.0,
        layout.first_baseline + options.heading_block_pt / 2.0,
    );

    let size = options.entry_font_size;
    let dot_width = font.text_width(".", size);
    // Page breaks follow the planned line capacity so the two always agree
    let mut top = layout.first_baseline;
    let mut capacity = layout.first_page_lines();
    let mut line = 0;

    for (i, entry) in entries.iter().enumerate() {
        if line == capacity {
            pages.push(std::mem::take(&mut ops));
            top = layout.continuation_baseline;
            capacity = layout.continuation_lines();
            line = 0;
        }
        let y = top - line as f32 * layout.line_height;

        let text = entry_text(i + 1, &entry.title, options);
        let page_text = options.format_page_reference(entry.start_page);
        let text_width = font.text_width(&text, size);
        let page_text_width = font.text_width(&page_text, size);
        let page_x = page_width - options.margin_pt - page_text_width;

        writer.write(&mut ops, &text, size, options.margin_pt, y);
        writer.write(&mut ops, &page_text, size, page_x, y);

        let leader_start = options.margin_pt + text_width + options.leader_gap_pt;
        let leader_end = page_x - options.leader_gap_pt;
        if dot_width > 0.0 && leader_end > leader_start {
            let dots = ((leader_end - leader_start) / dot_width).floor() as usize;
            if dots > 0 {
                // Right-aligned so every leader ends at the same x
                let x = leader_end - dots as f32 * dot_width;
                writer.write(&mut ops, &".".repeat(dots), size, x, y);
            }
        }

        line += 1;
    }
    pages.push(ops);

    let rendered = pages.len();
    if rendered != planned_pages {
        return Err(TocError::PageCountMismatch {
            planned: planned_pages,
            rendered,
        });
    }

    let width_mm = Mm(pt_to_mm(page_width));
    let height_mm = Mm(pt_to_mm(page_height));
    doc.pages = pages
        .into_iter()
        .map(|ops| PdfPage::new(width_mm, height_mm, ops))
        .collect();

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    // Make sure the output parses and has the pages we planned
    let parsed = lopdf::Document::load_mem(&bytes).map_err(|e| TocError::Pdf(e.to_string()))?;
    let pages = parsed.get_pages().len();
    if pages != planned_pages {
        return Err(TocError::PageCountMismatch {
            planned: planned_pages,
            rendered: pages,
        });
    }

    log::info!(
        "Rendered contents: {} entries on {} page(s) with {}",
        entries.len(),
        pages,
        font.name()
    );

    Ok(RenderedToc { bytes, pages })
}

/// Emits text operations for the resolved font
enum TextWriter {
    Builtin,
    Embedded(FontId),
}

impl TextWriter {
    fn new(doc: &mut PdfDocument, font: &ResolvedFont) -> Result<Self> {
        match font {
            ResolvedFont::Builtin => Ok(TextWriter::Builtin),
            ResolvedFont::Embedded(embedded) => {
                let mut warnings = Vec::new();
                let parsed = ParsedFont::from_bytes(&embedded.data, 0, &mut warnings)
                    .ok_or_else(|| {
                        TocError::Pdf(format!("Failed to parse font {}", embedded.name))
                    })?;
                Ok(TextWriter::Embedded(doc.add_font(&parsed)))
            }
        }
    }

    fn write(&self, ops: &mut Vec<Op>, text: &str, size: f32, x: f32, y: f32) {
        ops.push(Op::StartTextSection);
        match self {
            TextWriter::Builtin => {
                ops.push(Op::SetFontSizeBuiltinFont {
                    font: BuiltinFont::Helvetica,
                    size: Pt(size),
                });
                ops.push(Op::SetTextMatrix {
                    matrix: TextMatrix::Translate(Pt(x), Pt(y)),
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(text.to_string())],
                    font: BuiltinFont::Helvetica,
                });
            }
            TextWriter::Embedded(font_id) => {
                ops.push(Op::SetFontSize {
                    font: font_id.clone(),
                    size: Pt(size),
                });
                ops.push(Op::SetTextMatrix {
                    matrix: TextMatrix::Translate(Pt(x), Pt(y)),
                });
                ops.push(Op::WriteText {
                    items: vec![TextItem::Text(text.to_string())],
                    font: font_id.clone(),
                });
            }
        }
        ops.push(Op::EndTextSection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifty_char_title_truncated() {
        let title: String = "abcdefghij".repeat(5);
        assert_eq!(title.chars().count(), 50);

        let truncated = truncate_title(&title, 40, "...");
        assert_eq!(truncated.chars().count(), 40);
        assert_eq!(&truncated[..37], &title[..37]);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_short_title_untouched() {
        let title = "x".repeat(40);
        assert_eq!(truncate_title(&title, 40, "..."), title);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let title: String = "目录".repeat(25);
        let truncated = truncate_title(&title, 40, "...");
        assert_eq!(truncated.chars().count(), 40);
    }

    #[test]
    fn test_entry_text() {
        let options = TocOptions::default();
        assert_eq!(entry_text(3, "Quarterly review", &options), "3. Quarterly review");
    }
}
