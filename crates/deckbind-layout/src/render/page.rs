//! Grid page rendering
//!
//! Builds one PDF page from a [`GridPage`] of page images: each entry is
//! decoded, fitted into its slot and drawn with its decoration, or
//! replaced by a labelled placeholder when it cannot be decoded.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::constants::*;
use crate::layout::{PlacementDirective, Rect, SlotGeometry, fit};
use crate::metrics::helvetica_text_width;
use crate::options::GridOptions;
use crate::source::PageImage;
use crate::types::{LayoutError, Result, SourceKind};

use super::accumulator::GridPage;
use super::image::{embed_rgb_image, resample};

/// What ended up in each slot of a rendered page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotCounts {
    pub filled: usize,
    pub placeholders: usize,
}

impl SlotCounts {
    pub fn total(&self) -> usize {
        self.filled + self.placeholders
    }
}

impl std::ops::AddAssign for SlotCounts {
    fn add_assign(&mut self, other: Self) {
        self.filled += other.filled;
        self.placeholders += other.placeholders;
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Render one grid page into `output`.
///
/// # Arguments
/// * `output` - The intermediate document being built
/// * `page` - Page images with their slot assignments
/// * `geometry` - Resolved slot geometry
/// * `kind` - Source kind, selects label wording
/// * `options` - Grid options (labels, label size)
/// * `parent_pages_id` - The parent Pages object ID
/// * `font_id` - Helvetica font dictionary used for labels
pub fn render_grid_page(
    output: &mut Document,
    page: &GridPage<PageImage>,
    geometry: &SlotGeometry,
    kind: SourceKind,
    options: &GridOptions,
    parent_pages_id: ObjectId,
    font_id: ObjectId,
) -> Result<(ObjectId, SlotCounts)> {
    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();
    let mut counts = SlotCounts::default();

    for entry in &page.entries {
        let slot = geometry.slot(entry.slot_index).ok_or_else(|| {
            LayoutError::InvalidGeometry(format!(
                "slot {} outside a {}-slot grid",
                entry.slot_index,
                geometry.capacity()
            ))
        })?;
        let image = &entry.item;

        let pixels = match image.decode() {
            Ok(pixels) => Some(pixels),
            Err(e) => {
                log::warn!("Substituting placeholder: {e}");
                None
            }
        };

        let directive = fit(pixels.as_ref().map(|p| p.dimensions()), &slot.rect);
        match (directive, pixels) {
            (PlacementDirective::Draw { rect, resample: target }, Some(pixels)) => {
                let pixels = match target {
                    Some(size) => resample(&pixels, size),
                    None => pixels,
                };
                let image_id = embed_rgb_image(output, &pixels)?;
                let name = format!("Im{}", entry.slot_index);
                xobjects.set(name.as_bytes(), Object::Reference(image_id));

                content_ops.push(slot_frame_command(&slot.rect));
                content_ops.push(image_command(&name, &rect));
                content_ops.push(image_border_command(&rect));
                counts.filled += 1;
            }
            _ => {
                content_ops.push(placeholder_command(
                    &slot.rect,
                    &kind.placeholder_label(image.ordinal),
                    options.label_font_size,
                ));
                counts.placeholders += 1;
            }
        }

        if options.slot_labels {
            content_ops.push(slot_label_command(
                &slot.rect,
                &kind.slot_label(image.ordinal),
                options.label_font_size,
            ));
        }
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));
    resources.set(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![(
            LABEL_FONT_RESOURCE,
            Object::Reference(font_id),
        )])),
    );

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let page_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent_pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(geometry.page_width),
                Object::Real(geometry.page_height),
            ]),
        ),
        ("Contents", Object::Reference(content_id)),
        ("Resources", Object::Dictionary(resources)),
    ]);

    Ok((output.add_object(page_dict), counts))
}

/// Standard Helvetica font dictionary for label text
pub fn add_label_font(output: &mut Document) -> ObjectId {
    output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]))
}

// =============================================================================
// Content Stream Commands
// =============================================================================

fn slot_frame_command(slot: &Rect) -> String {
    format!(
        "q {SLOT_FRAME_GRAY} G {SLOT_FRAME_WIDTH} w {} re S Q\n",
        rect_operands(slot)
    )
}

fn image_command(name: &str, rect: &Rect) -> String {
    format!(
        "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /{} Do Q\n",
        rect.width, rect.height, rect.x, rect.y, name
    )
}

fn image_border_command(rect: &Rect) -> String {
    format!(
        "q {IMAGE_BORDER_GRAY} G {IMAGE_BORDER_WIDTH} w {} re S Q\n",
        rect_operands(rect)
    )
}

fn placeholder_command(slot: &Rect, text: &str, font_size: f32) -> String {
    let text_width = helvetica_text_width(text, font_size);
    let x = slot.center_x() - text_width / 2.0;
    let y = slot.center_y() - font_size / 3.0;
    format!(
        "q {PLACEHOLDER_FILL_GRAY} g {rect} re f Q\n\
         q 0 G {PLACEHOLDER_FRAME_WIDTH} w {rect} re S Q\n\
         {text_ops}",
        rect = rect_operands(slot),
        text_ops = text_command(text, font_size, x, y),
    )
}

fn slot_label_command(slot: &Rect, text: &str, font_size: f32) -> String {
    let text_width = helvetica_text_width(text, font_size);
    let x = slot.center_x() - text_width / 2.0;
    let y = slot.y - LABEL_BASELINE_DROP;
    text_command(text, font_size, x, y)
}

fn text_command(text: &str, font_size: f32, x: f32, y: f32) -> String {
    format!(
        "BT 0 g /{LABEL_FONT_RESOURCE} {font_size} Tf {x:.2} {y:.2} Td ({}) Tj ET\n",
        escape_pdf_string(text)
    )
}

fn rect_operands(rect: &Rect) -> String {
    format!(
        "{:.2} {:.2} {:.2} {:.2}",
        rect.x, rect.y, rect.width, rect.height
    )
}

/// Escape a literal string for a content stream
pub fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("p.3"), "p.3");
        assert_eq!(escape_pdf_string("a (b) \\c"), "a \\(b\\) \\\\c");
    }

    #[test]
    fn test_image_command_scales_unit_square() {
        let cmd = image_command("Im0", &Rect::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(cmd, "q 100.00 0 0 50.00 10.00 20.00 cm /Im0 Do Q\n");
    }

    #[test]
    fn test_label_is_centred_under_slot() {
        let slot = Rect::new(0.0, 100.0, 200.0, 100.0);
        let cmd = slot_label_command(&slot, "p.1", 8.0);
        let width = helvetica_text_width("p.1", 8.0);
        let expected_x = format!("{:.2}", 100.0 - width / 2.0);
        assert!(cmd.contains(&expected_x));
        assert!(cmd.contains("91.00 Td"));
        assert!(cmd.contains("(p.1) Tj"));
    }

    #[test]
    fn test_placeholder_fills_slot() {
        let slot = Rect::new(36.0, 400.0, 255.0, 150.0);
        let cmd = placeholder_command(&slot, "Missing page 2", 8.0);
        assert!(cmd.contains("36.00 400.00 255.00 150.00 re f"));
        assert!(cmd.contains("(Missing page 2) Tj"));
    }
}
