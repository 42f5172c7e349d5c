//! Running page-number footer
//!
//! Each page's existing content is wrapped in `q`/`Q` so its graphics
//! state cannot leak into the footer, then a centred page number is drawn
//! in Helvetica.

use deckbind_layout::metrics::helvetica_text_width;
use deckbind_layout::render::escape_pdf_string;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::options::FooterOptions;
use crate::types::Result;

const FOOTER_FONT_RESOURCE: &str = "FPgNum";

/// A4 portrait, used when a page carries no usable MediaBox
const FALLBACK_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 595.276, 841.89];

/// Number every page in `page_ids`, in order, starting at 1
pub fn add_page_numbers(
    doc: &mut Document,
    page_ids: &[ObjectId],
    footer: &FooterOptions,
) -> Result<()> {
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));

    for (index, &page_id) in page_ids.iter().enumerate() {
        let mut page = doc.get_dictionary(page_id)?.clone();

        let [x0, y0, x1, _] = media_box(&page);
        let text = footer.format(index + 1);
        let text_width = helvetica_text_width(&text, footer.font_size);
        let x = x0 + (x1 - x0 - text_width) / 2.0;
        let y = y0 + footer.offset_from_bottom_pt;

        let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let close = format!(
            "Q\nq BT 0 g /{FOOTER_FONT_RESOURCE} {} Tf {x:.2} {y:.2} Td ({}) Tj ET Q\n",
            footer.font_size,
            escape_pdf_string(&text)
        );
        let close_id = doc.add_object(Stream::new(Dictionary::new(), close.into_bytes()));

        let mut contents = vec![Object::Reference(open_id)];
        match page.get(b"Contents") {
            Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
            Ok(existing @ Object::Reference(_)) => contents.push(existing.clone()),
            _ => {}
        }
        contents.push(Object::Reference(close_id));
        page.set("Contents", Object::Array(contents));

        let mut resources = page
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve_dictionary(doc, r))
            .unwrap_or_default();
        let mut fonts = resources
            .get(b"Font")
            .ok()
            .and_then(|f| resolve_dictionary(doc, f))
            .unwrap_or_default();
        fonts.set(FOOTER_FONT_RESOURCE, Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));
        page.set("Resources", Object::Dictionary(resources));

        doc.objects.insert(page_id, Object::Dictionary(page));
    }

    log::info!("Numbered {} pages", page_ids.len());
    Ok(())
}

fn resolve_dictionary(doc: &Document, object: &Object) -> Option<Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict.clone()),
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        _ => None,
    }
}

fn media_box(page: &Dictionary) -> [f32; 4] {
    let Ok(Object::Array(values)) = page.get(b"MediaBox") else {
        return FALLBACK_MEDIA_BOX;
    };
    let numbers: Vec<f32> = values
        .iter()
        .filter_map(|v| match v {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r),
            _ => None,
        })
        .collect();
    match numbers.as_slice() {
        [x0, y0, x1, y1] => [*x0, *y0, *x1, *y1],
        _ => FALLBACK_MEDIA_BOX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_box(values: Vec<Object>) -> Dictionary {
        Dictionary::from_iter(vec![("MediaBox", Object::Array(values))])
    }

    #[test]
    fn test_media_box_mixed_numbers() {
        let page = page_with_box(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(595.5),
            Object::Integer(842),
        ]);
        assert_eq!(media_box(&page), [0.0, 0.0, 595.5, 842.0]);
    }

    #[test]
    fn test_media_box_fallback() {
        assert_eq!(media_box(&Dictionary::new()), FALLBACK_MEDIA_BOX);
        let short = page_with_box(vec![Object::Integer(0)]);
        assert_eq!(media_box(&short), FALLBACK_MEDIA_BOX);
    }
}
