//! Intermediate document assembly
//!
//! One intermediate document per input: every page image is pushed
//! through the [`PageAccumulator`] and each emitted grid page is rendered
//! straight away, so at most one page of pixels is held at a time.

use lopdf::{Dictionary, Document, Object};

use crate::options::GridOptions;
use crate::source::PageImage;
use crate::types::*;

use super::accumulator::{GridPage, PageAccumulator};
use super::page::{SlotCounts, add_label_font, render_grid_page};

/// A laid-out intermediate document
#[derive(Debug)]
pub struct GridDocument {
    pub document: Document,
    /// Number of grid pages
    pub page_count: usize,
    pub slots: SlotCounts,
}

/// Lay out `images` on grid pages.
///
/// Runs the CPU-bound work on the blocking pool.
pub async fn lay_out(
    images: Vec<PageImage>,
    kind: SourceKind,
    options: &GridOptions,
) -> Result<GridDocument> {
    let options = options.clone();
    tokio::task::spawn_blocking(move || render_grid_document(images, kind, &options)).await?
}

/// Lay out `images` on grid pages, synchronously.
///
/// Images keep their order; undecodable ones become placeholders in their
/// slot. Files marked temporary are deleted once their page is rendered.
///
/// # Errors
/// `LayoutError::NoPages` for an empty input and
/// `LayoutError::InvalidGeometry` when the options leave no room for slots.
pub fn render_grid_document(
    images: Vec<PageImage>,
    kind: SourceKind,
    options: &GridOptions,
) -> Result<GridDocument> {
    if images.is_empty() {
        return Err(LayoutError::NoPages);
    }
    let geometry = options.geometry()?;

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let font_id = add_label_font(&mut output);

    let mut page_refs = Vec::new();
    let mut slots = SlotCounts::default();
    let mut accumulator = PageAccumulator::new(geometry.capacity());

    let mut emit = |output: &mut Document, page: GridPage<PageImage>| -> Result<()> {
        let (page_id, counts) = render_grid_page(
            output,
            &page,
            &geometry,
            kind,
            options,
            pages_tree_id,
            font_id,
        )?;
        page_refs.push(Object::Reference(page_id));
        slots += counts;
        remove_temporary_files(&page);
        Ok(())
    };

    for image in images {
        if let Some(page) = accumulator.push(image) {
            emit(&mut output, page)?;
        }
    }
    if let Some(page) = accumulator.finish() {
        emit(&mut output, page)?;
    }

    let page_count = page_refs.len();
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(page_count as i64)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    output.trailer.set("Root", catalog_id);

    log::debug!(
        "Laid out {} slots ({} placeholders) on {} grid pages",
        slots.total(),
        slots.placeholders,
        page_count
    );

    Ok(GridDocument {
        document: output,
        page_count,
        slots,
    })
}

fn remove_temporary_files(page: &GridPage<PageImage>) {
    for entry in &page.entries {
        if !entry.item.temporary {
            continue;
        }
        if let Some(path) = entry.item.path() {
            if let Err(e) = std::fs::remove_file(path) {
                log::warn!("Could not remove temporary image {}: {}", path.display(), e);
            }
        }
    }
}
