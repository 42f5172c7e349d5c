//! Flat bookmark outline

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::metadata::text_string;
use crate::types::{MergeError, Result};

/// One outline entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    /// 1-based page in the final document
    pub page: usize,
    /// Outline depth; every bookmark sits at level 1
    pub level: u8,
}

impl Bookmark {
    pub fn new(title: impl Into<String>, page: usize) -> Self {
        Self {
            title: title.into(),
            page,
            level: 1,
        }
    }
}

/// Add a single-level outline to `doc` and open it with the outline
/// panel visible.
///
/// `page_ids` lists the document's pages in order; bookmark pages index
/// into it.
pub fn add_outline(
    doc: &mut Document,
    catalog_id: ObjectId,
    page_ids: &[ObjectId],
    bookmarks: &[Bookmark],
) -> Result<Option<ObjectId>> {
    if bookmarks.is_empty() {
        return Ok(None);
    }

    let mut targets = Vec::with_capacity(bookmarks.len());
    for bookmark in bookmarks {
        let page_id = bookmark
            .page
            .checked_sub(1)
            .and_then(|index| page_ids.get(index))
            .copied()
            .ok_or(MergeError::PlanMismatch {
                planned: bookmark.page,
                actual: page_ids.len(),
            })?;
        targets.push(page_id);
    }

    let outlines_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();

    for (i, (bookmark, &page_id)) in bookmarks.iter().zip(&targets).enumerate() {
        let mut item = Dictionary::from_iter(vec![
            ("Title", text_string(&bookmark.title)),
            ("Parent", Object::Reference(outlines_id)),
            (
                "Dest",
                Object::Array(vec![
                    Object::Reference(page_id),
                    Object::Name(b"Fit".to_vec()),
                ]),
            ),
        ]);
        if i > 0 {
            item.set("Prev", Object::Reference(item_ids[i - 1]));
        }
        if let Some(&next) = item_ids.get(i + 1) {
            item.set("Next", Object::Reference(next));
        }
        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    let (first, last) = match (item_ids.first(), item_ids.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(None),
    };
    let outlines = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Outlines".to_vec())),
        ("First", Object::Reference(first)),
        ("Last", Object::Reference(last)),
        ("Count", Object::Integer(item_ids.len() as i64)),
    ]);
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));

    let catalog = doc.get_dictionary_mut(catalog_id)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    log::info!("Added {} bookmarks", bookmarks.len());
    Ok(Some(outlines_id))
}

/// Read back `(title bytes, 1-based page)` for each top-level outline entry
pub fn read_outline(doc: &Document) -> Result<Vec<(Vec<u8>, usize)>> {
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let catalog = doc.catalog()?;
    let outlines_id = match catalog.get(b"Outlines") {
        Ok(Object::Reference(id)) => *id,
        _ => return Ok(Vec::new()),
    };

    let mut entries = Vec::new();
    let mut current = doc
        .get_dictionary(outlines_id)?
        .get(b"First")
        .and_then(Object::as_reference)
        .ok();
    while let Some(item_id) = current {
        let item = doc.get_dictionary(item_id)?;
        let title = item.get(b"Title")?.as_str()?.to_vec();
        let target = item.get(b"Dest")?.as_array()?;
        let page = target
            .first()
            .and_then(|o| o.as_reference().ok())
            .and_then(|id| pages.iter().position(|&p| p == id))
            .map(|index| index + 1)
            .unwrap_or(0);
        entries.push((title, page));
        current = item.get(b"Next").and_then(Object::as_reference).ok();
        // A well-formed flat outline never has more entries than pages
        if entries.len() > pages.len() {
            break;
        }
    }
    Ok(entries)
}
