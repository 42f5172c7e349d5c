//! Page concatenation
//!
//! Source documents are renumbered into one object space. Their pages are
//! re-parented under a single page tree, with inheritable attributes
//! copied onto each page first since the source page trees are dropped.

use std::collections::HashSet;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::types::Result;

/// Attributes a page may inherit from its ancestors
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Object types that belong to a source's document structure
const STRUCTURAL: [&[u8]; 4] = [b"Catalog", b"Pages", b"Outlines", b"Outline"];

/// The concatenated document
#[derive(Debug)]
pub struct AssembledDocument {
    pub document: Document,
    pub catalog_id: ObjectId,
    /// Page object ids in output order
    pub page_ids: Vec<ObjectId>,
}

/// Builds one document out of several, strictly in append order
#[derive(Debug)]
pub struct Assembly {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl Default for Assembly {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembly {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Pages appended so far
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append every page of `source`.
    ///
    /// Returns the id of the first appended page, or `None` if `source`
    /// has no pages.
    pub fn append(&mut self, mut source: Document) -> Result<Option<ObjectId>> {
        source.renumber_objects_with(self.document.max_id + 1);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

        let mut pages = Vec::with_capacity(page_ids.len());
        for &page_id in &page_ids {
            let mut dict = source.get_dictionary(page_id)?.clone();
            for key in INHERITABLE {
                if !dict.has(key) {
                    if let Some(value) = inherited_attribute(&source, &dict, key) {
                        dict.set(key, value);
                    }
                }
            }
            dict.set("Parent", Object::Reference(self.pages_id));
            pages.push((page_id, dict));
        }

        let page_set: HashSet<ObjectId> = page_ids.iter().copied().collect();
        let max_id = source.max_id;
        for (id, object) in source.objects {
            if page_set.contains(&id) || is_structural(&object) {
                continue;
            }
            self.document.objects.insert(id, object);
        }

        for (page_id, dict) in pages {
            self.document
                .objects
                .insert(page_id, Object::Dictionary(dict));
            self.kids.push(page_id);
        }
        self.document.max_id = self.document.max_id.max(max_id);

        Ok(page_ids.first().copied())
    }

    /// Close the page tree and add the catalog
    pub fn finish(mut self) -> AssembledDocument {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.kids.len() as i64)),
        ]);
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.document.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.document.trailer.set("Root", catalog_id);

        AssembledDocument {
            document: self.document,
            catalog_id,
            page_ids: self.kids,
        }
    }
}

/// Value of `key` on the nearest ancestor of `page` that defines it
fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut current = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = current {
        // Guard against cyclic Parent chains
        if depth > 64 {
            return None;
        }
        let node = doc.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
    None
}

fn is_structural(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return false,
    };
    match dict.get(b"Type") {
        Ok(Object::Name(name)) => STRUCTURAL.contains(&name.as_slice()),
        _ => false,
    }
}
