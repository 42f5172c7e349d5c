//! Document information dictionary

use chrono::{DateTime, Local};
use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::options::DocumentMetadata;

/// Encode `text` as a PDF text string.
///
/// ASCII stays a literal string; anything else is UTF-16BE with a byte
/// order mark.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// PDF date string, e.g. `D:20240131120000+01'00'`
pub fn pdf_date(time: &DateTime<Local>) -> String {
    let offset = time.format("%z").to_string();
    let (hours, minutes) = offset.split_at(offset.len().saturating_sub(2));
    format!("D:{}{}'{}'", time.format("%Y%m%d%H%M%S"), hours, minutes)
}

/// Write the Info dictionary for a document merged from `document_count`
/// inputs.
pub fn set_metadata(doc: &mut Document, metadata: &DocumentMetadata, document_count: usize) {
    let now = pdf_date(&Local::now());
    let info = Dictionary::from_iter(vec![
        ("Title", text_string(&metadata.title)),
        ("Author", text_string(&metadata.author)),
        ("Subject", text_string(&metadata.subject_for(document_count))),
        ("Keywords", text_string(&metadata.keywords)),
        ("Creator", text_string(&metadata.generator)),
        ("Producer", text_string(&metadata.generator)),
        ("CreationDate", Object::string_literal(now.clone())),
        ("ModDate", Object::string_literal(now)),
    ]);
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));
}
