//! Zero-valued sub-entities for "add" actions.
//!
//! Every default is deterministic and passes validation, so a new item can
//! be appended and saved without further edits.

use crate::model::{DocumentTag, Edition, EditionType, RelatedDocument, TagType};

pub fn related_document(document_id: impl Into<String>) -> RelatedDocument {
    RelatedDocument {
        document_id: document_id.into(),
        description: String::new(),
    }
}

pub fn edition() -> Edition {
    Edition {
        edition_type: EditionType::Updated,
        editor: None,
        is_draft: true,
        paperback_splits: Vec::new(),
    }
}

pub fn document_tag(tag_type: TagType) -> DocumentTag {
    DocumentTag { tag_type }
}
