//! # Document Editing Commands
//!
//! Catalog-specific actions on an [`EditSession`] over an
//! [`EditableDocument`]. Each one is expressed as a reducer mutation, so
//! the copy-on-write and dirty-tracking guarantees of the session apply.

use crate::factories;
use crate::model::{default_related_target, EditableDocument, SelectableDocument, TagType};
use crate::mutations::Mutation;
use crate::path::Path;
use crate::session::EditSession;
use crate::validation::{validate, RuleSet, ValidationIssue};
use crate::value::Value;
use crate::EditorError;

pub type DocumentSession = EditSession<EditableDocument>;

fn tags_path() -> Path {
    Path::root().field("tags")
}

fn related_path() -> Path {
    Path::root().field("relatedDocuments")
}

fn editions_path() -> Path {
    Path::root().field("editions")
}

impl EditSession<EditableDocument> {
    /// Typed view of the edited document
    pub fn document(&self) -> Result<EditableDocument, EditorError> {
        self.entity()
    }

    /// Overwrite a top-level document field
    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) -> Result<(), EditorError> {
        self.dispatch(Mutation::replace_value(Path::root().field(field), value))
    }

    /// Check or uncheck a tag. Tags stay unique by type.
    pub fn toggle_tag(&mut self, tag_type: TagType, enabled: bool) -> Result<(), EditorError> {
        let tags = self.get(&tags_path())?.as_array().unwrap_or_default().to_vec();
        let is_tag = |tag: &Value| tag.field("type").and_then(Value::as_str) == Some(tag_type.as_str());
        let present = tags.iter().any(is_tag);

        let next: Vec<Value> = match (enabled, present) {
            (true, false) => {
                let mut next = tags;
                next.push(Value::from_entity(&factories::document_tag(tag_type))?);
                next
            }
            (false, true) => tags.into_iter().filter(|tag| !is_tag(tag)).collect(),
            _ => return Ok(()),
        };

        self.dispatch(Mutation::replace_value(tags_path(), next))
    }

    /// Append a related document targeting the first catalog entry
    pub fn add_related_document(&mut self, catalog: &[SelectableDocument]) -> Result<(), EditorError> {
        let related = factories::related_document(default_related_target(catalog));
        self.dispatch(Mutation::add_item(related_path(), Value::from_entity(&related)?))
    }

    pub fn delete_related_document(&mut self, index: usize) -> Result<(), EditorError> {
        self.dispatch(Mutation::delete_item(related_path().index(index)))
    }

    pub fn add_edition(&mut self) -> Result<(), EditorError> {
        self.dispatch(Mutation::add_item(
            editions_path(),
            Value::from_entity(&factories::edition())?,
        ))
    }

    pub fn delete_edition(&mut self, index: usize) -> Result<(), EditorError> {
        self.dispatch(Mutation::delete_item(editions_path().index(index)))
    }

    /// Replace a field inside one edition; `field` is a path relative to
    /// the edition, e.g. `editor` or `paperbackSplits[0]`
    pub fn replace_edition_field(
        &mut self,
        index: usize,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), EditorError> {
        let at = editions_path().index(index).join(&Path::parse(field)?);
        self.dispatch(Mutation::replace_value(at, value))
    }

    /// Advisory validation of the edited document
    pub fn issues(&self, rules: &RuleSet) -> Result<Vec<ValidationIssue>, EditorError> {
        Ok(validate(self.current()?, rules))
    }
}
