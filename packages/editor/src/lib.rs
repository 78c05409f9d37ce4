//! # Catalog Editor
//!
//! Editing core for catalog documents: load an entity graph, apply
//! localized mutations addressed by path, diff against the original and
//! submit the changes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ query collaborator: id → DocumentQuery      │
//! └─────────────────────────────────────────────┘
//!                     ↓ load (once)
//! ┌─────────────────────────────────────────────┐
//! │ EditSession: original + current snapshots   │
//! │  - Mutations addressed by Path              │
//! │  - Copy-on-write along the path only        │
//! │  - Advisory field validation                │
//! │  - Dirty check by deep equality             │
//! └─────────────────────────────────────────────┘
//!                     ↓ save (current, original)
//! ┌─────────────────────────────────────────────┐
//! │ save collaborator: SavePlan → backend       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_editor::{DocumentSession, MemoryStore, QueryCollaborator, TagType};
//!
//! let mut store = MemoryStore::new(catalog);
//! let query = store.fetch("doc-1");
//!
//! let mut session = DocumentSession::new("doc-1");
//! session.poll(query.as_ref().map(|q| &q.document))?;
//!
//! session.replace("editions[0].editor", "Jason Henderson")?;
//! session.toggle_tag(TagType::Journal, true)?;
//!
//! if session.can_save() {
//!     session.save(&mut store)?;
//! }
//! ```

mod collaborators;
mod diff;
mod document_editor;
mod errors;
pub mod factories;
mod model;
mod mutations;
mod path;
mod session;
mod validation;
mod value;

pub use collaborators::{MemoryStore, QueryCollaborator, QueryStatus, SaveCollaborator, SaveError};
pub use diff::{diff_values, plan_document_save, EntityOp, SavePlan, ValueChange};
pub use document_editor::DocumentSession;
pub use errors::EditorError;
pub use model::{
    default_related_target, picker_options, sorted_selectable, DocumentQuery, DocumentTag,
    EditableDocument, Edition, EditionType, Friend, Lang, RelatedDocument, SelectableDocument,
    SelectableDocuments, TagType,
};
pub use mutations::{get, reduce, Mutation, MutationError};
pub use path::{Path, PathError, Segment};
pub use session::{EditSession, SaveReceipt, SaveRequest, SessionState};
pub use validation::{
    is_valid_filename, is_valid_slug, is_valid_year, parse_number_input, validate, FieldRule,
    RuleSet, ValidationIssue,
};
pub use value::{Map, Value};
