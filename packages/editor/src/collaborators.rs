//! # Collaborators
//!
//! The editor talks to the backend through two request/response seams:
//!
//! - [`QueryCollaborator`]: fetches a document and the selectable catalog
//! - [`SaveCollaborator`]: persists an edited entity given its original
//!
//! Neither seam retries, cancels or times out. [`MemoryStore`] implements
//! both in memory and records the save plans it receives.

use crate::diff::{plan_document_save, SavePlan};
use crate::model::{DocumentQuery, EditableDocument, SelectableDocument};
use std::collections::HashMap;
use thiserror::Error;

/// Status of a query as seen by the session
#[derive(Debug, Clone, PartialEq)]
pub enum QueryStatus<T> {
    /// Request still in flight
    Unresolved,

    /// Data available
    Resolved(T),

    /// Request failed
    Failed(String),
}

impl<T> QueryStatus<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, QueryStatus::Resolved(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryStatus::Resolved(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> QueryStatus<&T> {
        match self {
            QueryStatus::Unresolved => QueryStatus::Unresolved,
            QueryStatus::Resolved(data) => QueryStatus::Resolved(data),
            QueryStatus::Failed(message) => QueryStatus::Failed(message.clone()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> QueryStatus<U> {
        match self {
            QueryStatus::Unresolved => QueryStatus::Unresolved,
            QueryStatus::Resolved(data) => QueryStatus::Resolved(f(data)),
            QueryStatus::Failed(message) => QueryStatus::Failed(message),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    #[error("Save rejected: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Source of document query results
pub trait QueryCollaborator {
    fn fetch(&mut self, id: &str) -> QueryStatus<DocumentQuery>;
}

/// Sink for edited entities
pub trait SaveCollaborator<T> {
    /// Persist `current`; `original` is the baseline it was edited from
    fn save(&mut self, current: &T, original: &T) -> Result<(), SaveError>;
}

/// In-memory backend for tests and offline editing
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<String, EditableDocument>,
    catalog: Vec<SelectableDocument>,
    saves: Vec<SavePlan>,
    reject_next: Option<String>,
}

impl MemoryStore {
    pub fn new(catalog: Vec<SelectableDocument>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, document: EditableDocument) {
        self.documents.insert(document.id.clone(), document);
    }

    pub fn document(&self, id: &str) -> Option<&EditableDocument> {
        self.documents.get(id)
    }

    /// Save plans received so far, oldest first
    pub fn saves(&self) -> &[SavePlan] {
        &self.saves
    }

    /// Make the next save fail with the given reason
    pub fn reject_next_save(&mut self, reason: impl Into<String>) {
        self.reject_next = Some(reason.into());
    }
}

impl QueryCollaborator for MemoryStore {
    fn fetch(&mut self, id: &str) -> QueryStatus<DocumentQuery> {
        match self.documents.get(id) {
            Some(document) => QueryStatus::Resolved(DocumentQuery {
                document: document.clone(),
                selectable_documents: self.catalog.clone(),
            }),
            None => QueryStatus::Failed(format!("Document not found: {}", id)),
        }
    }
}

impl SaveCollaborator<EditableDocument> for MemoryStore {
    fn save(
        &mut self,
        current: &EditableDocument,
        original: &EditableDocument,
    ) -> Result<(), SaveError> {
        if let Some(reason) = self.reject_next.take() {
            return Err(SaveError::Rejected(reason));
        }

        self.saves.push(plan_document_save(current, original));
        self.documents.insert(current.id.clone(), current.clone());
        Ok(())
    }
}
