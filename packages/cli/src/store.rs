//! JSON-file collaborators.
//!
//! Stand-ins for the remote API: a query file holds one
//! [`DocumentQuery`], and saves write the edited document to a file.

use catalog_editor::{
    plan_document_save, DocumentQuery, EditableDocument, QueryCollaborator, QueryStatus,
    SaveCollaborator, SaveError, Value,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid document JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn read_json(path: &Path) -> Result<serde_json::Value, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the document of a query or bare document file as an untyped tree,
/// so fields the typed model would reject can still be validated
pub fn read_document_value(path: &Path) -> Result<Value, StoreError> {
    let mut json = read_json(path)?;
    let document = if json.get("document").is_some() {
        json["document"].take()
    } else {
        json
    };
    Ok(Value::from(document))
}

/// Read either a query file (`{document, selectableDocuments}`) or a bare
/// document file
pub fn read_query(path: &Path) -> Result<DocumentQuery, StoreError> {
    let json = read_json(path)?;
    let query = if json.get("document").is_some() {
        serde_json::from_value(json)
    } else {
        serde_json::from_value(json).map(|document| DocumentQuery {
            document,
            selectable_documents: Vec::new(),
        })
    };

    query.map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Query collaborator over a single file
pub struct JsonFileSource {
    query: DocumentQuery,
}

impl JsonFileSource {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            query: read_query(path)?,
        })
    }

    pub fn document_id(&self) -> &str {
        &self.query.document.id
    }
}

impl QueryCollaborator for JsonFileSource {
    fn fetch(&mut self, id: &str) -> QueryStatus<DocumentQuery> {
        if self.query.document.id == id {
            QueryStatus::Resolved(self.query.clone())
        } else {
            QueryStatus::Failed(format!("Document not found: {}", id))
        }
    }
}

/// Save collaborator that writes the edited document to a file
pub struct JsonFileSink {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new(path: PathBuf, pretty: bool) -> Self {
        Self { path, pretty }
    }
}

impl SaveCollaborator<EditableDocument> for JsonFileSink {
    fn save(
        &mut self,
        current: &EditableDocument,
        original: &EditableDocument,
    ) -> Result<(), SaveError> {
        let plan = plan_document_save(current, original);
        tracing::info!(
            document = %plan.document_id,
            ops = plan.ops.len(),
            path = %self.path.display(),
            "writing document"
        );

        let json = if self.pretty {
            serde_json::to_string_pretty(current)
        } else {
            serde_json::to_string(current)
        }
        .map_err(|e| SaveError::Rejected(e.to_string()))?;

        fs::write(&self.path, json).map_err(|e| SaveError::Transport(e.to_string()))
    }
}
