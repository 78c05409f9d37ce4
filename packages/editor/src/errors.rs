//! Error types for the editor

use crate::collaborators::SaveError;
use crate::mutations::MutationError;
use crate::path::PathError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Entity conversion error: {0}")]
    Conversion(#[from] serde_json::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Save failed: {0}")]
    Save(#[from] SaveError),

    #[error("Session has not loaded a document yet")]
    NotLoaded,

    #[error("Nothing to save: edited document matches the original")]
    NothingToSave,

    #[error("A save is already in flight")]
    SaveInFlight,

    #[error("No save is in flight")]
    NoSaveInFlight,
}
