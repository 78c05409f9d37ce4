//! # Edit Session Management
//!
//! Tracks one entity graph from load to save.
//!
//! A session starts `Unloaded` and moves to `Loaded` exactly once, when
//! the initial query resolves. From then on it holds two snapshots:
//!
//! - **original**: the last loaded or saved graph, never mutated
//! - **current**: the edited graph, replaced by every dispatched mutation
//!
//! Save is offered while the two differ. A save hands both snapshots to a
//! [`SaveCollaborator`]; on success the submitted snapshot becomes the new
//! original.

use crate::collaborators::{QueryStatus, SaveCollaborator, SaveError};
use crate::diff::{diff_values, ValueChange};
use crate::mutations::{self, Mutation};
use crate::path::Path;
use crate::value::Value;
use crate::EditorError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Lifecycle of a session
#[derive(Debug, Clone)]
pub enum SessionState {
    Unloaded,
    Loaded { original: Value, current: Value },
}

/// Snapshots handed to the save collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest<T> {
    pub current: T,
    pub original: T,
}

/// Outcome of a successful save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReceipt {
    /// Session version that was saved
    pub version: u64,

    /// When the save completed
    pub saved_at: DateTime<Utc>,
}

/// Edit session over one entity graph of type `T`
#[derive(Debug)]
pub struct EditSession<T> {
    /// Identifier of the loaded entity
    pub id: String,

    state: SessionState,

    /// Snapshot submitted by a save that has not completed yet
    pending_save: Option<Value>,

    /// Number of mutations applied since load
    version: u64,

    _entity: PhantomData<fn() -> T>,
}

impl<T> EditSession<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create an unloaded session for the entity with this id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: SessionState::Unloaded,
            pending_save: None,
            version: 0,
            _entity: PhantomData,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SessionState::Loaded { .. })
    }

    /// Load the initial graph. Returns `false` if already loaded; later
    /// results of the same query never overwrite local edits.
    pub fn load(&mut self, entity: &T) -> Result<bool, EditorError> {
        if self.is_loaded() {
            tracing::debug!(id = %self.id, "session already loaded, ignoring");
            return Ok(false);
        }

        let snapshot = Value::from_entity(entity)?;
        let current = Mutation::Replace {
            state: snapshot.clone(),
        }
        .apply(&Value::Null)?;

        self.state = SessionState::Loaded {
            original: snapshot,
            current,
        };
        tracing::info!(id = %self.id, "session loaded");
        Ok(true)
    }

    /// Load from a query status if it has resolved
    pub fn poll(&mut self, status: QueryStatus<&T>) -> Result<bool, EditorError> {
        match status {
            QueryStatus::Unresolved => Ok(false),
            QueryStatus::Resolved(entity) => self.load(entity),
            QueryStatus::Failed(message) => Err(EditorError::Query(message)),
        }
    }

    /// Apply a reducer command to the edited snapshot
    pub fn dispatch(&mut self, mutation: Mutation) -> Result<(), EditorError> {
        let SessionState::Loaded { current, .. } = &mut self.state else {
            return Err(EditorError::NotLoaded);
        };

        *current = mutation.apply(current)?;
        self.version += 1;
        Ok(())
    }

    /// Parse `path` and replace the value there
    pub fn replace(&mut self, path: &str, value: impl Into<Value>) -> Result<(), EditorError> {
        self.dispatch(Mutation::replace_value(Path::parse(path)?, value))
    }

    /// Parse `path` and append to the array there
    pub fn add_item(&mut self, path: &str, item: impl Into<Value>) -> Result<(), EditorError> {
        self.dispatch(Mutation::add_item(Path::parse(path)?, item))
    }

    /// Parse `path` and delete the array item it addresses
    pub fn delete_item(&mut self, path: &str) -> Result<(), EditorError> {
        self.dispatch(Mutation::delete_item(Path::parse(path)?))
    }

    pub fn current(&self) -> Result<&Value, EditorError> {
        match &self.state {
            SessionState::Loaded { current, .. } => Ok(current),
            SessionState::Unloaded => Err(EditorError::NotLoaded),
        }
    }

    pub fn original(&self) -> Result<&Value, EditorError> {
        match &self.state {
            SessionState::Loaded { original, .. } => Ok(original),
            SessionState::Unloaded => Err(EditorError::NotLoaded),
        }
    }

    /// Read the edited value at a path
    pub fn get(&self, path: &Path) -> Result<&Value, EditorError> {
        Ok(mutations::get(self.current()?, path)?)
    }

    /// Typed view of the edited snapshot
    pub fn entity(&self) -> Result<T, EditorError> {
        Ok(self.current()?.to_entity()?)
    }

    /// Number of mutations applied since load
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Edited snapshot differs from the original
    pub fn is_dirty(&self) -> bool {
        match &self.state {
            SessionState::Loaded { original, current } => original != current,
            SessionState::Unloaded => false,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.pending_save.is_some()
    }

    /// Save is offered iff the session is dirty and no save is in flight
    pub fn can_save(&self) -> bool {
        self.is_dirty() && !self.is_saving()
    }

    /// Leaf-level changes since the original
    pub fn changes(&self) -> Result<Vec<ValueChange>, EditorError> {
        Ok(diff_values(self.original()?, self.current()?))
    }

    /// Start a save: snapshot both graphs and mark the save in flight
    pub fn begin_save(&mut self) -> Result<SaveRequest<T>, EditorError> {
        let SessionState::Loaded { original, current } = &self.state else {
            return Err(EditorError::NotLoaded);
        };
        if self.pending_save.is_some() {
            return Err(EditorError::SaveInFlight);
        }
        if original == current {
            return Err(EditorError::NothingToSave);
        }

        let request = SaveRequest {
            current: current.to_entity()?,
            original: original.to_entity()?,
        };
        self.pending_save = Some(current.clone());
        Ok(request)
    }

    /// Finish the save started by [`begin_save`](Self::begin_save)
    pub fn complete_save(&mut self, result: Result<(), SaveError>) -> Result<SaveReceipt, EditorError> {
        let submitted = self.pending_save.take().ok_or(EditorError::NoSaveInFlight)?;

        if let Err(err) = result {
            tracing::warn!(id = %self.id, error = %err, "save failed");
            return Err(err.into());
        }

        if let SessionState::Loaded { original, .. } = &mut self.state {
            *original = submitted;
        }
        tracing::info!(id = %self.id, version = self.version, "session saved");

        Ok(SaveReceipt {
            version: self.version,
            saved_at: Utc::now(),
        })
    }

    /// Hand the current/original pair to `collaborator` and record the result
    pub fn save<C>(&mut self, collaborator: &mut C) -> Result<SaveReceipt, EditorError>
    where
        C: SaveCollaborator<T> + ?Sized,
    {
        let request = self.begin_save()?;
        let result = collaborator.save(&request.current, &request.original);
        self.complete_save(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
        lines: Vec<String>,
    }

    fn note() -> Note {
        Note {
            title: "First".to_string(),
            lines: vec!["a".to_string()],
        }
    }

    struct Recorder {
        saved: Vec<(Note, Note)>,
        fail: bool,
    }

    impl SaveCollaborator<Note> for Recorder {
        fn save(&mut self, current: &Note, original: &Note) -> Result<(), SaveError> {
            if self.fail {
                return Err(SaveError::Transport("offline".to_string()));
            }
            self.saved.push((current.clone(), original.clone()));
            Ok(())
        }
    }

    #[test]
    fn test_session_creation() {
        let session: EditSession<Note> = EditSession::new("note-1");

        assert_eq!(session.id, "note-1");
        assert!(!session.is_loaded());
        assert!(!session.is_dirty());
        assert!(matches!(session.current(), Err(EditorError::NotLoaded)));
    }

    #[test]
    fn test_dispatch_before_load_fails() {
        let mut session: EditSession<Note> = EditSession::new("note-1");
        let result = session.replace("title", "x");
        assert!(matches!(result, Err(EditorError::NotLoaded)));
    }

    #[test]
    fn test_load_happens_once() {
        let mut session = EditSession::new("note-1");
        assert!(session.load(&note()).unwrap());

        session.replace("title", "Edited").unwrap();

        let mut other = note();
        other.title = "Refetched".to_string();
        assert!(!session.load(&other).unwrap());
        assert_eq!(session.entity().unwrap().title, "Edited");
    }

    #[test]
    fn test_poll_waits_for_resolution() {
        let mut session = EditSession::new("note-1");
        let data = note();

        assert!(!session.poll(QueryStatus::Unresolved).unwrap());
        assert!(!session.is_loaded());

        assert!(session.poll(QueryStatus::Resolved(&data)).unwrap());
        assert!(session.is_loaded());

        let mut fresh: EditSession<Note> = EditSession::new("note-2");
        let err = fresh.poll(QueryStatus::Failed("boom".to_string())).unwrap_err();
        assert!(matches!(err, EditorError::Query(msg) if msg == "boom"));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut session = EditSession::new("note-1");
        session.load(&note()).unwrap();
        assert!(!session.can_save());

        session.replace("title", "Second").unwrap();
        assert!(session.is_dirty());
        assert!(session.can_save());

        // Editing back to the original value clears the dirty flag
        session.replace("title", "First").unwrap();
        assert!(!session.is_dirty());
        assert_eq!(session.version(), 2);
    }

    #[test]
    fn test_save_promotes_baseline() {
        let mut session = EditSession::new("note-1");
        session.load(&note()).unwrap();
        session.add_item("lines", "b").unwrap();

        let mut recorder = Recorder {
            saved: vec![],
            fail: false,
        };
        let receipt = session.save(&mut recorder).unwrap();

        assert_eq!(receipt.version, 1);
        assert_eq!(recorder.saved.len(), 1);
        assert_eq!(recorder.saved[0].0.lines, vec!["a", "b"]);
        assert_eq!(recorder.saved[0].1, note());
        assert!(!session.is_dirty());
        assert!(matches!(
            session.save(&mut recorder),
            Err(EditorError::NothingToSave)
        ));
    }

    #[test]
    fn test_failed_save_keeps_baseline() {
        let mut session = EditSession::new("note-1");
        session.load(&note()).unwrap();
        session.delete_item("lines[0]").unwrap();

        let mut recorder = Recorder {
            saved: vec![],
            fail: true,
        };
        let err = session.save(&mut recorder).unwrap_err();
        assert!(matches!(err, EditorError::Save(SaveError::Transport(_))));
        assert!(session.is_dirty());
        assert!(!session.is_saving());
    }

    #[test]
    fn test_no_double_submit() {
        let mut session = EditSession::new("note-1");
        session.load(&note()).unwrap();
        session.replace("title", "Second").unwrap();

        let request = session.begin_save().unwrap();
        assert_eq!(request.current.title, "Second");
        assert!(!session.can_save());
        assert!(matches!(session.begin_save(), Err(EditorError::SaveInFlight)));

        // Edits made while the save is in flight stay dirty afterwards
        session.replace("title", "Third").unwrap();
        session.complete_save(Ok(())).unwrap();
        assert!(session.is_dirty());
        assert_eq!(
            session.original().unwrap().field("title").and_then(Value::as_str),
            Some("Second")
        );
        assert!(matches!(
            session.complete_save(Ok(())),
            Err(EditorError::NoSaveInFlight)
        ));
    }

    #[test]
    fn test_structural_errors_leave_state_untouched() {
        let mut session = EditSession::new("note-1");
        session.load(&note()).unwrap();

        assert!(matches!(
            session.delete_item("lines[3]"),
            Err(EditorError::Mutation(_))
        ));
        assert!(matches!(session.replace("lines[", "x"), Err(EditorError::Path(_))));
        assert!(!session.is_dirty());
        assert_eq!(session.version(), 0);
    }
}
