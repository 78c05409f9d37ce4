//! # Tree Mutations
//!
//! Reducer commands over [`Value`] snapshots.
//!
//! ## Semantics
//!
//! Every command takes a snapshot by reference and returns a new one. The
//! input is never modified. Containers on the path from the root to the
//! target are shallow-copied with a single slot replaced; all other
//! subtrees are shared with the input.
//!
//! ### Replace
//! - Discards the current tree and returns the given state unchanged
//!
//! ### ReplaceValue
//! - Every intermediate segment must exist and have the right kind
//! - A final object field may be absent (it is added)
//! - A final index must be in bounds
//!
//! ### AddItem
//! - Target must be an array; the item is appended
//!
//! ### DeleteItem
//! - Path must end in an index into an array that is in bounds
//!
//! Out-of-range indices always fail; there is no silent no-op.

use crate::path::{Path, Segment};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Reducer command, in the same shape the UI dispatches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mutation {
    /// Swap in a whole new state, discarding local edits
    Replace { state: Value },

    /// Overwrite the value at a path
    ReplaceValue { at: Path, with: Value },

    /// Append to the array at a path
    AddItem { at: Path, value: Value },

    /// Remove the array element a path points at
    DeleteItem { at: Path },
}

/// Structural path errors. These indicate a caller bug, not bad user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Field not found: {path}")]
    FieldNotFound { path: Path },

    #[error("Index {index} out of bounds at {path} (length {len})")]
    IndexOutOfBounds { path: Path, index: usize, len: usize },

    #[error("Expected object at '{path}', found {found}")]
    NotAnObject { path: Path, found: &'static str },

    #[error("Expected array at '{path}', found {found}")]
    NotAnArray { path: Path, found: &'static str },

    #[error("Path does not address an array item: '{0}'")]
    NotAnItem(Path),
}

impl Mutation {
    pub fn replace_value(at: Path, with: impl Into<Value>) -> Self {
        Mutation::ReplaceValue {
            at,
            with: with.into(),
        }
    }

    pub fn add_item(at: Path, value: impl Into<Value>) -> Self {
        Mutation::AddItem {
            at,
            value: value.into(),
        }
    }

    pub fn delete_item(at: Path) -> Self {
        Mutation::DeleteItem { at }
    }

    /// Apply to a snapshot, producing the next snapshot
    pub fn apply(&self, state: &Value) -> Result<Value, MutationError> {
        let next = match self {
            Mutation::Replace { state: new_state } => Ok(new_state.clone()),
            Mutation::ReplaceValue { at, with } => replace_value(state, at, with),
            Mutation::AddItem { at, value } => add_item(state, at, value),
            Mutation::DeleteItem { at } => delete_item(state, at),
        }?;

        tracing::debug!(mutation = self.name(), at = %self.target(), "applied mutation");
        Ok(next)
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Replace { .. } => "replace",
            Mutation::ReplaceValue { .. } => "replace_value",
            Mutation::AddItem { .. } => "add_item",
            Mutation::DeleteItem { .. } => "delete_item",
        }
    }

    /// Path this mutation addresses (root for `Replace`)
    pub fn target(&self) -> Path {
        match self {
            Mutation::Replace { .. } => Path::root(),
            Mutation::ReplaceValue { at, .. }
            | Mutation::AddItem { at, .. }
            | Mutation::DeleteItem { at } => at.clone(),
        }
    }
}

/// Apply mutations in order, stopping at the first failure
pub fn reduce<'a, I>(state: &Value, mutations: I) -> Result<Value, MutationError>
where
    I: IntoIterator<Item = &'a Mutation>,
{
    mutations
        .into_iter()
        .try_fold(state.clone(), |current, mutation| mutation.apply(&current))
}

/// Read the value at a path
pub fn get<'v>(state: &'v Value, path: &Path) -> Result<&'v Value, MutationError> {
    let mut node = state;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = child(node, segment, path, depth)?;
    }
    Ok(node)
}

fn replace_value(state: &Value, at: &Path, with: &Value) -> Result<Value, MutationError> {
    let Some(last) = at.last() else {
        return Ok(with.clone());
    };

    let parent_len = at.len() - 1;
    update_in(state, &at.segments()[..parent_len], at, 0, |container| {
        match (container, last) {
            (Value::Object(fields), Segment::Field(name)) => {
                let mut copy = (**fields).clone();
                copy.insert(name.clone(), with.clone());
                Ok(Value::Object(Arc::new(copy)))
            }
            (Value::Array(items), Segment::Index(index)) => {
                if *index >= items.len() {
                    return Err(MutationError::IndexOutOfBounds {
                        path: at.prefix(parent_len),
                        index: *index,
                        len: items.len(),
                    });
                }
                let mut copy = (**items).clone();
                copy[*index] = with.clone();
                Ok(Value::Array(Arc::new(copy)))
            }
            (other, Segment::Field(_)) => Err(MutationError::NotAnObject {
                path: at.prefix(parent_len),
                found: other.kind(),
            }),
            (other, Segment::Index(_)) => Err(MutationError::NotAnArray {
                path: at.prefix(parent_len),
                found: other.kind(),
            }),
        }
    })
}

fn add_item(state: &Value, at: &Path, item: &Value) -> Result<Value, MutationError> {
    update_in(state, at.segments(), at, 0, |target| match target {
        Value::Array(items) => {
            let mut copy = (**items).clone();
            copy.push(item.clone());
            Ok(Value::Array(Arc::new(copy)))
        }
        other => Err(MutationError::NotAnArray {
            path: at.clone(),
            found: other.kind(),
        }),
    })
}

fn delete_item(state: &Value, at: &Path) -> Result<Value, MutationError> {
    let Some(Segment::Index(index)) = at.last() else {
        return Err(MutationError::NotAnItem(at.clone()));
    };

    let parent_len = at.len() - 1;
    update_in(state, &at.segments()[..parent_len], at, 0, |target| match target {
        Value::Array(items) if *index < items.len() => {
            let mut copy = (**items).clone();
            copy.remove(*index);
            Ok(Value::Array(Arc::new(copy)))
        }
        Value::Array(items) => Err(MutationError::IndexOutOfBounds {
            path: at.prefix(parent_len),
            index: *index,
            len: items.len(),
        }),
        other => Err(MutationError::NotAnArray {
            path: at.prefix(parent_len),
            found: other.kind(),
        }),
    })
}

/// Walk `segments` from `node`, run `leaf` on the node they reach, and
/// rebuild each ancestor as a shallow copy holding the updated child.
fn update_in<F>(
    node: &Value,
    segments: &[Segment],
    full: &Path,
    depth: usize,
    leaf: F,
) -> Result<Value, MutationError>
where
    F: FnOnce(&Value) -> Result<Value, MutationError>,
{
    let Some((segment, rest)) = segments.split_first() else {
        return leaf(node);
    };

    let updated = update_in(child(node, segment, full, depth)?, rest, full, depth + 1, leaf)?;

    match (node, segment) {
        (Value::Object(fields), Segment::Field(name)) => {
            let mut copy = (**fields).clone();
            copy.insert(name.clone(), updated);
            Ok(Value::Object(Arc::new(copy)))
        }
        (Value::Array(items), Segment::Index(index)) => {
            let mut copy = (**items).clone();
            copy[*index] = updated;
            Ok(Value::Array(Arc::new(copy)))
        }
        // `child` already rejected every other combination
        (other, Segment::Field(_)) => Err(MutationError::NotAnObject {
            path: full.prefix(depth),
            found: other.kind(),
        }),
        (other, Segment::Index(_)) => Err(MutationError::NotAnArray {
            path: full.prefix(depth),
            found: other.kind(),
        }),
    }
}

fn child<'v>(
    node: &'v Value,
    segment: &Segment,
    full: &Path,
    depth: usize,
) -> Result<&'v Value, MutationError> {
    match (node, segment) {
        (Value::Object(fields), Segment::Field(name)) => {
            fields.get(name).ok_or_else(|| MutationError::FieldNotFound {
                path: full.prefix(depth + 1),
            })
        }
        (Value::Array(items), Segment::Index(index)) => {
            items
                .get(*index)
                .ok_or_else(|| MutationError::IndexOutOfBounds {
                    path: full.prefix(depth),
                    index: *index,
                    len: items.len(),
                })
        }
        (other, Segment::Field(_)) => Err(MutationError::NotAnObject {
            path: full.prefix(depth),
            found: other.kind(),
        }),
        (other, Segment::Index(_)) => Err(MutationError::NotAnArray {
            path: full.prefix(depth),
            found: other.kind(),
        }),
    }
}
