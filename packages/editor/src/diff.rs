//! # Snapshot Diffing
//!
//! Two views of "what changed" between the loaded and edited snapshots:
//!
//! - [`diff_values`]: leaf-level changes over any pair of trees, addressed
//!   by [`Path`]. Shared subtrees are skipped without being walked.
//! - [`plan_document_save`]: the granular create/update/delete calls a
//!   backend needs to persist an edited [`EditableDocument`].
//!
//! Sub-entities carry no ids of their own, so they are matched by their
//! natural key within the parent document: editions by type, related
//! documents by target id, tags by type. Retargeting a related document
//! therefore shows up as a delete plus a create.

use crate::model::{EditableDocument, EditionType, TagType};
use crate::path::Path;
use crate::value::Value;
use serde::Serialize;

/// One leaf-level difference between two trees
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueChange {
    Added { path: Path, value: Value },
    Removed { path: Path, value: Value },
    Changed { path: Path, from: Value, to: Value },
}

impl ValueChange {
    pub fn path(&self) -> &Path {
        match self {
            ValueChange::Added { path, .. }
            | ValueChange::Removed { path, .. }
            | ValueChange::Changed { path, .. } => path,
        }
    }
}

/// List every difference from `original` to `edited`
pub fn diff_values(original: &Value, edited: &Value) -> Vec<ValueChange> {
    let mut changes = Vec::new();
    diff_into(original, edited, Path::root(), &mut changes);
    changes
}

fn diff_into(original: &Value, edited: &Value, path: Path, changes: &mut Vec<ValueChange>) {
    if original.ptr_eq(edited) {
        return;
    }

    match (original, edited) {
        (Value::Object(before), Value::Object(after)) => {
            for (key, old) in before.iter() {
                let child = path.clone().field(key.clone());
                match after.get(key) {
                    Some(new) => diff_into(old, new, child, changes),
                    None => changes.push(ValueChange::Removed {
                        path: child,
                        value: old.clone(),
                    }),
                }
            }
            for (key, new) in after.iter() {
                if !before.contains_key(key) {
                    changes.push(ValueChange::Added {
                        path: path.clone().field(key.clone()),
                        value: new.clone(),
                    });
                }
            }
        }
        (Value::Array(before), Value::Array(after)) => {
            for (i, old) in before.iter().enumerate() {
                let child = path.clone().index(i);
                match after.get(i) {
                    Some(new) => diff_into(old, new, child, changes),
                    None => changes.push(ValueChange::Removed {
                        path: child,
                        value: old.clone(),
                    }),
                }
            }
            for (i, new) in after.iter().enumerate().skip(before.len()) {
                changes.push(ValueChange::Added {
                    path: path.clone().index(i),
                    value: new.clone(),
                });
            }
        }
        _ if original != edited => changes.push(ValueChange::Changed {
            path,
            from: original.clone(),
            to: edited.clone(),
        }),
        _ => {}
    }
}

/// A single backend call needed to persist an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EntityOp {
    UpdateDocument { fields: Vec<&'static str> },
    CreateEdition { edition_type: EditionType },
    UpdateEdition { edition_type: EditionType },
    DeleteEdition { edition_type: EditionType },
    CreateRelatedDocument { document_id: String },
    UpdateRelatedDocument { document_id: String },
    DeleteRelatedDocument { document_id: String },
    CreateTag { tag_type: TagType },
    DeleteTag { tag_type: TagType },
}

/// Ordered backend calls for one document save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavePlan {
    pub document_id: String,
    pub ops: Vec<EntityOp>,
}

impl SavePlan {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Translate an edited document into the calls that persist it
pub fn plan_document_save(current: &EditableDocument, original: &EditableDocument) -> SavePlan {
    let mut ops = Vec::new();

    let scalar_fields = [
        ("altLanguageId", current.alt_language_id != original.alt_language_id),
        ("title", current.title != original.title),
        ("originalTitle", current.original_title != original.original_title),
        ("slug", current.slug != original.slug),
        ("filename", current.filename != original.filename),
        ("description", current.description != original.description),
        ("partialDescription", current.partial_description != original.partial_description),
        ("featuredDescription", current.featured_description != original.featured_description),
        ("published", current.published != original.published),
        ("incomplete", current.incomplete != original.incomplete),
    ];
    let fields: Vec<&'static str> = scalar_fields
        .iter()
        .filter(|(_, changed)| *changed)
        .map(|(name, _)| *name)
        .collect();
    if !fields.is_empty() {
        ops.push(EntityOp::UpdateDocument { fields });
    }

    let editions = keyed_changes(&current.editions, &original.editions, |e| e.edition_type);
    ops.extend(editions.created.into_iter().map(|edition_type| EntityOp::CreateEdition { edition_type }));
    ops.extend(editions.updated.into_iter().map(|edition_type| EntityOp::UpdateEdition { edition_type }));
    ops.extend(editions.deleted.into_iter().map(|edition_type| EntityOp::DeleteEdition { edition_type }));

    let related = keyed_changes(&current.related_documents, &original.related_documents, |r| {
        r.document_id.clone()
    });
    ops.extend(related.created.into_iter().map(|document_id| EntityOp::CreateRelatedDocument { document_id }));
    ops.extend(related.updated.into_iter().map(|document_id| EntityOp::UpdateRelatedDocument { document_id }));
    ops.extend(related.deleted.into_iter().map(|document_id| EntityOp::DeleteRelatedDocument { document_id }));

    // Tags have no fields beyond their key, so they are never updated
    let tags = keyed_changes(&current.tags, &original.tags, |t| t.tag_type);
    ops.extend(tags.created.into_iter().map(|tag_type| EntityOp::CreateTag { tag_type }));
    ops.extend(tags.deleted.into_iter().map(|tag_type| EntityOp::DeleteTag { tag_type }));

    SavePlan {
        document_id: current.id.clone(),
        ops,
    }
}

struct KeyedChanges<K> {
    created: Vec<K>,
    updated: Vec<K>,
    deleted: Vec<K>,
}

/// Pair current items with original ones as a multiset. Exact matches are
/// claimed first, then remaining items pair up by key; each original item
/// is claimed at most once.
fn keyed_changes<T, K, F>(current: &[T], original: &[T], key: F) -> KeyedChanges<K>
where
    T: PartialEq,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut changes = KeyedChanges {
        created: Vec::new(),
        updated: Vec::new(),
        deleted: Vec::new(),
    };

    let mut unclaimed: Vec<Option<&T>> = original.iter().map(Some).collect();
    let mut unchanged = vec![false; current.len()];

    for (item, same) in current.iter().zip(unchanged.iter_mut()) {
        if let Some(slot) = unclaimed.iter_mut().find(|slot| slot.is_some_and(|old| old == item)) {
            *slot = None;
            *same = true;
        }
    }

    for (item, _) in current.iter().zip(&unchanged).filter(|(_, same)| !**same) {
        let k = key(item);
        let pair = unclaimed
            .iter_mut()
            .find(|slot| slot.is_some_and(|old| key(old) == k));
        match pair {
            Some(slot) => {
                *slot = None;
                changes.updated.push(k);
            }
            None => changes.created.push(k),
        }
    }

    changes
        .deleted
        .extend(unclaimed.into_iter().flatten().map(|old| key(old)));

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories;
    use crate::model::{Friend, Lang, RelatedDocument};
    use serde_json::json;

    fn document() -> EditableDocument {
        EditableDocument {
            id: "doc-1".to_string(),
            friend: Friend {
                name: "Robert Barclay".to_string(),
                alphabetical_name: "Barclay, Robert".to_string(),
                lang: Lang::En,
            },
            alt_language_id: None,
            title: "Apology".to_string(),
            original_title: String::new(),
            slug: "apology".to_string(),
            filename: "Apology".to_string(),
            description: String::new(),
            partial_description: String::new(),
            featured_description: None,
            published: Some(1676),
            incomplete: false,
            tags: vec![factories::document_tag(TagType::Doctrinal)],
            related_documents: vec![RelatedDocument {
                document_id: "doc-2".to_string(),
                description: "Companion".to_string(),
            }],
            editions: vec![factories::edition()],
        }
    }

    #[test]
    fn test_diff_identical_is_empty() {
        let value = Value::from(json!({ "a": [1, { "b": 2 }] }));
        assert!(diff_values(&value, &value.clone()).is_empty());
        assert!(diff_values(&value, &Value::from(json!({ "a": [1, { "b": 2 }] }))).is_empty());
    }

    #[test]
    fn test_diff_reports_leaf_paths() {
        let before = Value::from(json!({ "title": "A", "tags": [{ "type": "journal" }], "old": 1 }));
        let after = Value::from(json!({ "title": "B", "tags": [{ "type": "journal" }, { "type": "letters" }], "new": true }));

        let changes = diff_values(&before, &after);
        let paths: Vec<String> = changes.iter().map(|c| c.path().to_string()).collect();
        assert_eq!(paths, vec!["old", "tags[1]", "title", "new"]);
        assert_eq!(
            changes[2],
            ValueChange::Changed {
                path: Path::root().field("title"),
                from: Value::from("A"),
                to: Value::from("B"),
            }
        );
    }

    #[test]
    fn test_diff_array_shrink() {
        let before = Value::from(json!(["a", "b", "c"]));
        let after = Value::from(json!(["a", "c"]));

        let changes = diff_values(&before, &after);
        assert_eq!(changes.len(), 2);
        assert!(matches!(&changes[1], ValueChange::Removed { path, .. } if path.to_string() == "[2]"));
    }

    #[test]
    fn test_plan_unchanged_is_empty() {
        let doc = document();
        assert!(plan_document_save(&doc, &doc.clone()).is_empty());
    }

    #[test]
    fn test_plan_scalar_and_nested_changes() {
        let original = document();
        let mut current = original.clone();
        current.title = "An Apology".to_string();
        current.incomplete = true;
        current.editions[0].editor = Some("Jason Henderson".to_string());
        current.related_documents.clear();
        current.tags.push(factories::document_tag(TagType::Treatise));

        let plan = plan_document_save(&current, &original);
        assert_eq!(plan.document_id, "doc-1");
        assert_eq!(
            plan.ops,
            vec![
                EntityOp::UpdateDocument {
                    fields: vec!["title", "incomplete"]
                },
                EntityOp::UpdateEdition {
                    edition_type: EditionType::Updated
                },
                EntityOp::DeleteRelatedDocument {
                    document_id: "doc-2".to_string()
                },
                EntityOp::CreateTag {
                    tag_type: TagType::Treatise
                },
            ]
        );
    }

    #[test]
    fn test_plan_creates_and_deletes_editions() {
        let original = document();
        let mut current = original.clone();
        current.editions = vec![crate::model::Edition {
            edition_type: EditionType::Modernized,
            ..factories::edition()
        }];

        let plan = plan_document_save(&current, &original);
        assert_eq!(
            plan.ops,
            vec![
                EntityOp::CreateEdition {
                    edition_type: EditionType::Modernized
                },
                EntityOp::DeleteEdition {
                    edition_type: EditionType::Updated
                },
            ]
        );
    }

    #[test]
    fn test_plan_counts_repeated_keys() {
        let original = document();
        let catalog = vec![crate::model::SelectableDocument {
            id: "doc-2".to_string(),
            title: "Truth Triumphant".to_string(),
            friend: original.friend.clone(),
        }];

        let mut session = crate::DocumentSession::new("doc-1");
        session.load(&original).unwrap();
        session.add_edition().unwrap();
        session.add_related_document(&catalog).unwrap();
        assert!(session.can_save());

        let plan = plan_document_save(&session.document().unwrap(), &original);
        assert_eq!(
            plan.ops,
            vec![
                EntityOp::CreateEdition {
                    edition_type: EditionType::Updated
                },
                EntityOp::CreateRelatedDocument {
                    document_id: "doc-2".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_plan_deletes_one_of_two_duplicates() {
        let mut original = document();
        original.editions.push(factories::edition());
        let mut current = original.clone();
        current.editions.pop();

        let plan = plan_document_save(&current, &original);
        assert_eq!(
            plan.ops,
            vec![EntityOp::DeleteEdition {
                edition_type: EditionType::Updated
            }]
        );
    }

    #[test]
    fn test_plan_prefers_exact_match_among_duplicates() {
        let mut original = document();
        original.editions.push(crate::model::Edition {
            editor: Some("Jason Henderson".to_string()),
            ..factories::edition()
        });
        // Drop the first copy and leave the second untouched
        let mut current = original.clone();
        current.editions.remove(0);

        let plan = plan_document_save(&current, &original);
        assert_eq!(
            plan.ops,
            vec![EntityOp::DeleteEdition {
                edition_type: EditionType::Updated
            }]
        );
    }
}
