//! Catalog entities as returned by the document query.
//!
//! Field names follow the remote API (camelCase), so these round-trip
//! through [`Value`](crate::Value) with the same paths the UI uses.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Es,
}

impl Lang {
    /// The other catalog language
    pub fn alternate(self) -> Lang {
        match self {
            Lang::En => Lang::Es,
            Lang::Es => Lang::En,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Es => "Spanish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagType {
    Journal,
    Letters,
    Exhortation,
    Doctrinal,
    Treatise,
    History,
    Allegory,
    SpiritualLife,
}

impl TagType {
    pub const ALL: [TagType; 8] = [
        TagType::Journal,
        TagType::Letters,
        TagType::Exhortation,
        TagType::Doctrinal,
        TagType::Treatise,
        TagType::History,
        TagType::Allegory,
        TagType::SpiritualLife,
    ];

    /// Wire name, as used in `tags[n].type`
    pub fn as_str(self) -> &'static str {
        match self {
            TagType::Journal => "journal",
            TagType::Letters => "letters",
            TagType::Exhortation => "exhortation",
            TagType::Doctrinal => "doctrinal",
            TagType::Treatise => "treatise",
            TagType::History => "history",
            TagType::Allegory => "allegory",
            TagType::SpiritualLife => "spiritualLife",
        }
    }

    /// Human-readable label for checkboxes and listings
    pub fn label(self) -> &'static str {
        match self {
            TagType::SpiritualLife => "spiritual life",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditionType {
    Original,
    Modernized,
    Updated,
}

impl EditionType {
    pub fn as_str(self) -> &'static str {
        match self {
            EditionType::Original => "original",
            EditionType::Modernized => "modernized",
            EditionType::Updated => "updated",
        }
    }
}

impl fmt::Display for EditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owning author of a document. Read-only in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub name: String,
    pub alphabetical_name: String,
    pub lang: Lang,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTag {
    #[serde(rename = "type")]
    pub tag_type: TagType,
}

/// Link from a document to another document in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedDocument {
    pub document_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    #[serde(rename = "type")]
    pub edition_type: EditionType,
    pub editor: Option<String>,
    pub is_draft: bool,
    #[serde(default)]
    pub paperback_splits: Vec<i64>,
}

/// The entity graph the editor loads, mutates and saves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableDocument {
    pub id: String,
    pub friend: Friend,
    pub alt_language_id: Option<String>,
    pub title: String,
    pub original_title: String,
    pub slug: String,
    pub filename: String,
    pub description: String,
    pub partial_description: String,
    pub featured_description: Option<String>,
    pub published: Option<i64>,
    pub incomplete: bool,
    #[serde(default)]
    pub tags: Vec<DocumentTag>,
    #[serde(default)]
    pub related_documents: Vec<RelatedDocument>,
    #[serde(default)]
    pub editions: Vec<Edition>,
}

impl EditableDocument {
    pub fn has_tag(&self, tag_type: TagType) -> bool {
        self.tags.iter().any(|t| t.tag_type == tag_type)
    }
}

/// Candidate target for a related-document picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectableDocument {
    pub id: String,
    pub title: String,
    pub friend: Friend,
}

pub type SelectableDocuments = Vec<SelectableDocument>;

/// Payload of the document query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub document: EditableDocument,
    #[serde(default)]
    pub selectable_documents: SelectableDocuments,
}

/// Catalog sorted by author's alphabetical name (stable for ties)
pub fn sorted_selectable(catalog: &[SelectableDocument]) -> Vec<&SelectableDocument> {
    let mut sorted: Vec<&SelectableDocument> = catalog.iter().collect();
    sorted.sort_by(|a, b| a.friend.alphabetical_name.cmp(&b.friend.alphabetical_name));
    sorted
}

/// `(id, label)` options for a related-document picker in one language
pub fn picker_options(catalog: &[SelectableDocument], lang: Lang) -> Vec<(String, String)> {
    sorted_selectable(catalog)
        .into_iter()
        .filter(|doc| doc.friend.lang == lang)
        .map(|doc| {
            (
                doc.id.clone(),
                format!("{}: {}", doc.friend.alphabetical_name, doc.title),
            )
        })
        .collect()
}

/// Target for a newly added related document: first entry of the sorted
/// catalog, or empty when there is nothing to pick
pub fn default_related_target(catalog: &[SelectableDocument]) -> String {
    sorted_selectable(catalog)
        .first()
        .map(|doc| doc.id.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectable(id: &str, author: &str, lang: Lang) -> SelectableDocument {
        SelectableDocument {
            id: id.to_string(),
            title: format!("Title {}", id),
            friend: Friend {
                name: author.to_string(),
                alphabetical_name: author.to_string(),
                lang,
            },
        }
    }

    #[test]
    fn test_tag_wire_names() {
        let tag = DocumentTag {
            tag_type: TagType::SpiritualLife,
        };
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, r#"{"type":"spiritualLife"}"#);
        assert_eq!(TagType::SpiritualLife.label(), "spiritual life");
        assert_eq!(TagType::Journal.label(), "journal");
    }

    #[test]
    fn test_picker_options_filter_and_sort() {
        let catalog = vec![
            selectable("c", "Penn, William", Lang::En),
            selectable("a", "Barclay, Robert", Lang::En),
            selectable("b", "Alvarez, Juan", Lang::Es),
        ];

        let options = picker_options(&catalog, Lang::En);
        assert_eq!(
            options,
            vec![
                ("a".to_string(), "Barclay, Robert: Title a".to_string()),
                ("c".to_string(), "Penn, William: Title c".to_string()),
            ]
        );
        assert_eq!(default_related_target(&catalog), "b");
        assert_eq!(default_related_target(&[]), "");
    }

    #[test]
    fn test_alternate_language() {
        assert_eq!(Lang::En.alternate(), Lang::Es);
        assert_eq!(Lang::Es.alternate().label(), "English");
    }
}
