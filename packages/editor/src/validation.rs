//! # Field Validation
//!
//! Advisory, per-field checks. A failing check produces a
//! [`ValidationIssue`] for presentation; it never blocks a mutation, so a
//! half-typed value still lands in the edited snapshot.

use crate::value::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const SLUG_MESSAGE: &str = "min length 3, only lowercase letters and dashes";
pub const FILENAME_MESSAGE: &str = "Letters, numbers, and underscores only";
pub const PUBLISHED_MESSAGE: &str = "must be a four digit year";

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z-]+$").expect("slug pattern compiles"))
}

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9_]+$").expect("filename pattern compiles"))
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("year pattern compiles"))
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() > 3 && slug_pattern().is_match(slug)
}

pub fn is_valid_filename(filename: &str) -> bool {
    filename_pattern().is_match(filename)
}

pub fn is_valid_year(year: &str) -> bool {
    year_pattern().is_match(year)
}

/// A field whose content fails its rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Path of the offending field
    pub field: String,

    /// Message shown next to the input
    pub message: String,
}

/// Predicate plus message for one top-level field.
///
/// The predicate sees the raw tree value (`Null` when the field is
/// missing), so values the typed model cannot hold yet are still checked.
#[derive(Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub message: &'static str,
    check: fn(&Value) -> bool,
}

impl FieldRule {
    pub fn new(field: &'static str, message: &'static str, check: fn(&Value) -> bool) -> Self {
        Self {
            field,
            message,
            check,
        }
    }

    pub fn check(&self, state: &Value) -> Option<ValidationIssue> {
        let value = state.field(self.field).unwrap_or(&Value::Null);
        if (self.check)(value) {
            None
        } else {
            Some(ValidationIssue {
                field: self.field.to_string(),
                message: self.message.to_string(),
            })
        }
    }
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("field", &self.field)
            .field("message", &self.message)
            .finish()
    }
}

/// Set of rules applied to a document
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    /// Built-in document rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                FieldRule::new("slug", SLUG_MESSAGE, |v| {
                    v.as_str().is_some_and(is_valid_slug)
                }),
                FieldRule::new("filename", FILENAME_MESSAGE, |v| {
                    v.as_str().is_some_and(is_valid_filename)
                }),
                FieldRule::new("altLanguageId", FILENAME_MESSAGE, |v| match v {
                    Value::Null => true,
                    Value::String(id) => id.is_empty() || is_valid_filename(id),
                    _ => false,
                }),
                FieldRule::new("published", PUBLISHED_MESSAGE, |v| match v {
                    Value::Null => true,
                    Value::Number(year) => is_valid_year(&year.to_string()),
                    _ => false,
                }),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: FieldRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Run every rule against a document snapshot
pub fn validate(state: &Value, rules: &RuleSet) -> Vec<ValidationIssue> {
    rules.rules().iter().filter_map(|rule| rule.check(state)).collect()
}

/// Turn numeric text input into a tree value.
///
/// Empty input clears the field, digits become a number, anything else is
/// kept as text so the invalid value is still visible to the user.
pub fn parse_number_input(input: &str) -> Value {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(input),
    }
}
