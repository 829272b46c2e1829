//! Controlled-vocabulary tagging of name and subject columns.
//!
//! The export flattens every MODS `<name>` into a column per role, so the
//! role is only recoverable from the column name. [`Vocabulary`] maps those
//! column names back to role and entity-type tags, and the `tag_*` functions
//! prefix every atom of a cell with its tag.
//!
//! A [`Vocabulary`] is built once and passed by reference to the stages that
//! need it; nothing here is global, so tests can swap in small tables.
//!
//! # Examples
//!
//! ```
//! use diglib_migrate::vocabulary::{tag_role, Vocabulary, ColumnTag};
//!
//! assert_eq!(
//!     tag_role("relators:aut:person", "Smith|Jones"),
//!     "relators:aut:person:Smith|relators:aut:person:Jones"
//! );
//!
//! let vocab = Vocabulary::standard();
//! assert!(matches!(
//!     vocab.route("mods_name_personal_author_namePart_ms"),
//!     Some(ColumnTag::Role("relators:aut:person"))
//! ));
//! ```

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::cell::{map_atoms, split_multi, DELIMITER_STR};
use crate::error::{MigrateError, Result};
use crate::record::BatchKind;
use crate::vocabulary_tables;

/// Prefix every atom of `cell` with `tag`.
#[must_use]
pub fn tag_role(tag: &str, cell: &str) -> String {
    map_atoms(cell, |atom| format!("{tag}:{atom}"))
}

/// Tag every atom with both tags: all atoms under the first tag, then all
/// atoms under the second.
#[must_use]
pub fn tag_dual_role(tags: (&str, &str), cell: &str) -> String {
    let atoms = split_multi(cell);
    [tags.0, tags.1]
        .iter()
        .flat_map(|tag| atoms.iter().map(move |atom| format!("{tag}:{atom}")))
        .collect::<Vec<_>>()
        .join(DELIMITER_STR)
}

/// Prefix every atom of `cell` with an entity-type label.
#[must_use]
pub fn tag_subject(entity_type: &str, cell: &str) -> String {
    map_atoms(cell, |atom| format!("{entity_type}:{atom}"))
}

/// Wrap every atom of `cell` in parentheses.
#[must_use]
pub fn parenthesize(cell: &str) -> String {
    map_atoms(cell, |atom| format!("({atom})"))
}

/// How a column's atoms are tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTag<'a> {
    /// A single role tag
    Role(&'a str),
    /// Two role tags held simultaneously
    DualRole(&'a str, &'a str),
    /// A subject entity type
    Subject(&'a str),
}

impl ColumnTag<'_> {
    /// Apply this tag to a cell.
    #[must_use]
    pub fn apply(&self, cell: &str) -> String {
        match *self {
            ColumnTag::Role(tag) => tag_role(tag, cell),
            ColumnTag::DualRole(first, second) => tag_dual_role((first, second), cell),
            ColumnTag::Subject(entity_type) => tag_subject(entity_type, cell),
        }
    }
}

/// Immutable lookup tables for one migration run.
///
/// Role tables are `IndexMap`s so that iteration follows table order, which
/// fixes the order agents appear in the combined `people` column.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    relators: IndexMap<String, String>,
    dual_relators: IndexMap<String, (String, String)>,
    subjects: IndexMap<String, String>,
    models: HashMap<String, String>,
    resource_types: HashMap<String, String>,
    display_hints: HashMap<String, String>,
    bad_batches: HashSet<String>,
}

impl Vocabulary {
    /// The tables for the legacy repository export.
    #[must_use]
    pub fn standard() -> Self {
        fn owned<'a>(
            pairs: &'a [(&'a str, &'a str)],
        ) -> impl Iterator<Item = (String, String)> + 'a {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        }

        Vocabulary {
            relators: owned(vocabulary_tables::RELATORS).collect(),
            dual_relators: vocabulary_tables::DUAL_RELATORS
                .iter()
                .map(|(k, (a, b))| ((*k).to_string(), ((*a).to_string(), (*b).to_string())))
                .collect(),
            subjects: owned(vocabulary_tables::SUBJECTS).collect(),
            models: owned(vocabulary_tables::MODELS).collect(),
            resource_types: owned(vocabulary_tables::RESOURCE_TYPES).collect(),
            display_hints: owned(vocabulary_tables::DISPLAY_HINTS).collect(),
            bad_batches: vocabulary_tables::BAD_BATCHES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Create a builder starting from empty tables.
    #[must_use]
    pub fn builder() -> VocabularyBuilder {
        VocabularyBuilder {
            vocabulary: Vocabulary::default(),
        }
    }

    /// Check that no column is routed by more than one table.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Vocabulary`] naming the first column found in
    /// two tables.
    pub fn validate(&self) -> Result<()> {
        let tables: [(&str, Vec<&String>); 3] = [
            ("relator", self.relators.keys().collect()),
            ("dual relator", self.dual_relators.keys().collect()),
            ("subject", self.subjects.keys().collect()),
        ];
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (table, columns) in &tables {
            for column in columns {
                if let Some(previous) = seen.insert(column.as_str(), *table) {
                    return Err(MigrateError::Vocabulary(format!(
                        "column '{column}' is routed by both the {previous} and {table} tables"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Find the tag for a column. Matching is exact and case-sensitive.
    #[must_use]
    pub fn route(&self, column: &str) -> Option<ColumnTag<'_>> {
        if let Some(tag) = self.relators.get(column) {
            return Some(ColumnTag::Role(tag));
        }
        if let Some((first, second)) = self.dual_relators.get(column) {
            return Some(ColumnTag::DualRole(first, second));
        }
        self.subjects
            .get(column)
            .map(|entity_type| ColumnTag::Subject(entity_type))
    }

    /// Role columns in table order: single-role columns, then dual-role.
    pub fn agent_columns(&self) -> impl Iterator<Item = &str> {
        self.relators
            .keys()
            .chain(self.dual_relators.keys())
            .map(String::as_str)
    }

    /// Subject name columns in table order.
    pub fn subject_columns(&self) -> impl Iterator<Item = &str> {
        self.subjects.keys().map(String::as_str)
    }

    /// Model label for a legacy content model name.
    #[must_use]
    pub fn model(&self, content_model: &str) -> Option<&str> {
        self.models.get(content_model).map(String::as_str)
    }

    /// Resource type for a model label.
    #[must_use]
    pub fn resource_type(&self, model: &str) -> Option<&str> {
        self.resource_types.get(model).map(String::as_str)
    }

    /// Display hint for a model label.
    #[must_use]
    pub fn display_hint(&self, model: &str) -> Option<&str> {
        self.display_hints.get(model).map(String::as_str)
    }

    /// Whether a batch needs known-parent disambiguation.
    #[must_use]
    pub fn is_bad_batch(&self, batch_name: &str) -> bool {
        self.bad_batches.contains(batch_name)
    }

    /// Classify a batch by its file name.
    #[must_use]
    pub fn batch_kind(&self, batch_name: &str) -> BatchKind {
        if self.is_bad_batch(batch_name) {
            BatchKind::Bad
        } else {
            BatchKind::Ordinary
        }
    }
}

/// Builder for custom [`Vocabulary`] tables.
#[derive(Debug)]
pub struct VocabularyBuilder {
    vocabulary: Vocabulary,
}

impl VocabularyBuilder {
    /// Add a single-role column
    #[must_use]
    pub fn relator(mut self, column: &str, tag: &str) -> Self {
        self.vocabulary
            .relators
            .insert(column.to_string(), tag.to_string());
        self
    }

    /// Add a dual-role column
    #[must_use]
    pub fn dual_relator(mut self, column: &str, first: &str, second: &str) -> Self {
        self.vocabulary
            .dual_relators
            .insert(column.to_string(), (first.to_string(), second.to_string()));
        self
    }

    /// Add a subject column
    #[must_use]
    pub fn subject(mut self, column: &str, entity_type: &str) -> Self {
        self.vocabulary
            .subjects
            .insert(column.to_string(), entity_type.to_string());
        self
    }

    /// Add a content model mapping
    #[must_use]
    pub fn model(mut self, content_model: &str, label: &str) -> Self {
        self.vocabulary
            .models
            .insert(content_model.to_string(), label.to_string());
        self
    }

    /// Add a resource type mapping
    #[must_use]
    pub fn resource_type(mut self, model: &str, resource_type: &str) -> Self {
        self.vocabulary
            .resource_types
            .insert(model.to_string(), resource_type.to_string());
        self
    }

    /// Add a display hint mapping
    #[must_use]
    pub fn display_hint(mut self, model: &str, hint: &str) -> Self {
        self.vocabulary
            .display_hints
            .insert(model.to_string(), hint.to_string());
        self
    }

    /// Flag a batch for known-parent disambiguation
    #[must_use]
    pub fn bad_batch(mut self, batch_name: &str) -> Self {
        self.vocabulary.bad_batches.insert(batch_name.to_string());
        self
    }

    /// Build the vocabulary, checking the routing tables are disjoint.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Vocabulary`] if a column appears in two tables.
    pub fn build(self) -> Result<Vocabulary> {
        self.vocabulary.validate()?;
        Ok(self.vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_role() {
        assert_eq!(
            tag_role("relators:aut:person", "Smith|Jones"),
            "relators:aut:person:Smith|relators:aut:person:Jones"
        );
        assert_eq!(tag_role("relators:aut:person", ""), "");
    }

    #[test]
    fn test_tag_dual_role_prefix_then_atom_order() {
        assert_eq!(
            tag_dual_role(("relators:col:person", "relators:res:person"), "A|B"),
            "relators:col:person:A|relators:col:person:B|relators:res:person:A|relators:res:person:B"
        );
        assert_eq!(tag_dual_role(("x", "y"), ""), "");
    }

    #[test]
    fn test_tag_subject() {
        assert_eq!(tag_subject("family", "Smith"), "family:Smith");
        assert_eq!(tag_subject("family", ""), "");
    }

    #[test]
    fn test_parenthesize() {
        assert_eq!(parenthesize("eng|fre"), "(eng)|(fre)");
        assert_eq!(parenthesize(""), "");
    }

    #[test]
    fn test_standard_tables_are_disjoint() {
        Vocabulary::standard()
            .validate()
            .expect("standard tables overlap");
    }

    #[test]
    fn test_route_each_table() {
        let vocab = Vocabulary::standard();
        assert_eq!(
            vocab.route("mods_name_personal_researcher_role_ms"),
            Some(ColumnTag::DualRole(
                "relators:col:person",
                "relators:res:person"
            ))
        );
        assert_eq!(
            vocab.route("mods_subject_name_family_namePart_ms"),
            Some(ColumnTag::Subject("family"))
        );
        assert_eq!(vocab.route("mods_titleInfo_title_ms"), None);
    }

    #[test]
    fn test_route_is_case_sensitive() {
        let vocab = Vocabulary::standard();
        assert_eq!(vocab.route("MODS_NAME_AUTHOR_NAMEPART_MS"), None);
    }

    #[test]
    fn test_overlapping_tables_rejected() {
        let result = Vocabulary::builder()
            .relator("col_a", "relators:aut:person")
            .subject("col_a", "person")
            .build();
        assert!(matches!(result, Err(MigrateError::Vocabulary(_))));
    }

    #[test]
    fn test_model_chain() {
        let vocab = Vocabulary::standard();
        let model = vocab.model("sp_large_image_cmodel").expect("model");
        assert_eq!(model, "Image");
        assert_eq!(vocab.resource_type(model), Some("Still Image"));
        assert_eq!(vocab.display_hint(model), Some("Open Seadragon"));
        assert_eq!(vocab.display_hint("Audio"), None);
    }

    #[test]
    fn test_bad_batches() {
        let vocab = Vocabulary::standard();
        assert!(vocab.is_bad_batch("batch-8.csv"));
        assert!(vocab.is_bad_batch("batch-14.csv"));
        assert!(!vocab.is_bad_batch("batch-13.csv"));
        assert_eq!(vocab.batch_kind("batch-9.csv"), BatchKind::Bad);
        assert_eq!(vocab.batch_kind("batch-1.csv"), BatchKind::Ordinary);
    }

    #[test]
    fn test_agent_column_order() {
        let vocab = Vocabulary::builder()
            .relator("b", "t1")
            .relator("a", "t2")
            .dual_relator("c", "t3", "t4")
            .build()
            .expect("vocabulary");
        assert_eq!(vocab.agent_columns().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }
}
