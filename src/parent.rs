//! Parent resolution for repository objects.
//!
//! The legacy platform allowed an object to sit in several collections at
//! once through three relationship columns. The target schema has a single
//! `parent`, so exactly one identifier is promoted and every other one is
//! handed back as "extra parents" for the auxiliary output.
//!
//! Some batches ("bad batches") link their objects both to an ordinary parent
//! and to a collection that has already been migrated. For those, a
//! [`KnownParentIndex`] of migrated collections is consulted: a candidate
//! found in the index becomes `member_of` (holding the migrated identifier)
//! instead of competing for `parent`.
//!
//! # Examples
//!
//! ```
//! use diglib_migrate::parent::{KnownParentIndex, ParentResolver};
//!
//! let mut index = KnownParentIndex::new();
//! index.insert_id("coll:1", "node/17");
//!
//! let resolver = ParentResolver::for_bad_batch(&index);
//! let resolution = resolver.resolve("obj:9", "coll:1|book:4")?;
//! assert_eq!(resolution.parent, "book:4");
//! assert_eq!(resolution.member_of, "node/17");
//! assert_eq!(resolution.extra_parents, None);
//! # Ok::<(), diglib_migrate::MigrateError>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::Deserialize;

use crate::cell::{join_multi, split_multi};
use crate::columns;
use crate::error::{MigrateError, Result};
use crate::record::Record;

/// URI prefix the relationship columns put in front of every identifier.
pub const FEDORA_URI_PREFIX: &str = "info:fedora/";

/// Legacy root collection; an object whose parent is the root has none.
pub const ROOT_COLLECTION: &str = "islandora:text_collection";

/// Marker written to `member_of` when several distinct candidates are known
/// parents.
pub const MULTIPLE_KNOWN_PARENTS_FLAG: &str = "@Multiple known parents. Manual review.";

/// The relationship columns, in the order their identifiers are combined.
pub const RELATIONSHIP_COLUMNS: [&str; 3] = [
    columns::IS_MEMBER_OF_COLLECTION,
    columns::IS_CONSTITUENT_OF,
    columns::IS_PAGE_OF,
];

/// What to do when more than one parent candidate is a known parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectionPolicy {
    /// Abort the batch with [`MigrateError::AmbiguousParent`]
    Strict,
    /// Write [`MULTIPLE_KNOWN_PARENTS_FLAG`] to `member_of`, promote the first
    /// candidate that is not a known parent (none when all are known), and
    /// send the rest to the extra parents (default)
    #[default]
    Flag,
    /// Take the first known candidate, in candidate order, as `member_of`
    FirstMatch,
}

impl fmt::Display for IntersectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Flag => write!(f, "flag"),
            Self::FirstMatch => write!(f, "first-match"),
        }
    }
}

impl FromStr for IntersectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "flag" => Ok(Self::Flag),
            "first-match" | "first_match" => Ok(Self::FirstMatch),
            other => Err(format!(
                "unknown intersection policy '{other}' (expected strict, flag or first-match)"
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PairRow(String, String);

/// Read-only index of collections that were migrated ahead of the bad
/// batches: legacy identifier -> migrated identifier, and -> title.
#[derive(Debug, Clone, Default)]
pub struct KnownParentIndex {
    migrated: HashMap<String, String>,
    titles: HashMap<String, String>,
    legacy_by_migrated: HashMap<String, String>,
}

impl KnownParentIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an index from the two static CSVs (`legacy,migrated` and
    /// `legacy,title`), each with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if either CSV is malformed.
    pub fn from_readers<R1: Read, R2: Read>(ids: R1, titles: R2) -> Result<Self> {
        let mut index = Self::new();
        for (legacy, migrated) in read_pairs(ids)? {
            index.insert_id(&legacy, &migrated);
        }
        for (legacy, title) in read_pairs(titles)? {
            index.insert_title(&legacy, &title);
        }
        Ok(index)
    }

    /// Record the migrated identifier of a legacy parent
    pub fn insert_id(&mut self, legacy: &str, migrated: &str) {
        self.migrated
            .insert(legacy.to_string(), migrated.to_string());
        self.legacy_by_migrated
            .insert(migrated.to_string(), legacy.to_string());
    }

    /// Record the title of a legacy parent
    pub fn insert_title(&mut self, legacy: &str, title: &str) {
        self.titles.insert(legacy.to_string(), title.to_string());
    }

    /// Whether a legacy identifier is a known parent.
    #[must_use]
    pub fn contains(&self, legacy: &str) -> bool {
        self.migrated.contains_key(legacy)
    }

    /// Migrated identifier of a known parent.
    #[must_use]
    pub fn migrated(&self, legacy: &str) -> Option<&str> {
        self.migrated.get(legacy).map(String::as_str)
    }

    /// Title of a known parent, looked up by legacy or migrated identifier.
    #[must_use]
    pub fn title(&self, id: &str) -> Option<&str> {
        self.titles
            .get(id)
            .or_else(|| {
                self.legacy_by_migrated
                    .get(id)
                    .and_then(|legacy| self.titles.get(legacy))
            })
            .map(String::as_str)
    }

    /// Number of known parents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.migrated.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrated.is_empty()
    }
}

fn read_pairs<R: Read>(reader: R) -> Result<Vec<(String, String)>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut pairs = Vec::new();
    for row in csv_reader.deserialize() {
        let PairRow(key, value) = row?;
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Combine the three relationship columns into one pipe-joined cell of bare
/// identifiers.
#[must_use]
pub fn combine_parent_links(record: &Record) -> String {
    join_multi(RELATIONSHIP_COLUMNS.iter().flat_map(|column| {
        split_multi(record.get(column))
            .into_iter()
            .map(|atom| atom.trim().trim_start_matches(FEDORA_URI_PREFIX))
    }))
}

/// Outcome of resolving one record's parents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentResolution {
    /// The promoted parent, empty for none
    pub parent: String,
    /// Migrated identifier of the known parent (bad batches only)
    pub member_of: String,
    /// Pipe-joined identifiers that did not fit, for the auxiliary output
    pub extra_parents: Option<String>,
}

impl ParentResolution {
    fn first_and_rest(candidates: &[&str]) -> Self {
        let (parent, rest) = match candidates.split_first() {
            Some((first, rest)) => ((*first).to_string(), rest),
            None => (String::new(), &[][..]),
        };
        ParentResolution {
            parent,
            member_of: String::new(),
            extra_parents: extras(rest),
        }
    }

    fn strip_root(mut self) -> Self {
        if self.parent == ROOT_COLLECTION {
            self.parent.clear();
        }
        self
    }
}

fn extras(rest: &[&str]) -> Option<String> {
    let joined = join_multi(rest);
    (!joined.is_empty()).then_some(joined)
}

/// Resolves a record's combined parent cell into a single parent.
#[derive(Debug, Clone, Copy)]
pub struct ParentResolver<'a> {
    known: Option<&'a KnownParentIndex>,
    policy: IntersectionPolicy,
}

impl<'a> ParentResolver<'a> {
    /// Resolver for an ordinary batch: the first candidate wins.
    #[must_use]
    pub fn ordinary() -> Self {
        ParentResolver {
            known: None,
            policy: IntersectionPolicy::default(),
        }
    }

    /// Resolver for a bad batch, disambiguating against `index`.
    #[must_use]
    pub fn for_bad_batch(index: &'a KnownParentIndex) -> Self {
        ParentResolver {
            known: Some(index),
            policy: IntersectionPolicy::default(),
        }
    }

    /// Set the policy for several intersecting known parents.
    #[must_use]
    pub fn with_policy(mut self, policy: IntersectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve a combined parent cell for the record identified by `pid`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::AmbiguousParent`] when several distinct candidates are
    /// known parents and the policy is [`IntersectionPolicy::Strict`].
    pub fn resolve(&self, pid: &str, combined: &str) -> Result<ParentResolution> {
        let candidates = split_multi(combined);
        let resolution = match self.known {
            None => ParentResolution::first_and_rest(&candidates),
            Some(index) => self.resolve_known(pid, &candidates, index)?,
        };
        Ok(resolution.strip_root())
    }

    fn resolve_known(
        &self,
        pid: &str,
        candidates: &[&str],
        index: &KnownParentIndex,
    ) -> Result<ParentResolution> {
        if let [only] = candidates {
            return Ok(match index.migrated(only) {
                Some(migrated) => ParentResolution {
                    parent: String::new(),
                    member_of: migrated.to_string(),
                    extra_parents: None,
                },
                None => ParentResolution::first_and_rest(candidates),
            });
        }

        // Distinct known identifiers, in candidate order
        let known: IndexSet<&str> = candidates
            .iter()
            .copied()
            .filter(|c| index.contains(c))
            .collect();

        let chosen = match (known.len(), self.policy) {
            (0, _) => None,
            (1, _) | (_, IntersectionPolicy::FirstMatch) => known.get_index(0).copied(),
            (_, IntersectionPolicy::Strict) => {
                return Err(MigrateError::AmbiguousParent {
                    pid: pid.to_string(),
                    candidates: known.iter().map(|c| (*c).to_string()).collect(),
                });
            },
            (_, IntersectionPolicy::Flag) => {
                tracing::warn!(pid, known = known.len(), "several known parents, flagged");
                let lead = candidates.iter().position(|c| !known.contains(c));
                let rest: Vec<&str> = candidates
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| Some(i) != lead)
                    .map(|(_, c)| *c)
                    .collect();
                return Ok(ParentResolution {
                    parent: lead.map(|i| candidates[i].to_string()).unwrap_or_default(),
                    member_of: MULTIPLE_KNOWN_PARENTS_FLAG.to_string(),
                    extra_parents: extras(&rest),
                });
            },
        };

        let Some(chosen) = chosen else {
            return Ok(ParentResolution::first_and_rest(candidates));
        };
        // Every occurrence of the chosen parent is consumed by member_of
        let remaining: Vec<&str> = candidates
            .iter()
            .copied()
            .filter(|c| *c != chosen)
            .collect();
        let mut resolution = ParentResolution::first_and_rest(&remaining);
        resolution.member_of = index.migrated(chosen).unwrap_or(chosen).to_string();
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn index() -> KnownParentIndex {
        let mut index = KnownParentIndex::new();
        index.insert_id("coll:1", "node/1");
        index.insert_id("coll:2", "node/2");
        index.insert_title("coll:1", "Oral Histories");
        index
    }

    #[test]
    fn test_combine_strips_prefix_and_joins_columns() {
        let record = Record::builder()
            .field(columns::IS_MEMBER_OF_COLLECTION, "info:fedora/coll:1")
            .field(columns::IS_CONSTITUENT_OF, "")
            .field(columns::IS_PAGE_OF, "info:fedora/book:4|info:fedora/book:5")
            .build();
        assert_eq!(combine_parent_links(&record), "coll:1|book:4|book:5");
    }

    #[test]
    fn test_combine_empty() {
        assert_eq!(combine_parent_links(&Record::new()), "");
    }

    #[test]
    fn test_ordinary_single() {
        let r = ParentResolver::ordinary().resolve("x:1", "book:4").expect("resolve");
        assert_eq!(r.parent, "book:4");
        assert_eq!(r.extra_parents, None);
    }

    #[test]
    fn test_ordinary_multiple() {
        let r = ParentResolver::ordinary()
            .resolve("x:1", "a:1|b:2|c:3")
            .expect("resolve");
        assert_eq!(r.parent, "a:1");
        assert_eq!(r.extra_parents.as_deref(), Some("b:2|c:3"));
        assert_eq!(r.member_of, "");
    }

    #[test]
    fn test_ordinary_empty() {
        let r = ParentResolver::ordinary().resolve("x:1", "").expect("resolve");
        assert_eq!(r, ParentResolution::default());
    }

    #[test]
    fn test_root_collection_collapses() {
        let r = ParentResolver::ordinary()
            .resolve("x:1", ROOT_COLLECTION)
            .expect("resolve");
        assert_eq!(r.parent, "");
    }

    #[test]
    fn test_bad_batch_one_known_among_two() {
        let index = index();
        let r = ParentResolver::for_bad_batch(&index)
            .resolve("x:1", "coll:1|book:4")
            .expect("resolve");
        assert_eq!(r.parent, "book:4");
        assert_eq!(r.member_of, "node/1");
        assert_eq!(r.extra_parents, None);
    }

    #[test]
    fn test_bad_batch_one_known_among_three() {
        let index = index();
        let r = ParentResolver::for_bad_batch(&index)
            .resolve("x:1", "book:4|coll:1|book:5")
            .expect("resolve");
        assert_eq!(r.parent, "book:4");
        assert_eq!(r.member_of, "node/1");
        assert_eq!(r.extra_parents.as_deref(), Some("book:5"));
    }

    #[test]
    fn test_bad_batch_no_known() {
        let index = index();
        let r = ParentResolver::for_bad_batch(&index)
            .resolve("x:1", "book:4|book:5")
            .expect("resolve");
        assert_eq!(r.parent, "book:4");
        assert_eq!(r.member_of, "");
        assert_eq!(r.extra_parents.as_deref(), Some("book:5"));
    }

    #[test]
    fn test_bad_batch_single_known() {
        let index = index();
        let r = ParentResolver::for_bad_batch(&index)
            .resolve("x:1", "coll:2")
            .expect("resolve");
        assert_eq!(r.parent, "");
        assert_eq!(r.member_of, "node/2");
    }

    #[test]
    fn test_bad_batch_single_unknown() {
        let index = index();
        let r = ParentResolver::for_bad_batch(&index)
            .resolve("x:1", "book:4")
            .expect("resolve");
        assert_eq!(r.parent, "book:4");
        assert_eq!(r.member_of, "");
    }

    #[test]
    fn test_several_known_flagged_by_default() {
        let index = index();
        let r = ParentResolver::for_bad_batch(&index)
            .resolve("x:1", "coll:1|coll:2|book:4")
            .expect("resolve");
        assert_eq!(r.member_of, MULTIPLE_KNOWN_PARENTS_FLAG);
        assert_eq!(r.parent, "book:4");
        assert_eq!(r.extra_parents.as_deref(), Some("coll:1|coll:2"));
    }

    #[test]
    fn test_several_known_strict() {
        let index = index();
        let err = ParentResolver::for_bad_batch(&index)
            .with_policy(IntersectionPolicy::Strict)
            .resolve("x:1", "coll:1|coll:2")
            .expect_err("should fail");
        assert!(matches!(err, MigrateError::AmbiguousParent { ref pid, .. } if pid == "x:1"));
    }

    #[test]
    fn test_several_known_first_match() {
        let index = index();
        let r = ParentResolver::for_bad_batch(&index)
            .with_policy(IntersectionPolicy::FirstMatch)
            .resolve("x:1", "book:4|coll:2|coll:1")
            .expect("resolve");
        assert_eq!(r.member_of, "node/2");
        assert_eq!(r.parent, "book:4");
        assert_eq!(r.extra_parents.as_deref(), Some("coll:1"));
    }

    #[test]
    fn test_repeated_known_parent_is_one_known() {
        let index = index();
        for policy in [
            IntersectionPolicy::Strict,
            IntersectionPolicy::Flag,
            IntersectionPolicy::FirstMatch,
        ] {
            let r = ParentResolver::for_bad_batch(&index)
                .with_policy(policy)
                .resolve("x:1", "coll:1|coll:1|book:4")
                .expect("resolve");
            assert_eq!(r.member_of, "node/1");
            assert_eq!(r.parent, "book:4");
            assert_eq!(r.extra_parents, None);
        }
    }

    #[test]
    fn test_repeated_known_parents_strict_lists_each_once() {
        let index = index();
        let err = ParentResolver::for_bad_batch(&index)
            .with_policy(IntersectionPolicy::Strict)
            .resolve("x:1", "coll:2|coll:1|coll:2")
            .expect_err("should fail");
        match err {
            MigrateError::AmbiguousParent { candidates, .. } => {
                assert_eq!(candidates, vec!["coll:2", "coll:1"]);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_all_known_flagged_leaves_parent_empty() {
        let index = index();
        let r = ParentResolver::for_bad_batch(&index)
            .resolve("x:1", "coll:1|coll:2")
            .expect("resolve");
        assert_eq!(r.member_of, MULTIPLE_KNOWN_PARENTS_FLAG);
        assert_eq!(r.parent, "");
        assert_eq!(r.extra_parents.as_deref(), Some("coll:1|coll:2"));
    }

    #[test]
    fn test_policy_parse_and_display() {
        for policy in [
            IntersectionPolicy::Strict,
            IntersectionPolicy::Flag,
            IntersectionPolicy::FirstMatch,
        ] {
            assert_eq!(policy.to_string().parse::<IntersectionPolicy>(), Ok(policy));
        }
        assert_eq!("FIRST_MATCH".parse(), Ok(IntersectionPolicy::FirstMatch));
        assert!("sometimes".parse::<IntersectionPolicy>().is_err());
    }

    #[test]
    fn test_title_by_legacy_or_migrated() {
        let index = index();
        assert_eq!(index.title("coll:1"), Some("Oral Histories"));
        assert_eq!(index.title("node/1"), Some("Oral Histories"));
        assert_eq!(index.title("coll:2"), None);
    }

    #[test]
    fn test_from_readers() {
        let ids = "pid,new_id\ncoll:1,node/1\ncoll:2,node/2\n";
        let titles = "pid,title\ncoll:1,\"Letters, 1900-1910\"\n";
        let index =
            KnownParentIndex::from_readers(ids.as_bytes(), titles.as_bytes()).expect("load");
        assert_eq!(index.len(), 2);
        assert_eq!(index.migrated("coll:2"), Some("node/2"));
        assert_eq!(index.title("coll:1"), Some("Letters, 1900-1910"));
    }

    proptest! {
        #[test]
        fn prop_ordinary_resolution_is_lossless(
            ids in proptest::collection::btree_set("[a-z]{1,4}:[0-9]{1,3}", 0..6)
        ) {
            let ids: Vec<String> = ids.into_iter().collect();
            let combined = ids.join("|");
            let r = ParentResolver::ordinary().resolve("x:1", &combined).expect("resolve");
            let mut out: Vec<String> = Vec::new();
            if !r.parent.is_empty() {
                out.push(r.parent.clone());
            }
            if let Some(extra) = &r.extra_parents {
                out.extend(extra.split('|').map(str::to_string));
            }
            prop_assert_eq!(out, ids);
        }

        #[test]
        fn prop_bad_batch_resolution_is_lossless(
            ids in proptest::collection::btree_set("[a-z]{1,4}:[0-9]{1,3}", 1..6),
            known_at in 0usize..6,
        ) {
            let ids: Vec<String> = ids.into_iter().collect();
            let mut index = KnownParentIndex::new();
            let known = known_at % ids.len();
            index.insert_id(&ids[known], &ids[known]);
            let combined = ids.join("|");
            let r = ParentResolver::for_bad_batch(&index)
                .resolve("x:1", &combined)
                .expect("resolve");
            let mut out: Vec<String> = Vec::new();
            if !r.parent.is_empty() {
                out.push(r.parent.clone());
            }
            out.push(r.member_of.clone());
            if let Some(extra) = &r.extra_parents {
                out.extend(extra.split('|').map(str::to_string));
            }
            out.sort();
            prop_assert_eq!(out, ids);
        }
    }
}
