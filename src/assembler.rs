//! The Record Assembler: turns one loaded batch into migrated records.
//!
//! Assembly runs in two passes. The first pass is per record and needs
//! nothing but the record itself and the run's immutable lookups: cell
//! normalization and tagging, `id`/`weight`/`people`, parent resolution and
//! identifier extraction. Title backfill needs to see the whole batch, so a
//! title index is built between the passes; the second pass then finishes
//! each record against it.
//!
//! Every stage is a plain function that takes a [`Record`] by value and hands
//! back the transformed record, so the order of stages in
//! [`Assembler::assemble`] is the only ordering there is.
//!
//! # Examples
//!
//! ```
//! use diglib_migrate::assembler::Assembler;
//! use diglib_migrate::config::MigrationConfig;
//! use diglib_migrate::parent::KnownParentIndex;
//! use diglib_migrate::vocabulary::Vocabulary;
//! use diglib_migrate::{Batch, Record};
//!
//! let vocabulary = Vocabulary::standard();
//! let known = KnownParentIndex::new();
//! let config = MigrationConfig::default();
//! let assembler = Assembler::new(&vocabulary, &known, &config);
//!
//! let record = Record::builder()
//!     .field("PID", "audio:7")
//!     .field("mods_originInfo_dateIssued_ss", "March 5, 1920")
//!     .build();
//! let batch = Batch::new("batch-3.csv", vec![], vec![record]);
//!
//! let migrated = assembler.assemble(&batch)?;
//! assert_eq!(migrated.records[0].get("mods_originInfo_dateIssued_ss"), "1920-03-05");
//! assert_eq!(migrated.records[0].get("alias"), "/islandora/object/audio:7");
//! # Ok::<(), diglib_migrate::MigrateError>(())
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::cell::{
    join_multi, normalize_quotes, split_multi, unescape_delimiters, DELIMITER, DELIMITER_STR,
};
use crate::columns;
use crate::config::MigrationConfig;
use crate::date::normalize_date;
use crate::error::{MigrateError, Result};
use crate::identifiers;
use crate::parent::{combine_parent_links, KnownParentIndex, ParentResolver, FEDORA_URI_PREFIX};
use crate::record::{Batch, BatchKind, Record};
use crate::validation::{flag, flag_invalid_urls, gate_lenient, gate_strict};
use crate::vocabulary::{parenthesize, Vocabulary};

/// Genre display label routing a value to the discourse-type column.
pub const OLAC_DISCOURSE_LABEL: &str = "OLAC Discourse Type";
/// Genre display label routing a value to the linguistic-type column.
pub const OLAC_LINGUISTIC_LABEL: &str = "OLAC Linguistic Type";
/// Written to the discourse-type column for an unrecognized OLAC label.
pub const OLAC_BAD_DATA_FLAG: &str = "@Bad data in OLAC column. Manual review.";
/// Written to the discourse-type column when labels and values differ in count.
pub const OLAC_MISMATCH_FLAG: &str = "@Data does not match. Manual review";
/// Access-control label for objects restricted to a user or role.
pub const RESTRICTED_AUDIO: &str = "Restricted Audio";

const LEGACY_MODEL_PREFIX: &str = "info:fedora/islandora:";
const PAGE_SEPARATOR: &str = " , Page ";

/// One row of the extra-parents output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraParents {
    /// Record the parents belong to
    pub pid: String,
    /// Pipe-joined parent identifiers beyond the promoted one
    pub parents: String,
}

/// A fully assembled batch.
#[derive(Debug, Clone)]
pub struct AssembledBatch {
    /// File name of the source batch
    pub name: String,
    /// Migrated records, in source order, still carrying every column
    pub records: Vec<Record>,
    /// Parents that did not fit the single-parent model
    pub extra_parents: Vec<ExtraParents>,
}

impl AssembledBatch {
    /// Records projected onto the output schema, in output column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records
            .iter()
            .map(|record| record.project(columns::OUTPUT_COLUMNS))
    }
}

/// Assembles batches against one run's vocabulary, known parents and
/// configuration.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    vocabulary: &'a Vocabulary,
    known_parents: &'a KnownParentIndex,
    config: &'a MigrationConfig,
}

impl<'a> Assembler<'a> {
    /// Create an assembler.
    #[must_use]
    pub fn new(
        vocabulary: &'a Vocabulary,
        known_parents: &'a KnownParentIndex,
        config: &'a MigrationConfig,
    ) -> Self {
        Assembler {
            vocabulary,
            known_parents,
            config,
        }
    }

    /// Migrate every record of a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch name carries no batch number, if a
    /// record's input `member_of` conflicts with the resolved one, or if
    /// parent resolution fails under [`crate::parent::IntersectionPolicy::Strict`].
    pub fn assemble(&self, batch: &Batch) -> Result<AssembledBatch> {
        let kind = self.vocabulary.batch_kind(&batch.name);
        let batch_number = batch.number()?;
        let resolver = match kind {
            BatchKind::Ordinary => ParentResolver::ordinary(),
            BatchKind::Bad => ParentResolver::for_bad_batch(self.known_parents),
        }
        .with_policy(self.config.intersection_policy);
        tracing::debug!(batch = %batch.name, ?kind, records = batch.len(), "assembling batch");

        let mut extra_parents = Vec::new();
        let mut records = Vec::with_capacity(batch.len());
        for source in &batch.records {
            let record = self.normalize_cells(source);
            let record = derive_agents(record, self.vocabulary);
            let (record, extra) = resolve_parents(record, &resolver, kind)?;
            if let Some(parents) = extra {
                extra_parents.push(ExtraParents {
                    pid: record.pid().to_string(),
                    parents,
                });
            }
            records.push(extract_identifiers(record));
        }

        let titles = TitleSource::for_batch(kind, &records, self.known_parents);
        let records = records
            .into_iter()
            .map(|record| self.finish(record, &titles, batch_number))
            .collect();

        Ok(AssembledBatch {
            name: batch.name.clone(),
            records,
            extra_parents,
        })
    }

    /// Normalize and tag every cell of a record.
    ///
    /// Date columns are normalized from the raw cell: a comma in
    /// `March 5, 1920` is not a delimiter.
    #[must_use]
    pub fn normalize_cells(&self, record: &Record) -> Record {
        let mut out = Record::new();
        for (column, raw) in record.iter() {
            let cell = match column {
                columns::DATE_ISSUED | columns::DATE_CREATED => normalize_date(raw),
                columns::ABSTRACT => normalize_quotes(&unescape_delimiters(raw)),
                columns::LANGUAGE_CODE => parenthesize(&unescape_delimiters(raw)),
                _ => {
                    let cell = unescape_delimiters(raw);
                    match self.vocabulary.route(column) {
                        Some(tag) => tag.apply(&cell),
                        None => cell,
                    }
                },
            };
            out.set(column, cell);
        }
        out
    }

    fn finish(&self, record: Record, titles: &TitleSource<'_>, batch_number: &str) -> Record {
        let record = backfill_title(record, titles);
        let record = reconcile_related_materials(record);
        let record = split_genre(record);
        let record = backfill_call_number(record);
        let record = assemble_language(record);
        let record = derive_paths(record, &self.config.media_root, batch_number);
        let record = derive_alias(record, &self.config.alias_prefix);
        let record = map_model(record, self.vocabulary);
        let record = flag_access(record);
        let record = gate_dates(record);
        let record = coalesce(record);
        validate_urls(record)
    }
}

fn derive_agents(mut record: Record, vocabulary: &Vocabulary) -> Record {
    let id = record.pid().to_string();
    let weight = record.get(columns::SEQUENCE_NUMBER).to_string();
    let people = join_multi(vocabulary.agent_columns().map(|c| record.get(c)));
    let subjects = join_multi(vocabulary.subject_columns().map(|c| record.get(c)));
    record.set(columns::ID, id);
    record.set(columns::WEIGHT, weight);
    record.set(columns::PEOPLE, people);
    record.set(columns::SUBJECT_PERSONAL, subjects);
    record
}

fn resolve_parents(
    mut record: Record,
    resolver: &ParentResolver<'_>,
    kind: BatchKind,
) -> Result<(Record, Option<String>)> {
    let combined = combine_parent_links(&record);
    let resolution = resolver.resolve(record.pid(), &combined)?;
    record.set(columns::PARENT, resolution.parent);

    if kind.is_bad() {
        let existing = record.get(columns::MEMBER_OF);
        if !existing.is_empty()
            && !resolution.member_of.is_empty()
            && existing != resolution.member_of
        {
            return Err(MigrateError::UnexpectedValue {
                column: columns::MEMBER_OF.to_string(),
                pid: record.pid().to_string(),
                value: existing.to_string(),
            });
        }
        record.set_if_blank(columns::MEMBER_OF, resolution.member_of);
    }
    Ok((record, resolution.extra_parents))
}

fn extract_identifiers(mut record: Record) -> Record {
    let ids = identifiers::extract(
        record.get(columns::DC_IDENTIFIER),
        record.get(columns::IDENTIFIER_LOCAL),
    );
    if !ids.recording_number.is_empty() {
        record.set(columns::RECORDING_NUMBER, ids.recording_number);
    }
    if !ids.program_number.is_empty() {
        record.set(columns::PROGRAM_NUMBER, ids.program_number);
    }
    record.set(columns::IDENTIFIER_LOCAL, ids.local);
    record
}

/// Where untitled records find their parent's title.
enum TitleSource<'a> {
    /// PID -> title of the records in the batch that carry one
    InBatch(HashMap<String, String>),
    /// Titles of collections migrated ahead of a bad batch
    Known(&'a KnownParentIndex),
}

impl<'a> TitleSource<'a> {
    fn for_batch(kind: BatchKind, records: &[Record], known: &'a KnownParentIndex) -> Self {
        match kind {
            BatchKind::Bad => TitleSource::Known(known),
            BatchKind::Ordinary => TitleSource::InBatch(
                records
                    .iter()
                    .filter(|r| !r.is_blank(columns::TITLE))
                    .map(|r| (r.pid().to_string(), r.get(columns::TITLE).to_string()))
                    .collect(),
            ),
        }
    }

    fn lookup(&self, record: &Record) -> Option<&str> {
        match self {
            TitleSource::InBatch(titles) => record
                .value(columns::PARENT)
                .and_then(|parent| titles.get(parent))
                .map(String::as_str),
            TitleSource::Known(index) => record
                .value(columns::PARENT)
                .or_else(|| record.value(columns::MEMBER_OF))
                .and_then(|key| index.title(key)),
        }
    }
}

fn backfill_title(mut record: Record, titles: &TitleSource<'_>) -> Record {
    if !record.is_blank(columns::TITLE) {
        return record;
    }
    let Some(parent_title) = titles.lookup(&record) else {
        return record;
    };
    let title = match record.value(columns::WEIGHT) {
        Some(weight) => format!("{parent_title}{PAGE_SEPARATOR}{weight}"),
        None => parent_title.to_string(),
    };
    record.set(columns::TITLE, title);
    record
}

fn reconcile_related_materials(mut record: Record) -> Record {
    let title = record.get(columns::RELATED_TITLE).to_string();
    let label = record.get(columns::RELATED_DISPLAY_LABEL);
    if label == title {
        return record;
    }
    if label.is_empty() {
        record.set(columns::RELATED_DISPLAY_LABEL, title.clone());
    }
    record.set(columns::RELATED_MATERIALS, title);
    record
}

/// Split parallel OLAC label and value cells into discourse-type and
/// linguistic-type cells.
///
/// Labels and values are paired by position, so both cells must hold the
/// same number of atoms; otherwise the discourse type carries
/// [`OLAC_MISMATCH_FLAG`]. A label other than the two OLAC labels puts
/// [`OLAC_BAD_DATA_FLAG`] in the discourse type. Empty values keep their
/// position in the output.
///
/// # Examples
///
/// ```
/// use diglib_migrate::assembler::split_olac;
///
/// let (discourse, linguistic) =
///     split_olac("OLAC Discourse Type|OLAC Linguistic Type", "narrative|dialogue");
/// assert_eq!(discourse, "narrative");
/// assert_eq!(linguistic, "dialogue");
/// ```
#[must_use]
pub fn split_olac(labels: &str, values: &str) -> (String, String) {
    let labels: Vec<&str> = labels.split(DELIMITER).collect();
    let values: Vec<&str> = values.split(DELIMITER).collect();
    if labels.len() != values.len() {
        tracing::warn!(
            labels = labels.len(),
            values = values.len(),
            "OLAC labels and values differ in count"
        );
        return (OLAC_MISMATCH_FLAG.to_string(), String::new());
    }

    let mut discourse = Vec::new();
    let mut linguistic = Vec::new();
    for (label, value) in labels.into_iter().zip(values) {
        match label {
            OLAC_DISCOURSE_LABEL => discourse.push(value),
            OLAC_LINGUISTIC_LABEL => linguistic.push(value),
            other => {
                tracing::warn!(label = other, "unrecognized OLAC label");
                discourse.push(OLAC_BAD_DATA_FLAG);
            },
        }
    }
    (discourse.join(DELIMITER_STR), linguistic.join(DELIMITER_STR))
}

fn split_genre(mut record: Record) -> Record {
    let labels = record.get(columns::GENRE_DISPLAY_LABEL);
    if labels.is_empty() {
        let genre = record.get(columns::GENRE_CONTENT).to_string();
        record.set(columns::GENRE, genre);
        return record;
    }
    let (discourse, linguistic) = split_olac(labels, record.get(columns::GENRE_CONTENT));
    record.set(columns::OLAC_DISCOURSE_TYPE, discourse);
    record.set(columns::OLAC_LINGUISTIC_TYPE, linguistic);
    record
}

fn backfill_call_number(mut record: Record) -> Record {
    let identifier = record.get(columns::RELATED_IDENTIFIER).to_string();
    record.set_if_blank(columns::PARENT_COLLECTION_IDENTIFIER, identifier);
    record
}

/// Pair language names with their (already parenthesized) codes.
///
/// Pairs are formed by position and stop at the shorter list. When only one
/// of the two cells has a value it is kept behind the review flag.
///
/// # Examples
///
/// ```
/// use diglib_migrate::assembler::zip_languages;
///
/// assert_eq!(zip_languages("English|French", "(eng)|(fre)"), "English (eng)|French (fre)");
/// assert_eq!(zip_languages("", "(eng)"), "@(eng)");
/// assert_eq!(zip_languages("", ""), "");
/// ```
#[must_use]
pub fn zip_languages(text: &str, codes: &str) -> String {
    match (text.is_empty(), codes.is_empty()) {
        (true, true) => String::new(),
        (false, true) => flag(text),
        (true, false) => flag(codes),
        (false, false) => {
            let names = split_multi(text);
            let codes = split_multi(codes);
            if names.len() != codes.len() {
                tracing::warn!(
                    names = names.len(),
                    codes = codes.len(),
                    "language names and codes differ in count"
                );
            }
            join_multi(
                names
                    .iter()
                    .zip(&codes)
                    .map(|(name, code)| format!("{name} {code}")),
            )
        },
    }
}

fn assemble_language(mut record: Record) -> Record {
    let languages = zip_languages(
        record.get(columns::LANGUAGE_TEXT),
        record.get(columns::LANGUAGE_CODE),
    );
    record.set(columns::LANGUAGE_TEXT, languages);
    record
}

fn derive_paths(mut record: Record, media_root: &str, batch_number: &str) -> Record {
    let stem = format!(
        "{}/batch{batch_number}/{}",
        media_root.trim_end_matches('/'),
        record.pid().replace(':', "_")
    );
    if !record.is_blank(columns::DATASTREAM_OBJ) {
        record.set(columns::FILE, format!("{stem}_OBJ.tiff"));
    } else if !record.is_blank(columns::DATASTREAM_JP2) {
        record.set(columns::FILE, format!("{stem}_JP2.jp2"));
    }
    if !record.is_blank(columns::DATASTREAM_TEI) {
        record.set(columns::TEI, format!("{stem}_TEI.xml"));
    }
    record
}

fn derive_alias(mut record: Record, prefix: &str) -> Record {
    let alias = format!("{prefix}{}", record.pid());
    record.set(columns::ALIAS, alias);
    record
}

fn map_model(mut record: Record, vocabulary: &Vocabulary) -> Record {
    let has_model = record.get(columns::HAS_MODEL);
    let model = vocabulary
        .model(&has_model.replace(LEGACY_MODEL_PREFIX, ""))
        .unwrap_or_default()
        .to_string();
    let resource_type = vocabulary.resource_type(&model).unwrap_or_default().to_string();
    let display_hint = vocabulary.display_hint(&model).unwrap_or_default().to_string();
    let legacy_model = has_model.replace(FEDORA_URI_PREFIX, "");
    record.set(columns::MODEL, model);
    record.set(columns::RESOURCE_TYPE, resource_type);
    record.set(columns::DISPLAY_HINT, display_hint);
    record.set(columns::HAS_MODEL, legacy_model);
    record
}

fn flag_access(mut record: Record) -> Record {
    if !record.is_blank(columns::VIEWABLE_BY_USER) || !record.is_blank(columns::VIEWABLE_BY_ROLE) {
        record.set(columns::ACCESS_CONTROL, RESTRICTED_AUDIO);
    }
    record
}

fn gate_dates(mut record: Record) -> Record {
    let issued = gate_strict(record.get(columns::DATE_ISSUED));
    if let Some(fallback) = issued.fallback {
        tracing::warn!(pid = record.pid(), date = %fallback, "date issued is not valid EDTF");
        record.set(columns::DATE_CREATED_TEXT, fallback);
    }
    record.set(columns::DATE_ISSUED, issued.canonical);

    let composite = join_multi([
        record.get(columns::DATE_MODIFIED),
        record.get(columns::DATE_CAPTURED),
        record.get(columns::DATE_CREATED),
    ]);
    let gated = gate_lenient(&composite);
    if gated != composite {
        tracing::warn!(pid = record.pid(), date = %composite, "date captured is not valid EDTF");
    }
    record.set(columns::DATE_CAPTURED, gated);
    record
}

fn coalesce(mut record: Record) -> Record {
    let groups: [(&str, &[&str]); 3] = [
        (
            columns::PLACE,
            &[columns::PLACE, columns::ORIGIN_PLACE_TERM, columns::ORIGIN_PLACE],
        ),
        (
            columns::CONFERENCE_PERSONAL,
            &[
                columns::CONFERENCE_PERSONAL,
                columns::CONFERENCE,
                columns::CONFERENCE_CORPORATE,
            ],
        ),
        (columns::NOTE, &[columns::NOTE, columns::NOTE_I]),
    ];
    for (target, sources) in groups {
        let joined = join_multi(sources.iter().map(|c| record.get(c)));
        record.set(target, joined);
    }
    record
}

fn validate_urls(mut record: Record) -> Record {
    let urls = flag_invalid_urls(record.get(columns::RELATED_URL));
    record.set(columns::RELATED_URL, urls);
    record
}
