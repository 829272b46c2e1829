//! Column names read and written by the pipeline.
//!
//! Input columns follow the flattened MODS/RELS naming of the legacy export
//! (`mods_<element>_..._ms` for multivalued fields, `_ss` for single-valued).
//! Derived columns use short lower-case names.

/// Persistent identifier of the object.
pub const PID: &str = "PID";
/// Copy of the identifier in the target schema.
pub const ID: &str = "id";
/// Ordering of a child within its parent.
pub const WEIGHT: &str = "weight";
/// Legacy sequence number literal.
pub const SEQUENCE_NUMBER: &str = "RELS_EXT_isSequenceNumber_literal_ms";
/// Union of all role-tagged agents.
pub const PEOPLE: &str = "people";
/// Primary parent identifier.
pub const PARENT: &str = "parent";
/// Known collection membership (bad batches only).
pub const MEMBER_OF: &str = "member_of";

/// Relationship column: member of collection.
pub const IS_MEMBER_OF_COLLECTION: &str = "RELS_EXT_isMemberOfCollection_uri_ms";
/// Relationship column: constituent of a compound object.
pub const IS_CONSTITUENT_OF: &str = "RELS_EXT_isConstituentOf_uri_ms";
/// Relationship column: page of a paged object.
pub const IS_PAGE_OF: &str = "RELS_EXT_isPageOf_uri_ms";

/// Composite legacy identifier column.
pub const DC_IDENTIFIER: &str = "dc.identifier";
/// Legacy local identifiers.
pub const IDENTIFIER_LOCAL: &str = "mods_identifier_local_ms";
/// Recording number extracted from `dc.identifier`.
pub const RECORDING_NUMBER: &str = "recording_number";
/// Program number extracted from `dc.identifier`.
pub const PROGRAM_NUMBER: &str = "program_number";

/// Main title.
pub const TITLE: &str = "mods_titleInfo_title_ms";
/// Related item title.
pub const RELATED_TITLE: &str = "mods_relatedItem_titleInfo_title_ms";
/// Related item display label (parent collection).
pub const RELATED_DISPLAY_LABEL: &str = "mods_relatedItem_displayLabel_parentCollection_ms";
/// Related materials output.
pub const RELATED_MATERIALS: &str = "related_materials";
/// Parent collection call number.
pub const PARENT_COLLECTION_IDENTIFIER: &str =
    "mods_relatedItem_displayLabel_parentCollectionIdentifier_ms";
/// Related item identifier, fallback for the call number.
pub const RELATED_IDENTIFIER: &str = "mods_relatedItem_identifier_ms";
/// Related collection URL.
pub const RELATED_URL: &str = "mods_relatedItem_location_url_ms";

/// Genre display label (carries the OLAC type names).
pub const GENRE_DISPLAY_LABEL: &str = "mods_genre_displayLabel_ms";
/// Genre content.
pub const GENRE_CONTENT: &str = "mods_genre_ms";
/// Plain genre output.
pub const GENRE: &str = "genre";
/// OLAC discourse type output.
pub const OLAC_DISCOURSE_TYPE: &str = "olac_discourse_type";
/// OLAC linguistic type output.
pub const OLAC_LINGUISTIC_TYPE: &str = "olac_linguistic_type";

/// Language names; receives the assembled `"<text> (<code>)"` pairs.
pub const LANGUAGE_TEXT: &str = "mods_language_languageTerm_text_ms";
/// Language codes.
pub const LANGUAGE_CODE: &str = "mods_language_languageTerm_code_ms";

/// Abstract / description.
pub const ABSTRACT: &str = "mods_abstract_ms";

/// Primary binary datastream identifier.
pub const DATASTREAM_OBJ: &str = "fedora_datastream_info_OBJ_ID_ms";
/// Image derivative datastream identifier.
pub const DATASTREAM_JP2: &str = "fedora_datastream_info_JP2_ID_ms";
/// Transcription datastream identifier.
pub const DATASTREAM_TEI: &str = "fedora_datastream_info_TEI_ID_ms";
/// Derived media file path.
pub const FILE: &str = "file";
/// Derived transcription path.
pub const TEI: &str = "tei";
/// Legacy URL alias.
pub const ALIAS: &str = "alias";

/// Legacy content model URI.
pub const HAS_MODEL: &str = "RELS_EXT_hasModel_uri_s";
/// Human-readable model label.
pub const MODEL: &str = "model";
/// Resource type label.
pub const RESOURCE_TYPE: &str = "resource_type";
/// Viewer display hint.
pub const DISPLAY_HINT: &str = "display_hint";

/// Restriction indicator: viewable by user.
pub const VIEWABLE_BY_USER: &str = "RELS_INT_isViewableByUser_literal_ms";
/// Restriction indicator: viewable by role.
pub const VIEWABLE_BY_ROLE: &str = "RELS_INT_isViewableByRole_literal_ms";
/// Access-control label output.
pub const ACCESS_CONTROL: &str = "access_control";

/// Issued date, canonical EDTF column.
pub const DATE_ISSUED: &str = "mods_originInfo_dateIssued_ss";
/// Free-text fallback for dates that fail validation.
pub const DATE_CREATED_TEXT: &str = "date_created_text";
/// Capture date; receives the modified/captured/created composite.
pub const DATE_CAPTURED: &str = "mods_originInfo_dateCaptured_ss";
/// Modification date.
pub const DATE_MODIFIED: &str = "mods_originInfo_dateModified_ss";
/// Creation date.
pub const DATE_CREATED: &str = "mods_originInfo_dateCreated_ss";

/// Place term; receives the coalesced places.
pub const PLACE: &str = "mods_place_placeTerm_text_ms";
/// Alternate place term.
pub const ORIGIN_PLACE_TERM: &str = "mods_originInfo_place_placeTerm_text_ms";
/// Alternate place.
pub const ORIGIN_PLACE: &str = "mods_originInfo_place_ms";

/// Conference name; receives the coalesced conference names.
pub const CONFERENCE_PERSONAL: &str = "mods_name_personal_conference_namePart_ms";
/// Alternate conference name.
pub const CONFERENCE: &str = "mods_name_conference_namePart_ms";
/// Alternate corporate conference name.
pub const CONFERENCE_CORPORATE: &str = "mods_name_corporate_conference_namePart_ms";

/// Note; receives the coalesced notes.
pub const NOTE: &str = "mods_note_ms";
/// Alternate note.
pub const NOTE_I: &str = "mods_note_i_ms";

/// Personal subject column; receives the union of all subject-type columns.
pub const SUBJECT_PERSONAL: &str = "mods_subject_name_personal_namePart_ms";

/// Output column that is written under [`NOTES_RENAMED`].
pub const NOTES: &str = "notes";
/// Header the target schema expects in place of [`NOTES`]. The umlaut is
/// part of the contract and must not be normalized away.
pub const NOTES_RENAMED: &str = "n\u{f6}tes";

/// Fixed output schema, in order, before the [`NOTES`] rename.
pub const OUTPUT_COLUMNS: &[&str] = &[
    NOTES,
    ID,
    PID,
    PARENT,
    WEIGHT,
    PEOPLE,
    IDENTIFIER_LOCAL,
    RECORDING_NUMBER,
    PROGRAM_NUMBER,
    "mods_titleInfo_subTitle_ms",
    "mods_subject_authority_olac_topic_ms",
    TITLE,
    "fgs_label_ms",
    "title",
    "mods_accessCondition_restriction_on_access_ms",
    RELATED_MATERIALS,
    "mods_classification_ms",
    PLACE,
    SUBJECT_PERSONAL,
    "mods_physicalDescription_extent_ms",
    "mods_originInfo_publisher_ms",
    "mods_name_personal_speaker_affiliation_ms",
    CONFERENCE_PERSONAL,
    OLAC_DISCOURSE_TYPE,
    OLAC_LINGUISTIC_TYPE,
    GENRE,
    "mods_subject_authority_lcsh_topic_ms",
    ABSTRACT,
    PARENT_COLLECTION_IDENTIFIER,
    LANGUAGE_TEXT,
    "mods_physicalDescription_form_authority_marcsmd_ms",
    DATE_CAPTURED,
    "mods_physicalDescription_note_ms",
    "mods_name_family_namePart_ms",
    "mods_subject_authority_local_cnair_topic_ms",
    "mods_physicalDescription_digitalOrigin_ms",
    "mods_relatedItem_note_ms",
    NOTE,
    "mods_physicalDescription_reformattingQuality_ms",
    "mods_typeOfResource_ms",
    RESOURCE_TYPE,
    "mods_subject_geographic_ms",
    "mods_tableOfContents_ms",
    "mods_note_bioghist_ms",
    "mods_subject_displayLabel_ms",
    RELATED_DISPLAY_LABEL,
    "mods_titleInfo_alternative_title_ms",
    "mods_subject_temporal_ms",
    "mods_accessCondition_use_and_reproduction_displayLabel_ms",
    DATE_ISSUED,
    DATE_CREATED_TEXT,
    "mods_subject_cartographics_coordinates_ms",
    "mods_subject_authority_local_topic_ms",
    "mods_relatedItem_identifier_uri_ms",
    RELATED_URL,
    "date_modified",
    "mods_physicalDescription_form_authority_marcform_ms",
    DATASTREAM_OBJ,
    DATASTREAM_TEI,
    DATASTREAM_JP2,
    HAS_MODEL,
    MODEL,
    IS_MEMBER_OF_COLLECTION,
    IS_CONSTITUENT_OF,
    IS_PAGE_OF,
    SEQUENCE_NUMBER,
    VIEWABLE_BY_USER,
    VIEWABLE_BY_ROLE,
    ACCESS_CONTROL,
    MEMBER_OF,
    FILE,
    TEI,
    DISPLAY_HINT,
    ALIAS,
];

/// Header name written for an output column.
#[must_use]
pub fn output_header(column: &str) -> &str {
    if column == NOTES {
        NOTES_RENAMED
    } else {
        column
    }
}

/// The full output header row, with the rename applied.
#[must_use]
pub fn output_headers() -> Vec<&'static str> {
    OUTPUT_COLUMNS.iter().copied().map(output_header).collect()
}
