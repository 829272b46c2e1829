//! Static controlled-vocabulary tables for the legacy export.
//!
//! Role tags have the shape `<scheme>:<code>:<entity type>`; `relators:` codes
//! come from the MARC relator list, `local:` codes were minted for roles the
//! list lacks. Column names are reproduced exactly as the export spells them,
//! misspellings included.

/// Name columns carrying a single role.
pub const RELATORS: &[(&str, &str)] = &[
    ("mods_name_corporate_printer_namePart_ms", "relators:prt:corporate_body"),
    ("mods_name_collector_namePart_ms", "relators:col:person"),
    ("mods_name_corporate_participant_namePart_ms", "local:par:corporate_body"),
    ("mods_name_personal_interviewer_namePart_ms", "relators:ivr:person"),
    ("mods_name_personal_c_namePart_ms", "relators:cre:person"),
    ("mods_name_consultant_namePart_ms", "relators:csl:person"),
    ("mods_name_personal_grantee_namePart_ms", "local:grn:person"),
    ("mods_name_personal_singer_namePart_ms", "relators:sng:person"),
    ("mods_name_corporate_creator_namePart_ms", "relators:cre:corporate_body"),
    ("mods_name_personal_speaker_namePart_ms", "relators:spk:person"),
    ("mods_name_corporate_depositor_namePart_ms", "relators:dpt:corporate_body"),
    ("mods_name_personal_researcher_namePart_ms", "relators:res:person"),
    ("mods_name_personal_uploader_namePart_ms", "local:upl:person"),
    ("mods_name_corporate_transcriber_namePart_ms", "relators:trc:corporate_body"),
    ("mods_name_personal_illustrator_namePart_ms", "relators:ill:person"),
    ("mods_name_corporate_interpreter_namePart_ms", "local:ipt:corporate_body"),
    ("mods_name_corporate_moderator_namePart_ms", "relators:mod:corporate_body"),
    ("mods_name_personal_correspondent_namePart_ms", "relators:crp:person"),
    ("mods_name_personal_compiler_namePart_ms", "relators:com:person"),
    ("mods_name_personal_grantor_namePart_ms", "local:gro:person"),
    ("mods_name_author_namePart_ms", "relators:aut:person"),
    ("mods_name_corporate_researcher_namePart_ms", "relators:res:corporate_body"),
    ("mods_name_personal_artist_namePart_ms", "relators:art:person"),
    ("mods_name_corporate_singer_namePart_ms", "relators:sng:corporate_body"),
    ("mods_name_corporate_interviewer_namePart_ms", "relators:ivr:corporate_body"),
    ("mods_name_corporate_recipient_namePart_ms", "relators:rcp:corporate_body"),
    ("mods_name_corporate_performer_namePart_ms", "relators:prf:corporate_body"),
    ("mods_name_corporate_recorder_namePart_ms", "relators:rcd:corporate_body"),
    ("mods_name_personal_consultnat_namePart_ms", "relators:csl:corporate_body"),
    ("mods_name_personal_composer_namePart_ms", "relators:cmp:person"),
    ("mods_name_personal_collector_namePart_ms", "relators:col:person"),
    ("mods_name_corporate_developer_namePart_ms", "local:dev:corporate_body"),
    ("mods_name_personal_depicted_namePart_ms", "relators:dpc:person"),
    ("mods_name_personal_printmaker_namePart_ms", "relators:prm:person"),
    ("mods_name_personal_printer_namePart_ms", "relators:prt:person"),
    ("mods_name_personal_participant_namePart_ms", "local:par:person"),
    ("mods_name_family_creator_namePart_ms", "relators:cre:family"),
    ("mods_name_personal_annotator_namePart_ms", "relators:ann:person"),
    ("mods_name_corporate_author_namePart_ms", "relators:aut:corporate_body"),
    ("mods_name_contributor_namePart_ms", "relators:ctb:person"),
    ("mods_name_personal_recipient_namePart_ms", "relators:rcp:person"),
    ("mods_name_personal_performer_namePart_ms", "relators:prf:person"),
    ("mods_name__cartographer_namePart_ms", "relators:ctg:person"),
    ("mods_name_personal_consultant_namePart_ms", "relators:csl:person"),
    ("mods_name_corporate_publisher_namePart_ms", "relators:pbl:corporate_body"),
    ("mods_name_recorder_namePart_ms", "relators:rcd:person"),
    ("mods_name_personal_creator_namePart_ms", "relators:cre:person"),
    ("mods_name_personal_seller_namePart_ms", "relators:sll:person"),
    ("mods_name_personal_buyer_namePart_ms", "local:buy:person"),
    ("mods_name_personal_contributor_namePart_ms", "relators:ctb:person"),
    ("mods_name_personal_publisher_namePart_ms", "relators:pbl:person"),
    ("mods_name_personal_producer_namePart_ms", "relators:rpc:person"),
    ("mods_name_personal_originator_namePart_ms", "relators:org:person"),
    ("mods_name_personal_surveyor_namePart_ms", "relators:srv:person"),
    ("mods_name_personal_data_contributor_namePart_ms", "relators:dtc:person"),
    ("mods_name_corporate_consultant_namePart_ms", "relators:csl:corporate_body"),
    ("mods_name_personal_source_namePart_ms", "local:src:person"),
    ("mods_name_personal_photographer_namePart_ms", "relators:pht:person"),
    ("mods_name_corporate_translator_namePart_ms", "relators:trl:corporate_body"),
    ("mods_name_creator_namePart_ms", "relators:cre:person"),
    ("mods_name_personal_cartographer_namePart_ms", "relators:ctg:person"),
    ("mods_name_personal_translator_namePart_ms", "relators:trl:person"),
    ("mods_name_personal_spaker_namePart_ms", "relators:spk:person"),
    ("mods_name_personal_depositor_namePart_ms", "relators:dpt:person"),
    ("mods_name_corporate_responder_namePart_ms", "relators:rsp:corporate_body"),
    ("mods_name_corporate_contributor_namePart_ms", "relators:ctb:corporate_body"),
    ("mods_name_corporate_speaker_namePart_ms", "relators:spk:person"),
    ("mods_name_personal_contributer_namePart_ms", "relators:ctb:person"),
    ("mods_name_corporate_collector_namePart_ms", "relators:col:corporate_body"),
    ("mods_name_corporate_speaker_affiliation_ms", "local:aff:corporate_body"),
    ("mods_name_personal_interpreter_namePart_ms", "local:ipt:person"),
    ("mods_name_personal_author_namePart_ms", "relators:aut:person"),
    ("mods_name_personal_engraver_namePart_ms", "relators:egr:person"),
    ("mods_name_personal_creater_namePart_ms", "relators:cre:person"),
    ("mods_name_personal_recorder_namePart_ms", "relators:rcd:person"),
    ("mods_name_researcher_namePart_ms", "relators:res:person"),
    ("mods_name_personal_transcriber_namePart_ms", "relators:trc:person"),
];

/// Name columns whose agents hold two roles at once.
pub const DUAL_RELATORS: &[(&str, (&str, &str))] = &[
    (
        "mods_name_personal_researcher_role_ms",
        ("relators:col:person", "relators:res:person"),
    ),
    (
        "mods_name_personal_contributor_compiler_namePart_ms",
        ("relators:com:person", "relators:ctb:person"),
    ),
    (
        "mods_name_corporate_stationer_and_printer_namePart_ms",
        ("relators:prt:corporate_body", "local:sta:corporate_body"),
    ),
];

/// Subject name columns and the entity type of their values.
pub const SUBJECTS: &[(&str, &str)] = &[
    ("mods_subject_name_family_namePart_ms", "family"),
    ("mods_subject_name_corporate_namePart_ms", "corporate_body"),
    ("mods_subject_name_personal_namePart_ms", "person"),
];

/// Legacy content model -> model label.
pub const MODELS: &[(&str, &str)] = &[
    ("bookCModel", "Paged Content"),
    ("collectionCModel", "Collection"),
    ("pageCModel", "Page"),
    ("sp_large_image_cmodel", "Image"),
    ("compoundCModel", "Compound Object"),
    ("sp_videoCModel", "Video"),
    ("sp_pdf", "Digital Document"),
    ("sp_strict_pdf", "Digital Document"),
    ("manuscriptCModel", "Manuscript"),
    ("manuscriptPageCModel", "Page"),
    ("sp-audioCModel", "Audio"),
    ("binaryObjectCModel", "Binary"),
];

/// Model label -> resource type label.
pub const RESOURCE_TYPES: &[(&str, &str)] = &[
    ("Paged Content", "Collection"),
    ("Collection", "Collection"),
    ("Page", "Text"),
    ("Image", "Still Image"),
    ("Compound Object", "Collection"),
    ("Video", "Moving Image"),
    ("Digital Document", "Text"),
    ("Manuscript", "Collection"),
    ("Manuscript Page", "Text"),
    ("Audio", "Sound"),
    ("Binary", "Text"),
];

/// Model label -> viewer display hint. Most models have none.
pub const DISPLAY_HINTS: &[(&str, &str)] = &[
    ("Image", "Open Seadragon"),
    ("Page", "Open Seadragon"),
    ("Digital Document", "PDFjs"),
];

/// Batches whose parent linkage overlaps the known-parent index.
pub const BAD_BATCHES: &[&str] = &[
    "batch-8.csv",
    "batch-9.csv",
    "batch-10.csv",
    "batch-11.csv",
    "batch-12.csv",
    "batch-14.csv",
];
