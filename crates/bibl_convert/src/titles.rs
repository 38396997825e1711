//! Title classification: maps the leveled titles of an entry onto a
//! citation type and the CSL title fields.

use crate::report::Report;
use bibl_xml::model::{Title, TitleLevel};
use csl_data::CitationType;
use std::collections::HashSet;
use url::Url;

/// Fields produced by title classification. `citation_type` is `None` when
/// no rule fired, leaving the assembler's default in place.
#[derive(Debug, Default, Clone)]
pub struct TitleFields {
    pub citation_type: Option<CitationType>,
    pub title: Option<String>,
    pub container_title: Option<String>,
    pub collection_title: Option<String>,
    pub url: Option<Url>,
}

/// Classify the titles of one entry.
///
/// The citation type is decided from the *set* of levels present, so it does
/// not depend on element order; field values are written in input order with
/// last-wins overwrite semantics on duplicate levels (which warn).
pub fn classify_titles(entry_id: &str, titles: &[Title], report: &mut Report) -> TitleFields {
    let levels: HashSet<TitleLevel> = titles.iter().filter_map(|t| t.level).collect();
    let has = |level: TitleLevel| levels.contains(&level);

    if has(TitleLevel::Series) && has(TitleLevel::Journal) {
        report.warn_item(
            entry_id,
            format!("Illegal title combination (series + journal) in item {entry_id}."),
        );
    }
    if has(TitleLevel::Series) && has(TitleLevel::Article) && !has(TitleLevel::Monograph) {
        report.warn_item(
            entry_id,
            format!("Illegal title combination (series + article) in item {entry_id}."),
        );
    }
    if has(TitleLevel::Monograph) && has(TitleLevel::Journal) {
        report.warn_item(
            entry_id,
            format!("Illegal title combination (monograph + journal) in item {entry_id}."),
        );
    }

    let mut fields = TitleFields::default();
    let chapter = has(TitleLevel::Monograph) && has(TitleLevel::Article);
    if chapter {
        fields.citation_type = Some(CitationType::Chapter);
    } else if has(TitleLevel::Journal) {
        fields.citation_type = Some(CitationType::ArticleJournal);
    } else if has(TitleLevel::Series) || has(TitleLevel::Monograph) {
        fields.citation_type = Some(CitationType::Book);
    }

    let mut seen = HashSet::new();
    for title in titles {
        let Some(level) = title.level else {
            report.warn_item(
                entry_id,
                format!("Unexpected shape for `title` element in item {entry_id}."),
            );
            continue;
        };

        // A linked reference supplies both the title text and the record URL.
        let text = match &title.reference {
            Some(reference) => {
                match Url::parse(&reference.target) {
                    Ok(url) => fields.url = Some(url),
                    Err(_) => report.warn_item(
                        entry_id,
                        format!(
                            "Invalid `ref` target `{}` in item {entry_id}.",
                            reference.target
                        ),
                    ),
                }
                reference.text.clone().or_else(|| title.text.clone())
            }
            None => title.text.clone(),
        };
        let Some(text) = text else {
            report.warn_item(
                entry_id,
                format!("Unexpected shape for `title` element in item {entry_id}."),
            );
            continue;
        };

        if !seen.insert(level) {
            report.warn_item(
                entry_id,
                format!("Duplicate title level in item {entry_id}."),
            );
        }

        match level {
            TitleLevel::Journal => fields.container_title = Some(text),
            TitleLevel::Series => fields.collection_title = Some(text),
            TitleLevel::Monograph if chapter => fields.container_title = Some(text),
            TitleLevel::Monograph | TitleLevel::Article => fields.title = Some(text),
        }
    }

    fields
}
