//! Converts the verse-catalogue bibliography into CSL citation records.
//!
//! The pipeline is a single pass over the source entries: agents, then
//! titles, then the publication statement, each contributing fields to one
//! fresh record per entry. Anomalies never abort a run; they degrade to
//! warnings collected in a [`Report`] and flushed once at the end.

use bibl_xml::model::{BiblEntry, PubStmt};
use bibl_xml::parser::{parse_bibliography, preprocess};
use csl_data::{CitationType, CslRecord, DateVariable, FacsimileLink};
use regex::Regex;
use roxmltree::Document;
use std::fs;
use std::path::Path;
use url::Url;

pub mod agents;
pub mod dates;
pub mod error;
pub mod pubstmt;
pub mod report;
pub mod titles;

pub use error::ConvertError;
pub use report::{Report, Warning};

use agents::convert_agents;
use dates::{date_attr_usable, parse_date};
use pubstmt::PubstmtMatcher;
use titles::classify_titles;

/// What one entry converts into.
#[derive(Debug)]
pub enum Outcome {
    Record(Box<CslRecord>),
    Facsimile(FacsimileLink),
    /// No `xml:id`: a cross-reference, counted but not converted.
    SkippedCrossRef,
}

/// The result of a full conversion run. Record order mirrors input order.
#[derive(Debug, Default)]
pub struct Conversion {
    pub records: Vec<CslRecord>,
    pub links: Vec<FacsimileLink>,
    pub skipped_cross_refs: usize,
    pub report: Report,
}

/// Read and parse a source bibliography file.
pub fn load_entries(path: &Path) -> Result<Vec<BiblEntry>, ConvertError> {
    let text = fs::read_to_string(path)?;
    let text = preprocess(&text);
    let doc = Document::parse(&text)?;
    parse_bibliography(doc.root_element()).map_err(ConvertError::Malformed)
}

pub struct Converter {
    matcher: PubstmtMatcher,
    url_in_text: Regex,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self {
            matcher: PubstmtMatcher::new(),
            url_in_text: Regex::new(r#"https?://[^\s<>"]+"#).unwrap(),
        }
    }

    /// Convert every entry, in input order.
    pub fn convert_document(&self, entries: &[BiblEntry]) -> Conversion {
        let mut conversion = Conversion::default();
        for entry in entries {
            match self.convert_entry(entry, &mut conversion.report) {
                Outcome::Record(record) => conversion.records.push(*record),
                Outcome::Facsimile(link) => conversion.links.push(link),
                Outcome::SkippedCrossRef => conversion.skipped_cross_refs += 1,
            }
        }
        conversion
    }

    /// Convert a single entry. Best effort: a partial record with warnings,
    /// never a failure, except that facsimile links are diverted whole.
    pub fn convert_entry(&self, entry: &BiblEntry, report: &mut Report) -> Outcome {
        let Some(id) = entry.id.as_deref() else {
            return Outcome::SkippedCrossRef;
        };

        // The default type must be in place before the pubstmt dispatch
        // reads it.
        let mut record = CslRecord {
            id: id.to_string(),
            r#type: CitationType::Book,
            ..Default::default()
        };

        if !entry.authors.is_empty() {
            record.author = Some(convert_agents(&entry.authors));
        }
        if !entry.editors.is_empty() {
            record.editor = Some(convert_agents(&entry.editors));
        }
        if !entry.translators.is_empty() {
            record.translator = Some(convert_agents(&entry.translators));
        }

        if entry.titles.is_empty() {
            report.warn_item(id, format!("Empty `titlestmt` in item {id}."));
        }
        let fields = classify_titles(id, &entry.titles, report);
        if let Some(citation_type) = fields.citation_type {
            record.r#type = citation_type;
        }
        record.title = fields.title;
        record.container_title = fields.container_title;
        record.collection_title = fields.collection_title;
        record.url = fields.url.clone();

        if let Some(pubstmt) = &entry.pubstmt {
            if pubstmt.is_empty() {
                report.warn_item(id, format!("Empty `pubstmt` in item {id}."));
            } else {
                // An http link in the statement text marks an online
                // facsimile, not a publication; the title's ref must agree.
                if let Some(url) = self.facsimile_url(pubstmt, &fields.url) {
                    return Outcome::Facsimile(FacsimileLink {
                        id: id.to_string(),
                        title: record.title.or(record.container_title),
                        url,
                    });
                }
                self.convert_pubstmt(id, pubstmt, &mut record, report);
            }
        }

        if !entry.extras.is_empty() {
            report.warn_item(
                id,
                format!(
                    "Unconsumed values in item {id}: {}.",
                    entry.extras.join(", ")
                ),
            );
        }

        Outcome::Record(Box::new(record))
    }

    /// The diversion check: a URL inside the pubstmt text, cross-checked
    /// against the linked reference the title classifier already resolved.
    fn facsimile_url(&self, pubstmt: &PubStmt, title_url: &Option<Url>) -> Option<Url> {
        let text = pubstmt.text.as_deref()?;
        let found = self.url_in_text.find(text)?;
        let title_url = title_url.as_ref()?;
        let found = found.as_str().trim_end_matches(['.', ',']);
        if found == title_url.as_str() {
            Some(title_url.clone())
        } else {
            None
        }
    }

    fn convert_pubstmt(
        &self,
        id: &str,
        pubstmt: &PubStmt,
        record: &mut CslRecord,
        report: &mut Report,
    ) {
        // Attribute-derived date first; the free text may override it.
        let mut attr_date: Vec<Vec<i32>> = Vec::new();
        match pubstmt.date.as_deref() {
            None => {
                report.warn_item(id, format!("No `date` attribute in item {id}. Skipping."));
            }
            Some(raw) if !date_attr_usable(raw) => {
                report.warn_item(
                    id,
                    format!("Invalid value found for `date` attribute in item {id}. Skipping."),
                );
            }
            Some(raw) => {
                attr_date = parse_date(raw);
                if attr_date.is_empty() {
                    report.warn_item(
                        id,
                        format!("Unsupported date pattern in item {id}. Skipping."),
                    );
                }
            }
        }

        let Some(text) = pubstmt.text.as_deref() else {
            report.warn_item(
                id,
                format!("No text value for `pubstmt` in item {id}. Skipping."),
            );
            if !attr_date.is_empty() {
                record.issued = Some(DateVariable::from_parts(attr_date));
            }
            return;
        };

        let parts = self.matcher.parse(id, record.r#type, text, report);

        if let Some(citation_type) = parts.citation_type {
            record.r#type = citation_type;
        }
        record.volume = parts.volume.or(record.volume.take());
        record.page = parts.page.or(record.page.take());
        record.edition = parts.edition.or(record.edition.take());
        record.publisher = parts.publisher.or(record.publisher.take());
        record.publisher_place = parts.publisher_place.or(record.publisher_place.take());
        record.collection_number = parts.collection_number.or(record.collection_number.take());
        record.genre = parts.genre.or(record.genre.take());

        // The free-text date is treated as the more authoritative source;
        // a change in the year *value* (not just representation) warns.
        let mut issued = attr_date;
        if !parts.text_date.is_empty() {
            let attr_year = issued.first().and_then(|p| p.first()).copied();
            let text_year = parts.text_date.first().and_then(|p| p.first()).copied();
            if let (Some(attr_year), Some(text_year)) = (attr_year, text_year) {
                if attr_year != text_year {
                    report.warn_item(
                        id,
                        format!(
                            "Date discrepancy in item {id}: attribute {attr_year}, pubstmt {text_year}."
                        ),
                    );
                }
            }
            issued = parts.text_date;
        }

        // A reprint is the publication being cited; the earlier date moves
        // to original-date.
        if let Some(reprint_year) = parts.reprint_year {
            if !issued.is_empty() {
                record.original_date = Some(DateVariable::from_parts(issued));
            }
            issued = vec![vec![reprint_year]];
        }

        if !issued.is_empty() {
            record.issued = Some(DateVariable::from_parts(issued));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibl_xml::model::{Agent, Title, TitleLevel};

    fn entry(id: &str) -> BiblEntry {
        BiblEntry {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn title(level: TitleLevel, text: &str) -> Title {
        Title {
            level: Some(level),
            text: Some(text.to_string()),
            reference: None,
        }
    }

    #[test]
    fn entry_without_id_is_skipped_without_warning() {
        let converter = Converter::new();
        let conversion = converter.convert_document(&[BiblEntry::default()]);
        assert!(conversion.records.is_empty());
        assert_eq!(conversion.skipped_cross_refs, 1);
        assert!(conversion.report.is_empty());
    }

    #[test]
    fn default_type_is_book() {
        let converter = Converter::new();
        let mut report = Report::new();
        let outcome = converter.convert_entry(&entry("X1"), &mut report);
        let Outcome::Record(record) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(record.r#type, CitationType::Book);
    }

    #[test]
    fn agents_are_attached_per_role() {
        let mut e = entry("X1");
        e.authors.push(Agent {
            first: Some("Carleton".to_string()),
            last: Some("Brown".to_string()),
        });
        e.editors.push(Agent {
            first: None,
            last: Some("Furnivall".to_string()),
        });

        let converter = Converter::new();
        let mut report = Report::new();
        let Outcome::Record(record) = converter.convert_entry(&e, &mut report) else {
            panic!("expected a record");
        };
        assert_eq!(record.author.as_ref().unwrap()[0].family, "Brown");
        assert_eq!(record.editor.as_ref().unwrap()[0].family, "Furnivall");
        assert!(record.translator.is_none());
    }

    #[test]
    fn date_discrepancy_warns_and_text_wins() {
        let mut e = entry("X1");
        e.titles.push(title(TitleLevel::Monograph, "A Book"));
        e.pubstmt = Some(PubStmt {
            date: Some("1930".to_string()),
            text: Some("Oxford: Clarendon Press, 1932".to_string()),
        });

        let converter = Converter::new();
        let mut report = Report::new();
        let Outcome::Record(record) = converter.convert_entry(&e, &mut report) else {
            panic!("expected a record");
        };
        assert_eq!(record.issued, Some(DateVariable::single(1932)));
        assert!(report
            .for_item("X1")
            .any(|w| w.message.contains("Date discrepancy")));
    }

    #[test]
    fn same_year_different_representation_does_not_warn() {
        let mut e = entry("X1");
        e.titles.push(title(TitleLevel::Monograph, "A Book"));
        e.pubstmt = Some(PubStmt {
            date: Some("[1932]".to_string()),
            text: Some("Oxford: Clarendon Press, 1932".to_string()),
        });

        let converter = Converter::new();
        let mut report = Report::new();
        converter.convert_entry(&e, &mut report);
        assert!(!report
            .for_item("X1")
            .any(|w| w.message.contains("Date discrepancy")));
    }

    #[test]
    fn reprint_moves_first_date_to_original_date() {
        let mut e = entry("X1");
        e.titles.push(title(TitleLevel::Monograph, "A Book"));
        e.pubstmt = Some(PubStmt {
            date: Some("1871".to_string()),
            text: Some("London: Chaucer Society, 1871; repr. 1903".to_string()),
        });

        let converter = Converter::new();
        let mut report = Report::new();
        let Outcome::Record(record) = converter.convert_entry(&e, &mut report) else {
            panic!("expected a record");
        };
        assert_eq!(record.issued, Some(DateVariable::single(1903)));
        assert_eq!(record.original_date, Some(DateVariable::single(1871)));
    }

    #[test]
    fn invalid_date_attribute_warns_and_is_skipped() {
        let mut e = entry("X1");
        e.titles.push(title(TitleLevel::Monograph, "A Book"));
        e.pubstmt = Some(PubStmt {
            date: Some("c1500".to_string()),
            text: Some("Oxford: Clarendon Press, 1932".to_string()),
        });

        let converter = Converter::new();
        let mut report = Report::new();
        let Outcome::Record(record) = converter.convert_entry(&e, &mut report) else {
            panic!("expected a record");
        };
        // The text-derived date still lands.
        assert_eq!(record.issued, Some(DateVariable::single(1932)));
        assert!(report
            .for_item("X1")
            .any(|w| w.message.contains("Invalid value")));
    }

    #[test]
    fn unconsumed_elements_are_reported() {
        let mut e = entry("X1");
        e.extras.push("repertory".to_string());

        let converter = Converter::new();
        let mut report = Report::new();
        converter.convert_entry(&e, &mut report);
        assert!(report
            .for_item("X1")
            .any(|w| w.message.contains("Unconsumed values")));
    }
}
