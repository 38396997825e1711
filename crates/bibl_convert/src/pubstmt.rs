//! The publication-statement pattern matcher.
//!
//! A pubstmt is free prose following the bibliographers' typographic
//! conventions ("Place: Publisher, Date", "Vol. N. Place, Date", ...). The
//! matcher classifies the whole string against an ordered rule table of
//! full-string regexes with named capture groups; the first rule that
//! matches wins, and a string no rule accepts falls back to verbatim
//! storage in `publisher` plus a warning. The sub-patterns are deliberately
//! imprecise (capitalized start, letters, diacritics, light punctuation);
//! graceful fallback beats false precision on this corpus.

use crate::dates::parse_date;
use crate::report::Report;
use csl_data::CitationType;
use regex::{Captures, Regex};

/// Fields extracted from one publication statement.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PubParts {
    /// `Some(Thesis)` when a thesis marker fired; otherwise the incoming
    /// type stands.
    pub citation_type: Option<CitationType>,
    pub volume: Option<String>,
    pub page: Option<String>,
    pub edition: Option<String>,
    pub publisher: Option<String>,
    pub publisher_place: Option<String>,
    pub collection_number: Option<String>,
    pub genre: Option<String>,
    /// Date isolated from the free text; takes precedence over the
    /// attribute-derived date.
    pub text_date: Vec<Vec<i32>>,
    /// Year of a trailing "repr. YYYY" clause, when present.
    pub reprint_year: Option<i32>,
}

// Sub-patterns shared by the book rules.
const DATE: &str = r"[\(\[]?(?P<date>\d{4}(?:[-–]\d{1,4})?)[\)\]]?";
const PLACE: &str = r"(?P<place>\p{Lu}[\p{L}\p{M}'\. -]*?)";
const PUBLISHER: &str = r"(?P<publisher>\p{Lu}[\p{L}\p{M}&'\.,/ -]*?)";
const NUMBER: &str = r"(?P<number>(?:[a-z]\. ?[a-z]\. )?\d+(?:\.\d+)?)";
const VOLUME: &str = r"Vol\. (?P<volume>\d+[A-Za-z]?)\.";
const EDITION: &str = r"(?P<edition>\d+)(?:st|nd|rd|th) ed\.";

/// One row of the book-template table.
struct BookRule {
    name: &'static str,
    /// Rows that carry a date but no imprint warn "no publisher/place".
    warn_no_imprint: bool,
    pattern: Regex,
}

impl BookRule {
    fn new(name: &'static str, warn_no_imprint: bool, pattern: &str) -> Self {
        Self {
            name,
            warn_no_imprint,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

pub struct PubstmtMatcher {
    book_rules: Vec<BookRule>,
    reprint: Regex,
    subsequent: Regex,
    et_seq: Regex,
    rev_ed: Regex,
    thesis_marker: Regex,
    trailing_year: Regex,
    journal: Regex,
    paren_year: Regex,
    page_clause: Regex,
    year_anywhere: Regex,
}

impl Default for PubstmtMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PubstmtMatcher {
    pub fn new() -> Self {
        // The table order is load-bearing: rules are tried top to bottom
        // and the first full match wins.
        let book_rules = vec![
            BookRule::new("date-only", true, &format!(r"^{DATE}\.?$")),
            BookRule::new("number-date", true, &format!(r"^{NUMBER}[\.,]? {DATE}\.?$")),
            BookRule::new(
                "volume-place-date",
                false,
                &format!(r"^{VOLUME} {PLACE}, {DATE}\.?$"),
            ),
            BookRule::new("place-date", false, &format!(r"^{PLACE}, {DATE}\.?$")),
            BookRule::new(
                "edition-place-date",
                false,
                &format!(r"^{EDITION} {PLACE}, {DATE}\.?$"),
            ),
            BookRule::new("publisher-date", false, &format!(r"^{PUBLISHER}: {DATE}\.?$")),
            BookRule::new(
                "number-publisher-date",
                false,
                &format!(r"^{NUMBER}[\.,]? {PUBLISHER}: {DATE}\.?$"),
            ),
            BookRule::new(
                "number-place-date",
                false,
                &format!(r"^{NUMBER}[\.,]? {PLACE}, {DATE}\.?$"),
            ),
            BookRule::new(
                "place-publisher-date",
                false,
                &format!(r"^{PLACE}: {PUBLISHER}, {DATE}\.?$"),
            ),
            BookRule::new(
                "edition-place-publisher-date",
                false,
                &format!(r"^{EDITION} {PLACE}: {PUBLISHER}, {DATE}\.?$"),
            ),
            BookRule::new(
                "volume-place-publisher-date",
                false,
                &format!(r"^{VOLUME} {PLACE}: {PUBLISHER}, {DATE}\.?$"),
            ),
            BookRule::new(
                "number-place-publisher-date",
                false,
                &format!(r"^{NUMBER}[\.,]? {PLACE}: {PUBLISHER}, {DATE}\.?$"),
            ),
        ];

        Self {
            book_rules,
            reprint: Regex::new(r"[;,]? ?\(?repr\. (?P<year>\d{4})\)?\.?$").unwrap(),
            subsequent: Regex::new(r",? and subsequent editions\.?$").unwrap(),
            et_seq: Regex::new(r",? ?et seq\.?$").unwrap(),
            rev_ed: Regex::new(r"^[Rr]ev\. ed\.,? ").unwrap(),
            thesis_marker: Regex::new(
                r"Ph\.D\. diss\.|Ph\.D\. thesis|M\.A\. thesis|B\.Litt\. thesis|B\.Litt\.|Diss\.|\b[Tt]hesis\b",
            )
            .unwrap(),
            trailing_year: Regex::new(r"[,;]? ?\(?(?P<year>\d{4})\)?\.?$").unwrap(),
            journal: Regex::new(r"^(?P<volume>.*?) ?\((?P<year>\d{4})\): ?(?P<page>.+?)\.?$")
                .unwrap(),
            paren_year: Regex::new(r" ?\((?P<year>\d{4})\)").unwrap(),
            page_clause: Regex::new(r",? ?(?:pp?\. )?(?P<page>\d+[-–]\d+)\.?$").unwrap(),
            year_anywhere: Regex::new(r"\d{4}").unwrap(),
        }
    }

    /// Decompose one publication statement. Never fails; anything
    /// unrecognized degrades to the verbatim-publisher fallback plus a
    /// warning.
    pub fn parse(
        &self,
        entry_id: &str,
        citation_type: CitationType,
        text: &str,
        report: &mut Report,
    ) -> PubParts {
        let original = text.trim();
        let mut parts = PubParts::default();
        let mut work = original.to_string();

        // Pre-clean: reprint clause, open-ended edition suffixes, leading
        // revised-edition prefix.
        if let Some(caps) = self.reprint.captures(&work) {
            parts.reprint_year = caps.name("year").and_then(|m| m.as_str().parse().ok());
            let start = caps.get(0).map(|m| m.start()).unwrap_or(work.len());
            work.truncate(start);
            work = work.trim().to_string();
        }
        work = self.subsequent.replace(&work, "").trim().to_string();
        work = self.et_seq.replace(&work, "").trim().to_string();
        if let Some(m) = self.rev_ed.find(&work) {
            parts.edition = Some("rev. ed.".to_string());
            work = work[m.end()..].trim().to_string();
        }

        // Thesis markers short-circuit whatever type the titles produced.
        if let Some(marker) = self.thesis_marker.find(&work) {
            let range = marker.range();
            let marker = marker.as_str().to_string();
            self.parse_thesis(&work, range, &marker, &mut parts);
            return parts;
        }

        match citation_type {
            CitationType::ArticleJournal => {
                self.parse_journal(entry_id, original, &work, &mut parts, report)
            }
            CitationType::Book | CitationType::Chapter => self.parse_book(
                entry_id,
                original,
                &work,
                citation_type == CitationType::Chapter,
                &mut parts,
                report,
            ),
            CitationType::Thesis => {
                // Only reachable on input that already claims to be a thesis
                // yet shows no thesis marker.
                report.warn_item(
                    entry_id,
                    format!("Unrecognized citation type for pubstmt of item {entry_id}."),
                );
            }
        }
        parts
    }

    fn parse_thesis(&self, work: &str, range: std::ops::Range<usize>, marker: &str, parts: &mut PubParts) {
        parts.citation_type = Some(CitationType::Thesis);
        parts.genre = Some(
            if marker.contains("M.A.") {
                "M.A. thesis"
            } else if marker.contains("B.Litt.") {
                "B.Litt. thesis"
            } else if marker.contains("Ph.D.") || marker.contains("Diss") {
                "Ph.D. diss."
            } else {
                "thesis"
            }
            .to_string(),
        );

        let mut rest = format!("{} {}", &work[..range.start], &work[range.end..]);
        while rest.contains("  ") {
            rest = rest.replace("  ", " ");
        }
        let mut rest = rest.trim().to_string();
        if let Some(caps) = self.trailing_year.captures(&rest) {
            if let Some(year) = caps.name("year") {
                parts.text_date = parse_date(year.as_str());
            }
            let start = caps.get(0).map(|m| m.start()).unwrap_or(rest.len());
            rest.truncate(start);
        }
        let institution = rest.trim_matches([' ', ',', ';']);
        if !institution.is_empty() {
            parts.publisher = Some(institution.to_string());
        }
    }

    fn parse_journal(
        &self,
        entry_id: &str,
        original: &str,
        work: &str,
        parts: &mut PubParts,
        report: &mut Report,
    ) {
        if let Some(caps) = self.journal.captures(work) {
            let volume = caps.name("volume").map(|m| m.as_str().trim()).unwrap_or("");
            if !volume.is_empty() {
                parts.volume = Some(volume.to_string());
            }
            if let Some(year) = caps.name("year") {
                parts.text_date = parse_date(year.as_str());
            }
            if let Some(page) = caps.name("page") {
                parts.page = Some(page.as_str().trim().to_string());
            }
        } else if let Some((left, right)) = work.split_once(':') {
            let mut left = left.trim().to_string();
            if let Some(caps) = self.paren_year.captures(&left) {
                if let Some(year) = caps.name("year") {
                    parts.text_date = parse_date(year.as_str());
                }
                left = self.paren_year.replace(&left, "").trim().to_string();
            }
            if !left.is_empty() {
                parts.volume = Some(left);
            }
            let right = right.trim().trim_end_matches('.');
            if !right.is_empty() {
                parts.page = Some(right.to_string());
            }
        } else {
            parts.publisher = Some(original.to_string());
            report.warn_item(
                entry_id,
                format!("Unprocessed pubstmt `{original}` in item {entry_id}."),
            );
        }
    }

    fn parse_book(
        &self,
        entry_id: &str,
        original: &str,
        work: &str,
        is_chapter: bool,
        parts: &mut PubParts,
        report: &mut Report,
    ) {
        let mut work = work.to_string();

        // Chapters carry a trailing page-range clause; peel it off and let
        // the remainder run through the same book rules. A bare year range
        // is not a page clause, hence the year check on what would remain.
        if is_chapter {
            let snapshot = work.clone();
            if let Some(caps) = self.page_clause.captures(&snapshot) {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(work.len());
                let head = work[..start].trim_end_matches([',', ' ']).to_string();
                if self.year_anywhere.is_match(&head) {
                    parts.page = caps.name("page").map(|m| m.as_str().to_string());
                    work = head;
                }
            }
        }

        for rule in &self.book_rules {
            if let Some(caps) = rule.pattern.captures(&work) {
                apply_captures(&caps, parts);
                if rule.warn_no_imprint {
                    report.warn_item(
                        entry_id,
                        format!(
                            "No publisher or place in pubstmt of item {entry_id} ({}).",
                            rule.name
                        ),
                    );
                }
                return;
            }
        }

        // Rule 13: no structural match. Keep the whole statement so nothing
        // is lost, and leave a paper trail.
        parts.publisher = Some(original.to_string());
        report.warn_item(
            entry_id,
            format!("Unprocessed pubstmt `{original}` in item {entry_id}."),
        );
    }
}

fn apply_captures(caps: &Captures, parts: &mut PubParts) {
    let take = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
    if let Some(volume) = take("volume") {
        parts.volume = Some(volume);
    }
    if let Some(edition) = take("edition") {
        parts.edition = Some(edition);
    }
    if let Some(number) = take("number") {
        parts.collection_number = Some(number);
    }
    if let Some(place) = take("place") {
        parts.publisher_place = Some(place);
    }
    if let Some(publisher) = take("publisher") {
        parts.publisher = Some(publisher);
    }
    if let Some(date) = caps.name("date") {
        parts.text_date = parse_date(date.as_str());
    }
}
