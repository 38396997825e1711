use serde::{Deserialize, Serialize};

/// One `<bibl>` element from the source bibliography.
///
/// Entries without an `xml:id` are cross-references to other entries and are
/// skipped by the converter.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct BiblEntry {
    pub id: Option<String>,
    pub authors: Vec<Agent>,
    pub editors: Vec<Agent>,
    pub translators: Vec<Agent>,
    pub titles: Vec<Title>,
    pub pubstmt: Option<PubStmt>,
    /// Tag names of child elements the parser did not recognize. The
    /// converter reports these as unconsumed values.
    pub extras: Vec<String>,
}

/// A raw name structure from `<authorstmt>`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Agent {
    pub first: Option<String>,
    pub last: Option<String>,
}

/// A leveled title from `<titlestmt>`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Title {
    /// `None` when the `level` attribute is missing or not one of the four
    /// recognized codes; the converter warns in that case.
    pub level: Option<TitleLevel>,
    pub text: Option<String>,
    pub reference: Option<TitleRef>,
}

/// The four title levels used by the catalogue's markup.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleLevel {
    Article,
    Monograph,
    Journal,
    Series,
}

impl TitleLevel {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(Self::Article),
            "m" => Some(Self::Monograph),
            "j" => Some(Self::Journal),
            "s" => Some(Self::Series),
            _ => None,
        }
    }
}

/// An embedded `<ref target="...">` inside a title.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct TitleRef {
    pub target: String,
    pub text: Option<String>,
}

/// The `<pubstmt>` element: a free-text publication statement plus an
/// optional raw `date` attribute.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct PubStmt {
    pub date: Option<String>,
    pub text: Option<String>,
}

impl PubStmt {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.text.is_none()
    }
}
