#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub type RefID = String;

/// The subset of CSL item types the catalogue's bibliography maps onto.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum CitationType {
    #[default]
    Book,
    ArticleJournal,
    Chapter,
    Thesis,
}

impl fmt::Display for CitationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Book => "book",
            Self::ArticleJournal => "article-journal",
            Self::Chapter => "chapter",
            Self::Thesis => "thesis",
        };
        write!(f, "{}", s)
    }
}

/// A CSL date variable in the structured `date-parts` representation.
///
/// Each part is a single year; one part for a plain year, two parts for a
/// range. An empty list means the source date was unparseable.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DateVariable {
    #[serde(rename = "date-parts")]
    pub date_parts: Vec<Vec<i32>>,
}

impl DateVariable {
    pub fn single(year: i32) -> Self {
        Self {
            date_parts: vec![vec![year]],
        }
    }

    pub fn from_parts(date_parts: Vec<Vec<i32>>) -> Self {
        Self { date_parts }
    }

    /// The lead year, if any.
    pub fn year(&self) -> Option<i32> {
        self.date_parts.first().and_then(|part| part.first()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.date_parts.is_empty()
    }
}

/// A personal name. `given` is omitted from the output entirely when absent,
/// never serialized as an empty field.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Name {
    pub family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
}

/// One converted bibliographic record. Assembled once per source entry and
/// never mutated afterwards.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub struct CslRecord {
    pub id: RefID,
    pub r#type: CitationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<DateVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_date: Option<DateVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Vec<Name>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<Vec<Name>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator: Option<Vec<Name>>,
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

/// An entry diverted from citation conversion because it points at an
/// online facsimile rather than a publication.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub struct FacsimileLink {
    pub id: RefID,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "URL")]
    pub url: Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_serialize_kebab_case_without_absent_fields() {
        let record = CslRecord {
            id: "Brown1932".to_string(),
            r#type: CitationType::Book,
            title: Some("English Lyrics".to_string()),
            publisher_place: Some("Oxford".to_string()),
            issued: Some(DateVariable::single(1932)),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "book");
        assert_eq!(json["publisher-place"], "Oxford");
        assert_eq!(json["issued"]["date-parts"][0][0], 1932);
        assert!(json.get("container-title").is_none());
        assert!(json.get("URL").is_none());
    }

    #[test]
    fn name_without_given_omits_the_field() {
        let name = Name {
            family: "Brown".to_string(),
            given: None,
        };
        let json = serde_json::to_value(&name).unwrap();
        assert_eq!(json, serde_json::json!({ "family": "Brown" }));
    }

    #[test]
    fn date_variable_year_reads_the_lead_part() {
        let range = DateVariable::from_parts(vec![vec![1920], vec![1923]]);
        assert_eq!(range.year(), Some(1920));
        assert!(DateVariable::default().year().is_none());
    }
}
