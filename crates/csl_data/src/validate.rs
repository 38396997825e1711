use crate::record::{CslRecord, DateVariable};
use thiserror::Error;

/// Structural validation failures for an assembled record list.
///
/// A failure is reported into the warning log by the caller; it never aborts
/// a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("record at index {0} has an empty id")]
    EmptyId(usize),
    #[error("record {id}: {field} has {parts} date parts (expected 1 or 2)")]
    DatePartCount {
        id: String,
        field: &'static str,
        parts: usize,
    },
    #[error("record {id}: {field} part {index} is not a single year")]
    MalformedDatePart {
        id: String,
        field: &'static str,
        index: usize,
    },
    #[error("record {id}: {field} contains implausible year {year}")]
    ImplausibleYear {
        id: String,
        field: &'static str,
        year: i32,
    },
    #[error("record {id}: {field} is present but empty")]
    EmptyField { id: String, field: &'static str },
}

/// Check the converter's output against the shape the CSL schema requires
/// of it: non-empty ids, well-formed year-only date parts, no empty string
/// fields.
pub fn validate_records(records: &[CslRecord]) -> Result<(), ValidationError> {
    for (index, record) in records.iter().enumerate() {
        if record.id.is_empty() {
            return Err(ValidationError::EmptyId(index));
        }
        if let Some(date) = &record.issued {
            validate_date(&record.id, "issued", date)?;
        }
        if let Some(date) = &record.original_date {
            validate_date(&record.id, "original-date", date)?;
        }
        for (field, value) in string_fields(record) {
            if let Some(value) = value {
                if value.is_empty() {
                    return Err(ValidationError::EmptyField {
                        id: record.id.clone(),
                        field,
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_date(
    id: &str,
    field: &'static str,
    date: &DateVariable,
) -> Result<(), ValidationError> {
    if date.date_parts.is_empty() || date.date_parts.len() > 2 {
        return Err(ValidationError::DatePartCount {
            id: id.to_string(),
            field,
            parts: date.date_parts.len(),
        });
    }
    for (index, part) in date.date_parts.iter().enumerate() {
        if part.len() != 1 {
            return Err(ValidationError::MalformedDatePart {
                id: id.to_string(),
                field,
                index,
            });
        }
        let year = part[0];
        if !(800..=2100).contains(&year) {
            return Err(ValidationError::ImplausibleYear {
                id: id.to_string(),
                field,
                year,
            });
        }
    }
    Ok(())
}

fn string_fields(record: &CslRecord) -> [(&'static str, Option<&String>); 10] {
    [
        ("title", record.title.as_ref()),
        ("container-title", record.container_title.as_ref()),
        ("collection-title", record.collection_title.as_ref()),
        ("collection-number", record.collection_number.as_ref()),
        ("volume", record.volume.as_ref()),
        ("page", record.page.as_ref()),
        ("edition", record.edition.as_ref()),
        ("publisher", record.publisher.as_ref()),
        ("publisher-place", record.publisher_place.as_ref()),
        ("genre", record.genre.as_ref()),
    ]
}
