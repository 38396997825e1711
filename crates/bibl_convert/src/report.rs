//! The warning report threaded through a conversion run.
//!
//! Every anomaly degrades to a warning here rather than an error; the
//! collected lines are flushed to the log file once at the end of the run,
//! in the order they were raised.

use std::fmt;
use std::io::{self, Write};

/// One diagnostic line, tagged with the entry it came from when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub entry_id: Option<String>,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WARNING: {}", self.message)
    }
}

/// Append-only, run-lifetime warning collector.
#[derive(Debug, Default, Clone)]
pub struct Report {
    warnings: Vec<Warning>,
    /// Validator detail, appended after the warnings in the log.
    validation: Option<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning against a specific entry.
    pub fn warn_item(&mut self, entry_id: &str, message: impl Into<String>) {
        self.warnings.push(Warning {
            entry_id: Some(entry_id.to_string()),
            message: message.into(),
        });
    }

    /// Record a warning not tied to any entry.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(Warning {
            entry_id: None,
            message: message.into(),
        });
    }

    pub fn set_validation_detail(&mut self, detail: impl Into<String>) {
        self.validation = Some(detail.into());
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }

    /// Warnings raised for a given entry; used by tests and spot checks.
    pub fn for_item<'a>(&'a self, entry_id: &'a str) -> impl Iterator<Item = &'a Warning> {
        self.warnings
            .iter()
            .filter(move |w| w.entry_id.as_deref() == Some(entry_id))
    }

    /// Flush the full log: header, warnings in order, validator detail if
    /// any, closing summary line.
    pub fn write_to<W: Write>(&self, mut out: W, summary: &str) -> io::Result<()> {
        writeln!(out, "Warnings from the latest run of `bibl-convert`.")?;
        writeln!(out)?;
        for warning in &self.warnings {
            writeln!(out, "{}", warning)?;
        }
        if let Some(detail) = &self.validation {
            writeln!(out)?;
            writeln!(out, "Validation report:")?;
            writeln!(out, "{}", detail)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", summary)?;
        Ok(())
    }
}
