//! Name normalization for author/editor/translator statements.

use bibl_xml::model::Agent;
use csl_data::Name;

/// Titles of address that occasionally precede a given name in the source.
const HONORIFICS: [&str; 6] = ["Dr.", "Sir", "Lord", "Dame", "Rev.", "Prof."];

/// Convert raw name structures into CSL names. `family` defaults to the
/// empty string when absent; `given` is omitted entirely rather than kept as
/// an empty field.
pub fn convert_agents(agents: &[Agent]) -> Vec<Name> {
    agents
        .iter()
        .map(|agent| Name {
            family: agent
                .last
                .as_deref()
                .and_then(clean_name_part)
                .unwrap_or_default(),
            given: agent.first.as_deref().and_then(clean_name_part),
        })
        .collect()
}

/// Strip honorifics and orphaned punctuation tokens; `None` when nothing
/// usable remains.
fn clean_name_part(raw: &str) -> Option<String> {
    let kept: Vec<&str> = raw
        .split_whitespace()
        .filter(|token| !HONORIFICS.contains(token))
        .filter(|token| token.chars().any(|c| c.is_alphanumeric()))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}
