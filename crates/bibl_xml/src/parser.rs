use crate::model::*;
use roxmltree::Node;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Flatten inline markup before the tree parse.
///
/// The source files carry pretty-printed whitespace and presentational
/// `<sup>`/`<i>` spans inside title and pubstmt text. Newlines are removed,
/// space runs collapsed, and the presentational tags replaced with sentinel
/// tokens so that element text comes out contiguous.
pub fn preprocess(xml: &str) -> String {
    let replaced = xml
        .replace(['\n', '\r'], "")
        .replace("<sup>", "BEGIN_SUP")
        .replace("</sup>", "END_SUP")
        .replace("<i>", "BEGIN_ITALICS")
        .replace("</i>", "END_ITALICS");

    let mut out = String::with_capacity(replaced.len());
    let mut prev_space = false;
    for ch in replaced.chars() {
        if ch == ' ' {
            if !prev_space {
                out.push(ch);
            }
            prev_space = true;
        } else {
            prev_space = false;
            out.push(ch);
        }
    }
    out
}

pub fn parse_bibliography(node: Node) -> Result<Vec<BiblEntry>, String> {
    if node.tag_name().name() != "bibliography" {
        return Err(format!(
            "Unexpected root element: {}",
            node.tag_name().name()
        ));
    }

    let mut entries = Vec::new();
    for child in node.children() {
        if !child.is_element() {
            continue;
        }
        match child.tag_name().name() {
            "bibl" => entries.push(parse_entry(child)?),
            other => return Err(format!("Unknown top-level tag: {}", other)),
        }
    }
    Ok(entries)
}

fn parse_entry(node: Node) -> Result<BiblEntry, String> {
    let mut entry = BiblEntry {
        id: xml_id(node),
        ..Default::default()
    };

    for child in node.children() {
        if !child.is_element() {
            continue;
        }
        match child.tag_name().name() {
            "authorstmt" => parse_authorstmt(child, &mut entry)?,
            "titlestmt" => entry.titles = parse_titlestmt(child)?,
            "pubstmt" => entry.pubstmt = Some(parse_pubstmt(child)),
            // Keywords; not converted.
            "index" => {}
            other => entry.extras.push(other.to_string()),
        }
    }
    Ok(entry)
}

fn xml_id(node: Node) -> Option<String> {
    node.attribute((XML_NS, "id"))
        .or_else(|| node.attribute("id"))
        .map(|s| s.to_string())
}

fn parse_authorstmt(node: Node, entry: &mut BiblEntry) -> Result<(), String> {
    for child in node.children() {
        if !child.is_element() {
            continue;
        }
        match child.tag_name().name() {
            "author" => entry.authors.push(parse_agent(child)),
            "editor" => entry.editors.push(parse_agent(child)),
            "translator" => entry.translators.push(parse_agent(child)),
            other => return Err(format!("Unknown agent tag: {}", other)),
        }
    }
    Ok(())
}

fn parse_agent(node: Node) -> Agent {
    let mut agent = Agent::default();
    for child in node.children() {
        if !child.is_element() {
            continue;
        }
        match child.tag_name().name() {
            "first" | "firstname" => agent.first = element_text(child),
            "last" | "lastname" => agent.last = element_text(child),
            _ => {}
        }
    }
    // Some entries carry the whole name as flat text.
    if agent.first.is_none() && agent.last.is_none() {
        agent.last = element_text(node);
    }
    agent
}

fn parse_titlestmt(node: Node) -> Result<Vec<Title>, String> {
    let mut titles = Vec::new();
    for child in node.children() {
        if !child.is_element() {
            continue;
        }
        if child.tag_name().name() == "title" {
            titles.push(parse_title(child));
        }
    }
    Ok(titles)
}

fn parse_title(node: Node) -> Title {
    let level = node.attribute("level").and_then(TitleLevel::from_code);
    let text = element_text(node);

    let mut reference = None;
    for child in node.children() {
        if child.is_element() && child.tag_name().name() == "ref" {
            reference = Some(TitleRef {
                target: child.attribute("target").unwrap_or_default().to_string(),
                text: element_text(child),
            });
        }
    }

    Title {
        level,
        text,
        reference,
    }
}

fn parse_pubstmt(node: Node) -> PubStmt {
    PubStmt {
        date: node.attribute("date").map(|s| s.to_string()),
        text: descendant_text(node),
    }
}

/// Concatenated direct text children, trimmed; `None` when blank.
fn element_text(node: Node) -> Option<String> {
    let mut text = String::new();
    for child in node.children() {
        if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        }
    }
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// All text under the node, including text inside nested elements such as
/// `<ref>`. Pubstmt prose sometimes wraps its URL in a ref.
fn descendant_text(node: Node) -> Option<String> {
    let mut text = String::new();
    for desc in node.descendants() {
        if desc.is_text() {
            text.push_str(desc.text().unwrap_or_default());
        }
    }
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
