//! Section parser — turns markdown-flavored text into integration records.
//!
//! Every top-level `# ` header opens a section. Within a section, lines are
//! matched first-rule-wins:
//!
//! - `# App` sets the application (and the "Integrations" group title)
//! - `## Box` sets the box id
//! - `Function: ...` sets the box title
//! - `Business purpose: ...` sets the arrow description
//!
//! Sections missing an application or a box id are dropped.

use crate::model::{Record, INTEGRATIONS_GROUP};
use regex::Regex;
use std::sync::LazyLock;

// A section starts at every line beginning with "# " (the split falls on the
// preceding newline).
static RE_SECTION_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# ").unwrap());

/// A recognized line within a section.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Application(&'a str),
    BoxId(&'a str),
    Function(&'a str),
    BusinessPurpose(&'a str),
}

/// Classify an already-trimmed line. Order matters: `# ` is tried before `## `.
fn classify(line: &str) -> Option<Line<'_>> {
    if let Some(rest) = line.strip_prefix("# ") {
        Some(Line::Application(rest.trim()))
    } else if let Some(rest) = line.strip_prefix("## ") {
        Some(Line::BoxId(rest.trim()))
    } else if let Some(rest) = line.strip_prefix("Function:") {
        Some(Line::Function(rest.trim()))
    } else if let Some(rest) = line.strip_prefix("Business purpose:") {
        Some(Line::BusinessPurpose(rest.trim()))
    } else {
        None
    }
}

/// Split trimmed content into section blobs, in input order.
pub fn split_sections(content: &str) -> Vec<&str> {
    let content = content.trim();
    let mut sections = Vec::new();
    let mut start = 0;
    for m in RE_SECTION_START.find_iter(content) {
        if m.start() == 0 {
            continue;
        }
        // m.start() - 1 is the newline that precedes the header
        sections.push(&content[start..m.start() - 1]);
        start = m.start();
    }
    sections.push(&content[start..]);
    sections
}

/// Extract a record from one section, if it names both application and box id.
pub fn parse_section(section: &str) -> Option<Record> {
    let mut record = Record::default();

    for line in section.trim().split('\n') {
        match classify(line.trim()) {
            Some(Line::Application(app)) => {
                record.application = app.to_string();
                record.group_title = INTEGRATIONS_GROUP.to_string();
            }
            Some(Line::BoxId(id)) => record.box_id = id.to_string(),
            Some(Line::Function(title)) => record.box_title = title.to_string(),
            Some(Line::BusinessPurpose(desc)) => record.arrow_description = desc.to_string(),
            None => {}
        }
    }

    record.is_complete().then_some(record)
}

/// Parse content into records, one per complete section.
pub fn parse(content: &str) -> Vec<Record> {
    let sections = split_sections(content);
    log::debug!("found {} section(s)", sections.len());

    let mut records = Vec::new();
    for section in sections {
        if section.trim().is_empty() {
            continue;
        }
        match parse_section(section) {
            Some(record) => records.push(record),
            None => log::debug!(
                "dropping section without application or box id: {:?}",
                section.lines().next().unwrap_or_default()
            ),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_section() {
        let input = "# AppOne\n## Box1\nFunction: Sync customers\nBusiness purpose: Keep CRM updated\n";
        let records = parse(input);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.application, "AppOne");
        assert_eq!(r.box_id, "Box1");
        assert_eq!(r.box_title, "Sync customers");
        assert_eq!(r.arrow_description, "Keep CRM updated");
        assert_eq!(r.group_title, "Integrations");
        assert_eq!(r.box_location, "External");
        assert_eq!(r.box_type, "Integration");
        assert_eq!(r.group_type, "Topic");
        assert_eq!(r.arrow_direction, "To");
    }

    #[test]
    fn one_record_per_section() {
        let input = "# A\n## One\n\n# B\n## Two\nFunction: f\n";
        let records = parse(input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].application, "A");
        assert_eq!(records[0].box_id, "One");
        assert_eq!(records[1].application, "B");
        assert_eq!(records[1].box_title, "f");
    }

    #[test]
    fn last_box_id_wins() {
        let records = parse("# A\n## First\n## Second\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].box_id, "Second");
    }

    #[test]
    fn indented_application_line_overrides() {
        let records = parse("# A\n## B\n  # C\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].application, "C");
        assert_eq!(records[0].group_title, "Integrations");
        assert_eq!(records[0].box_id, "B");
    }

    #[test]
    fn section_without_box_id_is_dropped() {
        assert!(parse("# A\nFunction: f\n").is_empty());
    }

    #[test]
    fn function_only_yields_nothing() {
        assert!(parse("Function: Sync customers\n").is_empty());
    }

    #[test]
    fn leading_preamble_is_its_own_section() {
        let input = "Intro text\n## Orphan\n# A\n## Box\n";
        let sections = split_sections(input);
        assert_eq!(sections, vec!["Intro text\n## Orphan", "# A\n## Box"]);
        let records = parse(input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].box_id, "Box");
    }

    #[test]
    fn deeper_headers_do_not_split() {
        let sections = split_sections("# A\n## B\n### C\n#NoSpace\n");
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn field_values_after_first_colon() {
        let r = parse_section("# A\n## B\nFunction:  a: b  \nBusiness purpose:x:y").unwrap();
        assert_eq!(r.box_title, "a: b");
        assert_eq!(r.arrow_description, "x:y");
    }

    #[test]
    fn crlf_and_indented_lines() {
        let r = parse_section("# A\r\n  ## B\r\nFunction: f\r\n").unwrap();
        assert_eq!(r.application, "A");
        assert_eq!(r.box_id, "B");
        assert_eq!(r.box_title, "f");
    }

    #[test]
    fn prefixes_are_case_sensitive() {
        let r = parse_section("# A\n## B\nfunction: nope\nBusiness Purpose: nope").unwrap();
        assert_eq!(r.box_title, "");
        assert_eq!(r.arrow_description, "");
    }

    #[test]
    fn empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n").is_empty());
    }

    #[test]
    fn classify_order() {
        assert_eq!(classify("# x"), Some(Line::Application("x")));
        assert_eq!(classify("## x"), Some(Line::BoxId("x")));
        assert_eq!(classify("### x"), None);
        assert_eq!(classify("Function:"), Some(Line::Function("")));
    }
}
