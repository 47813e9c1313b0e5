//! Markdown ⇄ paragraph model conversion.
//!
//! Only ATX headers of level 1–3 are understood. Everything else is carried
//! over as plain paragraph text.

use crate::model::{Paragraph, WordDocument};
use regex::Regex;
use std::sync::LazyLock;

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,3}) (.*)$").unwrap());

/// Style name prefix identifying heading paragraphs.
const HEADING_STYLE_PREFIX: &str = "Heading";

/// Levels above this are treated as unparseable heading styles.
const MAX_HEADING_LEVEL: i64 = 64;

/// Build a paragraph document from markdown text, one paragraph per line.
pub fn render_to_document(markdown: &str) -> WordDocument {
    let paragraphs = markdown
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                return Paragraph::empty();
            }
            match RE_HEADING.captures(line) {
                Some(caps) => Paragraph::heading(caps[1].len(), &caps[2]),
                None => Paragraph::plain(line),
            }
        })
        .collect();
    WordDocument { paragraphs }
}

/// Flatten a paragraph document back into markdown text.
///
/// Heading paragraphs get `#` prefixes matching their style level; paragraphs
/// are joined with `\n` without a trailing newline.
pub fn render_to_markdown(doc: &WordDocument) -> String {
    doc.paragraphs
        .iter()
        .map(|para| match heading_level(&para.style) {
            Some(level) => {
                let hashes = "#".repeat(usize::try_from(level).unwrap_or(0));
                format!("{} {}", hashes, para.text)
            }
            None => para.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Heading level of a style name like "Heading 2".
///
/// Returns `None` for non-heading styles and for heading styles whose last
/// word is not an integer ("Heading", "Heading1") or is above
/// [`MAX_HEADING_LEVEL`].
pub fn heading_level(style: &str) -> Option<i64> {
    if !style.starts_with(HEADING_STYLE_PREFIX) {
        return None;
    }
    style
        .split_whitespace()
        .last()?
        .parse()
        .ok()
        .filter(|level| *level <= MAX_HEADING_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_levels_one_to_three() {
        let doc = render_to_document("# One\n## Two\n### Three\n#### Four");
        let styles: Vec<&str> = doc.paragraphs.iter().map(|p| p.style.as_str()).collect();
        assert_eq!(styles, vec!["Heading 1", "Heading 2", "Heading 3", "Normal"]);
        assert_eq!(doc.paragraphs[0].text, "One");
        assert_eq!(doc.paragraphs[3].text, "#### Four");
    }

    #[test]
    fn blank_and_whitespace_lines_become_empty() {
        let doc = render_to_document("a\n\n   \nb\n");
        assert_eq!(doc.paragraphs.len(), 4);
        assert_eq!(doc.paragraphs[1], Paragraph::empty());
        assert_eq!(doc.paragraphs[2], Paragraph::empty());
    }

    #[test]
    fn heading_needs_space() {
        let doc = render_to_document("#tag\n#");
        assert_eq!(doc.paragraphs[0], Paragraph::plain("#tag"));
        assert_eq!(doc.paragraphs[1], Paragraph::plain("#"));
    }

    #[test]
    fn heading_text_is_verbatim() {
        let doc = render_to_document("##  spaced  ");
        assert_eq!(doc.paragraphs[0], Paragraph::heading(2, " spaced  "));
    }

    #[test]
    fn markdown_from_headings() {
        let doc = WordDocument {
            paragraphs: vec![
                Paragraph::heading(1, "App"),
                Paragraph::heading(2, "Box"),
                Paragraph::plain("Function: f"),
                Paragraph::empty(),
            ],
        };
        assert_eq!(render_to_markdown(&doc), "# App\n## Box\nFunction: f\n");
    }

    #[test]
    fn unparseable_heading_style_is_tolerated() {
        let doc = WordDocument {
            paragraphs: vec![
                Paragraph {
                    style: "Heading".to_string(),
                    text: "a".to_string(),
                },
                Paragraph {
                    style: "Heading1".to_string(),
                    text: "b".to_string(),
                },
            ],
        };
        assert_eq!(render_to_markdown(&doc), "a\nb");
    }

    #[test]
    fn zero_level_heading_keeps_space() {
        let doc = WordDocument {
            paragraphs: vec![Paragraph {
                style: "Heading 0".to_string(),
                text: "x".to_string(),
            }],
        };
        assert_eq!(render_to_markdown(&doc), " x");
    }

    #[test]
    fn heading_level_parsing() {
        assert_eq!(heading_level("Heading 3"), Some(3));
        assert_eq!(heading_level("Heading 12"), Some(12));
        assert_eq!(heading_level("Normal"), None);
        assert_eq!(heading_level("Title"), None);
        assert_eq!(heading_level("Heading x"), None);
    }

    #[test]
    fn absurd_heading_level_is_unprefixed() {
        assert_eq!(heading_level("Heading 64"), Some(64));
        assert_eq!(heading_level("Heading 65"), None);
        assert_eq!(heading_level("Heading 99999999999999"), None);
        let doc = WordDocument {
            paragraphs: vec![Paragraph {
                style: "Heading 99999999999999".to_string(),
                text: "x".to_string(),
            }],
        };
        assert_eq!(render_to_markdown(&doc), "x");
    }

    #[test]
    fn round_trip_preserves_lines() {
        let input = "# AppOne\n## Box1\nFunction: Sync\n\n### Detail\n#### deep\nplain";
        let out = render_to_markdown(&render_to_document(input));
        assert_eq!(out, input);
    }
}
