//! `.docx` package reading and writing.
//!
//! Writing goes through the `docx-rs` builder. Reading is manual ZIP + XML
//! streaming, since only paragraph text and style names are needed:
//!
//! - `word/styles.xml`: style id → display name ("Heading1" → "Heading 1")
//! - `word/document.xml`: body paragraphs, their `w:pStyle` id and run text

use crate::model::{Paragraph, WordDocument, NORMAL_STYLE};
use crate::transcode::markdown::heading_level;
use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

// -- Writing ------------------------------------------------------------------

/// Style id used for a heading paragraph of the given level.
fn heading_style_id(level: i64) -> String {
    format!("Heading{}", level)
}

/// Write `doc` as a `.docx` package at `path`.
pub fn write(doc: &WordDocument, path: &Path) -> Result<()> {
    let mut levels: Vec<i64> = doc
        .paragraphs
        .iter()
        .filter_map(|p| heading_level(&p.style))
        .filter(|level| *level >= 1)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut docx = docx_rs::Docx::new();
    for level in levels {
        docx = docx.add_style(
            docx_rs::Style::new(heading_style_id(level), docx_rs::StyleType::Paragraph)
                .name(format!("Heading {}", level)),
        );
    }

    for para in &doc.paragraphs {
        let mut out = docx_rs::Paragraph::new();
        if !para.text.is_empty() {
            out = out.add_run(docx_rs::Run::new().add_text(para.text.as_str()));
        }
        if let Some(level) = heading_level(&para.style).filter(|l| *l >= 1) {
            out = out.style(&heading_style_id(level));
        }
        docx = docx.add_paragraph(out);
    }

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    docx.build()
        .pack(file)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!(
        "wrote {} paragraph(s) to {}",
        doc.paragraphs.len(),
        path.display()
    );
    Ok(())
}

// -- Reading ------------------------------------------------------------------

/// Read the body paragraphs of the `.docx` package at `path`.
pub fn read(path: &Path) -> Result<WordDocument> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("{} is not a valid .docx package", path.display()))?;

    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => parse_styles(&xml)
            .with_context(|| format!("failed to parse {} in {}", STYLES_PART, path.display()))?,
        None => StyleTable::default(),
    };
    let document = read_part(&mut archive, DOCUMENT_PART)?
        .with_context(|| format!("{} has no {}", path.display(), DOCUMENT_PART))?;
    let doc = parse_document(&document, &styles)
        .with_context(|| format!("failed to parse {} in {}", DOCUMENT_PART, path.display()))?;

    log::debug!(
        "read {} paragraph(s) from {}",
        doc.paragraphs.len(),
        path.display()
    );
    Ok(doc)
}

/// Read a package part as text. `Ok(None)` if the part does not exist.
fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("failed to open {}", name)),
    };
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .with_context(|| format!("failed to read {}", name))?;
    Ok(Some(xml))
}

/// Style id → display name, plus the default paragraph style.
#[derive(Debug, Default)]
struct StyleTable {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleTable {
    /// Display name for a paragraph's `w:pStyle` id.
    fn resolve(&self, style_id: Option<&str>) -> String {
        style_id
            .and_then(|id| self.names.get(id))
            .or(self.default_paragraph.as_ref())
            .cloned()
            .unwrap_or_else(|| NORMAL_STYLE.to_string())
    }
}

/// Map the lower-case names word processors store for built-in styles to
/// the names shown in the UI.
fn ui_style_name(name: &str) -> String {
    if let Some(level) = name.strip_prefix("heading ") {
        return format!("Heading {}", level);
    }
    match name {
        "caption" => "Caption".to_string(),
        "footer" => "Footer".to_string(),
        "header" => "Header".to_string(),
        "title" => "Title".to_string(),
        _ => name.to_string(),
    }
}

/// Value of the attribute whose local name is `key` (namespace prefix ignored).
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn is_on(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "on"))
}

fn parse_styles(xml: &str) -> Result<StyleTable> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut table = StyleTable::default();
    let mut buf = Vec::new();

    // (style id, is default paragraph style, display name)
    let mut current: Option<(String, bool, Option<String>)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"style" => {
                let id = attr(&e, b"styleId").unwrap_or_default();
                let is_default = attr(&e, b"type").as_deref() == Some("paragraph")
                    && is_on(attr(&e, b"default").as_deref());
                current = Some((id, is_default, None));
            }
            Event::Empty(e) if e.local_name().as_ref() == b"name" => {
                if let Some((_, _, name)) = current.as_mut() {
                    *name = attr(&e, b"val").map(|v| ui_style_name(&v));
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"style" => {
                if let Some((id, is_default, name)) = current.take() {
                    let name = name.unwrap_or_else(|| id.clone());
                    if is_default {
                        table.default_paragraph = Some(name.clone());
                    }
                    table.names.insert(id, name);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(table)
}

/// Paragraph being collected.
#[derive(Default)]
struct OpenParagraph {
    style_id: Option<String>,
    text: String,
}

/// Streaming state for `word/document.xml`.
///
/// Only `w:p` elements that are direct children of `w:body` are collected.
/// Within such a paragraph, text comes from `w:r` children and from runs
/// inside `w:hyperlink`; tables, content controls, text boxes, tracked
/// insertions and the like are not part of the paragraph flow.
#[derive(Default)]
struct BodyWalker {
    paragraphs: Vec<Paragraph>,
    current: Option<OpenParagraph>,
    /// Local names of the currently open elements, outermost first.
    stack: Vec<Vec<u8>>,
    /// Stack length when the current paragraph was opened.
    paragraph_depth: usize,
}

impl BodyWalker {
    /// Open elements between the current paragraph and the element being
    /// handled, e.g. `["r"]` for a `w:t` directly inside a run.
    fn inside_paragraph(&self) -> &[Vec<u8>] {
        match self.current {
            Some(_) => self.stack.get(self.paragraph_depth + 1..).unwrap_or_default(),
            None => &[],
        }
    }

    /// True if the path is a run of the paragraph or of one of its hyperlinks.
    fn is_run_path(path: &[Vec<u8>]) -> bool {
        match path {
            [r] => r == b"r",
            [link, r] => link == b"hyperlink" && r == b"r",
            _ => false,
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(para) = self.current.as_mut() {
            para.text.push_str(text);
        }
    }

    fn finish_paragraph(&mut self, styles: &StyleTable) {
        if let Some(para) = self.current.take() {
            self.paragraphs.push(Paragraph {
                style: styles.resolve(para.style_id.as_deref()),
                text: para.text,
            });
        }
    }

    /// Handle an element opening (`Start` or `Empty`), before it is pushed.
    fn open_element(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name();
        let name = name.as_ref();

        if name == b"p" {
            if self.current.is_none() && self.stack.last().is_some_and(|n| n == b"body") {
                self.current = Some(OpenParagraph::default());
                self.paragraph_depth = self.stack.len();
            }
            return;
        }

        let path = self.inside_paragraph();
        if name == b"pStyle" && path.len() == 1 && path[0] == b"pPr" {
            let style_id = attr(e, b"val");
            if let Some(para) = self.current.as_mut() {
                para.style_id = style_id;
            }
        } else if Self::is_run_path(path) {
            match name {
                b"tab" => self.push_text("\t"),
                b"br" | b"cr" => self.push_text("\n"),
                _ => {}
            }
        }
    }

    /// Handle an element closing; `Empty` elements close right after opening.
    fn close_element(&mut self, styles: &StyleTable) {
        if self.current.is_some() && self.stack.len() == self.paragraph_depth {
            self.finish_paragraph(styles);
        }
    }

    /// True if character data at this point belongs to a paragraph run's `w:t`.
    fn in_run_text(&self) -> bool {
        match self.inside_paragraph().split_last() {
            Some((last, parents)) => last == b"t" && Self::is_run_path(parents),
            None => false,
        }
    }
}

fn parse_document(xml: &str, styles: &StyleTable) -> Result<WordDocument> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut walker = BodyWalker::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                walker.open_element(&e);
                walker.stack.push(e.local_name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                walker.open_element(&e);
                walker.close_element(styles);
            }
            Event::Text(e) => {
                if walker.in_run_text() {
                    let text = e.unescape()?;
                    walker.push_text(&text);
                }
            }
            Event::End(_) => {
                walker.stack.pop();
                walker.close_element(styles);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(WordDocument {
        paragraphs: walker.paragraphs,
    })
}
