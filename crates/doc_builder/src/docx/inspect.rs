//! Reads a `.docx` package back into a flat outline.
//!
//! Only the constructs produced by [`DocxRenderer`](super::DocxRenderer) are
//! understood: paragraph styles, text runs with line breaks, heading sizes in
//! `styles.xml` and the core title and creator.  Anything else is skipped.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::parts::{
    CORE_PROPERTIES, DOCUMENT, HEADING_STYLE_PREFIX, LIST_BULLET_STYLE, STYLES, TITLE_STYLE,
};
use crate::error::{Error, Result};
use crate::model::DirectiveCounts;

/// Role of a paragraph, derived from its paragraph style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParagraphKind {
    Title,
    Heading(u8),
    Body,
    Bullet,
}

impl ParagraphKind {
    fn from_style(style: Option<&str>) -> Self {
        match style {
            Some(TITLE_STYLE) => ParagraphKind::Title,
            Some(LIST_BULLET_STYLE) => ParagraphKind::Bullet,
            Some(style) => style
                .strip_prefix(HEADING_STYLE_PREFIX)
                .and_then(|level| level.parse().ok())
                .map_or(ParagraphKind::Body, ParagraphKind::Heading),
            None => ParagraphKind::Body,
        }
    }
}

/// One paragraph of `word/document.xml`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineParagraph {
    pub kind: ParagraphKind,
    pub text: String,
}

/// Structural view of a DOCX package.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocxOutline {
    /// Paragraphs in document order.
    pub paragraphs: Vec<OutlineParagraph>,
    /// Heading level to point size, as declared by the heading styles.
    pub heading_sizes: BTreeMap<u8, f32>,
    /// `dc:title` from the core properties.
    pub title: Option<String>,
    /// `dc:creator` from the core properties.
    pub creator: Option<String>,
}

impl DocxOutline {
    /// Counts paragraphs by kind, for comparison with [`Document::counts`](crate::Document::counts).
    pub fn counts(&self) -> DirectiveCounts {
        let mut counts = DirectiveCounts::default();
        for paragraph in &self.paragraphs {
            match paragraph.kind {
                ParagraphKind::Title => counts.titles += 1,
                ParagraphKind::Heading(_) => counts.headings += 1,
                ParagraphKind::Body => counts.paragraphs += 1,
                ParagraphKind::Bullet => counts.bullets += 1,
            }
        }
        counts
    }

    /// Returns the text of every paragraph of the given kind, in order.
    pub fn texts(&self, kind: ParagraphKind) -> Vec<&str> {
        self.paragraphs
            .iter()
            .filter(|paragraph| paragraph.kind == kind)
            .map(|paragraph| paragraph.text.as_str())
            .collect()
    }
}

/// Parses a DOCX package held in memory.
pub fn read_docx(bytes: &[u8]) -> Result<DocxOutline> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let document = read_part(&mut archive, DOCUMENT)?
        .ok_or(Error::MissingPart(DOCUMENT))?;
    let styles = read_part(&mut archive, STYLES)?;
    let core = read_part(&mut archive, CORE_PROPERTIES)?;

    Ok(DocxOutline {
        paragraphs: parse_paragraphs(&document)?,
        heading_sizes: match styles {
            Some(xml) => parse_heading_sizes(&xml)?,
            None => BTreeMap::new(),
        },
        title: match &core {
            Some(xml) => parse_core_property(xml, b"dc:title")?,
            None => None,
        },
        creator: match &core {
            Some(xml) => parse_core_property(xml, b"dc:creator")?,
            None => None,
        },
    })
}

/// Parses the DOCX package stored at `path`.
pub fn read_docx_file(path: impl AsRef<Path>) -> Result<DocxOutline> {
    let bytes = fs::read(path)?;
    read_docx(&bytes)
}

fn read_part<R>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>>
where
    R: Read + std::io::Seek,
{
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(Some(contents))
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match start
        .try_get_attribute(name)
        .map_err(quick_xml::Error::from)?
    {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn parse_paragraphs(xml: &str) -> Result<Vec<OutlineParagraph>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<(Option<String>, String)> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current = Some((None, String::new())),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(OutlineParagraph {
                    kind: ParagraphKind::Body,
                    text: String::new(),
                }),
                b"w:pStyle" => {
                    if let Some((style, _)) = current.as_mut() {
                        *style = attribute(&e, "w:val")?;
                    }
                }
                b"w:br" => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push('\n');
                    }
                }
                b"w:tab" => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push('\t');
                    }
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some((style, text)) = current.take() {
                        paragraphs.push(OutlineParagraph {
                            kind: ParagraphKind::from_style(style.as_deref()),
                            text,
                        });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parse_heading_sizes(xml: &str) -> Result<BTreeMap<u8, f32>> {
    let mut reader = Reader::from_str(xml);
    let mut sizes = BTreeMap::new();
    let mut level: Option<u8> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:style" => {
                level = attribute(&e, "w:styleId")?.and_then(|id| {
                    match ParagraphKind::from_style(Some(id.as_str())) {
                        ParagraphKind::Heading(level) => Some(level),
                        _ => None,
                    }
                });
            }
            Event::End(e) if e.name().as_ref() == b"w:style" => level = None,
            Event::Empty(e) if e.name().as_ref() == b"w:sz" => {
                if let Some(level) = level {
                    let half_points = attribute(&e, "w:val")?
                        .and_then(|value| value.parse::<u32>().ok());
                    if let Some(half_points) = half_points {
                        sizes.insert(level, half_points as f32 / 2.0);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(sizes)
}

/// Returns the text of the first `element` in `docProps/core.xml`.
fn parse_core_property(xml: &str, element: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    let mut value: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == element && value.is_none() => {
                inside = true;
                value = Some(String::new());
            }
            Event::End(e) if e.name().as_ref() == element => inside = false,
            Event::Text(e) if inside => {
                if let Some(value) = value.as_mut() {
                    value.push_str(&e.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(value)
}
