//! XML part writers for the DOCX package.

use std::collections::BTreeMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::model::{ContentDirective, Document, FontSize, HeadingLevel, MAX_HEADING_LEVEL};

pub(crate) const CONTENT_TYPES: &str = "[Content_Types].xml";
pub(crate) const PACKAGE_RELS: &str = "_rels/.rels";
pub(crate) const DOCUMENT: &str = "word/document.xml";
pub(crate) const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
pub(crate) const STYLES: &str = "word/styles.xml";
pub(crate) const NUMBERING: &str = "word/numbering.xml";
pub(crate) const CORE_PROPERTIES: &str = "docProps/core.xml";

pub(crate) const TITLE_STYLE: &str = "Title";
pub(crate) const LIST_BULLET_STYLE: &str = "ListBullet";
pub(crate) const HEADING_STYLE_PREFIX: &str = "Heading";

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const BULLET_NUM_ID: &str = "1";
const BULLET_GLYPH: &str = "\u{2022}";

// Letter paper with one inch margins, in twentieths of a point.
const PAGE_WIDTH: &str = "12240";
const PAGE_HEIGHT: &str = "15840";
const PAGE_MARGIN: &str = "1440";
const HEADER_FOOTER_DISTANCE: &str = "720";

/// Thin wrapper over [`quick_xml::Writer`] for the element shapes used in OOXML parts.
struct PartWriter {
    writer: Writer<Vec<u8>>,
}

impl PartWriter {
    fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// Writes escaped character data, rejecting characters XML 1.0 cannot represent.
    fn text(&mut self, text: &str) -> Result<()> {
        if let Some(invalid) = text.chars().find(|&ch| !is_xml_char(ch)) {
            return Err(Error::InvalidCharacter(invalid));
        }
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.open(name, attributes)?;
        self.text(text)?;
        self.close(name)
    }

    /// Writes `<name w:val="value"/>`.
    fn val(&mut self, name: &str, value: &str) -> Result<()> {
        self.empty(name, &[("w:val", value)])
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// `Char` production of XML 1.0; surrogates never occur in a `char`.
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

pub(crate) fn heading_style_id(level: HeadingLevel) -> String {
    format!("{}{}", HEADING_STYLE_PREFIX, level.get())
}

pub(crate) fn content_types() -> Result<Vec<u8>> {
    const OVERRIDES: &[(&str, &str)] = &[
        (
            "/word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/styles.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ),
        (
            "/word/numbering.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
    ];

    let mut part = PartWriter::new()?;
    part.open("Types", &[("xmlns", CONTENT_TYPES_NS)])?;
    part.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    part.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for &(name, content_type) in OVERRIDES {
        part.empty(
            "Override",
            &[("PartName", name), ("ContentType", content_type)],
        )?;
    }
    part.close("Types")?;
    Ok(part.finish())
}

fn relationships(entries: &[(&str, &str, &str)]) -> Result<Vec<u8>> {
    let mut part = PartWriter::new()?;
    part.open("Relationships", &[("xmlns", PACKAGE_RELATIONSHIPS_NS)])?;
    for &(id, kind, target) in entries {
        part.empty(
            "Relationship",
            &[("Id", id), ("Type", kind), ("Target", target)],
        )?;
    }
    part.close("Relationships")?;
    Ok(part.finish())
}

pub(crate) fn package_relationships() -> Result<Vec<u8>> {
    relationships(&[
        (
            "rId1",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            DOCUMENT,
        ),
        (
            "rId2",
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            CORE_PROPERTIES,
        ),
    ])
}

pub(crate) fn document_relationships() -> Result<Vec<u8>> {
    relationships(&[
        (
            "rId1",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles",
            "styles.xml",
        ),
        (
            "rId2",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering",
            "numbering.xml",
        ),
    ])
}

pub(crate) fn document(document: &Document) -> Result<Vec<u8>> {
    let mut part = PartWriter::new()?;
    part.open(
        "w:document",
        &[("xmlns:w", WORDPROCESSING_NS), ("xmlns:r", RELATIONSHIPS_NS)],
    )?;
    part.open("w:body", &[])?;

    for directive in document.directives() {
        match directive {
            ContentDirective::Title(text) => paragraph(&mut part, Some(TITLE_STYLE), text)?,
            ContentDirective::Heading { level, text } => {
                paragraph(&mut part, Some(heading_style_id(*level).as_str()), text)?
            }
            ContentDirective::Paragraph(text) => paragraph(&mut part, None, text)?,
            ContentDirective::BulletItem(text) => {
                paragraph(&mut part, Some(LIST_BULLET_STYLE), text)?
            }
            ContentDirective::StyleOverride { .. } => {}
        }
    }

    part.open("w:sectPr", &[])?;
    part.empty("w:pgSz", &[("w:w", PAGE_WIDTH), ("w:h", PAGE_HEIGHT)])?;
    part.empty(
        "w:pgMar",
        &[
            ("w:top", PAGE_MARGIN),
            ("w:right", PAGE_MARGIN),
            ("w:bottom", PAGE_MARGIN),
            ("w:left", PAGE_MARGIN),
            ("w:header", HEADER_FOOTER_DISTANCE),
            ("w:footer", HEADER_FOOTER_DISTANCE),
            ("w:gutter", "0"),
        ],
    )?;
    part.close("w:sectPr")?;

    part.close("w:body")?;
    part.close("w:document")?;
    Ok(part.finish())
}

/// Writes one `w:p` holding a single run.
///
/// `\n`, `\r` and `\r\n` become `w:br`; `\t` becomes `w:tab`.
fn paragraph(part: &mut PartWriter, style: Option<&str>, text: &str) -> Result<()> {
    part.open("w:p", &[])?;
    if let Some(style) = style {
        part.open("w:pPr", &[])?;
        part.val("w:pStyle", style)?;
        part.close("w:pPr")?;
    }

    if !text.is_empty() {
        part.open("w:r", &[])?;
        let mut pending = String::new();
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            let control = match ch {
                '\n' => "w:br",
                '\r' => {
                    chars.next_if_eq(&'\n');
                    "w:br"
                }
                '\t' => "w:tab",
                _ => {
                    pending.push(ch);
                    continue;
                }
            };
            run_text(part, &pending)?;
            pending.clear();
            part.empty(control, &[])?;
        }
        run_text(part, &pending)?;
        part.close("w:r")?;
    }

    part.close("w:p")
}

fn run_text(part: &mut PartWriter, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    part.text_element("w:t", &[("xml:space", "preserve")], text)
}

pub(crate) fn styles(overrides: &BTreeMap<HeadingLevel, FontSize>) -> Result<Vec<u8>> {
    let mut part = PartWriter::new()?;
    part.open("w:styles", &[("xmlns:w", WORDPROCESSING_NS)])?;

    part.open("w:docDefaults", &[])?;
    part.open("w:rPrDefault", &[])?;
    part.open("w:rPr", &[])?;
    part.empty(
        "w:rFonts",
        &[
            ("w:ascii", "Calibri"),
            ("w:hAnsi", "Calibri"),
            ("w:eastAsia", "Calibri"),
            ("w:cs", "Calibri"),
        ],
    )?;
    part.val("w:sz", "22")?;
    part.val("w:szCs", "22")?;
    part.val("w:lang", "en-US")?;
    part.close("w:rPr")?;
    part.close("w:rPrDefault")?;
    part.open("w:pPrDefault", &[])?;
    part.open("w:pPr", &[])?;
    part.empty(
        "w:spacing",
        &[("w:after", "160"), ("w:line", "259"), ("w:lineRule", "auto")],
    )?;
    part.close("w:pPr")?;
    part.close("w:pPrDefault")?;
    part.close("w:docDefaults")?;

    part.open(
        "w:style",
        &[
            ("w:type", "paragraph"),
            ("w:default", "1"),
            ("w:styleId", "Normal"),
        ],
    )?;
    part.val("w:name", "Normal")?;
    part.empty("w:qFormat", &[])?;
    part.close("w:style")?;

    part.open(
        "w:style",
        &[("w:type", "paragraph"), ("w:styleId", TITLE_STYLE)],
    )?;
    part.val("w:name", "Title")?;
    part.val("w:basedOn", "Normal")?;
    part.val("w:next", "Normal")?;
    part.empty("w:qFormat", &[])?;
    part.open("w:pPr", &[])?;
    part.empty("w:spacing", &[("w:after", "80")])?;
    part.empty("w:contextualSpacing", &[])?;
    part.close("w:pPr")?;
    run_properties(&mut part, FontSize::TITLE, false)?;
    part.close("w:style")?;

    for level in (1..=MAX_HEADING_LEVEL).filter_map(|level| HeadingLevel::new(level).ok()) {
        let size = overrides
            .get(&level)
            .copied()
            .unwrap_or_else(|| level.default_font_size());
        let style_id = heading_style_id(level);
        let outline_level = (level.get() - 1).to_string();
        let space_before = if level.get() == 1 { "480" } else { "200" };

        part.open("w:style", &[("w:type", "paragraph"), ("w:styleId", style_id.as_str())])?;
        part.val("w:name", &format!("heading {}", level))?;
        part.val("w:basedOn", "Normal")?;
        part.val("w:next", "Normal")?;
        part.val("w:uiPriority", "9")?;
        part.empty("w:qFormat", &[])?;
        part.open("w:pPr", &[])?;
        part.empty("w:keepNext", &[])?;
        part.empty("w:keepLines", &[])?;
        part.empty("w:spacing", &[("w:before", space_before), ("w:after", "0")])?;
        part.val("w:outlineLvl", &outline_level)?;
        part.close("w:pPr")?;
        run_properties(&mut part, size, true)?;
        part.close("w:style")?;
    }

    part.open(
        "w:style",
        &[("w:type", "paragraph"), ("w:styleId", LIST_BULLET_STYLE)],
    )?;
    part.val("w:name", "List Bullet")?;
    part.val("w:basedOn", "Normal")?;
    part.empty("w:qFormat", &[])?;
    part.open("w:pPr", &[])?;
    part.open("w:numPr", &[])?;
    part.val("w:ilvl", "0")?;
    part.val("w:numId", BULLET_NUM_ID)?;
    part.close("w:numPr")?;
    part.empty("w:contextualSpacing", &[])?;
    part.close("w:pPr")?;
    part.close("w:style")?;

    part.close("w:styles")?;
    Ok(part.finish())
}

fn run_properties(part: &mut PartWriter, size: FontSize, bold: bool) -> Result<()> {
    let half_points = size.half_points().to_string();
    part.open("w:rPr", &[])?;
    if bold {
        part.empty("w:b", &[])?;
        part.empty("w:bCs", &[])?;
    }
    part.val("w:sz", &half_points)?;
    part.val("w:szCs", &half_points)?;
    part.close("w:rPr")
}

pub(crate) fn numbering() -> Result<Vec<u8>> {
    let mut part = PartWriter::new()?;
    part.open("w:numbering", &[("xmlns:w", WORDPROCESSING_NS)])?;

    part.open("w:abstractNum", &[("w:abstractNumId", "0")])?;
    part.val("w:multiLevelType", "hybridMultilevel")?;
    part.open("w:lvl", &[("w:ilvl", "0")])?;
    part.val("w:start", "1")?;
    part.val("w:numFmt", "bullet")?;
    part.val("w:lvlText", BULLET_GLYPH)?;
    part.val("w:lvlJc", "left")?;
    part.open("w:pPr", &[])?;
    part.empty("w:ind", &[("w:left", "720"), ("w:hanging", "360")])?;
    part.close("w:pPr")?;
    part.close("w:lvl")?;
    part.close("w:abstractNum")?;

    part.open("w:num", &[("w:numId", BULLET_NUM_ID)])?;
    part.val("w:abstractNumId", "0")?;
    part.close("w:num")?;

    part.close("w:numbering")?;
    Ok(part.finish())
}

pub(crate) fn core_properties(title: Option<&str>, creator: &str) -> Result<Vec<u8>> {
    let mut part = PartWriter::new()?;
    part.open(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    if let Some(title) = title {
        part.text_element("dc:title", &[], title)?;
    }
    part.text_element("dc:creator", &[], creator)?;
    part.close("cp:coreProperties")?;
    Ok(part.finish())
}
