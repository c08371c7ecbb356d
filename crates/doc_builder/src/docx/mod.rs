//! Office Open XML (`.docx`) output.
//!
//! A `.docx` file is a zip container (an OPC package) holding a handful of
//! XML parts.  [`DocxRenderer`] writes the minimal set Word needs to open the
//! document with working heading styles and bullet lists:
//!
//! | Part                           | Contents                               |
//! |--------------------------------|----------------------------------------|
//! | `[Content_Types].xml`          | MIME types of every part               |
//! | `_rels/.rels`                  | package-level relationships            |
//! | `word/document.xml`            | the paragraphs                         |
//! | `word/_rels/document.xml.rels` | links to styles and numbering          |
//! | `word/styles.xml`              | Title, Heading 1-9 and List Bullet     |
//! | `word/numbering.xml`           | the bullet definition                  |
//! | `docProps/core.xml`            | title and creator metadata             |
//!
//! Entries are written in a fixed order with a fixed timestamp, so rendering
//! the same [`Document`] twice yields identical bytes.

pub mod inspect;
mod parts;

use std::io::{Cursor, Write};

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::builder::Renderer;
use crate::error::Result;
use crate::model::Document;

/// Creator recorded in `docProps/core.xml` unless overridden.
pub const DEFAULT_CREATOR: &str = "doc_builder";

/// Renders documents into `.docx` packages.
#[derive(Clone, Debug)]
pub struct DocxRenderer {
    creator: String,
}

impl Default for DocxRenderer {
    fn default() -> Self {
        Self {
            creator: DEFAULT_CREATOR.to_owned(),
        }
    }
}

impl DocxRenderer {
    /// Creates a renderer with default metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the creator stored in the core properties and returns the updated renderer.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Returns the configured creator.
    pub fn creator(&self) -> &str {
        &self.creator
    }
}

impl Renderer for DocxRenderer {
    fn render(&self, document: &Document) -> Result<Vec<u8>> {
        let package = [
            (parts::CONTENT_TYPES, parts::content_types()?),
            (parts::PACKAGE_RELS, parts::package_relationships()?),
            (parts::DOCUMENT, parts::document(document)?),
            (parts::DOCUMENT_RELS, parts::document_relationships()?),
            (parts::STYLES, parts::styles(&document.heading_sizes())?),
            (parts::NUMBERING, parts::numbering()?),
            (
                parts::CORE_PROPERTIES,
                parts::core_properties(document.title(), &self.creator)?,
            ),
        ];

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in package {
            debug!("Writing DOCX part {} ({} bytes)", name, contents.len());
            zip.start_file(name, options)?;
            zip.write_all(&contents)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}
