//! Error types for the doc_builder crate.

use std::io;

use thiserror::Error;

use crate::model::{FontSize, MAX_HEADING_LEVEL};

/// Result type alias for document building operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling, rendering or saving a document.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure while creating directories or writing the output file.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Heading level outside the range backed by built-in heading styles.
    #[error("heading level {0} is outside the supported range 1..={max}", max = MAX_HEADING_LEVEL)]
    InvalidHeadingLevel(u8),

    /// Font size that is not positive, not finite or larger than Word allows.
    #[error("font size {0}pt must be positive and at most {max}pt", max = FontSize::MAX_POINTS)]
    InvalidFontSize(f32),

    /// Text contains a character that XML 1.0 documents cannot carry.
    #[error("text contains {0:?}, which cannot be stored in an XML document")]
    InvalidCharacter(char),

    /// The DOCX zip container could not be written or read.
    #[error("DOCX package error: {0}")]
    Package(#[from] zip::result::ZipError),

    /// A DOCX part contained malformed XML.
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A required part was absent from a DOCX package.
    #[error("DOCX package is missing part `{0}`")]
    MissingPart(&'static str),

    /// PDF rendering or font loading failed.
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] genpdf::error::Error),

    /// The content definition could not be parsed.
    #[error("invalid content definition: {0}")]
    Content(#[from] toml::de::Error),
}
