//! Document construction helpers for the doc_builder crate.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::docx::DocxRenderer;
use crate::error::Result;
use crate::model::{ContentDirective, Document, FontSize, HeadingLevel};
use crate::pdf::PdfRenderer;

/// Serializes a [`Document`] into the bytes of one output format.
pub trait Renderer {
    /// Renders the document and returns the encoded file contents.
    fn render(&self, document: &Document) -> Result<Vec<u8>>;
}

/// Output formats with a built-in renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Office Open XML word processing document.
    #[default]
    Docx,
    /// PDF rendered through `genpdf`.
    Pdf,
}

impl OutputFormat {
    /// File extension used for this format, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Guesses the format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("docx") {
            Some(OutputFormat::Docx)
        } else if extension.eq_ignore_ascii_case("pdf") {
            Some(OutputFormat::Pdf)
        } else {
            None
        }
    }
}

/// Accumulates content directives and saves them as a document file.
///
/// Every `add_*` call appends to the end of the document; there is no cursor
/// to move and nothing is ever reordered.  Rendering happens only in
/// [`render`](Self::render) and [`save`](Self::save).
///
/// ```no_run
/// use doc_builder::DocumentBuilder;
///
/// let mut builder = DocumentBuilder::new();
/// builder.apply_heading_styles([(1, 18.0), (2, 16.0)])?;
/// builder.add_heading("Introduction", 1)?;
/// builder.add_paragraph_block("Hello\nWorld");
/// builder.add_bullet_list(["A", "B", "C"]);
/// builder.save("docs/example.docx")?;
/// # Ok::<(), doc_builder::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
    format: OutputFormat,
}

impl DocumentBuilder {
    /// Creates an empty builder producing DOCX output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated with the given directives.
    pub fn from_directives<I>(directives: I) -> Self
    where
        I: IntoIterator<Item = ContentDirective>,
    {
        Self {
            document: directives.into_iter().collect(),
            format: OutputFormat::default(),
        }
    }

    /// Selects the output format and returns the updated builder.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Returns the accumulated document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Appends an arbitrary directive.
    pub fn push(&mut self, directive: ContentDirective) -> &mut Self {
        self.document.push(directive);
        self
    }

    /// Configures the point size used for each heading level.
    ///
    /// Levels missing from `sizes` keep the output format's default.  All
    /// entries are validated before any of them is recorded.
    pub fn apply_heading_styles<I>(&mut self, sizes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (u8, f32)>,
    {
        let overrides = sizes
            .into_iter()
            .map(|(level, points)| {
                Ok(ContentDirective::StyleOverride {
                    level: HeadingLevel::new(level)?,
                    size: FontSize::new(points)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("Applying {} heading style overrides", overrides.len());
        self.document.extend(overrides);
        Ok(self)
    }

    /// Appends the document title.
    pub fn add_title(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(ContentDirective::Title(text.into()))
    }

    /// Appends a heading at the given nesting level.
    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) -> Result<&mut Self> {
        let directive = ContentDirective::heading(text, level)?;
        Ok(self.push(directive))
    }

    /// Appends one paragraph per line of `text`.
    ///
    /// `K` line breaks yield `K + 1` paragraphs; blank lines become empty
    /// paragraphs.  A `\r` preceding a line break is dropped.
    pub fn add_paragraph_block(&mut self, text: &str) -> &mut Self {
        let lines = text
            .split('\n')
            .map(|line| ContentDirective::paragraph(line.strip_suffix('\r').unwrap_or(line)));
        self.document.extend(lines);
        self
    }

    /// Appends each item as a bulleted paragraph, preserving order.
    pub fn add_bullet_list<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document
            .extend(items.into_iter().map(ContentDirective::bullet));
        self
    }

    /// Renders the document with the built-in renderer for the selected format.
    pub fn render(&self) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Docx => self.render_with(&DocxRenderer::default()),
            OutputFormat::Pdf => self.render_with(&PdfRenderer::default()),
        }
    }

    /// Renders the document with a caller-supplied renderer.
    pub fn render_with<R: Renderer + ?Sized>(&self, renderer: &R) -> Result<Vec<u8>> {
        renderer.render(&self.document)
    }

    /// Saves the document to `path` using the selected format's renderer.
    ///
    /// Missing parent directories are created first.  An existing file at
    /// `path` is overwritten.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        match self.format {
            OutputFormat::Docx => self.save_with(path, &DocxRenderer::default()),
            OutputFormat::Pdf => self.save_with(path, &PdfRenderer::default()),
        }
    }

    /// Saves the document to `path` using a caller-supplied renderer.
    pub fn save_with<R: Renderer + ?Sized>(&self, path: impl AsRef<Path>, renderer: &R) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let bytes = self.render_with(renderer)?;
        fs::write(path, &bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn paragraph_block_splits_on_line_breaks() {
        let mut builder = DocumentBuilder::new();
        builder.add_paragraph_block("first\r\nsecond\n\nfourth");

        assert_eq!(
            builder.document().directives(),
            &[
                ContentDirective::paragraph("first"),
                ContentDirective::paragraph("second"),
                ContentDirective::paragraph(""),
                ContentDirective::paragraph("fourth"),
            ]
        );
    }

    #[test]
    fn invalid_heading_level_is_rejected() {
        let mut builder = DocumentBuilder::new();
        let err = builder.add_heading("Too deep", 10).unwrap_err();
        assert!(matches!(err, Error::InvalidHeadingLevel(10)));
        assert!(builder.document().directives().is_empty());
    }

    #[test]
    fn heading_styles_are_all_or_nothing() {
        let mut builder = DocumentBuilder::new();
        let result = builder.apply_heading_styles([(1, 18.0), (0, 12.0)]);
        assert!(result.is_err());
        assert!(builder.document().heading_sizes().is_empty());
    }

    #[test]
    fn builder_defaults_to_docx() {
        let builder = DocumentBuilder::new();
        assert_eq!(builder.format(), OutputFormat::Docx);
        assert_eq!(builder.with_format(OutputFormat::Pdf).format(), OutputFormat::Pdf);
    }

    #[test]
    fn format_is_guessed_from_extension() {
        assert_eq!(OutputFormat::from_path("docs/srs.DOCX"), Some(OutputFormat::Docx));
        assert_eq!(OutputFormat::from_path("out.pdf"), Some(OutputFormat::Pdf));
        assert_eq!(OutputFormat::from_path("notes.txt"), None);
        assert_eq!(OutputFormat::from_path("README"), None);
    }
}
