//! PDF output through `genpdf`.

use genpdf::elements::{Break, Paragraph, UnorderedList};
use genpdf::error::{Error as PdfError, ErrorKind};
use genpdf::style::Style;
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position};

use crate::builder::Renderer;
use crate::error::Result;
use crate::fonts;
use crate::model::{ContentDirective, Document, FontSize};

const DEFAULT_MARGIN_MM: f64 = 25.4;
const FOOTER_HEIGHT_MM: f64 = 10.0;
const DEFAULT_BULLET: &str = "\u{2022}";

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn font_size_u8(size: FontSize) -> u8 {
    size.points().round().clamp(1.0, f32::from(u8::MAX)) as u8
}

/// Renders documents into PDF files.
///
/// Headings are bold at their effective point size, paragraphs are laid out
/// one per line and runs of consecutive bullet items form a single list.
#[derive(Clone, Debug)]
pub struct PdfRenderer {
    paper_size: PaperSize,
    margin_mm: f64,
    page_numbers: bool,
    bullet: String,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::Letter,
            margin_mm: DEFAULT_MARGIN_MM,
            page_numbers: true,
            bullet: DEFAULT_BULLET.to_owned(),
        }
    }
}

impl PdfRenderer {
    /// Creates a renderer with Letter paper, one inch margins and page numbers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size and returns the updated renderer.
    pub fn with_paper_size(mut self, paper_size: PaperSize) -> Self {
        self.paper_size = paper_size;
        self
    }

    /// Sets a uniform page margin in millimetres and returns the updated renderer.
    pub fn with_margins(mut self, margin_mm: f64) -> Self {
        self.margin_mm = margin_mm;
        self
    }

    /// Enables or disables the "Page N" footer.
    pub fn with_page_numbers(mut self, page_numbers: bool) -> Self {
        self.page_numbers = page_numbers;
        self
    }

    /// Sets the glyph used for bullet items.
    pub fn with_bullet(mut self, bullet: impl Into<String>) -> Self {
        self.bullet = bullet.into();
        self
    }
}

impl Renderer for PdfRenderer {
    fn render(&self, document: &Document) -> Result<Vec<u8>> {
        let font_family = fonts::default_font_family()?;
        let mut pdf = genpdf::Document::new(font_family);
        pdf.set_paper_size(self.paper_size);
        if let Some(title) = document.title() {
            pdf.set_title(title);
        }

        let footer_height = self.page_numbers.then(|| mm_from_f64(FOOTER_HEIGHT_MM));
        pdf.set_page_decorator(NumberedPageDecorator::new(
            Margins::all(mm_from_f64(self.margin_mm)),
            footer_height,
        ));

        let sizes = document.heading_sizes();
        let mut list: Option<UnorderedList> = None;

        for directive in document.directives() {
            if !matches!(directive, ContentDirective::BulletItem(_)) {
                if let Some(finished) = list.take() {
                    pdf.push(finished);
                }
            }

            match directive {
                ContentDirective::Title(text) => {
                    let style = Style::new().bold().with_font_size(font_size_u8(FontSize::TITLE));
                    pdf.push(
                        Paragraph::new(text.as_str())
                            .styled(style)
                            .padded(Margins::trbl(0, 0, 4, 0)),
                    );
                }
                ContentDirective::Heading { level, text } => {
                    let size = sizes
                        .get(level)
                        .copied()
                        .unwrap_or_else(|| level.default_font_size());
                    let style = Style::new().bold().with_font_size(font_size_u8(size));
                    pdf.push(
                        Paragraph::new(text.as_str())
                            .styled(style)
                            .padded(Margins::trbl(4, 0, 1, 0)),
                    );
                }
                ContentDirective::Paragraph(text) => {
                    for line in text.split('\n') {
                        let line = line.strip_suffix('\r').unwrap_or(line);
                        if line.is_empty() {
                            pdf.push(Break::new(1));
                        } else {
                            pdf.push(Paragraph::new(line).padded(Margins::trbl(0, 0, 2, 0)));
                        }
                    }
                }
                ContentDirective::BulletItem(text) => {
                    list.get_or_insert_with(|| UnorderedList::with_bullet(self.bullet.clone()))
                        .push(Paragraph::new(text.as_str()));
                }
                ContentDirective::StyleOverride { .. } => {}
            }
        }

        if let Some(finished) = list.take() {
            pdf.push(finished);
        }

        let mut bytes = Vec::new();
        pdf.render(&mut bytes)?;
        Ok(bytes)
    }
}

/// Applies page margins and draws an optional centered page number footer.
struct NumberedPageDecorator {
    page: usize,
    margins: Margins,
    footer_height: Option<Mm>,
}

impl NumberedPageDecorator {
    fn new(margins: Margins, footer_height: Option<Mm>) -> Self {
        Self {
            page: 0,
            margins,
            footer_height,
        }
    }
}

impl PageDecorator for NumberedPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> std::result::Result<genpdf::render::Area<'a>, PdfError> {
        self.page += 1;
        area.add_margins(self.margins);

        if let Some(height) = self.footer_height {
            let available = area.size().height;
            if height > available {
                return Err(PdfError::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - height));
            let mut footer =
                Paragraph::new(format!("Page {}", self.page)).aligned(Alignment::Center);
            let result = footer.render(context, footer_area, style)?;
            if result.has_more {
                return Err(PdfError::new(
                    "Page number does not fit into the reserved footer space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - height);
        }

        Ok(area)
    }
}
