//! Core entry point for the doc_builder crate.
//!
//! Documents are described as an ordered list of [`ContentDirective`]s and
//! handed to a [`Renderer`].  [`DocumentBuilder`] provides the imperative
//! `add_*` API on top of that list and saves the result to disk.

pub mod builder;
pub mod content;
pub mod docx;
pub mod error;
pub mod fonts;
pub mod model;
pub mod pdf;

pub use builder::{DocumentBuilder, OutputFormat, Renderer};
pub use content::ContentFile;
pub use docx::DocxRenderer;
pub use error::{Error, Result};
pub use model::{ContentDirective, DirectiveCounts, Document, FontSize, HeadingLevel};
pub use pdf::PdfRenderer;
