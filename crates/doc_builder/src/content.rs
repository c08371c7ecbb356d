//! Loading document content from TOML definitions.
//!
//! A content file keeps the literal text of a document out of code:
//!
//! ```toml
//! name = "Example"
//!
//! [[heading_styles]]
//! level = 1
//! size = 18
//!
//! [[blocks]]
//! kind = "heading"
//! level = 1
//! text = "Introduction"
//!
//! [[blocks]]
//! kind = "paragraph"
//! text = "Hello\nWorld"
//!
//! [[blocks]]
//! kind = "bullets"
//! items = ["A", "B", "C"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::builder::{DocumentBuilder, OutputFormat};
use crate::error::Result;

/// Directory, relative to the working directory, that receives generated documents.
pub const OUTPUT_DIR: &str = "docs";

/// Point size for one heading level.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HeadingStyle {
    pub level: u8,
    pub size: f32,
}

/// One block of a content file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ContentBlock {
    Title { text: String },
    Heading { level: u8, text: String },
    /// Split into one paragraph per line when applied.
    Paragraph { text: String },
    Bullets { items: Vec<String> },
}

/// A parsed content file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContentFile {
    /// File stem of the generated document.
    pub name: String,
    #[serde(default)]
    pub heading_styles: Vec<HeadingStyle>,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

impl ContentFile {
    /// Parses a content definition from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses the content file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading content from {}", path.display());
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Returns `docs/<name>.<ext>` for the given format.
    pub fn default_output_path(&self, format: OutputFormat) -> PathBuf {
        Path::new(OUTPUT_DIR).join(format!("{}.{}", self.name, format.extension()))
    }

    /// Applies the heading styles and then every block, in file order.
    pub fn into_builder(self) -> Result<DocumentBuilder> {
        let mut builder = DocumentBuilder::new();
        builder.apply_heading_styles(
            self.heading_styles
                .iter()
                .map(|style| (style.level, style.size)),
        )?;

        for block in self.blocks {
            match block {
                ContentBlock::Title { text } => {
                    builder.add_title(text);
                }
                ContentBlock::Heading { level, text } => {
                    builder.add_heading(text, level)?;
                }
                ContentBlock::Paragraph { text } => {
                    builder.add_paragraph_block(&text);
                }
                ContentBlock::Bullets { items } => {
                    builder.add_bullet_list(items);
                }
            }
        }

        debug!(
            "Content '{}' expanded to {} directives",
            self.name,
            builder.document().directives().len()
        );
        Ok(builder)
    }
}
