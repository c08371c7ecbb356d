//! Data structures describing the logical content of a document.
//!
//! The types in this module are independent of any output format.  A
//! [`Document`] is nothing more than an ordered list of [`ContentDirective`]
//! values; renderers walk that list front to back, so document order is
//! emission order.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Highest heading level backed by a built-in heading style.
pub const MAX_HEADING_LEVEL: u8 = 9;

/// Nesting level of a heading, validated to `1..=MAX_HEADING_LEVEL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Creates a heading level, rejecting values outside the supported range.
    pub fn new(level: u8) -> Result<Self> {
        if (1..=MAX_HEADING_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Error::InvalidHeadingLevel(level))
        }
    }

    /// Returns the numeric level.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Point size used when no style override is present for this level.
    pub fn default_font_size(self) -> FontSize {
        match self.0 {
            1 => FontSize(14.0),
            2 => FontSize(13.0),
            _ => FontSize(11.0),
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font size in points.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontSize(f32);

impl FontSize {
    /// Point size of the document title when no other size is configured.
    pub const TITLE: FontSize = FontSize(26.0);

    /// Largest size WordprocessingML accepts (`w:sz` tops out at 3276 half-points).
    pub const MAX_POINTS: f32 = 1638.0;

    /// Creates a font size, rejecting non-positive, non-finite and oversized values.
    pub fn new(points: f32) -> Result<Self> {
        if points.is_finite() && points > 0.0 && points <= Self::MAX_POINTS {
            Ok(Self(points))
        } else {
            Err(Error::InvalidFontSize(points))
        }
    }

    /// Returns the size in points.
    pub fn points(self) -> f32 {
        self.0
    }

    /// Returns the size in half-points, the unit used by WordprocessingML.
    pub fn half_points(self) -> u32 {
        (self.0 * 2.0).round() as u32
    }
}

/// One unit of structured content.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentDirective {
    /// Document title, rendered with the dedicated title style.
    Title(String),
    /// Heading at the given nesting level.
    Heading { level: HeadingLevel, text: String },
    /// Body paragraph.
    Paragraph(String),
    /// A single bulleted list entry.
    BulletItem(String),
    /// Point size override for every heading of the given level.
    StyleOverride { level: HeadingLevel, size: FontSize },
}

impl ContentDirective {
    /// Convenience helper for building a validated heading directive.
    pub fn heading(text: impl Into<String>, level: u8) -> Result<Self> {
        Ok(Self::Heading {
            level: HeadingLevel::new(level)?,
            text: text.into(),
        })
    }

    /// Convenience helper for building a paragraph directive.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(text.into())
    }

    /// Convenience helper for building a bullet directive.
    pub fn bullet(text: impl Into<String>) -> Self {
        Self::BulletItem(text.into())
    }

    /// Convenience helper for building a validated style override.
    pub fn style_override(level: u8, points: f32) -> Result<Self> {
        Ok(Self::StyleOverride {
            level: HeadingLevel::new(level)?,
            size: FontSize::new(points)?,
        })
    }
}

/// Number of directives of each renderable kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectiveCounts {
    pub titles: usize,
    pub headings: usize,
    pub paragraphs: usize,
    pub bullets: usize,
}

/// Ordered sequence of directives making up one document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    directives: Vec<ContentDirective>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the directives in emission order.
    pub fn directives(&self) -> &[ContentDirective] {
        &self.directives
    }

    /// Appends a directive.
    pub fn push(&mut self, directive: ContentDirective) {
        self.directives.push(directive);
    }

    /// Returns the text of the first title directive, if any.
    pub fn title(&self) -> Option<&str> {
        self.directives.iter().find_map(|directive| match directive {
            ContentDirective::Title(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the effective heading sizes. Later overrides replace earlier ones.
    pub fn heading_sizes(&self) -> BTreeMap<HeadingLevel, FontSize> {
        self.directives
            .iter()
            .filter_map(|directive| match directive {
                ContentDirective::StyleOverride { level, size } => Some((*level, *size)),
                _ => None,
            })
            .collect()
    }

    /// Counts the renderable directives by kind. Style overrides are not counted.
    pub fn counts(&self) -> DirectiveCounts {
        let mut counts = DirectiveCounts::default();
        for directive in &self.directives {
            match directive {
                ContentDirective::Title(_) => counts.titles += 1,
                ContentDirective::Heading { .. } => counts.headings += 1,
                ContentDirective::Paragraph(_) => counts.paragraphs += 1,
                ContentDirective::BulletItem(_) => counts.bullets += 1,
                ContentDirective::StyleOverride { .. } => {}
            }
        }
        counts
    }
}

impl FromIterator<ContentDirective> for Document {
    fn from_iter<I: IntoIterator<Item = ContentDirective>>(iter: I) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

impl Extend<ContentDirective> for Document {
    fn extend<I: IntoIterator<Item = ContentDirective>>(&mut self, iter: I) {
        self.directives.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_level_rejects_out_of_range_values() {
        assert!(HeadingLevel::new(0).is_err());
        assert!(HeadingLevel::new(MAX_HEADING_LEVEL + 1).is_err());
        assert_eq!(HeadingLevel::new(3).unwrap().get(), 3);
    }

    #[test]
    fn font_size_converts_to_half_points() {
        assert_eq!(FontSize::new(18.0).unwrap().half_points(), 36);
        assert_eq!(FontSize::new(10.5).unwrap().half_points(), 21);
        assert!(FontSize::new(0.0).is_err());
        assert!(FontSize::new(f32::NAN).is_err());
    }

    #[test]
    fn font_size_is_capped_at_word_maximum() {
        assert_eq!(
            FontSize::new(FontSize::MAX_POINTS).unwrap().half_points(),
            3276
        );
        assert!(matches!(
            FontSize::new(1639.0),
            Err(Error::InvalidFontSize(size)) if size == 1639.0
        ));
        assert!(FontSize::new(1e30).is_err());
        assert!(FontSize::new(f32::INFINITY).is_err());
    }

    #[test]
    fn last_style_override_wins() {
        let document: Document = [
            ContentDirective::style_override(1, 18.0).unwrap(),
            ContentDirective::style_override(2, 16.0).unwrap(),
            ContentDirective::style_override(1, 20.0).unwrap(),
        ]
        .into_iter()
        .collect();

        let sizes = document.heading_sizes();
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[&HeadingLevel::new(1).unwrap()].points(), 20.0);
        assert_eq!(sizes[&HeadingLevel::new(2).unwrap()].points(), 16.0);
    }

    #[test]
    fn counts_ignore_style_overrides() {
        let document: Document = [
            ContentDirective::Title("SRS".into()),
            ContentDirective::style_override(1, 18.0).unwrap(),
            ContentDirective::heading("Intro", 1).unwrap(),
            ContentDirective::paragraph("Body"),
            ContentDirective::bullet("A"),
            ContentDirective::bullet("B"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            document.counts(),
            DirectiveCounts {
                titles: 1,
                headings: 1,
                paragraphs: 1,
                bullets: 2,
            }
        );
        assert_eq!(document.title(), Some("SRS"));
    }
}
