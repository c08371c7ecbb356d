use std::fs;

use doc_builder::docx::inspect::{self, OutlineParagraph, ParagraphKind};
use doc_builder::docx::DEFAULT_CREATOR;
use doc_builder::{
    fonts, ContentDirective, DirectiveCounts, DocumentBuilder, DocxRenderer, Error, OutputFormat,
    PdfRenderer,
};
use genpdf::PaperSize;
use sha2::{Digest, Sha256};

fn paragraph(kind: ParagraphKind, text: &str) -> OutlineParagraph {
    OutlineParagraph {
        kind,
        text: text.to_owned(),
    }
}

fn sample_builder() -> DocumentBuilder {
    let mut builder = DocumentBuilder::new();
    builder
        .apply_heading_styles([(1, 18.0), (2, 16.0), (3, 14.0)])
        .expect("valid heading styles");
    builder.add_title("Software Requirements Specification");
    builder.add_paragraph_block("Venue Booking System");
    builder.add_heading("1. Introduction", 1).expect("level 1");
    builder.add_heading("1.1 Purpose", 2).expect("level 2");
    builder.add_paragraph_block("First line\nSecond line\nThird line");
    builder.add_heading("Booking Management", 3).expect("level 3");
    builder.add_bullet_list(["FR-1", "FR-2", "FR-3 & <more>"]);
    builder
}

#[test]
fn heading_then_multiline_paragraph() {
    let mut builder = DocumentBuilder::new();
    builder.add_heading("Introduction", 1).unwrap();
    builder.add_paragraph_block("Hello\nWorld");

    let outline = inspect::read_docx(&builder.render().unwrap()).unwrap();
    assert_eq!(
        outline.paragraphs,
        vec![
            paragraph(ParagraphKind::Heading(1), "Introduction"),
            paragraph(ParagraphKind::Body, "Hello"),
            paragraph(ParagraphKind::Body, "World"),
        ]
    );
}

#[test]
fn bullet_list_keeps_item_order() {
    let mut builder = DocumentBuilder::new();
    builder.add_bullet_list(["A", "B", "C"]);

    let outline = inspect::read_docx(&builder.render().unwrap()).unwrap();
    assert_eq!(outline.texts(ParagraphKind::Bullet), vec!["A", "B", "C"]);
    assert!(outline
        .paragraphs
        .iter()
        .all(|paragraph| paragraph.kind == ParagraphKind::Bullet));
}

#[test]
fn saved_structure_matches_directive_counts() {
    let builder = sample_builder();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.docx");
    builder.save(&path).unwrap();

    let outline = inspect::read_docx_file(&path).unwrap();
    assert_eq!(outline.counts(), builder.document().counts());
    assert_eq!(
        outline.counts(),
        DirectiveCounts {
            titles: 1,
            headings: 3,
            paragraphs: 4,
            bullets: 3,
        }
    );
    assert_eq!(
        outline.title.as_deref(),
        Some("Software Requirements Specification")
    );
    assert_eq!(outline.texts(ParagraphKind::Bullet)[2], "FR-3 & <more>");
}

#[test]
fn line_breaks_produce_one_more_paragraph() {
    for breaks in 0..6 {
        let text = vec!["line"; breaks + 1].join("\n");
        let mut builder = DocumentBuilder::new();
        builder.add_paragraph_block(&text);

        let outline = inspect::read_docx(&builder.render().unwrap()).unwrap();
        assert_eq!(outline.counts().paragraphs, breaks + 1, "{breaks} line breaks");
    }
}

#[test]
fn blank_lines_survive_as_empty_paragraphs() {
    let mut builder = DocumentBuilder::new();
    builder.add_paragraph_block("top\n\nbottom\n");

    let outline = inspect::read_docx(&builder.render().unwrap()).unwrap();
    assert_eq!(outline.texts(ParagraphKind::Body), vec!["top", "", "bottom", ""]);
}

#[test]
fn rendering_is_deterministic() {
    let bytes_a = sample_builder().render().unwrap();
    let bytes_b = sample_builder().render().unwrap();

    assert_eq!(bytes_a.len(), bytes_b.len(), "DOCX sizes should match");
    let hash_a: [u8; 32] = Sha256::digest(&bytes_a).into();
    let hash_b: [u8; 32] = Sha256::digest(&bytes_b).into();
    assert_eq!(hash_a, hash_b, "DOCX renders must be byte-identical");
}

#[test]
fn save_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/docs/out.docx");
    assert!(!path.parent().unwrap().exists());

    sample_builder().save(&path).unwrap();
    assert!(path.is_file());

    // Saving again into the now existing directory overwrites the file.
    let mut builder = DocumentBuilder::new();
    builder.add_paragraph_block("replaced");
    builder.save(&path).unwrap();
    let outline = inspect::read_docx_file(&path).unwrap();
    assert_eq!(outline.texts(ParagraphKind::Body), vec!["replaced"]);
}

#[test]
fn save_fails_when_directory_collides_with_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("docs");
    fs::write(&blocker, b"not a directory").unwrap();

    let err = sample_builder()
        .save(blocker.join("out.docx"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)), "unexpected error: {err}");
    assert_eq!(fs::read(&blocker).unwrap(), b"not a directory");
}

#[test]
fn creator_is_recorded_in_core_properties() {
    let builder = sample_builder();

    let outline = inspect::read_docx(&builder.render().unwrap()).unwrap();
    assert_eq!(outline.creator.as_deref(), Some(DEFAULT_CREATOR));

    let renderer = DocxRenderer::new().with_creator("Venue Booking Team");
    assert_eq!(renderer.creator(), "Venue Booking Team");
    let outline = inspect::read_docx(&builder.render_with(&renderer).unwrap()).unwrap();
    assert_eq!(outline.creator.as_deref(), Some("Venue Booking Team"));
    assert_eq!(
        outline.title.as_deref(),
        Some("Software Requirements Specification")
    );
}

#[test]
fn control_characters_fail_before_anything_is_written() {
    let mut builder = DocumentBuilder::new();
    builder.add_paragraph_block("page\u{0C}break");
    assert!(matches!(
        builder.render(),
        Err(Error::InvalidCharacter('\u{0C}'))
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.docx");
    assert!(builder.save(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn tabs_survive_the_round_trip() {
    let mut builder = DocumentBuilder::new();
    builder.add_bullet_list(["FR-1\tCreate booking"]);

    let outline = inspect::read_docx(&builder.render().unwrap()).unwrap();
    assert_eq!(outline.texts(ParagraphKind::Bullet), vec!["FR-1\tCreate booking"]);
}

#[test]
fn heading_sizes_reach_the_styles_part() {
    let outline = inspect::read_docx(&sample_builder().render().unwrap()).unwrap();

    assert_eq!(outline.heading_sizes.get(&1), Some(&18.0));
    assert_eq!(outline.heading_sizes.get(&2), Some(&16.0));
    assert_eq!(outline.heading_sizes.get(&3), Some(&14.0));
    assert_eq!(outline.heading_sizes.get(&4), Some(&11.0));
}

#[test]
fn declarative_directives_render_like_builder_calls() {
    let declarative = DocumentBuilder::from_directives([
        ContentDirective::heading("Introduction", 1).unwrap(),
        ContentDirective::paragraph("Hello"),
        ContentDirective::paragraph("World"),
    ]);

    let mut imperative = DocumentBuilder::new();
    imperative.add_heading("Introduction", 1).unwrap();
    imperative.add_paragraph_block("Hello\nWorld");

    assert_eq!(declarative.render().unwrap(), imperative.render().unwrap());
}

#[test]
fn renders_pdf_when_fonts_are_available() {
    if !fonts::fonts_available() {
        eprintln!(
            "Skipping renders_pdf_when_fonts_are_available: no font family found. Set {} to enable it.",
            fonts::FONTS_DIR_ENV
        );
        return;
    }

    let builder = sample_builder().with_format(OutputFormat::Pdf);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/sample.pdf");
    builder.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"), "output should carry a PDF header");

    let compact = PdfRenderer::new()
        .with_paper_size(PaperSize::A4)
        .with_margins(15.0)
        .with_page_numbers(false)
        .with_bullet("-");
    let bytes = sample_builder().render_with(&compact).unwrap();
    assert!(bytes.starts_with(b"%PDF"), "custom layout should still render");
}
