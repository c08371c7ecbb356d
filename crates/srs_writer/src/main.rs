use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use doc_builder::{ContentFile, OutputFormat};
use log::debug;

/// Venue Booking System SRS shipped with the binary.
const BUNDLED_CONTENT: &str = include_str!("../content/venue_booking_srs.toml");

/// Renders the Venue Booking System SRS.
///
/// Without arguments the bundled content is written to
/// `docs/Venue_Booking_System_SRS.docx` relative to the current directory.
#[derive(Parser)]
#[command(author, version, about = "Generates the Venue Booking System SRS document")]
struct Cli {
    /// Content definition to render instead of the bundled SRS.
    #[arg(long, value_name = "FILE")]
    content: Option<PathBuf>,

    /// Output file. Defaults to `docs/<name>.<ext>` under the current directory,
    /// not the directory holding the binary.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format. Inferred from `--output` when omitted, otherwise DOCX.
    #[arg(long, value_enum)]
    format: Option<Format>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Docx,
    Pdf,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Docx => OutputFormat::Docx,
            Format::Pdf => OutputFormat::Pdf,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(path) => println!("SRS written to: {}", path.display()),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> doc_builder::Result<PathBuf> {
    let content = match &cli.content {
        Some(path) => ContentFile::load(path)?,
        None => ContentFile::from_toml_str(BUNDLED_CONTENT)?,
    };

    let format = cli
        .format
        .map(OutputFormat::from)
        .or_else(|| cli.output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or_default();
    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| content.default_output_path(format));
    debug!("Rendering '{}' as {:?} to {}", content.name, format, path.display());

    let builder = content.into_builder()?.with_format(format);
    builder.save(&path)?;
    Ok(path)
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use doc_builder::docx::inspect::{self, ParagraphKind};

    #[test]
    fn bundled_content_parses() {
        let content = ContentFile::from_toml_str(BUNDLED_CONTENT).expect("bundled content");
        assert_eq!(content.name, "Venue_Booking_System_SRS");
        assert_eq!(
            content.default_output_path(OutputFormat::Docx),
            PathBuf::from("docs/Venue_Booking_System_SRS.docx")
        );
    }

    #[test]
    fn bundled_content_renders_every_section() {
        let builder = ContentFile::from_toml_str(BUNDLED_CONTENT)
            .and_then(ContentFile::into_builder)
            .expect("bundled content");
        let outline = inspect::read_docx(&builder.render().expect("render")).expect("outline");

        assert_eq!(
            outline.title.as_deref(),
            Some("Software Requirements Specification (SRS)")
        );
        let top_level: Vec<_> = outline
            .paragraphs
            .iter()
            .filter(|paragraph| paragraph.kind == ParagraphKind::Heading(1))
            .map(|paragraph| paragraph.text.as_str())
            .collect();
        assert_eq!(top_level.len(), 9);
        assert_eq!(top_level.first(), Some(&"1. Introduction"));
        assert_eq!(top_level.last(), Some(&"9. Appendix"));
        assert_eq!(outline.heading_sizes.get(&1), Some(&18.0));
        assert_eq!(outline.counts().bullets, 31);
    }

    #[test]
    fn help_states_where_docs_is_resolved() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("under the current directory"), "{help}");
    }

    #[test]
    fn output_extension_selects_format() {
        let cli = Cli::parse_from(["srs_writer", "--output", "out/srs.pdf"]);
        let format = cli
            .format
            .map(OutputFormat::from)
            .or_else(|| cli.output.as_deref().and_then(OutputFormat::from_path));
        assert_eq!(format, Some(OutputFormat::Pdf));
    }
}
