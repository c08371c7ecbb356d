//! Font discovery for the PDF renderer.
//!
//! `genpdf` embeds TrueType fonts, so rendering PDF output needs a font family
//! on disk.  The family is looked up in the following directories, first match
//! wins:
//!
//! 1. `$DOC_BUILDER_FONTS_DIR`
//! 2. `assets/fonts` next to the running executable
//! 3. `assets/fonts` inside this crate
//! 4. the system Liberation fonts directory

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the font family loaded for PDF output.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "LiberationSans";

/// Environment variable pointing at a directory holding the font family.
pub const FONTS_DIR_ENV: &str = "DOC_BUILDER_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "LiberationSans-Regular.ttf",
    "LiberationSans-Bold.ttf",
    "LiberationSans-Italic.ttf",
    "LiberationSans-BoldItalic.ttf",
];

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
];

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env::var_os(FONTS_DIR_ENV).map(PathBuf::from) {
        if !path.as_os_str().is_empty() {
            candidates.push(path);
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut candidates, bin_dir.join("assets/fonts"));
        }
    }

    push_unique(
        &mut candidates,
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"),
    );

    for dir in SYSTEM_FONT_DIRS {
        push_unique(&mut candidates, PathBuf::from(dir));
    }

    candidates
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            debug!("Using fonts from {}", candidate.display());
            return Ok(candidate);
        }

        let reason = if !exists {
            format!("directory missing at {}", candidate.display())
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };

        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };

    warn!("No usable font directory found: {}", summary);
    Err(Error::new(
        format!(
            "Unable to locate the {} font family. Checked: {}. Set {} to a directory containing {}.",
            DEFAULT_FONT_FAMILY_NAME,
            summary,
            FONTS_DIR_ENV,
            FONT_FILES.join(", ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

/// Loads the font family used for PDF output.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Indicates whether a complete font family can be found for PDF output.
pub fn fonts_available() -> bool {
    font_directory_candidates()
        .iter()
        .any(|candidate| candidate.is_dir() && missing_font_files(candidate).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_listed_for_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(missing_font_files(dir.path()).len(), FONT_FILES.len());
    }

    #[test]
    fn candidates_include_crate_assets() {
        let manifest_fonts = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
        assert!(font_directory_candidates().contains(&manifest_fonts));
    }
}
