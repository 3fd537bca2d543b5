//! Export artifacts that don't need a rasterizer: file naming, raw save and
//! the user-facing outcome of an export.

use serde::{Deserialize, Serialize};

use folio_core::{DocumentState, Element, PaperSize};

/// What kind of printed piece a document is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Single-page recruitment poster.
    #[default]
    Poster,
    /// Folded brochure.
    Brochure,
}

impl DocumentKind {
    /// Lowercase name used in file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Brochure => "brochure",
        }
    }
}

/// Deterministic file name for an export, e.g. `poster-letter.pdf`.
#[must_use]
pub fn file_name(kind: DocumentKind, paper: &PaperSize, extension: &str) -> String {
    format!("{}-{}.{extension}", kind.name(), paper.name())
}

/// Hand the committed elements, unchanged, to a caller-supplied save callback.
pub fn save_raw<F>(document: &DocumentState, on_save: F)
where
    F: FnOnce(&[Element]),
{
    tracing::debug!(count = document.elements().len(), "Saving raw elements");
    on_save(document.elements());
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short heading.
    pub title: String,
    /// Detail line.
    pub message: String,
}

impl Notification {
    /// The notification shown when an export fails.
    #[must_use]
    pub fn export_failed(reason: impl std::fmt::Display) -> Self {
        Self {
            title: "Export failed".to_string(),
            message: format!("Failed to export. Please try again. ({reason})"),
        }
    }
}

/// Result of an export attempt as seen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The artifact was produced.
    Exported {
        /// Suggested download name.
        file_name: String,
        /// File contents.
        bytes: Vec<u8>,
    },
    /// The export failed; the document is untouched.
    Failed(Notification),
}

impl ExportOutcome {
    /// Whether the export produced an artifact.
    #[must_use]
    pub const fn is_exported(&self) -> bool {
        matches!(self, Self::Exported { .. })
    }
}
