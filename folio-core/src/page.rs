//! Page sizes for print layouts.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::grid::Guide;

/// Resolution the named paper sizes are defined at.
pub const PRINT_DPI: f32 = 300.0;

/// Page size of a layout, in canvas pixels at [`PRINT_DPI`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    /// US Letter portrait, 8.5" x 11".
    #[default]
    Letter,
    /// Tabloid portrait, 11" x 17".
    Tabloid,
    /// ISO A3 portrait.
    A3,
    /// Letter landscape folded into three panels.
    TriFold,
    /// Arbitrary page size.
    Custom {
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
    },
}

impl PaperSize {
    /// Default custom page, same as tabloid.
    pub const DEFAULT_CUSTOM: Self = Self::Custom {
        width: 3300.0,
        height: 5100.0,
    };

    /// Page dimensions in pixels.
    #[must_use]
    pub const fn pixels(&self) -> Size {
        match self {
            Self::Letter => Size::new(2550.0, 3300.0),
            Self::Tabloid => Size::new(3300.0, 5100.0),
            Self::A3 => Size::new(3508.0, 4961.0),
            Self::TriFold => Size::new(3300.0, 2550.0),
            Self::Custom { width, height } => Size::new(*width, *height),
        }
    }

    /// Short lowercase name, used in export file names.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::Tabloid => "tabloid",
            Self::A3 => "a3",
            Self::TriFold => "trifold",
            Self::Custom { .. } => "custom",
        }
    }

    /// Number of folded panels across the page width.
    #[must_use]
    pub const fn panels(&self) -> u32 {
        match self {
            Self::TriFold => 3,
            _ => 1,
        }
    }

    /// Vertical guides at each fold line.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fold_guides(&self) -> Vec<Guide> {
        let panels = self.panels();
        let panel_width = self.pixels().width / panels as f32;
        (1..panels)
            .map(|i| Guide {
                color: "#2563eb".to_string(),
                ..Guide::vertical(panel_width * i as f32)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_is_eight_and_a_half_by_eleven_inches() {
        let size = PaperSize::Letter.pixels();
        assert!((size.width / PRINT_DPI - 8.5).abs() < 1e-4);
        assert!((size.height / PRINT_DPI - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_trifold_has_two_fold_guides() {
        let guides = PaperSize::TriFold.fold_guides();
        assert_eq!(guides.len(), 2);
        assert!((guides[0].position - 1100.0).abs() < f32::EPSILON);
        assert!((guides[1].position - 2200.0).abs() < f32::EPSILON);
        assert!(PaperSize::Letter.fold_guides().is_empty());
    }

    #[test]
    fn test_paper_serde_names() {
        let json = serde_json::to_string(&PaperSize::A3).expect("serialize");
        assert_eq!(json, "\"a3\"");
        let custom: PaperSize =
            serde_json::from_str(r#"{"custom":{"width":100.0,"height":50.0}}"#).expect("parse");
        assert_eq!(custom.pixels(), Size::new(100.0, 50.0));
    }
}
