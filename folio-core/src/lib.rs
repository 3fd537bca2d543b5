//! # Folio Core
//!
//! Document model and editing logic for the Folio print layout editor
//! (recruitment posters, tri-fold brochures).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 folio-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Element Store       │  Transform Controller│
//! │  - Document state    │  - Hit testing       │
//! │  - Undo/redo history │  - Drag/resize/rotate│
//! │  - Arrange, z-order  │  - Grid/guide snap   │
//! ├─────────────────────────────────────────────┤
//! │  Templates           │  Generated content   │
//! │  - Relative layouts  │  - Tagged parsing    │
//! │  - Tri-fold panels   │  - Poster, brochure  │
//! │  - Study session     │  - Cancel-and-replace│
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering and export live in `folio-renderer`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arrange;
pub mod brochure;
pub mod config;
pub mod content;
pub mod controller;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod generation;
pub mod geometry;
pub mod grid;
pub mod handle;
pub mod history;
pub mod page;
pub mod store;
pub mod study;
pub mod template;
pub mod view;

pub use arrange::{Alignment, Axis, StackMove};
pub use brochure::{
    builtin_brochure_template, builtin_brochure_templates, BrochureContent, BrochureTemplate,
    Panel,
};
pub use config::{EditorConfig, ZoomSettings};
pub use content::{ColorScheme, Generated, PosterContent};
pub use controller::{Outcome, TransformController};
pub use document::DocumentState;
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, ShapeKind, TextAlign, TextStyle,
};
pub use error::{EditorError, EditorResult};
pub use event::{InputEvent, Key, KeyModifiers, PointerPhase};
pub use generation::{GenerationTicket, GenerationTracker};
pub use geometry::{Point, Rect, Size};
pub use grid::{snap_position, GridSettings, Guide, Orientation};
pub use handle::{Handle, HandleStyle};
pub use history::History;
pub use page::{PaperSize, PRINT_DPI};
pub use store::ElementStore;
pub use study::{FileStorage, MemoryStorage, StudyDetails, StudySession, StudyStorage};
pub use template::{builtin_template, builtin_templates, Template};
pub use view::{ViewState, Viewport};

/// Folio core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
