//! # Folio Renderer
//!
//! Turns a Folio document into pixels and print files.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   render()    ┌─────────────┐  scene_to_svg()  ┌─────────┐
//! │ DocumentState│ ────────────► │ RenderScene │ ───────────────► │   SVG   │
//! │ + ViewState  │  (pure)       │ (items)     │                  └────┬────┘
//! └──────────────┘               └─────────────┘                       │
//!                                          resvg / tiny-skia ◄─────────┘
//!                                                 │
//!                                     ┌───────────┼───────────┐
//!                                    PNG         JPEG        PDF
//! ```
//!
//! The on-screen scene adds grid, guides and the selection overlay; export
//! scenes carry only the page and its elements. Raster and PDF output sit
//! behind the default `export` feature.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod output;
pub mod surface;
pub mod svg;

pub use error::{RenderError, RenderResult};
#[cfg(feature = "export")]
pub use export::{ExportConfig, ExportFormat, LayoutExporter};
pub use output::{file_name, save_raw, DocumentKind, ExportOutcome, Notification};
pub use surface::{render, RenderItem, RenderScene};
pub use svg::scene_to_svg;
