//! Layout export to print and image formats.
//!
//! Every format goes through the SVG produced by [`crate::svg`] for an
//! export-mode scene (no grid, guides or selection overlay). Raster formats
//! rasterize it with resvg/tiny-skia; PDF embeds that raster in a single
//! page sized to the layout at the configured DPI.

use std::sync::Arc;

use base64::Engine;
use image::ImageEncoder;

use folio_core::{DocumentState, PaperSize, Size, PRINT_DPI};

use crate::error::{RenderError, RenderResult};
use crate::output::{file_name, DocumentKind, ExportOutcome, Notification};
use crate::surface::RenderScene;
use crate::svg::scene_to_svg;

/// Largest raster side we attempt to allocate.
const MAX_RASTER_SIDE: f32 = 16_384.0;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector graphics (the SVG XML as UTF-8 bytes).
    Svg,
    /// PDF document with an embedded raster page.
    Pdf,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

/// Configuration for layout export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Dots per inch the canvas pixels are defined at (default: 300).
    pub dpi: f32,
    /// Raster pixels per canvas pixel. Values below 1 trade resolution for
    /// speed without changing the PDF page size.
    pub raster_scale: f32,
    /// Background color as RGBA bytes, used to flatten JPEG output.
    pub background: [u8; 4],
    /// JPEG quality 1-100 (default: 90).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dpi: PRINT_DPI,
            raster_scale: 1.0,
            background: [255, 255, 255, 255],
            jpeg_quality: 90,
        }
    }
}

impl ExportConfig {
    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidConfig`] for a non-positive DPI or
    /// raster scale, or a JPEG quality outside 1-100.
    pub fn validate(&self) -> RenderResult<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        if !(self.raster_scale.is_finite() && self.raster_scale > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "raster_scale must be positive, got {}",
                self.raster_scale
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(RenderError::InvalidConfig(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Exports a document to image and print formats.
pub struct LayoutExporter {
    config: ExportConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl LayoutExporter {
    /// Create an exporter, loading the system fonts once.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ExportConfig) -> RenderResult<Self> {
        config.validate()?;
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(faces = fontdb.len(), "Loaded fonts for export");
        Ok(Self {
            config,
            fontdb: Arc::new(fontdb),
        })
    }

    /// Create an exporter with default configuration.
    ///
    /// # Errors
    ///
    /// Never fails for the default configuration; kept fallible to match [`Self::new`].
    pub fn with_defaults() -> RenderResult<Self> {
        Self::new(ExportConfig::default())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export a document to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot be rendered or encoded.
    pub fn export(
        &self,
        document: &DocumentState,
        page: Size,
        format: ExportFormat,
    ) -> RenderResult<Vec<u8>> {
        match format {
            ExportFormat::Png => self.render_to_png(document, page),
            ExportFormat::Jpeg => self.render_to_jpeg(document, page),
            ExportFormat::Svg => Ok(self.render_to_svg(document, page).into_bytes()),
            ExportFormat::Pdf => self.render_to_pdf(document, page),
        }
    }

    /// Export and turn any failure into a user notification.
    ///
    /// The document is only borrowed, so a failed export leaves it as it was.
    pub fn try_export(
        &self,
        document: &DocumentState,
        kind: DocumentKind,
        paper: &PaperSize,
        format: ExportFormat,
    ) -> ExportOutcome {
        let name = file_name(kind, paper, format.extension());
        match self.export(document, paper.pixels(), format) {
            Ok(bytes) => {
                tracing::info!(file = %name, bytes = bytes.len(), "Exported layout");
                ExportOutcome::Exported {
                    file_name: name,
                    bytes,
                }
            }
            Err(e) => {
                tracing::error!(file = %name, error = %e, "Export failed");
                ExportOutcome::Failed(Notification::export_failed(&e))
            }
        }
    }

    /// Export the layout to an SVG string at canvas scale.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn render_to_svg(&self, document: &DocumentState, page: Size) -> String {
        scene_to_svg(&RenderScene::for_export(document, page, 1.0))
    }

    /// Export the layout to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, document: &DocumentState, page: Size) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(document, page)?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the layout to JPEG bytes, flattened onto the background color.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_jpeg(&self, document: &DocumentState, page: Size) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(document, page)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = &self.config.background;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        for pixel in pixmap.pixels() {
            // Pixmap data is premultiplied; compose over the background.
            let c = pixel.demultiply();
            let alpha = f32::from(c.alpha()) / 255.0;
            let inv = 1.0 - alpha;
            rgb_data.push((f32::from(c.red()).mul_add(alpha, f32::from(bg[0]) * inv)) as u8);
            rgb_data.push((f32::from(c.green()).mul_add(alpha, f32::from(bg[1]) * inv)) as u8);
            rgb_data.push((f32::from(c.blue()).mul_add(alpha, f32::from(bg[2]) * inv)) as u8);
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the layout to a single-page PDF.
    ///
    /// The page measures `page / dpi` inches, so the named paper sizes at
    /// 300 DPI come out at their physical size whatever the raster scale.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or PDF generation fails.
    pub fn render_to_pdf(&self, document: &DocumentState, page: Size) -> RenderResult<Vec<u8>> {
        let png_data = self.render_to_png(document, page)?;
        let (width_mm, height_mm) = self.page_size_mm(page);

        let (doc, page1, layer1) = printpdf::PdfDocument::new(
            "Folio Export",
            printpdf::Mm(width_mm),
            printpdf::Mm(height_mm),
            "Layout",
        );
        let current_layer = doc.get_page(page1).get_layer(layer1);

        // Decode with printpdf's bundled image crate for compatibility.
        let dynamic_image = printpdf::image_crate::load_from_memory(&png_data)
            .map_err(|e| RenderError::Export(format!("Failed to decode PNG for PDF: {e}")))?;
        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);

        let transform = printpdf::ImageTransform {
            translate_x: Some(printpdf::Mm(0.0)),
            translate_y: Some(printpdf::Mm(0.0)),
            dpi: Some(self.config.dpi * self.config.raster_scale),
            ..Default::default()
        };
        pdf_image.add_to_layer(current_layer, transform);

        doc.save_to_bytes()
            .map_err(|e| RenderError::Export(format!("PDF save failed: {e}")))
    }

    /// Render a PNG preview as a `data:` URI, e.g. for template thumbnails.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn png_data_uri(&self, document: &DocumentState, page: Size) -> RenderResult<String> {
        let png = self.render_to_png(document, page)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png);
        Ok(format!("data:image/png;base64,{encoded}"))
    }

    /// Physical page size in millimetres.
    #[must_use]
    pub fn page_size_mm(&self, page: Size) -> (f32, f32) {
        (
            page.width / self.config.dpi * 25.4,
            page.height / self.config.dpi * 25.4,
        )
    }

    /// Rasterize the export scene at the configured raster scale.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, document: &DocumentState, page: Size) -> RenderResult<tiny_skia::Pixmap> {
        let scene = RenderScene::for_export(document, page, self.config.raster_scale);
        let (out_w, out_h) = (scene.output_width(), scene.output_height());
        if out_w > MAX_RASTER_SIDE || out_h > MAX_RASTER_SIDE {
            return Err(RenderError::Raster(format!(
                "raster of {out_w}x{out_h} exceeds {MAX_RASTER_SIDE} pixels per side"
            )));
        }

        let svg_string = scene_to_svg(&scene);
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(&svg_string, &opt)
            .map_err(|e| RenderError::Svg(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Raster("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        tracing::debug!(width = px_w, height = px_h, "Rasterized layout");

        Ok(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        for config in [
            ExportConfig {
                dpi: 0.0,
                ..ExportConfig::default()
            },
            ExportConfig {
                raster_scale: -1.0,
                ..ExportConfig::default()
            },
            ExportConfig {
                jpeg_quality: 0,
                ..ExportConfig::default()
            },
        ] {
            assert!(matches!(
                LayoutExporter::new(config),
                Err(RenderError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_letter_page_is_letter_sized() {
        let exporter = LayoutExporter::with_defaults().expect("exporter");
        let (w, h) = exporter.page_size_mm(PaperSize::Letter.pixels());
        assert!((w - 215.9).abs() < 0.01);
        assert!((h - 279.4).abs() < 0.01);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
    }
}
