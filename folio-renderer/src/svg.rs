//! SVG serialization of a [`RenderScene`].
//!
//! The SVG is the intermediate every export format goes through, and is
//! also what a host can put straight into a web view.

use std::fmt::Write;

use folio_core::{Element, ElementKind, Handle, Point, Rect, ShapeKind, TextAlign, TextStyle};

use crate::surface::{RenderItem, RenderScene, SELECTION_COLOR};

/// Fill used for an image element whose source is empty.
const IMAGE_PLACEHOLDER: &str = "#e0e0e0";

/// Serialize `scene` to an SVG document.
///
/// The root is `page * scale` pixels with a viewBox covering the page, so
/// items are written in canvas coordinates.
#[must_use]
pub fn scene_to_svg(scene: &RenderScene) -> String {
    let out_w = scene.output_width().max(1.0);
    let out_h = scene.output_height().max(1.0);
    let stroke = 1.0 / scene.scale.max(f32::EPSILON);

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
        scene.page.width, scene.page.height,
    );

    for item in &scene.items {
        match item {
            RenderItem::Background { rect, fill } => {
                let _ = write!(
                    svg,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    escape_xml(fill),
                );
            }
            RenderItem::GridLine {
                from,
                to,
                color,
                opacity,
            } => {
                let _ = write!(
                    svg,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-opacity=\"{opacity}\" stroke-width=\"{stroke}\"/>",
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    escape_xml(color),
                );
            }
            RenderItem::Guide { from, to, color } => {
                let _ = write!(
                    svg,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{stroke}\" stroke-dasharray=\"{} {}\"/>",
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    escape_xml(color),
                    stroke * 4.0,
                    stroke * 4.0,
                );
            }
            RenderItem::Element(element) => render_element_svg(&mut svg, element),
            RenderItem::SelectionBox { bounds, rotation } => {
                let _ = write!(
                    svg,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{SELECTION_COLOR}\" stroke-width=\"{}\"{}/>",
                    bounds.x,
                    bounds.y,
                    bounds.width,
                    bounds.height,
                    stroke * 2.0,
                    rotate_attr(*rotation, bounds.center()),
                );
            }
            RenderItem::Handle {
                handle,
                rect,
                rotation,
                pivot,
            } => render_handle_svg(&mut svg, *handle, rect, *rotation, *pivot, stroke),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn render_handle_svg(
    svg: &mut String,
    handle: Handle,
    rect: &Rect,
    rotation: f32,
    pivot: Point,
    stroke: f32,
) {
    let transform = rotate_attr(rotation, pivot);
    if handle == Handle::Rotation {
        let center = rect.center();
        let _ = write!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"#ffffff\" stroke=\"{SELECTION_COLOR}\" stroke-width=\"{stroke}\"{transform}/>",
            center.x,
            center.y,
            rect.width / 2.0,
        );
    } else {
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" stroke=\"{SELECTION_COLOR}\" stroke-width=\"{stroke}\"{transform}/>",
            rect.x, rect.y, rect.width, rect.height,
        );
    }
}

/// Render a single element.
fn render_element_svg(svg: &mut String, element: &Element) {
    let bounds = element.bounds();
    let _ = write!(
        svg,
        "<g opacity=\"{}\"{}>",
        element.opacity,
        rotate_attr(element.rotation, bounds.center()),
    );

    match &element.kind {
        ElementKind::Text { content, style } => render_text_svg(svg, content, style, &bounds),

        ElementKind::Image { src, .. } => {
            if src.trim().is_empty() {
                let _ = write!(
                    svg,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{IMAGE_PLACEHOLDER}\"/>",
                    bounds.x, bounds.y, bounds.width, bounds.height,
                );
            } else {
                let _ = write!(
                    svg,
                    "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" xlink:href=\"{}\"/>",
                    bounds.x,
                    bounds.y,
                    bounds.width,
                    bounds.height,
                    escape_xml(src),
                );
            }
        }

        ElementKind::Shape {
            shape,
            fill,
            stroke,
            stroke_width,
        } => {
            let paint = paint_attrs(fill.as_deref(), stroke.as_deref(), *stroke_width);
            match shape {
                ShapeKind::Rect => {
                    let _ = write!(
                        svg,
                        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{paint}/>",
                        bounds.x, bounds.y, bounds.width, bounds.height,
                    );
                }
                ShapeKind::Ellipse => {
                    let center = bounds.center();
                    let _ = write!(
                        svg,
                        "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"{paint}/>",
                        center.x,
                        center.y,
                        bounds.width / 2.0,
                        bounds.height / 2.0,
                    );
                }
                ShapeKind::Line => {
                    // A line has no interior; its color comes from the stroke,
                    // or the fill when no stroke is set.
                    let color = stroke.as_deref().or(fill.as_deref()).unwrap_or("#000000");
                    let width = if *stroke_width > 0.0 { *stroke_width } else { 1.0 };
                    let _ = write!(
                        svg,
                        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{width}\"/>",
                        bounds.x,
                        bounds.y,
                        bounds.right(),
                        bounds.bottom(),
                        escape_xml(color),
                    );
                }
            }
        }
    }

    svg.push_str("</g>");
}

#[allow(clippy::cast_precision_loss)]
fn render_text_svg(svg: &mut String, content: &str, style: &TextStyle, bounds: &Rect) {
    let (anchor, x) = match style.align {
        TextAlign::Left => ("start", bounds.x),
        TextAlign::Center => ("middle", bounds.center().x),
        TextAlign::Right => ("end", bounds.right()),
    };
    let baseline = bounds.y + style.font_size;
    let line_step = style.font_size * style.line_height;

    let _ = write!(
        svg,
        "<text x=\"{x}\" y=\"{baseline}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{anchor}\"",
        escape_xml(&style.font_family),
        style.font_size,
        escape_xml(&style.fill),
    );
    if style.bold {
        svg.push_str(" font-weight=\"bold\"");
    }
    if style.italic {
        svg.push_str(" font-style=\"italic\"");
    }
    if style.underline {
        svg.push_str(" text-decoration=\"underline\"");
    }
    svg.push('>');

    for (i, line) in content.split('\n').enumerate() {
        let dy = if i == 0 { 0.0 } else { line_step };
        let _ = write!(
            svg,
            "<tspan x=\"{x}\" dy=\"{dy}\">{}</tspan>",
            escape_xml(line),
        );
    }
    svg.push_str("</text>");
}

fn paint_attrs(fill: Option<&str>, stroke: Option<&str>, stroke_width: f32) -> String {
    let mut attrs = format!(" fill=\"{}\"", escape_xml(fill.unwrap_or("none")));
    if let Some(stroke) = stroke {
        let _ = write!(
            attrs,
            " stroke=\"{}\" stroke-width=\"{stroke_width}\"",
            escape_xml(stroke),
        );
    }
    attrs
}

fn rotate_attr(degrees: f32, pivot: Point) -> String {
    if degrees.abs() < f32::EPSILON {
        String::new()
    } else {
        format!(" transform=\"rotate({degrees} {} {})\"", pivot.x, pivot.y)
    }
}

/// Escape special XML characters in text content and attribute values.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
