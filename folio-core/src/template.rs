//! Layout templates in page-relative coordinates.
//!
//! A template describes background sections and elements as fractions of the
//! page (0.0 to 1.0). [`Template::instantiate`] resolves them against a page
//! size and a study into ordinary absolute elements.

use serde::{Deserialize, Serialize};

use crate::content::FALLBACK_KEY_POINTS;
use crate::element::{Element, ShapeKind, TextAlign, TextStyle};
use crate::error::{EditorError, EditorResult};
use crate::geometry::{Point, Rect, Size};
use crate::page::PaperSize;
use crate::study::StudyDetails;

/// Placeholder replaced by the study title.
pub const TITLE_PLACEHOLDER: &str = "[Study Title]";

/// A rectangle in page-relative units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeRect {
    /// Left edge, fraction of page width.
    pub x: f32,
    /// Top edge, fraction of page height.
    pub y: f32,
    /// Width, fraction of page width.
    pub width: f32,
    /// Height, fraction of page height.
    pub height: f32,
}

impl RelativeRect {
    /// Resolve against a page.
    #[must_use]
    pub fn resolve(&self, page: Size) -> Rect {
        Rect::new(
            self.x * page.width,
            self.y * page.height,
            self.width * page.width,
            self.height * page.height,
        )
    }

    fn is_valid(&self) -> bool {
        let unit = 0.0..=1.0;
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| unit.contains(v))
            && self.x + self.width <= 1.0 + f32::EPSILON
            && self.y + self.height <= 1.0 + f32::EPSILON
    }
}

/// A named region of the page, optionally filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSection {
    /// Section name (header, body, footer, sidebar, ...).
    pub name: String,
    /// Region of the page.
    pub area: RelativeRect,
    /// Background color; unfilled sections produce no element.
    #[serde(default)]
    pub background: Option<String>,
}

/// Content of a template element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateContent {
    /// Text, possibly containing placeholders.
    Text {
        /// Text content.
        content: String,
        /// Typography.
        #[serde(default)]
        style: TextStyle,
    },
    /// Bulleted list filled from the study's key points.
    List {
        /// Typography of each bullet.
        #[serde(default)]
        style: TextStyle,
        /// Line pitch as a multiple of the font size.
        #[serde(default = "default_spacing")]
        spacing: f32,
    },
    /// Image slot; the source is looked up in the study under the element id.
    Image {
        /// Fallback source when the study has none.
        #[serde(default)]
        src: String,
    },
}

const fn default_spacing() -> f32 {
    1.5
}

/// An element in page-relative coordinates.
///
/// For text, `x` is the anchor of the alignment: left edge, centre or
/// right edge of the text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateElement {
    /// Template-local identifier.
    pub id: String,
    /// Content.
    #[serde(flatten)]
    pub content: TemplateContent,
    /// Horizontal position, fraction of page width.
    pub x: f32,
    /// Top edge, fraction of page height.
    pub y: f32,
    /// Box width, fraction of page width.
    #[serde(default)]
    pub width: Option<f32>,
    /// Box height, fraction of page height.
    #[serde(default)]
    pub height: Option<f32>,
}

/// A reusable starting layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Preview image URL.
    pub thumbnail: String,
    /// One-line description.
    pub description: String,
    /// Intended paper size.
    pub paper: PaperSize,
    /// Background sections, painted beneath every element.
    #[serde(default)]
    pub sections: Vec<LayoutSection>,
    /// Elements in paint order.
    #[serde(default)]
    pub elements: Vec<TemplateElement>,
}

impl Template {
    /// Parse and validate a template from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a coordinate is outside
    /// the page.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Check that every section and element lies on the page.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Template`] naming the offending entry.
    pub fn validate(&self) -> EditorResult<()> {
        for section in &self.sections {
            if !section.area.is_valid() {
                return Err(EditorError::Template(format!(
                    "{}: section '{}' lies outside the page",
                    self.id, section.name
                )));
            }
        }
        validate_elements(&self.id, &self.elements)
    }

    /// Resolve into absolute elements for `page`, seeded from `study`.
    ///
    /// Filled sections become locked, non-draggable rectangles beneath
    /// everything else. Lists expand to one text element per key point.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails validation.
    pub fn instantiate(&self, page: Size, study: &StudyDetails) -> EditorResult<Vec<Element>> {
        self.validate()?;
        let mut elements: Vec<Element> = self
            .sections
            .iter()
            .filter_map(|section| {
                let fill = section.background.as_ref()?;
                Some(
                    Element::shape(ShapeKind::Rect, fill.clone(), section.area.resolve(page))
                        .with_locked(true)
                        .with_draggable(false),
                )
            })
            .collect();

        let page_frame = Rect::from_origin_size(Point::default(), page);
        elements.extend(resolve_elements(&self.elements, page_frame, study));

        for (z, element) in elements.iter_mut().enumerate() {
            element.z_index = i32::try_from(z).unwrap_or(i32::MAX);
        }
        tracing::debug!("Instantiated template {} into {} element(s)", self.id, elements.len());
        Ok(elements)
    }
}

/// Check that every element lies within its frame (0.0 to 1.0 on each axis).
pub(crate) fn validate_elements(owner: &str, elements: &[TemplateElement]) -> EditorResult<()> {
    for element in elements {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        let sizes_ok = element.width.map_or(true, in_unit) && element.height.map_or(true, in_unit);
        if !(in_unit(element.x) && in_unit(element.y) && sizes_ok) {
            return Err(EditorError::Template(format!(
                "{owner}: element '{}' lies outside the page",
                element.id
            )));
        }
    }
    Ok(())
}

/// Resolve relative elements against `frame`, a page or a panel of one.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn resolve_elements(
    items: &[TemplateElement],
    frame: Rect,
    study: &StudyDetails,
) -> Vec<Element> {
    let mut elements = Vec::new();
    for item in items {
        let x = frame.x + item.x * frame.width;
        let y = frame.y + item.y * frame.height;
        let width = item.width.map(|w| w * frame.width);
        match &item.content {
            TemplateContent::Text { content, style } => {
                let text = match study.title() {
                    Some(title) => content.replace(TITLE_PLACEHOLDER, title),
                    None => content.clone(),
                };
                elements.push(anchored_text(&text, style.clone(), x, y, width));
            }
            TemplateContent::List { style, spacing } => {
                let mut points = study.get_list("keyPoints");
                if points.is_empty() {
                    points = FALLBACK_KEY_POINTS.iter().map(ToString::to_string).collect();
                }
                let pitch = style.font_size * spacing;
                elements.extend(points.iter().enumerate().map(|(i, point)| {
                    anchored_text(
                        &format!("\u{2022} {point}"),
                        style.clone(),
                        x,
                        y + pitch * i as f32,
                        width,
                    )
                }));
            }
            TemplateContent::Image { src } => {
                let src = study.get_str(&item.id).unwrap_or(src);
                let size = Size::new(
                    width.unwrap_or(0.2 * frame.width),
                    item.height.unwrap_or(0.2) * frame.height,
                );
                elements.push(Element::image(src, Point::new(x, y), size));
            }
        }
    }
    elements
}

/// A text element whose box is placed relative to `anchor_x` according to
/// the style's alignment. With `width` the box has an explicit size;
/// otherwise it is auto-sized.
#[must_use]
pub fn anchored_text(content: &str, style: TextStyle, anchor_x: f32, y: f32, width: Option<f32>) -> Element {
    let align = style.align;
    let mut element = Element::text(content, Point::new(anchor_x, y)).with_text_style(style);
    if let Some(width) = width {
        let height = element.effective_size().height;
        element = element.with_size(Size::new(width, height));
    }
    let box_width = element.effective_size().width;
    element.position.x = match align {
        TextAlign::Left => anchor_x,
        TextAlign::Center => anchor_x - box_width / 2.0,
        TextAlign::Right => anchor_x - box_width,
    };
    element
}

/// Templates shipped with the editor.
#[must_use]
pub fn builtin_templates() -> Vec<Template> {
    let inter = |font_size: f32, fill: &str, align: TextAlign| TextStyle {
        font_size,
        font_family: "Inter".to_string(),
        fill: fill.to_string(),
        align,
        ..TextStyle::default()
    };
    let text = |id: &str, content: &str, x: f32, y: f32, width: f32, style: TextStyle| TemplateElement {
        id: id.to_string(),
        content: TemplateContent::Text {
            content: content.to_string(),
            style,
        },
        x,
        y,
        width: Some(width),
        height: None,
    };
    let section = |name: &str, area: RelativeRect, background: Option<&str>| LayoutSection {
        name: name.to_string(),
        area,
        background: background.map(ToString::to_string),
    };
    let band = |y: f32, height: f32| RelativeRect {
        x: 0.0,
        y,
        width: 1.0,
        height,
    };
    let column = |x: f32, width: f32| RelativeRect {
        x,
        y: 0.0,
        width,
        height: 1.0,
    };

    vec![
        Template {
            id: "clinical-modern".to_string(),
            name: "Modern Clinical".to_string(),
            thumbnail: "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d".to_string(),
            description: "Clean, modern design with emphasis on readability".to_string(),
            paper: PaperSize::Letter,
            sections: vec![
                section("header", band(0.0, 0.2), Some("#2563eb")),
                section("body", band(0.2, 0.6), None),
                section("footer", band(0.8, 0.2), Some("#f3f4f6")),
            ],
            elements: vec![
                text("title", TITLE_PLACEHOLDER, 0.5, 0.1, 0.8, inter(72.0, "#ffffff", TextAlign::Center)),
                text(
                    "subtitle",
                    "Research Study Participants Needed",
                    0.5,
                    0.15,
                    0.7,
                    inter(36.0, "#ffffff", TextAlign::Center),
                ),
                TemplateElement {
                    id: "key-points".to_string(),
                    content: TemplateContent::List {
                        style: inter(24.0, "#1f2937", TextAlign::Left),
                        spacing: 1.5,
                    },
                    x: 0.1,
                    y: 0.3,
                    width: Some(0.8),
                    height: None,
                },
                text(
                    "contact",
                    "Contact Information",
                    0.5,
                    0.85,
                    0.8,
                    inter(28.0, "#1f2937", TextAlign::Center),
                ),
            ],
        },
        Template {
            id: "medical-professional".to_string(),
            name: "Professional Medical".to_string(),
            thumbnail: "https://images.unsplash.com/photo-1579684385127-1ef15d508118".to_string(),
            description: "Professional design for medical institutions".to_string(),
            paper: PaperSize::Letter,
            sections: vec![
                section("sidebar", column(0.0, 0.3), Some("#1e40af")),
                section("main", column(0.3, 0.7), None),
            ],
            elements: vec![
                TemplateElement {
                    id: "logo".to_string(),
                    content: TemplateContent::Image { src: String::new() },
                    x: 0.05,
                    y: 0.1,
                    width: Some(0.2),
                    height: Some(0.1),
                },
                text("title", TITLE_PLACEHOLDER, 0.35, 0.1, 0.6, inter(64.0, "#1f2937", TextAlign::Left)),
            ],
        },
    ]
}

/// Look up a built-in template by id.
#[must_use]
pub fn builtin_template(id: &str) -> Option<Template> {
    builtin_templates().into_iter().find(|t| t.id == id)
}
