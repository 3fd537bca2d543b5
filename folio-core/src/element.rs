//! Layout elements - the building blocks of a poster or brochure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect, Size};

/// Average glyph advance as a fraction of the font size, used to size
/// auto-sized text without a font rasterizer.
const GLYPH_ADVANCE: f32 = 0.6;

/// Fallback size for shapes placed without explicit dimensions.
const DEFAULT_SHAPE_SIZE: f32 = 100.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centred.
    Center,
    /// Flush right.
    Right,
}

impl TextAlign {
    /// The next alignment in the left → center → right cycle.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Left => Self::Center,
            Self::Center => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Typography of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Font family name.
    pub font_family: String,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Underline decoration.
    pub underline: bool,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Text color as hex.
    pub fill: String,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 48.0,
            font_family: "Arial".to_string(),
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Left,
            fill: "#000000".to_string(),
            line_height: 1.2,
        }
    }
}

/// Geometric primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Rectangle filling the element bounds.
    #[default]
    Rect,
    /// Ellipse inscribed in the element bounds.
    Ellipse,
    /// Line from the top-left to the bottom-right corner of the bounds.
    Line,
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum ElementKind {
    /// A text block.
    Text {
        /// Text content, may contain newlines.
        content: String,
        /// Typography.
        style: TextStyle,
    },

    /// A placed image.
    Image {
        /// Image source URI or base64 data URI.
        src: String,
        /// Intrinsic width of the image in pixels.
        natural_width: f32,
        /// Intrinsic height of the image in pixels.
        natural_height: f32,
    },

    /// A vector shape.
    Shape {
        /// Primitive to draw.
        shape: ShapeKind,
        /// Fill color as hex, `None` for no fill.
        fill: Option<String>,
        /// Stroke color as hex, `None` for no stroke.
        stroke: Option<String>,
        /// Stroke width in pixels.
        stroke_width: f32,
    },
}

impl ElementKind {
    /// Short lowercase name of the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Shape { .. } => "shape",
        }
    }
}

/// A layout element with content, geometry and permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content type.
    pub kind: ElementKind,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    /// Explicit size, `None` for auto-sized text.
    #[serde(default)]
    pub size: Option<Size>,
    /// Rotation in degrees around the element centre.
    #[serde(default)]
    pub rotation: f32,
    /// Paint order; ties are broken by insertion order.
    #[serde(default)]
    pub z_index: i32,
    /// Opacity from 0.0 to 1.0.
    #[serde(default = "Element::default_opacity")]
    pub opacity: f32,
    /// Locked elements ignore every edit except unlocking.
    #[serde(default)]
    pub locked: bool,
    /// Whether pointer drags may move this element.
    #[serde(default = "Element::default_draggable")]
    pub draggable: bool,
}

impl Element {
    const fn default_opacity() -> f32 {
        1.0
    }

    const fn default_draggable() -> bool {
        true
    }

    /// Create a new element with the given kind at the given position.
    #[must_use]
    pub fn new(kind: ElementKind, position: Point) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            position,
            size: None,
            rotation: 0.0,
            z_index: 0,
            opacity: 1.0,
            locked: false,
            draggable: true,
        }
    }

    /// Create an auto-sized text element with default typography.
    #[must_use]
    pub fn text(content: impl Into<String>, position: Point) -> Self {
        Self::new(
            ElementKind::Text {
                content: content.into(),
                style: TextStyle::default(),
            },
            position,
        )
    }

    /// Create an image element displayed at its natural size.
    #[must_use]
    pub fn image(src: impl Into<String>, position: Point, natural: Size) -> Self {
        Self::new(
            ElementKind::Image {
                src: src.into(),
                natural_width: natural.width,
                natural_height: natural.height,
            },
            position,
        )
        .with_size(natural)
    }

    /// Create a filled shape element.
    #[must_use]
    pub fn shape(shape: ShapeKind, fill: impl Into<String>, bounds: Rect) -> Self {
        Self::new(
            ElementKind::Shape {
                shape,
                fill: Some(fill.into()),
                stroke: None,
                stroke_width: 0.0,
            },
            bounds.origin(),
        )
        .with_size(bounds.size())
    }

    /// Set an explicit size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the paint order.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the text style. Has no effect on non-text elements.
    #[must_use]
    pub fn with_text_style(mut self, new_style: TextStyle) -> Self {
        if let ElementKind::Text { style, .. } = &mut self.kind {
            *style = new_style;
        }
        self
    }

    /// Set the lock flag.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Set whether the element may be dragged.
    #[must_use]
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Whether pointer gestures may move or reshape this element.
    #[must_use]
    pub const fn is_movable(&self) -> bool {
        self.draggable && !self.locked
    }

    /// Size used for layout: the explicit size, or an estimate for auto-sized text.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn effective_size(&self) -> Size {
        if let Some(size) = self.size {
            return size;
        }
        match &self.kind {
            ElementKind::Text { content, style } => {
                let lines = content.lines().count().max(1);
                let longest = content
                    .lines()
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(1);
                Size::new(
                    longest as f32 * style.font_size * GLYPH_ADVANCE,
                    lines as f32 * style.font_size * style.line_height,
                )
            }
            ElementKind::Image {
                natural_width,
                natural_height,
                ..
            } => Size::new(*natural_width, *natural_height),
            ElementKind::Shape { .. } => Size::new(DEFAULT_SHAPE_SIZE, DEFAULT_SHAPE_SIZE),
        }
    }

    /// Unrotated bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.effective_size())
    }

    /// Check if a point (in canvas coordinates) is within this element,
    /// taking rotation about the centre into account.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        let bounds = self.bounds();
        let local = point.rotate_around(bounds.center(), -self.rotation);
        bounds.contains(local)
    }
}

/// Sparse set of changes merged into an element by an update.
///
/// Kind-specific fields are ignored for elements of another kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    /// New position.
    pub position: Option<Point>,
    /// New explicit size.
    pub size: Option<Size>,
    /// New rotation in degrees.
    pub rotation: Option<f32>,
    /// New paint order.
    pub z_index: Option<i32>,
    /// New opacity, clamped to 0..=1.
    pub opacity: Option<f32>,
    /// Lock or unlock.
    pub locked: Option<bool>,
    /// Allow or forbid dragging.
    pub draggable: Option<bool>,
    /// Text content.
    pub content: Option<String>,
    /// Text font size.
    pub font_size: Option<f32>,
    /// Text font family.
    pub font_family: Option<String>,
    /// Text bold flag.
    pub bold: Option<bool>,
    /// Text italic flag.
    pub italic: Option<bool>,
    /// Text underline flag.
    pub underline: Option<bool>,
    /// Text alignment.
    pub align: Option<TextAlign>,
    /// Text color or shape fill.
    pub fill: Option<String>,
    /// Shape stroke color.
    pub stroke: Option<String>,
    /// Shape stroke width.
    pub stroke_width: Option<f32>,
    /// Image source.
    pub src: Option<String>,
}

impl ElementPatch {
    /// Patch that only moves the element.
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch that only resizes the element.
    #[must_use]
    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Patch that only rotates the element.
    #[must_use]
    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    /// Patch that only changes the lock flag.
    #[must_use]
    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Self::default()
        }
    }

    /// Whether the patch carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `element`. Returns `true` if the element changed.
    ///
    /// A locked element only accepts the `locked` field.
    pub fn apply_to(&self, element: &mut Element) -> bool {
        let before = element.clone();

        if element.locked {
            if let Some(locked) = self.locked {
                element.locked = locked;
            }
            return *element != before;
        }

        if let Some(position) = self.position {
            element.position = position;
        }
        if let Some(size) = self.size {
            element.size = Some(size);
        }
        if let Some(rotation) = self.rotation {
            element.rotation = rotation;
        }
        if let Some(z_index) = self.z_index {
            element.z_index = z_index;
        }
        if let Some(opacity) = self.opacity {
            element.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(draggable) = self.draggable {
            element.draggable = draggable;
        }

        match &mut element.kind {
            ElementKind::Text { content, style } => {
                if let Some(new_content) = &self.content {
                    content.clone_from(new_content);
                }
                if let Some(font_size) = self.font_size {
                    style.font_size = font_size;
                }
                if let Some(family) = &self.font_family {
                    style.font_family.clone_from(family);
                }
                if let Some(bold) = self.bold {
                    style.bold = bold;
                }
                if let Some(italic) = self.italic {
                    style.italic = italic;
                }
                if let Some(underline) = self.underline {
                    style.underline = underline;
                }
                if let Some(align) = self.align {
                    style.align = align;
                }
                if let Some(fill) = &self.fill {
                    style.fill.clone_from(fill);
                }
            }
            ElementKind::Image { src, .. } => {
                if let Some(new_src) = &self.src {
                    src.clone_from(new_src);
                }
            }
            ElementKind::Shape {
                fill,
                stroke,
                stroke_width,
                ..
            } => {
                if let Some(new_fill) = &self.fill {
                    *fill = Some(new_fill.clone());
                }
                if let Some(new_stroke) = &self.stroke {
                    *stroke = Some(new_stroke.clone());
                }
                if let Some(width) = self.stroke_width {
                    *stroke_width = width.max(0.0);
                }
            }
        }

        *element != before
    }
}
