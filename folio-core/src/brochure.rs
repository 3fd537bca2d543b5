//! Tri-fold brochures: panel templates and generated panel copy.
//!
//! A tri-fold page is split into three equal columns. Seen from the outside
//! of the folded sheet, the left column is the inside flap, the middle is
//! the back and the right is the front cover.
//!
//! ```text
//! ┌──────────┬──────────┬──────────┐
//! │  Inside  │   Back   │  Front   │
//! │ sections │ contact  │ headline │
//! │ bullets  │ notices  │ call to  │
//! │ details  │          │ action   │
//! └──────────┴──────────┴──────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::content::{interpret, ColorScheme, Generated};
use crate::element::{Element, TextAlign, TextStyle};
use crate::error::EditorResult;
use crate::geometry::{Rect, Size};
use crate::page::{PaperSize, PRINT_DPI};
use crate::study::StudyDetails;
use crate::template::{
    anchored_text, resolve_elements, validate_elements, TemplateContent, TemplateElement,
    TITLE_PLACEHOLDER,
};

const FALLBACK_HEADLINE: &str = "Clinical Research Study";
const FALLBACK_SUBHEADLINE: &str = "Research Study Participants Needed";
const FALLBACK_CALL_TO_ACTION: &str =
    "Learn more about participating in this important research study";
const FALLBACK_OBJECTIVE: &str = "Study details to be provided";
const TO_BE_DETERMINED: &str = "To be determined";

/// Points per inch, for converting typographic sizes to canvas pixels.
const POINTS_PER_INCH: f32 = 72.0;

/// One column of a tri-fold page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    /// Inside flap (left column).
    Inside,
    /// Back of the folded brochure (middle column).
    Back,
    /// Front cover (right column).
    Front,
}

impl Panel {
    /// Panels from left to right.
    pub const ALL: [Self; 3] = [Self::Inside, Self::Back, Self::Front];

    /// Column index from the left.
    #[must_use]
    pub const fn column(self) -> usize {
        match self {
            Self::Inside => 0,
            Self::Back => 1,
            Self::Front => 2,
        }
    }

    /// The panel's region on a page.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn area(self, page: Size) -> Rect {
        let width = page.width / Self::ALL.len() as f32;
        Rect::new(width * self.column() as f32, 0.0, width, page.height)
    }
}

/// Elements for each panel, in panel-relative coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrochurePanels {
    /// Front cover.
    pub front: Vec<TemplateElement>,
    /// Inside flap.
    pub inside: Vec<TemplateElement>,
    /// Back panel.
    pub back: Vec<TemplateElement>,
}

impl BrochurePanels {
    /// Elements for `panel`.
    #[must_use]
    pub fn get(&self, panel: Panel) -> &[TemplateElement] {
        match panel {
            Panel::Front => &self.front,
            Panel::Inside => &self.inside,
            Panel::Back => &self.back,
        }
    }
}

/// A reusable starting layout for a tri-fold brochure.
///
/// Element coordinates are fractions of their panel, not of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrochureTemplate {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Preview image URL.
    pub thumbnail: String,
    /// One-line description.
    pub description: String,
    /// Per-panel elements.
    pub panels: BrochurePanels,
}

impl BrochureTemplate {
    /// Brochures always print on tri-fold paper.
    #[must_use]
    pub const fn paper(&self) -> PaperSize {
        PaperSize::TriFold
    }

    /// Parse and validate a brochure template from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an element lies outside
    /// its panel.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Check that every element lies within its panel.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Template`] naming the offending element.
    pub fn validate(&self) -> EditorResult<()> {
        for panel in Panel::ALL {
            validate_elements(&self.id, self.panels.get(panel))?;
        }
        Ok(())
    }

    /// Resolve into absolute elements on `page`, seeded from `study`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails validation.
    pub fn instantiate(&self, page: Size, study: &StudyDetails) -> EditorResult<Vec<Element>> {
        self.validate()?;
        let mut elements: Vec<Element> = Panel::ALL
            .into_iter()
            .flat_map(|panel| resolve_elements(self.panels.get(panel), panel.area(page), study))
            .collect();
        for (z, element) in elements.iter_mut().enumerate() {
            element.z_index = i32::try_from(z).unwrap_or(i32::MAX);
        }
        tracing::debug!(
            "Instantiated brochure template {} into {} element(s)",
            self.id,
            elements.len()
        );
        Ok(elements)
    }
}

/// Brochure templates shipped with the editor.
#[must_use]
pub fn builtin_brochure_templates() -> Vec<BrochureTemplate> {
    let style = |font_size: f32, fill: &str, align: TextAlign, bold: bool| TextStyle {
        font_size,
        font_family: "Inter".to_string(),
        fill: fill.to_string(),
        align,
        bold,
        ..TextStyle::default()
    };
    let text = |id: &str, content: &str, x: f32, y: f32, style: TextStyle| TemplateElement {
        id: id.to_string(),
        content: TemplateContent::Text {
            content: content.to_string(),
            style,
        },
        x,
        y,
        width: Some(0.8),
        height: None,
    };

    vec![BrochureTemplate {
        id: "trifold-clinical".to_string(),
        name: "Clinical Tri-Fold".to_string(),
        thumbnail: "https://images.unsplash.com/photo-1576091160550-2173dba999ef".to_string(),
        description: "Three-panel brochure with study overview and contact details".to_string(),
        panels: BrochurePanels {
            front: vec![
                TemplateElement {
                    id: "front-image".to_string(),
                    content: TemplateContent::Image { src: String::new() },
                    x: 0.1,
                    y: 0.08,
                    width: Some(0.8),
                    height: Some(0.35),
                },
                text("headline", TITLE_PLACEHOLDER, 0.5, 0.5, style(64.0, "#1e40af", TextAlign::Center, true)),
                text(
                    "subheadline",
                    FALLBACK_SUBHEADLINE,
                    0.5,
                    0.6,
                    style(40.0, "#2563eb", TextAlign::Center, false),
                ),
            ],
            inside: vec![
                text("about", "About the Study", 0.1, 0.08, style(48.0, "#1e40af", TextAlign::Left, true)),
                TemplateElement {
                    id: "key-points".to_string(),
                    content: TemplateContent::List {
                        style: style(32.0, "#1f2937", TextAlign::Left, false),
                        spacing: 1.6,
                    },
                    x: 0.1,
                    y: 0.18,
                    width: Some(0.8),
                    height: None,
                },
            ],
            back: vec![
                text("contact", "Contact Us", 0.5, 0.1, style(48.0, "#1e40af", TextAlign::Center, true)),
                text(
                    "voluntary",
                    "Participation is voluntary",
                    0.5,
                    0.85,
                    style(28.0, "#4b5563", TextAlign::Center, false),
                ),
            ],
        },
    }]
}

/// Look up a built-in brochure template by id.
#[must_use]
pub fn builtin_brochure_template(id: &str) -> Option<BrochureTemplate> {
    builtin_brochure_templates().into_iter().find(|t| t.id == id)
}

/// Cover copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontPanel {
    /// Cover headline.
    pub headline: String,
    /// Line under the headline.
    #[serde(default)]
    pub subheadline: String,
    /// Closing prompt at the foot of the cover.
    #[serde(default)]
    pub call_to_action: String,
    /// Descriptions of suggested cover imagery.
    #[serde(default)]
    pub image_prompts: Vec<String>,
    /// Suggested palette.
    #[serde(default)]
    pub color_scheme: ColorScheme,
}

/// One titled block of inside copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoSection {
    /// Block heading.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Highlighted line shown after the body.
    #[serde(default)]
    pub emphasis: Option<String>,
    /// Suggested illustration.
    #[serde(default)]
    pub visual_suggestion: Option<String>,
}

/// Practical facts about taking part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyFacts {
    /// How long participation lasts.
    pub duration: String,
    /// Number and kind of visits.
    pub visits: String,
    /// Payment or reimbursement.
    pub compensation: String,
}

impl Default for StudyFacts {
    fn default() -> Self {
        Self {
            duration: TO_BE_DETERMINED.to_string(),
            visits: TO_BE_DETERMINED.to_string(),
            compensation: "Details provided during screening".to_string(),
        }
    }
}

/// Inside flap copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsidePanel {
    /// Titled blocks, top to bottom.
    pub sections: Vec<InfoSection>,
    /// Bullet points.
    pub key_points: Vec<String>,
    /// Duration, visits and compensation.
    pub study_details: StudyFacts,
}

/// How to reach the study team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInformation {
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
    /// Web address.
    pub website: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Back panel copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackPanel {
    /// Contact block.
    pub contact_information: ContactInformation,
    /// Logo image URLs.
    pub institutional_logos: Vec<String>,
    /// Short notices printed above the regulatory line.
    pub disclaimers: Vec<String>,
    /// Ethics board or registration statement.
    pub regulatory_info: String,
}

/// Copy for all three panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrochurePanelsContent {
    /// Front cover.
    pub front: FrontPanel,
    /// Inside flap.
    #[serde(default)]
    pub inside: InsidePanel,
    /// Back panel.
    #[serde(default)]
    pub back: BackPanel,
}

/// Font sizes in typographic points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    /// Headline size.
    pub headline: f32,
    /// Subheadline size.
    pub subheadline: f32,
    /// Body size.
    pub body: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            headline: 24.0,
            subheadline: 18.0,
            body: 12.0,
        }
    }
}

/// Suggested fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    /// Family for headings.
    pub headline_font: String,
    /// Family for body text.
    pub body_font: String,
    /// Sizes per role.
    pub font_size: FontSizes,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            headline_font: "Helvetica Neue".to_string(),
            body_font: "Arial".to_string(),
            font_size: FontSizes::default(),
        }
    }
}

/// Suggested spacing, with lengths as CSS-style strings (`0.75in`, `12pt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Spacing {
    /// Panel margin.
    pub margins: String,
    /// Gap between blocks.
    pub padding: String,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            margins: "0.75in".to_string(),
            padding: "0.5in".to_string(),
            line_height: 1.5,
        }
    }
}

/// Typography and spacing guidance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrochureDesign {
    /// Fonts.
    pub typography: Typography,
    /// Spacing.
    pub spacing: Spacing,
}

/// Generated tri-fold brochure copy and design guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrochureContent {
    /// Per-panel copy.
    pub panels: BrochurePanelsContent,
    /// Typography and spacing.
    #[serde(default)]
    pub design: BrochureDesign,
}

impl BrochureContent {
    /// Interpret a raw model response.
    ///
    /// Follows the same rules as poster content: code fences are stripped,
    /// malformed or incomplete JSON yields the study fallback and an empty
    /// response fails.
    #[must_use]
    pub fn from_response(raw: &str, study: &StudyDetails) -> Generated<Self> {
        interpret(raw, "brochure", Self::is_complete, || Self::fallback(study))
    }

    /// Content derived from the study alone.
    #[must_use]
    pub fn fallback(study: &StudyDetails) -> Self {
        let owned = |value: &str| value.to_string();
        Self {
            panels: BrochurePanelsContent {
                front: FrontPanel {
                    headline: owned(study.title().unwrap_or(FALLBACK_HEADLINE)),
                    subheadline: owned(FALLBACK_SUBHEADLINE),
                    call_to_action: owned(FALLBACK_CALL_TO_ACTION),
                    image_prompts: vec![
                        owned("Professional medical research setting with modern equipment"),
                        owned("Diverse group of healthcare professionals in clinical setting"),
                    ],
                    color_scheme: ColorScheme::default(),
                },
                inside: InsidePanel {
                    sections: vec![InfoSection {
                        title: owned("About the Study"),
                        content: owned(study.get_str("primaryObjective").unwrap_or(FALLBACK_OBJECTIVE)),
                        emphasis: Some(owned("Advancing medical knowledge through research")),
                        visual_suggestion: Some(owned("Simple scientific illustration or infographic")),
                    }],
                    key_points: vec![
                        owned("Qualified participants may receive study-related care at no cost"),
                        owned("Compensation for time and travel may be available"),
                        owned("Your privacy will be protected"),
                    ],
                    study_details: StudyFacts::default(),
                },
                back: BackPanel {
                    contact_information: ContactInformation {
                        phone: owned(study.get_str("phone").unwrap_or("(555) 123-4567")),
                        email: owned(study.get_str("email").unwrap_or("research@example.com")),
                        website: None,
                        address: None,
                    },
                    institutional_logos: Vec::new(),
                    disclaimers: vec![
                        owned("Participation is voluntary"),
                        owned("All information will be kept confidential"),
                    ],
                    regulatory_info: owned("IRB approval information to be added"),
                },
            },
            design: BrochureDesign::default(),
        }
    }

    /// A non-empty headline and something to put inside: a titled section
    /// or a key point.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let inside = &self.panels.inside;
        !self.panels.front.headline.trim().is_empty()
            && (inside.sections.iter().any(|s| !s.title.trim().is_empty())
                || inside.key_points.iter().any(|p| !p.trim().is_empty()))
    }

    /// Lay the copy out on a tri-fold page of the given size.
    ///
    /// Each panel is filled top to bottom inside its margin. Point sizes
    /// from the design are converted to canvas pixels.
    #[must_use]
    pub fn to_elements(&self, page: Size) -> Vec<Element> {
        let design = &self.design;
        let colors = &self.panels.front.color_scheme;
        let px = |points: f32| points * PRINT_DPI / POINTS_PER_INCH;
        let sizes = design.typography.font_size;
        let margin = parse_length(&design.spacing.margins).unwrap_or(0.75 * PRINT_DPI);
        let gap = parse_length(&design.spacing.padding).unwrap_or(0.5 * PRINT_DPI) / 2.0;
        let style = |points: f32, family: &str, fill: &str, align: TextAlign| TextStyle {
            font_size: px(points),
            font_family: family.to_string(),
            fill: fill.to_string(),
            align,
            line_height: design.spacing.line_height,
            ..TextStyle::default()
        };
        let headline = |fill: &str, align: TextAlign| TextStyle {
            bold: true,
            ..style(sizes.headline, &design.typography.headline_font, fill, align)
        };
        let subheadline = |fill: &str, align: TextAlign| {
            style(sizes.subheadline, &design.typography.headline_font, fill, align)
        };
        let body = |fill: &str, align: TextAlign| style(sizes.body, &design.typography.body_font, fill, align);

        let mut elements = Vec::new();

        // Front: headline block centred a quarter of the way down, call to
        // action above the bottom margin.
        let front = PanelCursor::new(Panel::Front.area(page), margin, gap);
        let mut cursor = front.starting_at(page.height * 0.25);
        let cover = &self.panels.front;
        cursor.centred(&mut elements, &cover.headline, headline(&colors.primary, TextAlign::Center));
        cursor.centred(&mut elements, &cover.subheadline, subheadline(&colors.secondary, TextAlign::Center));
        let call = body("#1f2937", TextAlign::Center);
        let call_y = front.bottom() - call.font_size * call.line_height;
        front.starting_at(call_y).centred(&mut elements, &cover.call_to_action, call);

        // Inside: sections, bullets, then the practical facts.
        let inside = &self.panels.inside;
        let mut cursor = PanelCursor::new(Panel::Inside.area(page), margin, gap);
        for section in &inside.sections {
            cursor.left(&mut elements, &section.title, subheadline(&colors.primary, TextAlign::Left));
            cursor.left(&mut elements, &section.content, body("#1f2937", TextAlign::Left));
            if let Some(emphasis) = &section.emphasis {
                let emphasised = TextStyle {
                    italic: true,
                    ..body(&colors.accent, TextAlign::Left)
                };
                cursor.left(&mut elements, emphasis, emphasised);
            }
        }
        for point in inside.key_points.iter().filter(|p| !p.trim().is_empty()) {
            cursor.left(&mut elements, &format!("\u{2022} {point}"), body("#1f2937", TextAlign::Left));
        }
        let facts = &inside.study_details;
        for (label, value) in [
            ("Duration", &facts.duration),
            ("Visits", &facts.visits),
            ("Compensation", &facts.compensation),
        ] {
            if !value.trim().is_empty() {
                cursor.left(&mut elements, &format!("{label}: {value}"), body("#1f2937", TextAlign::Left));
            }
        }

        // Back: contact block, then notices.
        let back = &self.panels.back;
        let contact = &back.contact_information;
        let mut cursor = PanelCursor::new(Panel::Back.area(page), margin, gap);
        cursor.centred(&mut elements, "Contact Us", subheadline(&colors.primary, TextAlign::Center));
        for line in [Some(&contact.phone), Some(&contact.email), contact.website.as_ref(), contact.address.as_ref()]
            .into_iter()
            .flatten()
        {
            cursor.centred(&mut elements, line, body("#1f2937", TextAlign::Center));
        }
        for disclaimer in &back.disclaimers {
            cursor.centred(&mut elements, disclaimer, body("#4b5563", TextAlign::Center));
        }
        cursor.centred(&mut elements, &back.regulatory_info, body("#4b5563", TextAlign::Center));

        for (z, element) in elements.iter_mut().enumerate() {
            element.z_index = i32::try_from(z).unwrap_or(i32::MAX);
        }
        elements
    }
}

/// Stacks text blocks down a panel inside its margin.
#[derive(Debug, Clone, Copy)]
struct PanelCursor {
    inner: Rect,
    gap: f32,
    y: f32,
}

impl PanelCursor {
    fn new(area: Rect, margin: f32, gap: f32) -> Self {
        let margin = margin.min(area.width / 4.0).min(area.height / 4.0);
        let inner = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width - 2.0 * margin,
            area.height - 2.0 * margin,
        );
        Self { inner, gap, y: inner.y }
    }

    fn starting_at(self, y: f32) -> Self {
        Self {
            y: y.max(self.inner.y),
            ..self
        }
    }

    fn bottom(&self) -> f32 {
        self.inner.bottom()
    }

    fn centred(&mut self, out: &mut Vec<Element>, content: &str, style: TextStyle) {
        let anchor = self.inner.center().x;
        self.place(out, content, style, anchor);
    }

    fn left(&mut self, out: &mut Vec<Element>, content: &str, style: TextStyle) {
        let anchor = self.inner.x;
        self.place(out, content, style, anchor);
    }

    fn place(&mut self, out: &mut Vec<Element>, content: &str, style: TextStyle, anchor_x: f32) {
        if content.trim().is_empty() {
            return;
        }
        let element = anchored_text(content, style, anchor_x, self.y, Some(self.inner.width));
        self.y += element.bounds().height + self.gap;
        out.push(element);
    }
}

/// Parse a CSS-style length (`0.75in`, `12pt`, `10mm`, `40px` or a bare
/// number of pixels) into canvas pixels at [`PRINT_DPI`].
#[must_use]
pub fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let split = value
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: f32 = number.trim().parse().ok()?;
    let pixels = match unit.trim() {
        "in" => number * PRINT_DPI,
        "pt" => number * PRINT_DPI / POINTS_PER_INCH,
        "mm" => number * PRINT_DPI / 25.4,
        "cm" => number * PRINT_DPI / 2.54,
        "px" | "" => number,
        _ => return None,
    };
    (pixels.is_finite() && pixels >= 0.0).then_some(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn trifold() -> Size {
        PaperSize::TriFold.pixels()
    }

    fn text_of(element: &Element) -> Option<&str> {
        match &element.kind {
            ElementKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    fn find<'a>(elements: &'a [Element], content: &str) -> &'a Element {
        elements
            .iter()
            .find(|e| text_of(e) == Some(content))
            .unwrap_or_else(|| panic!("no element with text {content:?}"))
    }

    fn within(element: &Element, panel: Panel) -> bool {
        let area = panel.area(trifold());
        let bounds = element.bounds();
        bounds.x >= area.x - 1e-3 && bounds.right() <= area.right() + 1e-3
    }

    const RESPONSE: &str = r##"{
        "panels": {
            "front": {
                "headline": "Living With Asthma?",
                "subheadline": "A 12-week inhaler study",
                "callToAction": "Call today to see if you qualify",
                "imagePrompts": ["Adult using an inhaler outdoors"],
                "colorScheme": {"primary": "#0f766e", "secondary": "#115e59", "accent": "#5eead4"}
            },
            "inside": {
                "sections": [{"title": "What Happens", "content": "Six clinic visits", "emphasis": "No cost to you"}],
                "keyPoints": ["Ages 18-70"],
                "studyDetails": {"duration": "12 weeks", "visits": "6", "compensation": "$50 per visit"}
            },
            "back": {
                "contactInformation": {"phone": "555-0199", "email": "asthma@example.org", "website": "example.org/asthma"},
                "disclaimers": ["Participation is voluntary"],
                "regulatoryInfo": "Approved by the Example IRB"
            }
        },
        "design": {"typography": {"fontSize": {"headline": 30, "subheadline": 20, "body": 12}}}
    }"##;

    #[test]
    fn test_panels_split_page_into_thirds() {
        let page = trifold();
        assert_eq!(Panel::Inside.area(page), Rect::new(0.0, 0.0, 1100.0, 2550.0));
        assert_eq!(Panel::Back.area(page), Rect::new(1100.0, 0.0, 1100.0, 2550.0));
        assert_eq!(Panel::Front.area(page), Rect::new(2200.0, 0.0, 1100.0, 2550.0));
    }

    #[test]
    fn test_builtin_brochure_places_elements_in_their_panels() {
        let template = builtin_brochure_template("trifold-clinical").expect("template");
        assert_eq!(template.paper(), PaperSize::TriFold);
        let study = StudyDetails::new()
            .with("title", "BREATHE-3")
            .with("keyPoints", vec!["Adults 18-70", "Six visits"]);
        let elements = template.instantiate(trifold(), &study).expect("instantiate");

        let headline = find(&elements, "BREATHE-3");
        assert!(within(headline, Panel::Front));
        assert!((headline.bounds().center().x - 2750.0).abs() < 1e-2);
        assert!((headline.position.y - 1275.0).abs() < 1e-2);

        assert!(within(find(&elements, "\u{2022} Six visits"), Panel::Inside));
        assert!(within(find(&elements, "Contact Us"), Panel::Back));

        let image = elements
            .iter()
            .find(|e| matches!(e.kind, ElementKind::Image { .. }))
            .expect("image slot");
        assert!((image.position.x - 2310.0).abs() < 1e-2);

        let z: Vec<i32> = elements.iter().map(|e| e.z_index).collect();
        assert_eq!(z, (0..).take(elements.len()).collect::<Vec<i32>>());
    }

    #[test]
    fn test_brochure_template_from_json_rejects_off_panel_element() {
        let json = r#"{
            "id": "bad", "name": "Bad", "thumbnail": "", "description": "",
            "panels": {"back": [{"id": "x", "type": "text", "content": "Hi", "x": 1.2, "y": 0.1}]}
        }"#;
        assert!(matches!(
            BrochureTemplate::from_json(json),
            Err(crate::EditorError::Template(_))
        ));
    }

    #[test]
    fn test_response_parses_and_lays_out_three_panels() {
        let result = BrochureContent::from_response(RESPONSE, &StudyDetails::new());
        let Generated::Parsed(content) = result else {
            panic!("expected parsed content, got {result:?}");
        };
        assert_eq!(content.panels.inside.study_details.visits, "6");
        assert_eq!(content.design.spacing, Spacing::default());

        let elements = content.to_elements(trifold());
        let headline = find(&elements, "Living With Asthma?");
        assert!(within(headline, Panel::Front));
        let ElementKind::Text { style, .. } = &headline.kind else {
            panic!("headline is not text");
        };
        assert!((style.font_size - 125.0).abs() < 1e-3);
        assert!(style.bold);
        assert_eq!(style.fill, "#0f766e");

        assert!(within(find(&elements, "Duration: 12 weeks"), Panel::Inside));
        assert!(within(find(&elements, "\u{2022} Ages 18-70"), Panel::Inside));
        assert!(within(find(&elements, "example.org/asthma"), Panel::Back));

        let what = find(&elements, "What Happens");
        let body = find(&elements, "Six clinic visits");
        assert!(body.position.y > what.position.y);
        assert!((what.position.x - 225.0).abs() < 1e-2);
    }

    #[test]
    fn test_headline_only_response_falls_back() {
        let study = StudyDetails::new()
            .with("title", "BREATHE-3")
            .with("primaryObjective", "Compare two inhalers");
        let raw = r#"{"panels": {"front": {"headline": "Hi"}}}"#;
        let result = BrochureContent::from_response(raw, &study);
        assert!(result.is_fallback());
        let content = result.into_value().expect("fallback");
        assert_eq!(content.panels.front.headline, "BREATHE-3");
        assert_eq!(content.panels.inside.sections[0].content, "Compare two inhalers");
        assert_eq!(content.panels.back.disclaimers.len(), 2);
    }

    #[test]
    fn test_empty_brochure_response_fails() {
        assert!(matches!(
            BrochureContent::from_response("", &StudyDetails::new()),
            Generated::Failed(_)
        ));
    }

    #[test]
    fn test_fallback_layout_respects_margins() {
        let content = BrochureContent::fallback(&StudyDetails::new());
        let elements = content.to_elements(trifold());
        let cta = find(&elements, FALLBACK_CALL_TO_ACTION);
        assert!(cta.bounds().bottom() <= 2550.0 - 225.0 + 1e-2);
        assert!(elements.iter().all(|e| e.bounds().y >= 225.0 - 1e-2));
        assert!(find(&elements, "(555) 123-4567").position.x >= 1100.0);
    }

    #[test]
    fn test_parse_length_units() {
        assert_eq!(parse_length("0.75in"), Some(225.0));
        assert_eq!(parse_length("12pt"), Some(50.0));
        assert_eq!(parse_length(" 40px "), Some(40.0));
        assert_eq!(parse_length("40"), Some(40.0));
        assert!(parse_length("2.54cm").is_some_and(|v| (v - 300.0).abs() < 1e-3));
        assert_eq!(parse_length("1em"), None);
        assert_eq!(parse_length("wide"), None);
    }
}
