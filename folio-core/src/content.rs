//! Generated poster content: parsing, fallback and layout.
//!
//! The editor does not talk to a model itself. The host hands over the raw
//! response text, and [`PosterContent::from_response`] turns it into a tagged
//! [`Generated`] value so the caller can tell real output from fallback.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::element::{Element, TextAlign, TextStyle};
use crate::geometry::Size;
use crate::study::StudyDetails;
use crate::template::anchored_text;

/// Key points used when a response cannot be parsed.
pub const FALLBACK_KEY_POINTS: [&str; 4] = [
    "Seeking volunteers for a clinical research study",
    "Compensation provided for time and travel",
    "No-cost study-related medical care",
    "Must be 18 years or older",
];

const FALLBACK_TITLE: &str = "Clinical Research Study";
const FALLBACK_SUBTITLE: &str = "Research Study Participants Needed";
const FALLBACK_CONTACT: &str = "Contact us to learn more";

/// Outcome of interpreting a generation response.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated<T> {
    /// The response parsed and validated.
    Parsed(T),
    /// The response was unusable; this is the study-derived substitute.
    Fallback(T),
    /// Nothing usable was produced.
    Failed(String),
}

impl<T> Generated<T> {
    /// The content, whether parsed or fallback.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) | Self::Fallback(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Consume into the content, whether parsed or fallback.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Parsed(value) | Self::Fallback(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// True for [`Generated::Fallback`].
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Transform the content, keeping the tag.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Generated<U> {
        match self {
            Self::Parsed(value) => Generated::Parsed(f(value)),
            Self::Fallback(value) => Generated::Fallback(f(value)),
            Self::Failed(reason) => Generated::Failed(reason),
        }
    }
}

/// Colors suggested alongside generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    /// Main color.
    pub primary: String,
    /// Secondary color.
    pub secondary: String,
    /// Highlight color.
    pub accent: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            secondary: "#1e40af".to_string(),
            accent: "#60a5fa".to_string(),
        }
    }
}

/// Recruitment poster copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterContent {
    /// Headline.
    pub title: String,
    /// Line under the headline.
    #[serde(default)]
    pub subtitle: String,
    /// Bullet points.
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Call to action / contact line.
    #[serde(default)]
    pub contact_info: String,
    /// Suggested palette.
    #[serde(default)]
    pub suggested_colors: ColorScheme,
    /// Suggested image URLs.
    #[serde(default)]
    pub suggested_images: Vec<String>,
}

impl PosterContent {
    /// Interpret a raw model response.
    ///
    /// Markdown code fences are stripped before parsing. Valid content is
    /// [`Generated::Parsed`]; malformed or incomplete content yields the
    /// study fallback; an empty response is [`Generated::Failed`].
    #[must_use]
    pub fn from_response(raw: &str, study: &StudyDetails) -> Generated<Self> {
        interpret(raw, "poster", Self::is_complete, || Self::fallback(study))
    }

    /// Content derived from the study alone.
    #[must_use]
    pub fn fallback(study: &StudyDetails) -> Self {
        Self {
            title: study.title().unwrap_or(FALLBACK_TITLE).to_string(),
            subtitle: FALLBACK_SUBTITLE.to_string(),
            key_points: FALLBACK_KEY_POINTS.iter().map(ToString::to_string).collect(),
            contact_info: study
                .get_str("contactInfo")
                .unwrap_or(FALLBACK_CONTACT)
                .to_string(),
            suggested_colors: ColorScheme::default(),
            suggested_images: Vec::new(),
        }
    }

    /// A non-empty title and at least one non-empty key point.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && self.key_points.iter().any(|p| !p.trim().is_empty())
    }

    /// Lay the content out on a page of the given size.
    ///
    /// Title and subtitle are centred near the top, bullets run down the
    /// left, and the contact line sits 300 px above the bottom edge.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_elements(&self, page: Size) -> Vec<Element> {
        let centre = page.width / 2.0;
        let style = |font_size: f32, fill: &str, align: TextAlign| TextStyle {
            font_size,
            fill: fill.to_string(),
            align,
            ..TextStyle::default()
        };

        let mut elements = vec![
            anchored_text(&self.title, style(120.0, "#000000", TextAlign::Center), centre, 200.0, None),
            anchored_text(&self.subtitle, style(72.0, "#666666", TextAlign::Center), centre, 400.0, None),
        ];
        elements.extend(
            self.key_points
                .iter()
                .filter(|point| !point.trim().is_empty())
                .enumerate()
                .map(|(i, point)| {
                    anchored_text(
                        &format!("\u{2022} {point}"),
                        style(48.0, "#333333", TextAlign::Left),
                        300.0,
                        600.0 + 150.0 * i as f32,
                        None,
                    )
                }),
        );
        elements.push(anchored_text(
            &self.contact_info,
            style(48.0, "#000000", TextAlign::Center),
            centre,
            page.height - 300.0,
            None,
        ));

        elements.retain(|e| match &e.kind {
            crate::element::ElementKind::Text { content, .. } => !content.trim().is_empty(),
            _ => true,
        });
        for (z, element) in elements.iter_mut().enumerate() {
            element.z_index = i32::try_from(z).unwrap_or(i32::MAX);
        }
        elements
    }
}

/// Parse a model response into `T`. Malformed or incomplete content is
/// replaced by `fallback`; an empty response fails.
pub(crate) fn interpret<T: DeserializeOwned>(
    raw: &str,
    kind: &str,
    is_complete: impl FnOnce(&T) -> bool,
    fallback: impl FnOnce() -> T,
) -> Generated<T> {
    let body = strip_code_fences(raw);
    if body.is_empty() {
        return Generated::Failed("empty response".to_string());
    }
    match serde_json::from_str::<T>(body) {
        Ok(content) if is_complete(&content) => Generated::Parsed(content),
        Ok(_) => {
            tracing::warn!("Generated {kind} content is incomplete, using fallback");
            Generated::Fallback(fallback())
        }
        Err(e) => {
            tracing::warn!("Failed to parse {kind} content: {e}");
            Generated::Fallback(fallback())
        }
    }
}

/// Strip a surrounding markdown code fence (```` ``` ```` or ```` ```json ````).
///
/// The fence may span lines or sit on one line with the body, as in
/// ```` ```json {"title": "A"}``` ````.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => {
            let untagged = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            if untagged.trim_start().starts_with(['{', '[']) {
                untagged
            } else {
                rest
            }
        }
    };
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    const RESPONSE: &str = r#"{
        "title": "Help Us Beat Migraine",
        "subtitle": "Volunteers needed",
        "keyPoints": ["Ages 18-65", "Four clinic visits"],
        "contactInfo": "Call 555-0100"
    }"#;

    fn texts(elements: &[Element]) -> Vec<&str> {
        elements
            .iter()
            .filter_map(|e| match &e.kind {
                ElementKind::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fenced_response_parses() {
        let raw = format!("```json\n{RESPONSE}\n```");
        let result = PosterContent::from_response(&raw, &StudyDetails::new());
        let Generated::Parsed(content) = result else {
            panic!("expected parsed content, got {result:?}");
        };
        assert_eq!(content.key_points.len(), 2);
        assert_eq!(content.suggested_colors, ColorScheme::default());
    }

    #[test]
    fn test_single_line_fenced_response_parses() {
        let raw = r#"```json {"title":"T","keyPoints":["Paid visits"],"contactInfo":"c"}```"#;
        let result = PosterContent::from_response(raw, &StudyDetails::new());
        let Generated::Parsed(content) = result else {
            panic!("expected parsed content, got {result:?}");
        };
        assert_eq!(content.title, "T");
        assert_eq!(content.key_points, vec!["Paid visits".to_string()]);
    }

    #[test]
    fn test_malformed_response_falls_back_to_study() {
        let study = StudyDetails::new().with("title", "ASPIRE-2");
        let result = PosterContent::from_response("Sure! Here is a poster:", &study);
        assert!(result.is_fallback());
        let content = result.into_value().expect("fallback content");
        assert_eq!(content.title, "ASPIRE-2");
        assert_eq!(content.key_points.len(), FALLBACK_KEY_POINTS.len());
    }

    #[test]
    fn test_missing_key_points_falls_back() {
        let result = PosterContent::from_response(r#"{"title":"T","keyPoints":[]}"#, &StudyDetails::new());
        assert!(result.is_fallback());
    }

    #[test]
    fn test_empty_response_fails() {
        let result = PosterContent::from_response("  \n ", &StudyDetails::new());
        assert!(matches!(result, Generated::Failed(_)));
        assert!(result.value().is_none());
    }

    #[test]
    fn test_layout_positions_follow_poster_grid() {
        let content = PosterContent::from_response(RESPONSE, &StudyDetails::new())
            .into_value()
            .expect("content");
        let elements = content.to_elements(Size::new(2550.0, 3300.0));

        assert_eq!(
            texts(&elements),
            vec![
                "Help Us Beat Migraine",
                "Volunteers needed",
                "\u{2022} Ages 18-65",
                "\u{2022} Four clinic visits",
                "Call 555-0100"
            ]
        );
        let title = &elements[0];
        assert!((title.position.y - 200.0).abs() < f32::EPSILON);
        assert!((title.bounds().center().x - 1275.0).abs() < 1e-3);
        assert!((elements[3].position.y - 750.0).abs() < f32::EPSILON);
        assert!((elements[3].position.x - 300.0).abs() < f32::EPSILON);
        assert!((elements[4].position.y - 3000.0).abs() < f32::EPSILON);
        let z: Vec<i32> = elements.iter().map(|e| e.z_index).collect();
        assert_eq!(z, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n[1]"), "[1]");
        assert_eq!(strip_code_fences("```json {\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```[1, 2]```"), "[1, 2]");
    }
}
