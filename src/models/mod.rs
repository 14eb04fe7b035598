use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for one grading attempt. Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub enum GradingInput {
    Text {
        value: String,
    },
    Image {
        bytes: Vec<u8>,
        mime_type: String,
    },
    TextAndImage {
        value: String,
        bytes: Vec<u8>,
        mime_type: String,
    },
}

impl GradingInput {
    pub fn text(value: impl Into<String>) -> Self {
        GradingInput::Text { value: value.into() }
    }

    pub fn image(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        GradingInput::Image {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn text_and_image(
        value: impl Into<String>,
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Self {
        GradingInput::TextAndImage {
            value: value.into(),
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match self {
            GradingInput::Text { value } | GradingInput::TextAndImage { value, .. } => Some(value),
            GradingInput::Image { .. } => None,
        }
    }

    pub fn image_data(&self) -> Option<(&[u8], &str)> {
        match self {
            GradingInput::Image { bytes, mime_type }
            | GradingInput::TextAndImage { bytes, mime_type, .. } => Some((bytes, mime_type)),
            GradingInput::Text { .. } => None,
        }
    }
}

/// Coarse sustainability bucket. Thresholds are the model's policy, not ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", s)
    }
}

/// Grounding citation from the model's live search, in relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Canonical grading output. `score` and `grade` are always present, including
/// on the degraded fallback result; `sources` is always a defined sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub score: u8, // 0-100
    pub grade: Grade,
    pub composition_analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care_instructions: Option<String>,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_verdict: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Optional fit-check modifier. Purely additive: absent means grade as usual.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitCheckConfig {
    pub include_fit_check: bool,
    pub desired_size: String,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub waist: Option<String>,
    #[serde(default)]
    pub bust_chest: Option<String>,
    #[serde(default)]
    pub inseam: Option<String>,
    #[serde(default)]
    pub hips: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialCategory {
    Natural,
    #[serde(rename = "Semi-Synthetic")]
    SemiSynthetic,
    Synthetic,
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MaterialCategory::Natural => "Natural",
            MaterialCategory::SemiSynthetic => "Semi-Synthetic",
            MaterialCategory::Synthetic => "Synthetic",
        };
        write!(f, "{}", s)
    }
}

/// Fabric dictionary entry. Static fixture data, loaded at process start.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: &'static str,
    pub name: &'static str,
    pub category: MaterialCategory,
    pub sustainability_rating: Grade,
    pub description: &'static str,
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
    pub care_instructions: &'static [&'static str],
    pub eco_impact: &'static str,
}

/// Curated sustainable-brand directory entry. Static fixture data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price_range: &'static str,
    pub categories: &'static [&'static str],
    pub primary_fabrics: &'static [&'static str],
    pub location: &'static str,
    pub shipping: &'static str,
    pub website_url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FiberType {
    Natural,
    Synthetic,
    Hybrid,
}

/// Decomposition timeline entry ("how long does clothing take to decompose?").
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecompositionEntry {
    pub fabric: &'static str,
    pub duration: &'static str,
    #[serde(rename = "type")]
    pub fiber_type: FiberType,
    pub details: &'static str,
}

/// Aggregated view over the check history ("Your Insights").
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_checks: usize,
    pub average_score: u8,
    pub high_grade_count: usize,
    pub carbon_saved_kg: f64,
    pub top_fibers: Vec<FiberCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiberCount {
    pub name: String,
    pub count: usize,
}

/// One completed grading attempt kept in the ephemeral in-process history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    pub input_text: Option<String>,
    pub had_image: bool,
    pub result: GradeResult,
    pub checked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_serializes_as_bare_letter() {
        assert_eq!(serde_json::to_string(&Grade::A).unwrap(), "\"A\"");
        let g: Grade = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(g, Grade::F);
    }

    #[test]
    fn test_grade_result_sources_default_to_empty() {
        let json = r#"{
            "score": 85,
            "grade": "B",
            "compositionAnalysis": "60% Cotton / 40% Polyester",
            "explanation": "Blend with significant synthetic content."
        }"#;

        let result: GradeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.score, 85);
        assert_eq!(result.grade, Grade::B);
        assert!(result.sources.is_empty());
        assert!(result.product_name.is_none());
    }

    #[test]
    fn test_fit_check_camel_case_fields() {
        let json = r#"{
            "includeFitCheck": true,
            "desiredSize": "M",
            "height": "170cm",
            "bustChest": "92cm"
        }"#;

        let fit: FitCheckConfig = serde_json::from_str(json).unwrap();
        assert!(fit.include_fit_check);
        assert_eq!(fit.desired_size, "M");
        assert_eq!(fit.height.as_deref(), Some("170cm"));
        assert_eq!(fit.bust_chest.as_deref(), Some("92cm"));
        assert!(fit.waist.is_none());
    }

    #[test]
    fn test_grading_input_accessors() {
        let text = GradingInput::text("Uniqlo Linen Shirt");
        assert_eq!(text.text_value(), Some("Uniqlo Linen Shirt"));
        assert!(text.image_data().is_none());

        let both = GradingInput::text_and_image("label photo", vec![0xFF, 0xD8], "image/jpeg");
        assert_eq!(both.text_value(), Some("label photo"));
        let (bytes, mime) = both.image_data().unwrap();
        assert_eq!(bytes, &[0xFF, 0xD8]);
        assert_eq!(mime, "image/jpeg");
    }
}
