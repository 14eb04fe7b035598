use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use crate::models::{FitCheckConfig, Grade, GradeResult, GradingInput, Source};
use crate::services::ai_service::{GradingError, GradingService};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "systemInstruction")]
    system_instruction: RequestContent,
    tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

/// The JSON object the prompt instructs the model to emit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedGrade {
    #[serde(default)]
    product_name: Option<String>,
    score: i64,
    grade: Grade,
    composition_analysis: String,
    #[serde(default)]
    care_instructions: Option<String>,
    explanation: String,
    #[serde(default)]
    fit_verdict: Option<String>,
}

pub struct GeminiService {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiService {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_endpoint(api_key, model, DEFAULT_API_URL.to_string())
    }

    /// Endpoint injected explicitly so tests can point at a local server.
    pub fn with_endpoint(api_key: String, model: String, endpoint: String) -> Self {
        Self {
            api_key,
            model,
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request(
        &self,
        input: &GradingInput,
        fit: Option<&FitCheckConfig>,
    ) -> GenerateContentRequest {
        let mut parts = Vec::new();

        if let Some((bytes, mime_type)) = input.image_data() {
            let data = general_purpose::STANDARD.encode(bytes);
            log::debug!(
                "🖼️ Attaching inline image: {} bytes raw, {} bytes base64",
                bytes.len(),
                data.len()
            );

            parts.push(RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.to_string(),
                    data,
                },
            });
            parts.push(RequestPart::Text {
                text: "Analyze this image. If it's a label, read the composition. \
                       If it's a barcode or product, identify it."
                    .to_string(),
            });
        }

        if let Some(text) = input.text_value() {
            parts.push(RequestPart::Text {
                text: format!("Additional Context/Input: \"{}\"", text),
            });
        }

        GenerateContentRequest {
            contents: vec![RequestContent { parts }],
            system_instruction: RequestContent {
                parts: vec![RequestPart::Text {
                    text: build_system_instruction(fit),
                }],
            },
            tools: vec![Tool {
                google_search: serde_json::json!({}),
            }],
        }
    }
}

#[async_trait::async_trait]
impl GradingService for GeminiService {
    async fn grade(
        &self,
        input: &GradingInput,
        fit: Option<&FitCheckConfig>,
    ) -> Result<GradeResult, GradingError> {
        let request = self.build_request(input, fit);

        log::info!("🤖 Sending grading request to Gemini with model: {}", self.model);

        // Exactly one external call per grading attempt. No retry, no follow-up.
        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        log::debug!("📥 Gemini response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Gemini API error ({}): {}", status, error_text);
            return Err(GradingError::Service(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            GradingError::Service(format!("Failed to decode Gemini response: {}", e))
        })?;

        let (text, sources) = flatten_response(body);
        log::info!(
            "💬 Gemini replied with {} chars, {} grounding sources",
            text.len(),
            sources.len()
        );

        Ok(parse_grade_response(&text, sources))
    }
}

/// Connectivity problems get their own user-facing message; everything else is
/// a generic service failure.
fn classify_transport_error(e: reqwest::Error) -> GradingError {
    if e.is_connect() || e.is_timeout() {
        log::error!("❌ Network failure reaching Gemini: {}", e);
        GradingError::Network(e)
    } else {
        log::error!("❌ Gemini request failed: {}", e);
        GradingError::Service(e.to_string())
    }
}

/// Pull the reply text and the grounding citations out of the first candidate.
/// Source order is the model's relevance order and is preserved.
fn flatten_response(body: GenerateContentResponse) -> (String, Vec<Source>) {
    let mut text = String::new();
    let mut sources = Vec::new();

    if let Some(candidate) = body.candidates.into_iter().next() {
        if let Some(content) = candidate.content {
            for part in content.parts {
                if let Some(t) = part.text {
                    text.push_str(&t);
                }
            }
        }

        if let Some(metadata) = candidate.grounding_metadata {
            for chunk in metadata.grounding_chunks {
                if let Some(web) = chunk.web {
                    if let Some(uri) = web.uri {
                        sources.push(Source {
                            title: web.title.unwrap_or_else(|| "Source".to_string()),
                            uri,
                        });
                    }
                }
            }
        }
    }

    (text, sources)
}

/// Greedy outer-brace match: first `{` through last `}`. Tolerates
/// conversational wrapper prose but is not a JSON-in-text scanner; a reply
/// with stray unbalanced braces outside the payload defeats it.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Map the model's free-form reply to a `GradeResult`. A reply that does not
/// contain the expected JSON degrades to the fallback result instead of
/// failing: the caller always gets something renderable.
fn parse_grade_response(text: &str, sources: Vec<Source>) -> GradeResult {
    let parsed = extract_json(text).and_then(|json| {
        serde_json::from_str::<ParsedGrade>(json)
            .map_err(|e| log::warn!("⚠️ Gemini reply contained unparseable JSON: {}", e))
            .ok()
    });

    match parsed {
        Some(grade) => GradeResult {
            product_name: grade.product_name,
            score: grade.score.clamp(0, 100) as u8,
            grade: grade.grade,
            composition_analysis: grade.composition_analysis,
            care_instructions: grade.care_instructions,
            explanation: grade.explanation,
            fit_verdict: grade.fit_verdict,
            sources,
            timestamp: None,
        },
        None => {
            log::warn!("⚠️ No parseable JSON in Gemini reply, returning fallback grade");
            fallback_result(sources)
        }
    }
}

/// Degraded but well-formed result used when the reply cannot be parsed.
fn fallback_result(sources: Vec<Source>) -> GradeResult {
    GradeResult {
        product_name: None,
        score: 0,
        grade: Grade::F,
        composition_analysis: "Could not analyze".to_string(),
        care_instructions: None,
        explanation: "The AI analysis did not return clear results. Try providing \
                      a clearer label photo or the direct product link."
            .to_string(),
        fit_verdict: None,
        sources,
        timestamp: None,
    }
}

fn build_system_instruction(fit: Option<&FitCheckConfig>) -> String {
    let mut instruction = String::from(
        "You are ClearTag AI, an expert in sustainable fashion, textile science, and fabric composition.\n\
         Your goal is to analyze product information provided by the user and determine its fabric \
         composition and sustainability grade.\n\
         \n\
         The user may provide text (URL, Name, Description) OR an image (Product Label, Barcode, or the Item itself).\n\
         \n\
         If an IMAGE is provided:\n\
         1. Look for a Fabric Composition Label (e.g., \"100% Cotton\"). Read the text exactly.\n\
         2. Look for a Barcode. If readable, try to identify the product code.\n\
         3. Look for the product itself. Identify the item type (e.g., \"Denim Jeans\").\n\
         \n\
         If TEXT is provided:\n\
         - Use Google Search to find the specific fabric composition if it is a product name.\n\
         - Analyze the composition string directly if provided.\n\
         \n\
         Grading Criteria:\n\
         - Score (0-100):\n\
           - 100: 100% Natural Organic fibers (GOTS Cotton, Linen, Hemp).\n\
           - 90-99: 100% Natural conventional fibers.\n\
           - 70-89: Mostly natural (>80%) or high-quality semi-synthetics (Tencel/Lyocell).\n\
           - 50-69: Blends with significant synthetic content (e.g. 60% Cotton / 40% Poly).\n\
           - <50: Majority synthetic (Polyester, Acrylic, Nylon) or virgin synthetics.\n\
         - Grade (A, B, C, D, F): derived roughly from the score.\n\
         \n\
         Output Format:\n\
         Return a strictly valid JSON object. Do not include markdown code blocks. The JSON must match this structure:\n\
         {\n\
           \"productName\": \"Extracted Name or 'Unknown Product'\",\n\
           \"score\": 85,\n\
           \"grade\": \"B\",\n\
           \"compositionAnalysis\": \"e.g. 100% Organic Cotton (detected from label)\",\n\
           \"careInstructions\": \"Short, specific washing and drying instructions based on the fabric type.\",\n\
           \"explanation\": \"A short 1-2 sentence explanation of why it got this grade.\"\n\
         }\n",
    );

    if let Some(fit) = fit.filter(|f| f.include_fit_check) {
        instruction.push_str("\nFIT CHECK REQUESTED:\n");
        instruction.push_str(&format!(
            "The user wants to know how size \"{}\" of this garment would fit them.\n",
            fit.desired_size
        ));
        instruction.push_str("User measurements:\n");
        for (label, value) in [
            ("Height", &fit.height),
            ("Weight", &fit.weight),
            ("Waist", &fit.waist),
            ("Bust/Chest", &fit.bust_chest),
            ("Inseam", &fit.inseam),
            ("Hips", &fit.hips),
        ] {
            if let Some(value) = value {
                instruction.push_str(&format!("- {}: {}\n", label, value));
            }
        }
        instruction.push_str(
            "Cross-reference size charts and fit reviews for this product and add a \
             \"fitVerdict\" string field to the JSON object with a short verdict on \
             whether the desired size will fit.\n",
        );
    }

    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_wrapped_in_prose() {
        let text = "Here you go: {\"score\": 92} Hope that helps!";
        assert_eq!(extract_json(text), Some("{\"score\": 92}"));
    }

    #[test]
    fn test_extract_json_bare_object() {
        let text = "{\"score\": 10}";
        assert_eq!(extract_json(text), Some("{\"score\": 10}"));
    }

    #[test]
    fn test_extract_json_no_braces() {
        assert_eq!(extract_json("Sorry, I cannot help."), None);
        assert_eq!(extract_json(""), None);
    }

    #[test]
    fn test_extract_json_reversed_braces() {
        assert_eq!(extract_json("} not json {"), None);
    }

    #[test]
    fn test_parse_wrapped_response() {
        let text = "Here you go: {\"score\":92,\"grade\":\"A\",\"compositionAnalysis\":\"100% Linen\",\"explanation\":\"Natural fiber\"}";
        let result = parse_grade_response(text, vec![]);

        assert_eq!(result.score, 92);
        assert_eq!(result.grade, Grade::A);
        assert_eq!(result.composition_analysis, "100% Linen");
        assert_eq!(result.explanation, "Natural fiber");
        assert!(result.sources.is_empty());
        assert!(result.product_name.is_none());
    }

    #[test]
    fn test_parse_no_json_falls_back() {
        let result = parse_grade_response("Sorry, I cannot help.", vec![]);

        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::F);
        assert!(!result.explanation.is_empty());
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_parse_malformed_json_falls_back() {
        let result = parse_grade_response("{\"score\": \"not a number\"}", vec![]);

        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::F);
    }

    #[test]
    fn test_parse_two_objects_falls_back() {
        // Greedy outer-brace match spans both objects and fails to parse, so
        // two independent JSON objects degrade rather than mis-merge.
        let text = "{\"score\": 90, \"grade\": \"A\"} and also {\"score\": 10, \"grade\": \"F\"}";
        let result = parse_grade_response(text, vec![]);

        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::F);
    }

    #[test]
    fn test_fallback_keeps_grounding_sources() {
        let sources = vec![Source {
            title: "Some shop".to_string(),
            uri: "https://example.com/shirt".to_string(),
        }];
        let result = parse_grade_response("no json here", sources.clone());

        assert_eq!(result.sources, sources);
    }

    #[test]
    fn test_parse_clamps_out_of_range_score() {
        let text = "{\"score\":150,\"grade\":\"A\",\"compositionAnalysis\":\"100% Hemp\",\"explanation\":\"ok\"}";
        let result = parse_grade_response(text, vec![]);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_build_request_text_only() {
        let service = GeminiService::new("test_key".to_string(), "test_model".to_string());
        let input = GradingInput::text("Uniqlo Linen Shirt");
        let request = service.build_request(&input, None);

        let json = serde_json::to_value(&request).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts.as_array().unwrap().len(), 1);
        assert!(parts[0]["text"]
            .as_str()
            .unwrap()
            .contains("Uniqlo Linen Shirt"));
        assert!(json["tools"][0]["googleSearch"].is_object());
        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("ClearTag AI"));
    }

    #[test]
    fn test_build_request_image_part_comes_first() {
        let service = GeminiService::new("test_key".to_string(), "test_model".to_string());
        let input = GradingInput::text_and_image("striped shirt", vec![1, 2, 3], "image/jpeg");
        let request = service.build_request(&input, None);

        let json = serde_json::to_value(&request).unwrap();
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(
            parts[0]["inlineData"]["data"],
            general_purpose::STANDARD.encode([1u8, 2, 3])
        );
        assert!(parts[1]["text"].as_str().unwrap().contains("label"));
        assert!(parts[2]["text"].as_str().unwrap().contains("striped shirt"));
    }

    #[test]
    fn test_fit_check_instruction_contains_values_verbatim() {
        let fit = FitCheckConfig {
            include_fit_check: true,
            desired_size: "M".to_string(),
            height: Some("170cm".to_string()),
            weight: None,
            waist: None,
            bust_chest: None,
            inseam: None,
            hips: None,
        };

        let instruction = build_system_instruction(Some(&fit));
        assert!(instruction.contains("\"M\""));
        assert!(instruction.contains("170cm"));
        assert!(instruction.contains("fitVerdict"));
    }

    #[test]
    fn test_fit_check_disabled_adds_nothing() {
        let fit = FitCheckConfig {
            include_fit_check: false,
            desired_size: "L".to_string(),
            height: None,
            weight: None,
            waist: None,
            bust_chest: None,
            inseam: None,
            hips: None,
        };

        let instruction = build_system_instruction(Some(&fit));
        assert_eq!(instruction, build_system_instruction(None));
    }

    #[test]
    fn test_request_url_generation() {
        let service = GeminiService::new("k".to_string(), "gemini-3-flash-preview".to_string());
        assert_eq!(
            service.request_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_flatten_response_extracts_text_and_sources() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "part one "}, {"text": "part two"}]},
                    "groundingMetadata": {
                        "groundingChunks": [
                            {"web": {"uri": "https://a.example", "title": "A"}},
                            {"web": {"uri": "https://b.example"}},
                            {"web": {}}
                        ]
                    }
                }]
            }"#,
        )
        .unwrap();

        let (text, sources) = flatten_response(body);
        assert_eq!(text, "part one part two");
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "A");
        assert_eq!(sources[1].title, "Source");
        assert_eq!(sources[1].uri, "https://b.example");
    }
}
