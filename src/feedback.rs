// src/feedback.rs

//! Natural-language feedback for a completed assessment.
//!
//! Thin boundary over an OpenAI-style chat-completions endpoint. The model
//! is asked for a strict JSON object; any failure along the way (no API key
//! configured, HTTP error, unparseable reply) degrades to a deterministic
//! score-banded fallback so the results page always renders.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// The four-field feedback contract consumed by the results page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
    pub overall_performance: String,
}

/// Scores and profile metadata the prompt is built from.
#[derive(Debug, Clone)]
pub struct FeedbackInput {
    pub mcq_score: i64,
    pub coding_score: Option<i64>,
    pub total_score: i64,
    pub interest: Option<String>,
    pub years_experience: Option<String>,
    pub current_role: Option<String>,
}

#[derive(Clone)]
pub struct FeedbackClient {
    backend: Option<Backend>,
}

#[derive(Clone)]
struct Backend {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

fn build_prompt(input: &FeedbackInput) -> String {
    let coding = match input.coding_score {
        Some(score) => format!("{}%", score),
        None => "ungraded".to_string(),
    };
    format!(
        r#"Analyze this assessment result for a {} learner:
- MCQ Score: {}%
- Coding Score: {}
- Total Score: {}%
- Experience Level: {}
- Current Role: {}

Provide personalized feedback in JSON format:
{{
  "strengths": ["strength1", "strength2", "strength3"],
  "improvements": ["area1", "area2", "area3"],
  "recommendations": ["rec1", "rec2", "rec3"],
  "overallPerformance": "detailed analysis paragraph"
}}"#,
        input.interest.as_deref().unwrap_or("DevOps"),
        input.mcq_score,
        coding,
        input.total_score,
        input.years_experience.as_deref().unwrap_or("Beginner"),
        input.current_role.as_deref().unwrap_or("Student"),
    )
}

/// Canned feedback used whenever the LLM is unavailable or misbehaves.
fn fallback(input: &FeedbackInput) -> Feedback {
    let band = match input.total_score {
        80..=100 => "strong",
        50..=79 => "solid",
        _ => "developing",
    };
    let domain = input.interest.clone().unwrap_or_else(|| "DevOps".to_string());
    Feedback {
        strengths: vec![
            format!("Completed the full {} assessment", domain),
            format!("Overall score of {}% shows a {} foundation", input.total_score, band),
        ],
        improvements: vec![
            "Review the topics behind the questions you missed".to_string(),
            "Practice writing small functions against test cases".to_string(),
        ],
        recommendations: vec![
            format!("Start with chapter 1 of the {} learning path", domain),
            "Revisit the assessment after finishing the first chapters".to_string(),
        ],
        overall_performance: format!(
            "You scored {}% overall ({}% on multiple choice). The curriculum \
             is sequenced to close the gaps this assessment surfaced; work \
             through the chapters in order and re-test as you go.",
            input.total_score, input.mcq_score
        ),
    }
}

impl FeedbackClient {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        let backend = api_key.map(|api_key| Backend {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_default(),
            api_key,
            base_url,
            model,
        });
        Self { backend }
    }

    /// A client with no backend; every call yields the fallback.
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Never fails: the fallback absorbs every error path.
    pub async fn generate(&self, input: &FeedbackInput) -> Feedback {
        let Some(backend) = &self.backend else {
            return fallback(input);
        };

        match backend.chat_json(&build_prompt(input)).await {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!("feedback generation failed, using fallback: {}", e);
                fallback(input)
            }
        }
    }
}

impl Backend {
    async fn chat_json(&self, prompt: &str) -> Result<Feedback, String> {
        let url = format!("{}/chat/completions", self.base_url);
        let req = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: ResponseFormat {
                r#type: "json_object".to_string(),
            },
        };

        let res = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&req)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            return Err(format!("LLM HTTP {}", res.status()));
        }

        let body: ChatResponse = res.json().await.map_err(|e| e.to_string())?;
        let content = body
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        serde_json::from_str::<Feedback>(&content).map_err(|e| format!("JSON parse error: {}", e))
    }
}
