//! Predictions shown under the countdown.
//!
//! The provider asks a Gemini `generateContent` endpoint for a JSON array of
//! `{text, topic}` records. Any failure (no credential, transport, HTTP status,
//! unparsable or empty payload) falls back to the built-in list, so the page
//! always has something to rotate through.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response, window};

use crate::config::PageConfig;

/// Label shown when a record comes without a topic.
pub const DEFAULT_TOPIC: &str = "Prediction";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspiration {
    pub text: String,
    #[serde(default)]
    pub topic: String,
}

impl Inspiration {
    pub fn new(text: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic: topic.into(),
        }
    }

    pub fn topic_label(&self) -> &str {
        let topic = self.topic.trim();
        if topic.is_empty() { DEFAULT_TOPIC } else { topic }
    }
}

const BUILT_IN: [(&str, &str); 10] = [
    ("Your coffee will cost more than your Netflix subscription. Time to invest in beans!", "Economy"),
    ("Cats will finally master smartphones and launch their own social network called 'Meowspace'.", "Technology"),
    ("Pizza delivery drones will get lost so often that free pizza Fridays become a thing.", "Food"),
    ("Your houseplants will secretly rate you on an app. Spoiler: you're getting 2 stars.", "Nature"),
    ("Scientists will discover where all the missing socks go: a parallel laundry dimension.", "Mystery"),
    ("Mondays will be officially renamed 'Coffee Day' to improve everyone's mood.", "Society"),
    ("Dogs will dominate TikTok and become the world's top influencers. Humans won't stand a chance.", "Social Media"),
    ("Napping will be recognized as exercise. Gyms will offer premium nap classes with pillows.", "Wellness"),
    ("Autocorrect will become so smart, it'll finish your sentences before you even think them.", "AI"),
    ("Penguins will be elected as climate ambassadors and waddle into the UN for their first speech.", "Environment"),
];

/// The built-in predictions.
pub fn fallback() -> Vec<Inspiration> {
    BUILT_IN
        .iter()
        .map(|&(text, topic)| Inspiration::new(text, topic))
        .collect()
}

#[derive(Debug, Error)]
pub enum InspirationError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("provider answered with HTTP {0}")]
    Status(u16),

    #[error("malformed provider payload: {0}")]
    Malformed(String),

    #[error("provider payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider returned no predictions")]
    Empty,
}

// --- Gemini payloads --------------------------------------------------------

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// JSON body for a `generateContent` call asking for `count` predictions.
pub fn request_body(count: u8, year: i32) -> String {
    let prompt = format!(
        "Write {count} short, funny, lighthearted predictions about the year {year}. \
         Answer with a JSON array of objects with a \"text\" field (one sentence) \
         and a \"topic\" field (one or two words)."
    );
    serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": { "responseMimeType": "application/json" }
    })
    .to_string()
}

/// Pull the predictions out of a `generateContent` response body.
pub fn parse_response(body: &str) -> Result<Vec<Inspiration>, InspirationError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .ok_or_else(|| InspirationError::Malformed("no text part in first candidate".into()))?;
    parse_predictions(&text)
}

/// Parse the model's text: a JSON array of records, possibly wrapped in a
/// markdown code fence. Records with blank text are dropped.
pub fn parse_predictions(text: &str) -> Result<Vec<Inspiration>, InspirationError> {
    let items: Vec<Inspiration> = serde_json::from_str(strip_code_fence(text))?;
    let items: Vec<Inspiration> = items
        .into_iter()
        .filter(|item| !item.text.trim().is_empty())
        .collect();
    if items.is_empty() {
        return Err(InspirationError::Empty);
    }
    Ok(items)
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Collapse every provider outcome into a non-empty list.
pub fn or_fallback(result: Result<Vec<Inspiration>, InspirationError>) -> Vec<Inspiration> {
    match result {
        Ok(items) if !items.is_empty() => items,
        Ok(_) => {
            console_warn!("prediction provider returned nothing; using built-in list");
            fallback()
        }
        Err(err) => {
            console_warn!("prediction provider failed ({err}); using built-in list");
            fallback()
        }
    }
}

// --- Browser fetch ----------------------------------------------------------

/// Load predictions for `year`, falling back to the built-in list on any failure.
pub async fn load(config: &PageConfig, year: i32) -> Vec<Inspiration> {
    let result = fetch(config, year).await;
    if let Ok(items) = &result {
        console_log!("loaded {} predictions from provider", items.len());
    }
    or_fallback(result)
}

async fn fetch(config: &PageConfig, year: i32) -> Result<Vec<Inspiration>, InspirationError> {
    let key = config
        .credential()
        .ok_or(InspirationError::MissingCredential)?;
    let url = format!(
        "{}/models/{}:generateContent?key={}",
        config.endpoint.trim_end_matches('/'),
        config.model,
        key
    );

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&request_body(config.prediction_count, year)));
    let request = Request::new_with_str_and_init(&url, &opts).map_err(transport)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(transport)?;

    let win = window().ok_or_else(|| InspirationError::Transport("no window".into()))?;
    let response: Response = JsFuture::from(win.fetch_with_request(&request))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    if !response.ok() {
        return Err(InspirationError::Status(response.status()));
    }
    let body = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?
        .as_string()
        .ok_or_else(|| InspirationError::Malformed("response body is not text".into()))?;
    parse_response(&body)
}

fn transport(err: JsValue) -> InspirationError {
    InspirationError::Transport(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gemini(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        })
        .to_string()
    }

    #[test]
    fn fallback_is_complete() {
        let items = fallback();
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|i| !i.text.is_empty() && !i.topic.is_empty()));
        assert_eq!(items[8].topic, "AI");
    }

    #[test]
    fn parses_generate_content_response() {
        let body = gemini(r#"[{"text": "Robots will nap.", "topic": "AI"}, {"text": "Socks return."}]"#);
        let items = parse_response(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Inspiration::new("Robots will nap.", "AI"));
        assert_eq!(items[1].topic_label(), DEFAULT_TOPIC);
    }

    #[test]
    fn strips_markdown_fence() {
        let text = "```json\n[{\"text\": \"Fenced.\", \"topic\": \"Misc\"}]\n```";
        assert_eq!(parse_predictions(text).unwrap()[0].text, "Fenced.");
    }

    #[test]
    fn classifies_failures() {
        assert!(matches!(parse_response("nope"), Err(InspirationError::Json(_))));
        assert!(matches!(
            parse_response(r#"{"candidates": []}"#),
            Err(InspirationError::Malformed(_))
        ));
        assert!(matches!(parse_response(&gemini("[]")), Err(InspirationError::Empty)));
        assert!(matches!(
            parse_response(&gemini(r#"[{"text": "  "}]"#)),
            Err(InspirationError::Empty)
        ));
        assert!(matches!(
            parse_response(&gemini(r#"[{"topic": "no text"}]"#)),
            Err(InspirationError::Json(_))
        ));
    }

    #[test]
    fn every_failure_falls_back() {
        let failures = vec![
            Err(InspirationError::MissingCredential),
            Err(InspirationError::Transport("offline".into())),
            Err(InspirationError::Status(503)),
            Err(InspirationError::Empty),
            Ok(Vec::new()),
        ];
        for failure in failures {
            let items = or_fallback(failure);
            assert_eq!(items, fallback());
        }
        let ok = vec![Inspiration::new("x", "y")];
        assert_eq!(or_fallback(Ok(ok.clone())), ok);
    }

    #[test]
    fn request_body_asks_for_json() {
        let body: serde_json::Value = serde_json::from_str(&request_body(5, 2027)).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Write 5 ") && prompt.contains("2027"));
    }
}
