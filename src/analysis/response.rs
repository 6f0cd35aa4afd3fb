use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

// Returns the content of the first ```json fenced block if the reply
// contains one, otherwise the reply as-is.
pub fn extract_json(raw_text: &str) -> &str {
    static FENCE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());
    match FENCE.captures(raw_text).and_then(|caps| caps.get(1)) {
        Some(block) => block.as_str(),
        None => raw_text,
    }
}
