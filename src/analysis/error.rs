use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("clé API Gemini absente (variable d'environnement GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("échec lors de l'appel au LLM: {source}")]
    LlmCall {
        #[source]
        source: anyhow::Error,
    },
    #[error("réponse du LLM illisible en JSON: {source}")]
    ResponseParse {
        #[source]
        source: serde_json::Error,
        raw_text: String,
    },
    #[error("la réponse du LLM ne contient pas de tableau 'data'")]
    MissingData { raw_text: String },
}

impl AnalysisError {
    // Best-effort raw LLM text, kept for diagnosis.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            AnalysisError::ResponseParse { raw_text, .. }
            | AnalysisError::MissingData { raw_text } => Some(raw_text),
            _ => None,
        }
    }
}
