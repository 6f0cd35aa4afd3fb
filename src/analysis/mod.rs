mod error;
mod llm_client;
mod pipeline;
mod prompt;
mod response;

pub use error::AnalysisError;
pub use llm_client::{
    GeminiLLMClient, LLMClient, MockLLMClient, DEFAULT_LLM_ENDPOINT, DEFAULT_LLM_MODEL,
};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use prompt::{PromptBuilder, PromptTemplate, DEFAULT_INSTRUCTION};
pub use response::{extract_json, AnalysisRequest};
