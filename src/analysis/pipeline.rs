use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::error::AnalysisError;
use super::llm_client::LLMClient;
use super::prompt::{PromptBuilder, PromptTemplate};
use super::response::{extract_json, AnalysisRequest};
use crate::domain::{GeneQuery, GeneRecord, ResultTable};
use crate::registry::{EntrezClient, GeneValidator};

pub struct AnalysisPipeline<C: LLMClient, R: EntrezClient> {
    llm: Arc<C>,
    prompt_builder: PromptBuilder,
    validator: GeneValidator<R>,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub table: ResultTable,
    pub user_prompt: String,
    pub raw_text: String,
}

impl<C: LLMClient, R: EntrezClient> AnalysisPipeline<C, R> {
    pub fn new(llm: Arc<C>, template: PromptTemplate, validator: GeneValidator<R>) -> Self {
        Self {
            llm,
            prompt_builder: PromptBuilder::new(template),
            validator,
        }
    }

    pub fn run(
        &self,
        genes: &GeneQuery,
        instruction: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        let (system_prompt, user_prompt) = self.prompt_builder.build(genes, instruction);
        debug!("system" = %system_prompt, "message" = "instruction système envoyée au LLM");
        debug!("user" = %user_prompt, "message" = "requête utilisateur envoyée au LLM");

        let request = AnalysisRequest {
            system_prompt,
            user_prompt: user_prompt.clone(),
        };
        let raw_text = self
            .llm
            .generate(&request)
            .map_err(|source| AnalysisError::LlmCall { source })?;
        debug!("raw" = %raw_text, "message" = "réponse brute du LLM reçue");

        let candidate = extract_json(&raw_text);
        let document: Value =
            serde_json::from_str(candidate).map_err(|source| AnalysisError::ResponseParse {
                source,
                raw_text: raw_text.clone(),
            })?;

        let data = document
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| AnalysisError::MissingData {
                raw_text: raw_text.clone(),
            })?;

        let records: Vec<GeneRecord> = serde_json::from_value(Value::Array(data.clone()))
            .map_err(|source| AnalysisError::ResponseParse {
                source,
                raw_text: raw_text.clone(),
            })?;

        if records.is_empty() {
            warn!("message" = "le LLM a répondu mais le tableau 'data' est vide");
            return Ok(AnalysisReport {
                table: ResultTable::default(),
                user_prompt,
                raw_text,
            });
        }

        let rows = self.validator.validate_records(records);
        Ok(AnalysisReport {
            table: ResultTable::new(rows),
            user_prompt,
            raw_text,
        })
    }
}
