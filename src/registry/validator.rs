use std::sync::Arc;

use tracing::info;

use super::cache::ValidationCache;
use super::entrez::{summary_description, EntrezClient};
use crate::domain::{GeneRecord, ValidatedRecord};

pub const STATUS_SKIPPED_SYMBOL_MISSING: &str = "Skipped (Symbol Missing)";
pub const STATUS_SKIPPED_LLM_NOT_FOUND: &str = "Skipped (LLM Not Found)";
pub const STATUS_GENE_NOT_FOUND: &str = "Gene Not Found in NCBI";
pub const NAME_NOT_APPLICABLE: &str = "N/A";
pub const NAME_NOT_AVAILABLE: &str = "Not Available";

// Per-record lookup state; every transition that touches the network
// goes through the EntrezClient seam.
enum LookupState {
    Search { symbol: String },
    Summarize { gene_id: String },
    Done(Verdict),
}

#[derive(Debug, Clone)]
struct Verdict {
    status: String,
    full_name: String,
}

impl Verdict {
    fn skipped(status: &str) -> Self {
        Self {
            status: status.to_string(),
            full_name: NAME_NOT_APPLICABLE.to_string(),
        }
    }

    fn api_error(err: &anyhow::Error) -> Self {
        Self {
            status: format!("API Error: {err:#}"),
            full_name: NAME_NOT_APPLICABLE.to_string(),
        }
    }

    fn processing_error(err: &anyhow::Error) -> Self {
        Self {
            status: format!("Processing Error: {err:#}"),
            full_name: NAME_NOT_APPLICABLE.to_string(),
        }
    }

    fn found(gene_id: &str, full_name: String) -> Self {
        Self {
            status: format!("Found (ID: {gene_id})"),
            full_name,
        }
    }
}

pub struct GeneValidator<R: EntrezClient> {
    registry: Arc<R>,
    cache: ValidationCache,
}

impl<R: EntrezClient> GeneValidator<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self {
            registry,
            cache: ValidationCache::new(),
        }
    }

    // Order-preserving, one output row per input record. A registry
    // failure stays confined to its own record's status field.
    pub fn validate_records(&self, records: Vec<GeneRecord>) -> Vec<ValidatedRecord> {
        if let Some(cached) = self.cache.get(&records) {
            info!(rows = cached.len(), "message" = "validation servie depuis le cache");
            return cached;
        }

        let validated: Vec<ValidatedRecord> = records
            .iter()
            .cloned()
            .map(|record| self.validate(record))
            .collect();
        self.cache.store(&records, &validated);
        validated
    }

    pub fn validate(&self, record: GeneRecord) -> ValidatedRecord {
        let symbol = record.symbol().map(str::to_string);
        let mut state = initial_state(&record);
        let verdict = loop {
            state = match state {
                LookupState::Done(verdict) => break verdict,
                LookupState::Search { symbol } => self.step_search(&symbol),
                LookupState::Summarize { gene_id } => self.step_summarize(&gene_id),
            };
        };
        info!(
            "gene" = symbol.as_deref().unwrap_or("?"),
            "statut" = %verdict.status,
            "message" = "validation NCBI terminée"
        );
        record.into_validated(verdict.status, verdict.full_name)
    }

    fn step_search(&self, symbol: &str) -> LookupState {
        match self.registry.search_gene(symbol) {
            Err(err) => LookupState::Done(Verdict::api_error(&err)),
            Ok(ids) => match ids.into_iter().next() {
                None => LookupState::Done(Verdict::skipped(STATUS_GENE_NOT_FOUND)),
                Some(gene_id) => LookupState::Summarize { gene_id },
            },
        }
    }

    fn step_summarize(&self, gene_id: &str) -> LookupState {
        let xml = match self.registry.fetch_summary(gene_id) {
            Err(err) => return LookupState::Done(Verdict::api_error(&err)),
            Ok(xml) => xml,
        };
        match summary_description(&xml) {
            Err(err) => LookupState::Done(Verdict::processing_error(&err)),
            Ok(description) => LookupState::Done(Verdict::found(
                gene_id,
                description.unwrap_or_else(|| NAME_NOT_AVAILABLE.to_string()),
            )),
        }
    }
}

// The symbol check comes before the LLM status check: a record with
// neither is reported as symbol-missing.
fn initial_state(record: &GeneRecord) -> LookupState {
    match record.symbol() {
        None => LookupState::Done(Verdict::skipped(STATUS_SKIPPED_SYMBOL_MISSING)),
        Some(_) if record.is_llm_unresolved() => {
            LookupState::Done(Verdict::skipped(STATUS_SKIPPED_LLM_NOT_FOUND))
        }
        Some(symbol) => LookupState::Search {
            symbol: symbol.to_string(),
        },
    }
}
