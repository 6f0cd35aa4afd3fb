use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const KEY_STATUS: &str = "status";
pub const KEY_NCBI_STATUS: &str = "NCBI Status";
pub const KEY_NCBI_FULL_NAME: &str = "NCBI Full Name";
pub const LLM_NOT_FOUND: &str = "Not Found";

// Spellings under which the LLM is known to emit the gene symbol,
// checked in priority order.
const SYMBOL_KEYS: &[&str] = &["Gene Symbol", "geneSymbol"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneRecord {
    fields: Map<String, Value>,
}

impl GeneRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn symbol(&self) -> Option<&str> {
        SYMBOL_KEYS.iter().find_map(|key| {
            self.get_str(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
    }

    pub fn is_llm_unresolved(&self) -> bool {
        self.get_str(KEY_STATUS) == Some(LLM_NOT_FOUND)
    }

    pub fn into_validated(
        mut self,
        status: impl Into<String>,
        full_name: impl Into<String>,
    ) -> ValidatedRecord {
        self.fields
            .insert(KEY_NCBI_STATUS.to_string(), Value::String(status.into()));
        self.fields.insert(
            KEY_NCBI_FULL_NAME.to_string(),
            Value::String(full_name.into()),
        );
        ValidatedRecord { record: self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedRecord {
    record: GeneRecord,
}

impl ValidatedRecord {
    pub fn status(&self) -> &str {
        self.record.get_str(KEY_NCBI_STATUS).unwrap_or_default()
    }

    pub fn full_name(&self) -> &str {
        self.record.get_str(KEY_NCBI_FULL_NAME).unwrap_or_default()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        self.record.fields()
    }
}
