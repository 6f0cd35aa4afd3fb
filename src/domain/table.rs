use serde::Serialize;
use std::collections::HashSet;

use super::record::ValidatedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    LlmUnresolved,
    RegistryError,
    Normal,
}

impl StatusCategory {
    pub fn of(status: &str) -> Self {
        if status.contains("Skipped (LLM Not Found)") {
            StatusCategory::LlmUnresolved
        } else if status.contains("API Error")
            || status.contains("Processing Error")
            || status.contains("Gene Not Found in NCBI")
        {
            StatusCategory::RegistryError
        } else {
            StatusCategory::Normal
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ValidatedRecord>,
}

impl ResultTable {
    pub fn new(rows: Vec<ValidatedRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ValidatedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // Union of row keys, ordered by first appearance while scanning rows
    // in table order.
    pub fn columns(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut columns = Vec::new();
        for row in &self.rows {
            for key in row.fields().keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }
}
