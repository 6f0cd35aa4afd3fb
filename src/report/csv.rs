use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::domain::ResultTable;

pub const DEFAULT_EXPORT_FILENAME: &str = "gene_analysis_gemini_validated.csv";

pub struct CsvExporter;

impl CsvExporter {
    pub fn render(table: &ResultTable) -> String {
        let columns = table.columns();
        let mut out = String::new();

        let header: Vec<String> = columns.iter().map(|name| escape_field(name)).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for row in table.rows() {
            let cells: Vec<String> = columns
                .iter()
                .map(|column| escape_field(&cell_text(row.fields().get(column))))
                .collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    pub fn write_to_path(path: impl AsRef<Path>, table: &ResultTable) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("impossible de créer le dossier {:?}", parent))?;
        }
        fs::write(path, Self::render(table))
            .with_context(|| format!("impossible d'écrire l'export CSV dans {:?}", path))?;
        Ok(())
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
