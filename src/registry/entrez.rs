use anyhow::{Context, Result};
use parking_lot::Mutex;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_CONTACT: &str = "gene.analyzer.tool@google.com";

const TOOL_NAME: &str = "GeneAnalyzer";
const ORGANISM_FILTER: &str = "human";
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct EntrezConfig {
    pub base_url: String,
    pub contact: String,
}

impl EntrezConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            contact: DEFAULT_CONTACT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }
}

impl Default for EntrezConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub trait EntrezClient: Send + Sync {
    fn search_gene(&self, symbol: &str) -> Result<Vec<String>>;
    fn fetch_summary(&self, gene_id: &str) -> Result<String>;
}

pub struct HttpEntrezClient {
    http: HttpClient,
    config: EntrezConfig,
}

impl HttpEntrezClient {
    pub fn new(config: EntrezConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(CALL_TIMEOUT)
            .build()
            .context("impossible de créer le client HTTP pour NCBI Entrez")?;

        Ok(Self { http, config })
    }

    fn esearch_url(&self, symbol: &str) -> String {
        format!(
            "{}/esearch.fcgi?db=gene&term={}%5Bgene%5D+AND+{}%5Borganism%5D&retmode=json&tool={}&email={}",
            self.config.base_url,
            urlencoding::encode(symbol),
            ORGANISM_FILTER,
            TOOL_NAME,
            self.config.contact
        )
    }

    fn esummary_url(&self, gene_id: &str) -> String {
        format!(
            "{}/esummary.fcgi?db=gene&id={}&retmode=xml&tool={}&email={}",
            self.config.base_url,
            urlencoding::encode(gene_id),
            TOOL_NAME,
            self.config.contact
        )
    }
}

impl EntrezClient for HttpEntrezClient {
    fn search_gene(&self, symbol: &str) -> Result<Vec<String>> {
        let url = self.esearch_url(symbol);
        debug!("url" = %url, "message" = "appel ESearch");
        let response = self
            .http
            .get(&url)
            .send()
            .context("appel HTTP ESearch impossible")?
            .error_for_status()
            .context("le serveur Entrez a renvoyé un statut d'erreur (ESearch)")?;
        let parsed: ESearchResponse = response.json().context("réponse ESearch illisible")?;
        Ok(parsed.esearch_result.id_list)
    }

    fn fetch_summary(&self, gene_id: &str) -> Result<String> {
        let url = self.esummary_url(gene_id);
        debug!("url" = %url, "message" = "appel ESummary");
        self.http
            .get(&url)
            .send()
            .context("appel HTTP ESummary impossible")?
            .error_for_status()
            .context("le serveur Entrez a renvoyé un statut d'erreur (ESummary)")?
            .text()
            .context("réponse ESummary illisible")
    }
}

#[derive(Debug, Deserialize, Default)]
struct ESearchResponse {
    #[serde(rename = "esearchresult", default)]
    esearch_result: ESearchResult,
}

#[derive(Debug, Deserialize, Default)]
struct ESearchResult {
    #[serde(rename = "idlist", default)]
    id_list: Vec<String>,
}

// First non-empty Description text under DocumentSummarySet/DocumentSummary.
pub fn summary_description(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_summary = false;
    let mut in_description = false;
    loop {
        match reader
            .read_event()
            .context("document ESummary mal formé")?
        {
            Event::Start(start) => match start.name().as_ref() {
                b"DocumentSummary" => in_summary = true,
                b"Description" if in_summary => in_description = true,
                _ => {}
            },
            Event::End(end) => match end.name().as_ref() {
                b"DocumentSummary" => in_summary = false,
                b"Description" => in_description = false,
                _ => {}
            },
            Event::Text(text) if in_description => {
                let value = text.unescape().context("texte ESummary indécodable")?;
                let value = value.trim();
                if !value.is_empty() {
                    return Ok(Some(value.to_string()));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[derive(Clone, Default)]
pub struct MockEntrezClient {
    state: Arc<Mutex<MockEntrezState>>,
}

#[derive(Default)]
struct MockEntrezState {
    id_lists: HashMap<String, Vec<String>>,
    summaries: HashMap<String, String>,
    search_failures: HashSet<String>,
    summary_failures: HashSet<String>,
    search_log: Vec<String>,
    summary_log: Vec<String>,
}

impl MockEntrezClient {
    pub fn stub_search(&self, symbol: impl Into<String>, ids: Vec<String>) {
        self.state.lock().id_lists.insert(symbol.into(), ids);
    }

    pub fn stub_summary(&self, gene_id: impl Into<String>, xml: impl Into<String>) {
        self.state.lock().summaries.insert(gene_id.into(), xml.into());
    }

    pub fn fail_search(&self, symbol: impl Into<String>) {
        self.state.lock().search_failures.insert(symbol.into());
    }

    pub fn fail_summary(&self, gene_id: impl Into<String>) {
        self.state.lock().summary_failures.insert(gene_id.into());
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.state.lock().search_log.clone()
    }

    pub fn summary_calls(&self) -> Vec<String> {
        self.state.lock().summary_log.clone()
    }
}

impl EntrezClient for MockEntrezClient {
    fn search_gene(&self, symbol: &str) -> Result<Vec<String>> {
        let mut state = self.state.lock();
        state.search_log.push(symbol.to_string());
        if state.search_failures.contains(symbol) {
            anyhow::bail!("panne simulée ESearch pour {}", symbol);
        }
        state
            .id_lists
            .get(symbol)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("aucune recherche mock pour {}", symbol))
    }

    fn fetch_summary(&self, gene_id: &str) -> Result<String> {
        let mut state = self.state.lock();
        state.summary_log.push(gene_id.to_string());
        if state.summary_failures.contains(gene_id) {
            anyhow::bail!("panne simulée ESummary pour {}", gene_id);
        }
        state
            .summaries
            .get(gene_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("aucun résumé mock pour {}", gene_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn esearch_response_reads_id_list() {
        let json = r#"{
            "header": {"type": "esearch", "version": "0.3"},
            "esearchresult": {"count": "1", "retmax": "1", "idlist": ["7157"]}
        }"#;
        let parsed: ESearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.esearch_result.id_list, ["7157"]);
    }

    #[test]
    fn esearch_response_tolerates_missing_id_list() {
        let parsed: ESearchResponse = serde_json::from_str(r#"{"esearchresult": {}}"#).unwrap();
        assert!(parsed.esearch_result.id_list.is_empty());
        let parsed: ESearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.esearch_result.id_list.is_empty());
    }

    #[test]
    fn description_is_taken_from_first_document_summary() {
        let xml = r#"<?xml version="1.0"?>
            <eSummaryResult>
              <DocumentSummarySet status="OK">
                <DocumentSummary uid="7157">
                  <Name>TP53</Name>
                  <Description>tumor protein p53</Description>
                </DocumentSummary>
                <DocumentSummary uid="99">
                  <Description>should not be read</Description>
                </DocumentSummary>
              </DocumentSummarySet>
            </eSummaryResult>"#;
        assert_eq!(
            summary_description(xml).unwrap().as_deref(),
            Some("tumor protein p53")
        );
    }

    #[test]
    fn missing_description_yields_none() {
        let xml = r#"<eSummaryResult>
              <DocumentSummarySet status="OK">
                <DocumentSummary uid="7157"><Name>TP53</Name></DocumentSummary>
              </DocumentSummarySet>
            </eSummaryResult>"#;
        assert_eq!(summary_description(xml).unwrap(), None);
    }

    #[test]
    fn description_outside_summary_is_ignored() {
        let xml = r#"<eSummaryResult>
              <Description>stray</Description>
              <DocumentSummarySet status="OK">
                <DocumentSummary uid="1"><Description>real</Description></DocumentSummary>
              </DocumentSummarySet>
            </eSummaryResult>"#;
        assert_eq!(summary_description(xml).unwrap().as_deref(), Some("real"));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(summary_description("<eSummaryResult><oops").is_err());
    }

    #[test]
    fn urls_embed_tool_and_contact() {
        let client = HttpEntrezClient::new(
            EntrezConfig::new().with_base_url("https://example.org/eutils/"),
        )
        .unwrap();
        let url = client.esearch_url("TP53");
        assert_eq!(
            url,
            "https://example.org/eutils/esearch.fcgi?db=gene&term=TP53%5Bgene%5D+AND+human%5Borganism%5D&retmode=json&tool=GeneAnalyzer&email=gene.analyzer.tool@google.com"
        );
        let url = client.esummary_url("7157");
        assert_eq!(
            url,
            "https://example.org/eutils/esummary.fcgi?db=gene&id=7157&retmode=xml&tool=GeneAnalyzer&email=gene.analyzer.tool@google.com"
        );
    }
}
