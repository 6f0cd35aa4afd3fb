use std::sync::Arc;

use genelens::analysis::{
    AnalysisPipeline, MockLLMClient, PromptTemplate, DEFAULT_INSTRUCTION,
};
use genelens::domain::{GeneQuery, StatusCategory};
use genelens::registry::{GeneValidator, MockEntrezClient};
use genelens::report::CsvExporter;

const TP53_SUMMARY: &str = r#"<eSummaryResult>
    <DocumentSummarySet status="OK">
      <DocumentSummary uid="7157">
        <Name>TP53</Name>
        <Description>tumor protein p53</Description>
      </DocumentSummary>
    </DocumentSummarySet>
  </eSummaryResult>"#;

fn pipeline(
    llm: &MockLLMClient,
    registry: &MockEntrezClient,
) -> AnalysisPipeline<MockLLMClient, MockEntrezClient> {
    AnalysisPipeline::new(
        Arc::new(llm.clone()),
        PromptTemplate::default(),
        GeneValidator::new(Arc::new(registry.clone())),
    )
}

#[test]
fn analysis_merges_llm_rows_with_registry_verdicts() {
    let llm = MockLLMClient::default();
    llm.push_response(
        r#"```json
{"data": [
  {"Gene Symbol": "TP53", "Function": "tumor suppressor", "status": "Found"},
  {"geneSymbol": "FAKEGENE9", "status": "Not Found"},
  {"Gene Symbol": "ZZZ999"}
]}
```"#,
    );
    let registry = MockEntrezClient::default();
    registry.stub_search("TP53", vec!["7157".to_string()]);
    registry.stub_summary("7157", TP53_SUMMARY);
    registry.stub_search("ZZZ999", vec![]);

    let genes = GeneQuery::parse("TP53, fakegene9\nZZZ999");
    assert_eq!(genes.symbols(), ["TP53", "FAKEGENE9", "ZZZ999"]);

    let report = pipeline(&llm, &registry)
        .run(&genes, DEFAULT_INSTRUCTION)
        .expect("analysis should succeed");

    let rows = report.table.rows();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].status(), "Found (ID: 7157)");
    assert_eq!(rows[0].full_name(), "tumor protein p53");
    assert_eq!(
        rows[0].fields().get("Function").and_then(|v| v.as_str()),
        Some("tumor suppressor")
    );
    assert_eq!(StatusCategory::of(rows[0].status()), StatusCategory::Normal);

    assert_eq!(rows[1].status(), "Skipped (LLM Not Found)");
    assert_eq!(rows[1].full_name(), "N/A");
    assert_eq!(
        StatusCategory::of(rows[1].status()),
        StatusCategory::LlmUnresolved
    );

    assert_eq!(rows[2].status(), "Gene Not Found in NCBI");
    assert_eq!(
        StatusCategory::of(rows[2].status()),
        StatusCategory::RegistryError
    );

    // FAKEGENE9 was marked unresolved by the LLM and must not reach the registry.
    assert_eq!(registry.search_calls(), ["TP53", "ZZZ999"]);
    assert_eq!(registry.summary_calls(), ["7157"]);

    let csv = CsvExporter::render(&report.table);
    let header = csv.lines().next().expect("csv has a header");
    assert!(header.starts_with("Gene Symbol,Function,status,NCBI Status,NCBI Full Name"));
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn rerunning_the_same_analysis_reuses_the_validation_cache() {
    let llm = MockLLMClient::default();
    let reply = r#"{"data": [{"Gene Symbol": "TP53"}]}"#;
    llm.push_response(reply);
    llm.push_response(reply);
    let registry = MockEntrezClient::default();
    registry.stub_search("TP53", vec!["7157".to_string()]);
    registry.stub_summary("7157", TP53_SUMMARY);

    let pipeline = pipeline(&llm, &registry);
    let genes = GeneQuery::parse("TP53");
    let first = pipeline.run(&genes, DEFAULT_INSTRUCTION).unwrap();
    let second = pipeline.run(&genes, DEFAULT_INSTRUCTION).unwrap();

    assert_eq!(first.table.rows(), second.table.rows());
    assert_eq!(registry.search_calls().len(), 1);
    assert_eq!(registry.summary_calls().len(), 1);
}
