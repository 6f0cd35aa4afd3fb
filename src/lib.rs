pub mod analysis;
pub mod domain;
pub mod registry;
pub mod report;
pub mod utils;

pub use analysis::{AnalysisError, AnalysisPipeline, AnalysisReport, LLMClient};
pub use domain::{GeneQuery, GeneRecord, ResultTable, StatusCategory, ValidatedRecord};
pub use registry::{EntrezClient, EntrezConfig, GeneValidator};
