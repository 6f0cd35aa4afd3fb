mod cache;
mod entrez;
mod validator;

pub use cache::ValidationCache;
pub use entrez::{
    summary_description, EntrezClient, EntrezConfig, HttpEntrezClient, MockEntrezClient,
    DEFAULT_BASE_URL, DEFAULT_CONTACT,
};
pub use validator::{
    GeneValidator, NAME_NOT_APPLICABLE, NAME_NOT_AVAILABLE, STATUS_GENE_NOT_FOUND,
    STATUS_SKIPPED_LLM_NOT_FOUND, STATUS_SKIPPED_SYMBOL_MISSING,
};
