use serde::{Deserialize, Serialize};

use crate::domain::GeneQuery;

pub const DEFAULT_INSTRUCTION: &str = "\
For the provided genes, supply the following structured information:
1. Gene Symbol
2. Full Gene Name
3. Main Molecular Function (max 30 words)
4. Primary Associated Human Disease";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
}

impl PromptTemplate {
    pub fn default() -> Self {
        let system = concat!(
            "You are an expert bioinformatics assistant. Your mission is to analyze a list ",
            "of gene symbols and respond to the user's request.\n",
            "**Your output MUST be EXCLUSIVELY a JSON object**, which can be parsed directly.\n",
            "The JSON must contain an array called 'data'. Each object in the 'data' array ",
            "must represent a gene and the requested information.\n",
            "Do not include descriptive text, Markdown, or explanations outside the JSON block.\n",
            "If a gene is not found, its object in the array must indicate the status 'Not Found'.",
        )
        .to_string();

        Self { system }
    }
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl PromptBuilder {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn build(&self, genes: &GeneQuery, instruction: &str) -> (String, String) {
        let system = self.template.system.clone();
        let user = format!(
            "**Gene List to Analyze:** {}\n\n**Detailed User Instruction:** {}\n\nGenerate the output as JSON, adhering to system requirements.",
            genes.joined(),
            instruction.trim()
        );
        (system, user)
    }
}
