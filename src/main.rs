use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use genelens::analysis::{
    AnalysisError, AnalysisPipeline, GeminiLLMClient, PromptBuilder, PromptTemplate,
    DEFAULT_INSTRUCTION, DEFAULT_LLM_ENDPOINT, DEFAULT_LLM_MODEL,
};
use genelens::domain::{GeneQuery, StatusCategory};
use genelens::registry::{
    EntrezConfig, GeneValidator, HttpEntrezClient, DEFAULT_BASE_URL, DEFAULT_CONTACT,
};
use genelens::report::{CsvExporter, DEFAULT_EXPORT_FILENAME};

#[derive(Parser)]
#[command(name = "genelens", version, about = "Gene List Analyzer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    Analyze {
        #[arg(long)]
        genes: String,
        #[arg(long, default_value = DEFAULT_INSTRUCTION)]
        instruction: String,
        #[arg(long, default_value = DEFAULT_EXPORT_FILENAME)]
        csv: PathBuf,
        #[arg(long, default_value = DEFAULT_LLM_ENDPOINT)]
        llm_endpoint: String,
        #[arg(long, default_value = DEFAULT_LLM_MODEL)]
        llm_model: String,
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        registry_endpoint: String,
        #[arg(long, default_value = DEFAULT_CONTACT)]
        registry_contact: String,
    },
    ShowPrompt {
        #[arg(long)]
        genes: String,
        #[arg(long, default_value = DEFAULT_INSTRUCTION)]
        instruction: String,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_genes(input: &str) -> anyhow::Result<GeneQuery> {
    let genes = GeneQuery::parse(input);
    if genes.is_empty() {
        anyhow::bail!("aucun symbole de gène exploitable dans l'entrée");
    }
    Ok(genes)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Analyze {
            genes,
            instruction,
            csv,
            llm_endpoint,
            llm_model,
            registry_endpoint,
            registry_contact,
        } => {
            let genes = parse_genes(&genes)?;
            let api_key = std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty())
                .ok_or(AnalysisError::MissingApiKey)?;

            let llm = GeminiLLMClient::new(llm_endpoint, llm_model, api_key)?;
            let registry = HttpEntrezClient::new(
                EntrezConfig::new()
                    .with_base_url(registry_endpoint)
                    .with_contact(registry_contact),
            )?;
            let pipeline = AnalysisPipeline::new(
                Arc::new(llm),
                PromptTemplate::default(),
                GeneValidator::new(Arc::new(registry)),
            );

            info!(genes = genes.len(), "message" = "analyse démarrée");
            match pipeline.run(&genes, &instruction) {
                Ok(report) => {
                    if report.table.is_empty() {
                        warn!("message" = "tableau 'data' vide, prompt affiché pour inspection");
                        println!("{}", report.user_prompt);
                        return Ok(());
                    }

                    for row in report.table.rows() {
                        let category = StatusCategory::of(row.status());
                        if category != StatusCategory::Normal {
                            warn!(
                                "statut" = row.status(),
                                "category" = ?category,
                                "message" = "ligne à vérifier"
                            );
                        }
                    }
                    println!("{}", serde_json::to_string_pretty(&report.table)?);

                    CsvExporter::write_to_path(&csv, &report.table)?;
                    info!(rows = report.table.len(), "export" = %csv.display());
                }
                Err(err) => {
                    if let Some(raw_text) = err.raw_text() {
                        eprintln!("Réponse brute reçue:\n{}", raw_text);
                    }
                    return Err(err.into());
                }
            }
        }
        Commands::ShowPrompt { genes, instruction } => {
            let genes = parse_genes(&genes)?;
            let builder = PromptBuilder::new(PromptTemplate::default());
            let (system, user) = builder.build(&genes, &instruction);
            println!("{}\n\n{}", system, user);
        }
    }

    Ok(())
}
