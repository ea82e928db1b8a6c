use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use drona_chroma::ChromaStore;
use drona_core::{Answer, VectorStore};
use drona_gemini::GeminiClient;
use drona_rag::{IngestionPipeline, QueryPipeline};

#[derive(Parser)]
#[command(name = "drona")]
#[command(about = "Retrieval-augmented alumni assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a single question against the alumni corpus
    Ask {
        question: String,
        /// Override the default number of retrieved passages
        #[arg(short = 'n', long)]
        n_results: Option<usize>,
    },
    /// Interactive question loop
    Chat,
    /// Ingest a PDF source into the vector collection
    Ingest {
        /// HTTP(S) URL of the PDF source
        url: Option<String>,
        /// Local PDF file instead of a URL
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
        /// Drop and recreate the collection before ingesting
        #[arg(long)]
        replace: bool,
    },
    /// Print the corpus size
    Count,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Provider handles are constructed once here and shared by reference.
    let gemini = Arc::new(GeminiClient::from_env()?);
    let mut store = ChromaStore::from_env()?;
    store.connect().await?;

    if let Command::Ingest { replace: true, .. } = &cli.command {
        println!("{} Replacing collection...", "♻️".yellow());
        store.replace_collection().await?;
    }
    let store = Arc::new(store);

    match cli.command {
        Command::Ask {
            question,
            n_results,
        } => {
            let mut pipeline = QueryPipeline::new(store, gemini.clone(), gemini);
            if let Some(n) = n_results {
                pipeline = pipeline.with_default_k(n);
            }
            print_answer(&pipeline.answer(&question).await?);
        }
        Command::Chat => {
            let pipeline = QueryPipeline::new(store, gemini.clone(), gemini);
            run_chat_loop(&pipeline).await?;
        }
        Command::Ingest { url, file, .. } => {
            let pipeline = IngestionPipeline::new(store, gemini)?;
            let report = match (url, file) {
                (Some(url), None) => pipeline.ingest_url(&url).await?,
                (None, Some(path)) => {
                    let bytes = tokio::fs::read(&path).await?;
                    pipeline.ingest_bytes(&bytes).await?
                }
                _ => anyhow::bail!("provide a source url or --file <path>"),
            };
            println!(
                "{} Added {} chunks to the collection",
                "✅".green(),
                report.chunks_added
            );
        }
        Command::Count => {
            let total = store.count().await?;
            println!("There are {} alumni in the database.", total);
        }
    }

    Ok(())
}

async fn run_chat_loop(
    pipeline: &QueryPipeline<ChromaStore, GeminiClient, GeminiClient>,
) -> Result<()> {
    println!(
        "{}",
        "Hi, I'm Drona AI — your Alumni Roadmap Assistant!".cyan().bold()
    );
    println!("Type 'exit' to quit.\n");

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            println!("{}", "👋 Goodbye!".green());
            break;
        }

        match pipeline.answer(input).await {
            Ok(answer) => print_answer(&answer),
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    Ok(())
}

fn print_answer(answer: &Answer) {
    println!("\n{} {}\n", "Bot:".cyan().bold(), answer.text);

    if !answer.grounding_chunks.is_empty() {
        let sources: Vec<&str> = answer
            .grounding_chunks
            .iter()
            .map(|c| c.source_locator.as_str())
            .collect();
        println!("{} {}", "Sources:".dimmed(), sources.join(", "));
    }
}
