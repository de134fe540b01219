//! Command-line front end for doc-chat.
//!
//! Loads one document, then answers questions about it from the terminal.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use console::style;
use doc_chat::{
    export, providers::GeminiClient, AskOutcome, ContextQueryClient, DocChatConfig, DocumentPayload,
    ExportFormat, FileParser, Session,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CHAT_HELP: &str = "Type a question, or :history, :export <pdf|docx|csv|xlsx> [PATH], :quit";

/// Ask questions about a PDF, CSV, DOCX or XLSX document.
#[derive(Parser, Debug)]
#[command(name = "docchat", version, about, arg_required_else_help = true)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the text extracted from a document
    Extract {
        file: PathBuf,
        /// Print the text before lowercasing
        #[arg(long)]
        raw: bool,
    },
    /// Ask a single question about a document
    Ask { file: PathBuf, question: String },
    /// Interactive question/answer loop over a document
    Chat { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_chat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = DocChatConfig::load(cli.config.as_deref())?.apply_env();
    let parser = FileParser::new(&config.extraction);
    let credential = cli
        .api_key
        .clone()
        .or_else(|| config.llm.api_key.clone())
        .unwrap_or_default();

    match cli.command {
        Command::Extract { file, raw } => {
            let payload = read_payload(&file)?;
            let extracted = parser.extract(payload)?;
            if raw {
                println!("{}", extracted.text);
            } else {
                println!("{}", doc_chat::ingestion::normalize(&extracted.text));
            }
            eprintln!(
                "{} {} ({}, {} chars)",
                style("✓").green(),
                file.display(),
                extracted.format,
                extracted.text.chars().count()
            );
        }
        Command::Ask { file, question } => {
            let client = query_client(&config)?;
            let mut session = load_session(&parser, &file)?;
            let outcome = session.ask(&question, &client, &credential).await?;
            print_outcome(&outcome);
        }
        Command::Chat { file } => {
            let client = query_client(&config)?;
            let session = load_session(&parser, &file)?;
            chat(session, &client, &credential).await?;
        }
    }

    Ok(())
}

fn query_client(config: &DocChatConfig) -> Result<ContextQueryClient> {
    let provider = GeminiClient::new(&config.llm)?;
    Ok(ContextQueryClient::new(Arc::new(provider)))
}

fn read_payload(file: &Path) -> Result<DocumentPayload> {
    let data = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    Ok(DocumentPayload::from_file(name, data)?)
}

fn load_session(parser: &FileParser, file: &Path) -> Result<Session> {
    let mut session = Session::new();
    let summary = session.load_document(parser, read_payload(file)?)?;
    eprintln!(
        "{} Loaded {} ({}, {} chars of context)",
        style("✓").green(),
        file.display(),
        summary.format,
        summary.context_chars
    );
    Ok(session)
}

fn print_outcome(outcome: &AskOutcome) {
    match outcome {
        AskOutcome::Answered(entry) => {
            println!("{} {}", style("Chatbot:").bold(), entry.answer());
        }
        guarded => {
            if let Some(guidance) = guarded.guidance() {
                println!("{}", style(guidance).yellow());
            }
        }
    }
}

async fn chat(mut session: Session, client: &ContextQueryClient, credential: &str) -> Result<()> {
    eprintln!("{}", style(CHAT_HELP).dim());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", style("You:").bold().red());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [] => continue,
            [":quit"] | [":q"] => break,
            [":history"] => print!("{}", session.transcript().to_markdown()),
            [":export", format, rest @ ..] if rest.len() <= 1 => {
                match export_to_file(&session, format, rest.first().copied()) {
                    Ok(path) => println!("{} Saved {}", style("✓").green(), path.display()),
                    Err(e) => println!("{} {}", style("✗").red(), e),
                }
            }
            [command, ..] if command.starts_with(':') => {
                println!("{}", style(CHAT_HELP).dim());
            }
            _ => match session.ask(line, client, credential).await {
                Ok(outcome) => print_outcome(&outcome),
                Err(e) => println!("{} {}", style("✗").red(), e),
            },
        }
    }

    Ok(())
}

fn export_to_file(session: &Session, format: &str, path: Option<&str>) -> Result<PathBuf> {
    let format: ExportFormat = format.parse()?;
    let artifact = export(format, session.transcript())?;
    let path = path.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(artifact.file_name()));
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
