//! Command-line interface for the quote search client.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use quoteseek::client::QuoteClient;
use quoteseek::config::{self, Settings};
use quoteseek::export;
use quoteseek::models::Quote;
use quoteseek::services::{SearchEvent, SearchOutcome, SearchService};
use quoteseek::session::SearchSession;

#[derive(Parser)]
#[command(name = "qseek", about = "Conference talk quote search client", version)]
struct Cli {
    /// Backend endpoint URL (overrides configuration).
    #[arg(long, global = true, env = "QUOTESEEK_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a question and print matching quotes.
    Ask {
        /// The question to search for.
        question: String,
        /// Show every returned quote instead of the first five.
        #[arg(long)]
        all: bool,
        /// Also write the shown quotes to an HTML file.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Ask a question and write every returned quote to an HTML file.
    Export {
        /// The question to search for.
        question: String,
        /// Output path (defaults to the configured export directory).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings().await;
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = endpoint.trim_end_matches('/').to_string();
    }

    match cli.command {
        Command::Ask {
            question,
            all,
            export,
        } => ask(&settings, &question, all, export).await,
        Command::Export { question, output } => {
            let path = output.unwrap_or_else(|| settings.export_path());
            run_export(&settings, &question, path).await
        }
    }
}

fn build_service(settings: &Settings) -> SearchService {
    let client = QuoteClient::new(&settings.endpoint, settings.timeout());
    let client = match settings.search_index.as_deref() {
        Some(index) => client.with_search_index(index),
        None => client,
    };
    SearchService::new(client, settings.poll_config())
}

/// Run one query with a spinner tied to the search lifecycle events.
async fn run_search(
    service: &SearchService,
    session: &mut SearchSession,
    question: &str,
) -> anyhow::Result<SearchOutcome> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").expect("spinner template"));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = service
        .search(session, question, |event| match event {
            SearchEvent::Started => spinner.set_message("Searching..."),
            SearchEvent::Queued { job_id } => {
                spinner.set_message(format!("Waiting for job {job_id}..."))
            }
            SearchEvent::Finished => spinner.finish_and_clear(),
        })
        .await;

    Ok(outcome?)
}

async fn ask(
    settings: &Settings,
    question: &str,
    all: bool,
    export_to: Option<PathBuf>,
) -> anyhow::Result<()> {
    let service = build_service(settings);
    let mut session = SearchSession::new();
    let outcome = run_search(&service, &mut session, question).await?;

    if session.is_empty() {
        println!("No matching quotes found.");
        return Ok(());
    }

    if all {
        session.show_all();
    }

    println!("{}\n", style(format!("{} quotes found", outcome.total)).bold());
    for quote in session.visible_quotes() {
        print_quote(quote);
    }

    if session.has_more() {
        let hidden = session.len() - session.visible_quotes().len();
        println!(
            "{}",
            style(format!("... {hidden} more (re-run with --all to see every quote)")).dim()
        );
    }

    if let Some(path) = export_to {
        let path = export::write_document(session.visible_quotes(), &path)
            .context("failed to write export document")?;
        println!("Saved {}", path.display());
    }

    Ok(())
}

async fn run_export(settings: &Settings, question: &str, path: PathBuf) -> anyhow::Result<()> {
    let service = build_service(settings);
    let mut session = SearchSession::new();
    let outcome = run_search(&service, &mut session, question).await?;

    if session.is_empty() {
        println!("No matching quotes found; nothing exported.");
        return Ok(());
    }

    session.show_all();
    let path = export::write_document(session.all_quotes(), &path)
        .context("failed to write export document")?;
    println!("Saved {} quotes to {}", outcome.total, path.display());

    Ok(())
}

fn print_quote(quote: &Quote) {
    println!("{}", style(&quote.speaker).bold());
    if !quote.role.is_empty() {
        println!("{}", style(&quote.role).dim());
    }

    let mut context = Vec::new();
    if !quote.title.is_empty() {
        context.push(quote.title.clone());
    }
    if let Some(session) = quote.session_label() {
        context.push(session);
    }
    if !context.is_empty() {
        println!("{}", style(context.join(", ")).dim());
    }

    println!("\n{}\n", quote.paragraph_text);
    if !quote.paragraph_deep_link.is_empty() {
        println!("  Read in context: {}", quote.paragraph_deep_link);
    }
    if let Some(link) = quote.timed_youtube_link() {
        println!("  Watch: {link} ({})", quote.start_label());
    }
    println!();
}
