//! `playground`: terminal front end for the GraphRAG playground backend.
//!
//! Each subcommand corresponds to one route of the playground and drives the
//! matching page controller.

mod render;

use anyhow::{Context as _, Result, bail};
use api::{ApiClient, ClientConfig, EntityType, GraphRagMode, SearchType};
use clap::{Parser, Subcommand, ValueEnum};
use pages::{
    AdminPage, AgenticRagPage, AssumeYes, Confirm, ContractPage, Context, CypherPage,
    DocumentsPage, EntityPage, GraphRagPage, KnowledgeGraphPage, NavShell, PageState, RagPage,
    Route, Settle, StatisticsPage, StatsPoller,
};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "GraphRAG playground: query and administer the backend", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "PLAYGROUND_API_URL", default_value = "http://localhost:8000", global = true)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = api::config::DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// Bearer token sent with every request
    #[arg(long, env = "PLAYGROUND_API_TOKEN", hide_env_values = true, global = true)]
    api_token: Option<String>,

    /// JSON output and JSON log lines
    #[arg(long, global = true)]
    json: bool,

    /// Skip confirmation prompts for destructive actions
    #[arg(short, long, global = true)]
    yes: bool,

    /// Print request counters after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the navigation sidebar
    Routes {
        /// Current path to highlight
        #[arg(default_value = "/")]
        path: String,
    },

    /// PDF ingestion
    Documents {
        #[command(subcommand)]
        action: DocumentsCmd,
    },

    /// Ask a question with vector, keyword, hybrid or step-back retrieval
    Rag {
        question: String,

        #[arg(long, value_enum, default_value_t = SearchArg::Hybrid)]
        search_type: SearchArg,
    },

    /// Natural language to Cypher
    Cypher {
        #[command(subcommand)]
        action: CypherCmd,
    },

    /// Tool-using agent
    Agentic {
        #[command(subcommand)]
        action: AgenticCmd,
    },

    /// Entity and relationship extraction
    Entities {
        #[command(subcommand)]
        action: EntitiesCmd,
    },

    /// Contract field extraction
    Contracts {
        #[command(subcommand)]
        action: ContractsCmd,
    },

    /// Community-based global or local search
    GraphRag {
        #[command(subcommand)]
        action: GraphRagCmd,
    },

    /// Contract knowledge graph
    Kg {
        #[command(subcommand)]
        action: KgCmd,
    },

    /// Node and relationship counts
    Stats {
        /// Keep polling until interrupted
        #[arg(long)]
        watch: bool,

        /// Poll interval, clamped to 10..=30 seconds
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Bypass the results cache
        #[arg(long)]
        force: bool,
    },

    /// Backend liveness
    Health,

    /// Database administration
    Db {
        #[command(subcommand)]
        action: DbCmd,
    },
}

#[derive(Subcommand)]
enum DocumentsCmd {
    /// Upload a local PDF
    Upload { file: PathBuf },
    /// Have the backend download a PDF
    Download { url: String },
    /// Chunk and document counters
    Counts,
}

#[derive(Subcommand)]
enum CypherCmd {
    Ask {
        question: String,
        /// Domain terminology hint
        #[arg(long)]
        terminology: Option<String>,
        /// Few-shot question/Cypher examples
        #[arg(long)]
        examples: Option<String>,
    },
    /// Graph schema as seen by the generator
    Schema,
    /// Load the movies sample dataset
    LoadMovies,
}

#[derive(Subcommand)]
enum AgenticCmd {
    Ask { question: String },
    /// Tools available to the agent
    Tools,
}

#[derive(Subcommand)]
enum EntitiesCmd {
    Extract {
        /// Text to analyse; read from --file when omitted
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Comma-separated entity types
        #[arg(long, value_delimiter = ',', value_parser = parse_entity_type)]
        types: Vec<EntityType>,
    },
    /// Stored entity graph
    Graph,
}

#[derive(Subcommand)]
enum ContractsCmd {
    Extract {
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Previously extracted contracts
    List,
}

#[derive(Subcommand)]
enum GraphRagCmd {
    Ask {
        question: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Global)]
        mode: ModeArg,
    },
    /// Run community detection
    Communities,
}

#[derive(Subcommand)]
enum KgCmd {
    /// Print the sample contract
    Sample,
    /// Extract contract structure without importing
    Extract {
        #[arg(long)]
        file: Option<PathBuf>,
        /// Use the backend's sample contract
        #[arg(long)]
        sample: bool,
    },
    /// Extract and import into the graph
    Import {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        sample: bool,
    },
    Query { question: String },
    /// Create uniqueness constraints
    Constraints,
    Statistics,
    /// Raw graph data
    Data,
    /// Remove all contract data
    Clear,
}

#[derive(Subcommand)]
enum DbCmd {
    /// Delete every node and relationship
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchArg {
    Vector,
    Keyword,
    Hybrid,
    Stepback,
}

impl From<SearchArg> for SearchType {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::Vector => SearchType::Vector,
            SearchArg::Keyword => SearchType::Keyword,
            SearchArg::Hybrid => SearchType::Hybrid,
            SearchArg::Stepback => SearchType::Stepback,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Global,
    Local,
}

impl From<ModeArg> for GraphRagMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Global => GraphRagMode::Global,
            ModeArg::Local => GraphRagMode::Local,
        }
    }
}

fn parse_entity_type(value: &str) -> std::result::Result<EntityType, String> {
    EntityType::parse(value).ok_or_else(|| {
        let known: Vec<_> = EntityType::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown entity type '{value}' (expected one of {})", known.join(", "))
    })
}

/// Reads a yes/no answer from stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json);

    let mut config = ClientConfig::new(cli.api_url.clone()).with_timeout_secs(cli.timeout_secs);
    if let Some(token) = &cli.api_token {
        config = config.with_api_token(token.clone());
    }
    let client = ApiClient::new(config).context("Failed to create API client")?;
    let ctx = Context::new(client);

    let outcome = run(&cli, ctx.clone()).await;

    let Context { client, .. } = ctx;
    let metrics = match Arc::try_unwrap(client) {
        Ok(client) => client.dispose(),
        Err(shared) => shared.metrics(),
    };
    info!(
        total_requests = metrics.total_requests,
        failed_requests = metrics.failed_requests,
        avg_latency_ms = metrics.avg_latency_ms,
        "session finished"
    );
    if cli.metrics {
        print!("{}", render::metrics(&metrics));
    }

    outcome
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: &Cli, ctx: Context) -> Result<()> {
    let json = cli.json;
    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    match &cli.command {
        Commands::Routes { path } => {
            for line in NavShell::render(path) {
                println!("{line}");
            }
            match Route::from_path(path) {
                Some(route) => println!("\n{}: {}", route.label(), route.description()),
                None => println!("\nNo route matches {path}"),
            }
        }

        Commands::Documents { action } => {
            let mut page = DocumentsPage::new(ctx);
            match action {
                DocumentsCmd::Upload { file } => {
                    let bytes = tokio::fs::read(file)
                        .await
                        .with_context(|| format!("Failed to read {}", file.display()))?;
                    page.upload(&file_name(file), bytes).await;
                    show(&page.ingest, json, render::ingested)?;
                    show(&page.counts, json, render::counts)?;
                }
                DocumentsCmd::Download { url } => {
                    page.download(url).await;
                    show(&page.ingest, json, render::ingested)?;
                    show(&page.counts, json, render::counts)?;
                }
                DocumentsCmd::Counts => {
                    page.refresh_counts().await;
                    show(&page.counts, json, render::counts)?;
                }
            }
        }

        Commands::Rag {
            question,
            search_type,
        } => {
            let mut page = RagPage::new(ctx);
            page.set_question(question.as_str());
            page.set_search_type((*search_type).into());
            page.submit().await;
            show(&page.view, json, render::rag)?;
        }

        Commands::Cypher { action } => {
            let mut page = CypherPage::new(ctx);
            match action {
                CypherCmd::Ask {
                    question,
                    terminology,
                    examples,
                } => {
                    page.set_question(question.as_str());
                    if let Some(t) = terminology {
                        page.set_terminology(t.as_str());
                    }
                    if let Some(e) = examples {
                        page.set_examples(e.as_str());
                    }
                    page.submit().await;
                    show(&page.view, json, render::cypher)?;
                }
                CypherCmd::Schema => {
                    page.load_schema().await;
                    show(&page.schema, json, |s| format!("{}\n", s.schema_string))?;
                }
                CypherCmd::LoadMovies => {
                    page.load_movies().await;
                    show(&page.dataset, json, |m| format!("{}\n", m.summary()))?;
                }
            }
        }

        Commands::Agentic { action } => {
            let mut page = AgenticRagPage::new(ctx);
            match action {
                AgenticCmd::Ask { question } => {
                    page.set_question(question.as_str());
                    page.submit().await;
                    show(&page.view, json, render::agentic)?;
                }
                AgenticCmd::Tools => {
                    page.load_tools().await;
                    show(&page.tools, json, |t| render::tools(t))?;
                }
            }
        }

        Commands::Entities { action } => {
            let mut page = EntityPage::new(ctx);
            match action {
                EntitiesCmd::Extract { text, file, types } => {
                    page.set_text(read_input(text.as_deref(), file.as_deref()).await?);
                    if !types.is_empty() {
                        page.select_only(types.iter().copied());
                    }
                    page.submit().await;
                    print_panel(page.error_panel());
                    show(&page.view, json, render::entities)?;
                }
                EntitiesCmd::Graph => {
                    page.load_graph().await;
                    show(&page.graph, json, render::entity_graph)?;
                }
            }
        }

        Commands::Contracts { action } => {
            let mut page = ContractPage::new(ctx);
            match action {
                ContractsCmd::Extract { text, file } => {
                    page.set_contract_text(read_input(text.as_deref(), file.as_deref()).await?);
                    page.submit().await;
                    print_panel(page.error_panel());
                    show(&page.view, json, render::contract)?;
                }
                ContractsCmd::List => {
                    page.load_stored().await;
                    show(&page.stored, json, |list| pretty(&list.contracts))?;
                }
            }
        }

        Commands::GraphRag { action } => {
            let mut page = GraphRagPage::new(ctx);
            match action {
                GraphRagCmd::Ask { question, mode } => {
                    page.set_question(question.as_str());
                    page.set_mode((*mode).into());
                    page.submit().await;
                    show(&page.view, json, render::graph_rag)?;
                }
                GraphRagCmd::Communities => {
                    page.detect_communities().await;
                    show(&page.communities, json, render::communities)?;
                }
            }
        }

        Commands::Kg { action } => run_knowledge_graph(action, ctx, json, confirm.as_ref()).await?,

        Commands::Stats {
            watch,
            interval_secs,
            force,
        } => {
            let mut page = StatisticsPage::new(ctx.clone());
            if *watch {
                let interval = interval_secs.unwrap_or(ctx.client.config().poll_interval_secs);
                watch_statistics(&mut page, ctx, Duration::from_secs(interval), json).await;
            } else {
                page.refresh(*force).await;
                show(&page.live, json, render::statistics)?;
                page.refresh_contracts().await;
                if page.contracts.error().is_none() {
                    show(&page.contracts, json, render::contract_statistics)?;
                }
            }
        }

        Commands::Health => {
            let mut page = AdminPage::new(ctx);
            page.check_health().await;
            show(&page.health, json, |h| format!("{}\n", h.status))?;
            if page.health.result().is_some_and(|h| !h.is_healthy()) {
                bail!("Backend reports it is not healthy");
            }
        }

        Commands::Db {
            action: DbCmd::Reset,
        } => {
            let mut page = AdminPage::new(ctx);
            if page.reset_database(confirm.as_ref()).await == Settle::Cancelled {
                println!("Cancelled.");
                return Ok(());
            }
            show(&page.reset, json, |m| format!("{}\n", m.summary()))?;
        }
    }

    Ok(())
}

async fn run_knowledge_graph(
    action: &KgCmd,
    ctx: Context,
    json: bool,
    confirm: &dyn Confirm,
) -> Result<()> {
    let mut page = KnowledgeGraphPage::new(ctx);
    match action {
        KgCmd::Sample => {
            page.load_sample().await.map_err(|e| anyhow::anyhow!(e.toast()))?;
            println!("{}", page.document());
        }
        KgCmd::Extract { file, sample } => {
            load_document(&mut page, file.as_deref(), *sample).await?;
            page.extract().await;
            print_panel(page.error_panel());
            show(&page.extraction, json, pretty)?;
        }
        KgCmd::Import { file, sample } => {
            load_document(&mut page, file.as_deref(), *sample).await?;
            page.import().await;
            print_panel(page.error_panel());
            show(&page.import, json, |i| {
                format!("{}\n{}", i.import_result.summary(), pretty(&i.extraction_result))
            })?;
        }
        KgCmd::Query { question } => {
            page.set_question(question.as_str());
            page.ask().await;
            show(&page.answer, json, render::contract_query)?;
        }
        KgCmd::Constraints => {
            page.create_constraints().await;
            show(&page.constraints, json, render::constraints)?;
        }
        KgCmd::Statistics => {
            page.load_statistics().await;
            show(&page.statistics, json, render::contract_statistics)?;
        }
        KgCmd::Data => {
            page.load_graph().await;
            show(&page.graph, json, pretty)?;
        }
        KgCmd::Clear => {
            if page.clear(confirm).await == Settle::Cancelled {
                println!("Cancelled.");
                return Ok(());
            }
            show(&page.admin, json, |m| format!("{}\n", m.summary()))?;
        }
    }
    Ok(())
}

async fn load_document(page: &mut KnowledgeGraphPage, file: Option<&Path>, sample: bool) -> Result<()> {
    if sample {
        return page.load_sample().await.map_err(|e| anyhow::anyhow!(e.toast()));
    }
    let document = read_input(None, file).await?;
    page.set_document(document);
    Ok(())
}

async fn watch_statistics(page: &mut StatisticsPage, ctx: Context, interval: Duration, json: bool) {
    let (tx, mut rx) = mpsc::channel(4);
    let poller = StatsPoller::spawn(ctx.client.clone(), interval, tx);
    info!(period_secs = poller.period().as_secs(), "watching statistics, Ctrl-C to stop");

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                let tick = event.tick;
                page.apply_poll(event);
                if let Some(err) = page.live.error() {
                    eprintln!("[{tick}] {}", err.toast());
                } else if let Err(e) = show(&page.live, json, render::statistics) {
                    eprintln!("{e:#}");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.shutdown().await;
}

/// Print a settled page slice, or turn its error into the command's failure.
fn show<T, F>(state: &PageState<T>, json: bool, render: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    if let Some(err) = state.error() {
        bail!(err.toast());
    }
    if let Some(value) = state.result() {
        if json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", render(value));
        }
    }
    Ok(())
}

fn print_panel(panel: Option<String>) {
    if let Some(panel) = panel {
        eprintln!("{panel}");
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).map_or_else(|e| format!("<unprintable: {e}>"), |s| s + "\n")
}

async fn read_input(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => bail!("Provide the text inline or with --file"),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rag_defaults_to_hybrid() {
        let cli = Cli::try_parse_from(["playground", "rag", "Who directed The Matrix?"]).unwrap();
        match cli.command {
            Commands::Rag { search_type, .. } => {
                assert_eq!(SearchType::from(search_type), SearchType::Hybrid)
            }
            _ => panic!("expected rag command"),
        }
    }

    #[test]
    fn test_entity_types_parse_case_insensitively() {
        let cli = Cli::try_parse_from([
            "playground",
            "entities",
            "extract",
            "Neo met Trinity",
            "--types",
            "person,Location",
        ])
        .unwrap();
        match cli.command {
            Commands::Entities {
                action: EntitiesCmd::Extract { types, .. },
            } => assert_eq!(types, vec![EntityType::Person, EntityType::Location]),
            _ => panic!("expected entities extract"),
        }
        assert!(parse_entity_type("ALIEN").is_err());
    }

    #[test]
    fn test_file_name_from_path() {
        assert_eq!(file_name(Path::new("/tmp/docs/paper.pdf")), "paper.pdf");
    }
}
