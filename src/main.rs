use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use codepad::banner::{BannerInfo, print_banner, print_session_summary};
use codepad::client::ExecutionClient;
use codepad::client::http::HttpTransport;
use codepad::commands::{CommandContext, CommandRegistry, CommandResult};
use codepad::consts::{
    DEFAULT_API_KEY, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, MAX_TEST_CASES, default_db_path,
};
use codepad::events::EventBus;
use codepad::input::{LineSource, SharedInput};
use codepad::languages;
use codepad::layout::{Layout, Viewport};
use codepad::report::print_results;
use codepad::session::{RunStatus, Session};
use codepad::settings::Settings;
use codepad::store::KvStore;
use codepad::store::sqlite::SqliteStore;
use codepad::{files, spinner::Spinner};

#[derive(Parser)]
#[command(
    name = "codepad",
    version,
    about = "Write code here, run it on a remote execution service."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Execution service URL
    #[arg(long, env = "CODEPAD_API_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Shared key sent with every request
    #[arg(long, env = "CODEPAD_API_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    key: String,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// SQLite database for session state (use :memory: for ephemeral)
    #[arg(short, long)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a file once and print the results
    Run {
        /// Source file
        file: PathBuf,

        /// Language id (defaults to a guess from the file extension)
        #[arg(short, long)]
        lang: Option<String>,

        /// Test-case input; repeat for more cases
        #[arg(short, long = "input")]
        inputs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let settings = Settings {
        endpoint: cli.endpoint,
        api_key: cli.key,
        timeout: Duration::from_secs(cli.timeout),
        db_path: cli
            .db
            .unwrap_or_else(|| default_db_path().to_string_lossy().into_owned()),
    };
    settings.warn_if_insecure();
    info!(?settings, "starting");

    match cli.command {
        Some(Command::Run { file, lang, inputs }) => {
            run_once(&settings, &file, lang, inputs).await
        }
        None => repl(&settings).await,
    }
}

fn build_client(settings: &Settings) -> anyhow::Result<ExecutionClient> {
    let transport = HttpTransport::new(&settings.endpoint, settings.timeout)
        .context("failed to build HTTP client")?;
    Ok(ExecutionClient::new(Box::new(transport), settings.api_key.clone()))
}

fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn KvStore>> {
    if !settings.is_ephemeral()
        && let Some(parent) = Path::new(&settings.db_path).parent()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(Arc::new(SqliteStore::open(&settings.db_path)?))
}

/// Non-interactive mode: one file, one run, then exit.
/// Uses an ephemeral store so the REPL's saved state is left alone.
async fn run_once(
    settings: &Settings,
    file: &Path,
    lang: Option<String>,
    inputs: Vec<String>,
) -> anyhow::Result<()> {
    if inputs.len() > MAX_TEST_CASES {
        bail!("at most {MAX_TEST_CASES} inputs are allowed");
    }

    let store: Arc<dyn KvStore> = Arc::new(SqliteStore::in_memory()?);
    let session = Session::new(build_client(settings)?, store);

    let lang_id = match lang {
        Some(id) => id,
        None => file
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(languages::from_extension)
            .map(|l| l.id.to_string())
            .with_context(|| {
                format!("cannot tell the language of {}; pass --lang", file.display())
            })?,
    };
    session.select_language(&lang_id)?;
    files::load_into(&session, file).await?;

    for (i, input) in inputs.into_iter().enumerate() {
        if i > 0 {
            session.add_test_case();
        }
        session.set_test_case(i, input);
    }

    let spinner = Spinner::start(&format!("running {}", session.language().label));
    let status = session.run().await;
    spinner.stop().await;

    match status {
        RunStatus::Completed(outcome) => {
            print_results(&session.results());
            if !outcome.is_success() {
                bail!("run failed");
            }
            Ok(())
        }
        RunStatus::EmptySource => bail!("{} is empty", file.display()),
        RunStatus::AlreadyRunning => bail!("a run is already in progress"),
    }
}

async fn repl(settings: &Settings) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let session = Arc::new(Session::new(build_client(settings)?, store));
    let layout = Mutex::new(Layout::new());
    let bus = EventBus::default();
    let registry = CommandRegistry::new();
    let viewport = terminal_viewport();

    let store_label = if settings.is_ephemeral() {
        "ephemeral"
    } else {
        settings.db_path.as_str()
    };
    let layout_label = {
        let layout = layout.lock().unwrap();
        format!(
            "editor {} | output {}",
            layout.editor.extent(),
            layout.output.extent()
        )
    };
    print_banner(&BannerInfo {
        endpoint: &settings.endpoint,
        language: session.language().label,
        test_cases: session.test_cases().len(),
        layout: &layout_label,
        store: store_label,
    });

    // Async stdin so Ctrl+C is caught at the prompt too. Commands that read
    // more lines (/edit) take the same reader from the context.
    let stdin: Box<dyn LineSource> = Box::new(BufReader::new(tokio::io::stdin()).lines());
    let input = SharedInput::new(stdin);

    let ctx = CommandContext {
        session: &session,
        layout: &layout,
        bus: &bus,
        input: &input,
        viewport,
    };
    let mut runs = 0;

    loop {
        print!("\ncodepad [{}]> ", session.language().id);
        io::stdout().flush()?;

        let line = tokio::select! {
            result = async { input.lock().await.next_line().await } => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        // /run and /edit handle Ctrl+C themselves
        match registry.dispatch(command, &ctx).await {
            CommandResult::Quit => break,
            CommandResult::Ran(RunStatus::Completed(_)) => runs += 1,
            CommandResult::NotACommand => {
                println!("not a command; type /help (use /edit to change the source)");
            }
            CommandResult::Ran(_) | CommandResult::Handled => {}
        }
    }

    print_session_summary(runs);
    Ok(())
}

/// Terminal size from `COLUMNS`/`LINES`, or 120x40.
fn terminal_viewport() -> Viewport {
    let dim = |var: &str, fallback: f64| {
        std::env::var(var)
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| *v > 0.0)
            .unwrap_or(fallback)
    };
    Viewport::new(dim("COLUMNS", 120.0), dim("LINES", 40.0))
}
