//! `taskpilot ask` — one-shot or interactive requests.
//!
//! Each line is its own request with a fresh session; the store is what
//! carries state between them. Ctrl+C cancels the request in flight, or
//! quits when pressed at the prompt.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use taskpilot_agent::AgentLoop;
use taskpilot_config::AppConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

pub async fn run(path: Option<&Path>, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(path)?;

    // Check for API key early — give a clear error
    if !config.has_api_key() && config.default_provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!("    TASKPILOT_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let store = taskpilot_store::open(&config.store).await?;
    let provider = taskpilot_providers::build_from_config(&config)?.default_provider()?;
    let tools = Arc::new(taskpilot_tools::default_registry(store));
    let agent = AgentLoop::from_config(provider, tools, &config);

    let interrupts = Interrupts::default();
    let watcher = interrupts.watch();
    let result = converse(&agent, &config, &interrupts, message).await;
    watcher.abort();

    if interrupts.quit.is_cancelled() {
        // The blocking stdin read would keep the runtime alive until Enter.
        std::process::exit(130);
    }
    result
}

async fn converse(
    agent: &AgentLoop,
    config: &AppConfig,
    interrupts: &Interrupts,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(msg) = message {
        eprint!("  Thinking...");
        let run = ask_once(agent, interrupts, &msg).await;
        eprint!("\r              \r");
        println!("{}", run?);
        return Ok(());
    }

    println!();
    println!("  taskpilot — interactive mode");
    println!("  Model: {}  Store: {}", config.default_model, config.store.backend);
    println!("  Type 'exit', Ctrl+D or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"  You > ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupts.quit.cancelled() => {
                println!();
                None
            }
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        match ask_once(agent, interrupts, line).await {
            Ok(response) => {
                println!();
                for l in response.lines() {
                    println!("  Assistant > {l}");
                }
                println!();
            }
            Err(e) => {
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    Ok(())
}

/// Run one request, cancellable through `interrupts`.
async fn ask_once(
    agent: &AgentLoop,
    interrupts: &Interrupts,
    query: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let cancel = interrupts.begin();
    let run = agent.run(query, cancel).await;
    interrupts.finish();

    tracing::debug!(
        session_id = %run.session.id(),
        cycles = run.cycles,
        dispatches = run.dispatches,
        "Request finished"
    );
    Ok(run.result?)
}

/// Routes Ctrl+C for the whole session.
#[derive(Clone, Default)]
struct Interrupts {
    in_flight: Arc<Mutex<Option<CancellationToken>>>,
    quit: CancellationToken,
}

impl Interrupts {
    /// Listen for Ctrl+C until aborted.
    fn watch(&self) -> tokio::task::JoinHandle<()> {
        let interrupts = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                interrupts.interrupt();
            }
        })
    }

    /// Register a new request and return its token.
    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.slot() = Some(token.clone());
        token
    }

    fn finish(&self) {
        self.slot().take();
    }

    /// Cancel the request in flight, or signal quit when idle.
    fn interrupt(&self) {
        match self.slot().take() {
            Some(token) => token.cancel(),
            None => self.quit.cancel(),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
