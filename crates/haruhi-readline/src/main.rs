use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use rustyline::Editor;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use haruhi_application::{ChatUseCase, FaqUseCase, TranscriptSink};
use haruhi_core::config::{ClientConfig, FaqSourceKind, SecretConfig};
use haruhi_core::faq::{FaqOrigin, FaqSource};
use haruhi_core::session::{ChatMessage, MessageRole, ThinkingMode};
use haruhi_infrastructure::StateRepositoryImpl;
use haruhi_infrastructure::paths::HaruhiPaths;
use haruhi_infrastructure::settings;
use haruhi_interaction::{BackendFaqSource, DirectFaqSource, HaruhiApi};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/sessions".to_string(),
                "/switch".to_string(),
                "/new".to_string(),
                "/mode".to_string(),
                "/faq".to_string(),
                "/help".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Prints main-chat entries as they become visible.
struct ChatRenderer;

impl TranscriptSink for ChatRenderer {
    fn entry_appended(&self, entry: &ChatMessage) {
        print_chat_entry(entry);
    }

    fn view_replaced(&self, entries: &[ChatMessage]) {
        if entries.is_empty() {
            return;
        }
        println!("{}", "── session history ──".bright_black());
        for entry in entries {
            print_chat_entry(entry);
        }
    }
}

fn print_chat_entry(entry: &ChatMessage) {
    match entry.role {
        MessageRole::User => println!("{}", format!("> {}", entry.content).green()),
        MessageRole::Assistant => {
            for line in entry.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

/// Prints FAQ popup entries; questions cyan, answers magenta.
struct FaqRenderer;

impl TranscriptSink for FaqRenderer {
    fn entry_appended(&self, entry: &ChatMessage) {
        match entry.role {
            MessageRole::User => println!("{}", format!("? {}", entry.content).cyan()),
            MessageRole::Assistant => {
                for line in entry.content.lines() {
                    println!("{}", line.bright_magenta());
                }
            }
        }
    }

    fn view_replaced(&self, entries: &[ChatMessage]) {
        for entry in entries {
            self.entry_appended(entry);
        }
    }
}

fn init_tracing() {
    let default_level = "info";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(settings::ENV_LOG)
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Builds the configured FAQ source.
///
/// The direct source needs both the hosted data URL and an API key; when
/// either is missing the client falls back to asking through the service.
fn build_faq_source(config: &ClientConfig, secrets: &SecretConfig) -> Arc<dyn FaqSource> {
    let timeout = config.request_timeout_secs.map(Duration::from_secs);

    match config.faq.source {
        FaqSourceKind::Backend => {
            let mut source = BackendFaqSource::new(&config.base_url);
            if let Some(timeout) = timeout {
                source = source.with_timeout(timeout);
            }
            Arc::new(source)
        }
        FaqSourceKind::Direct => {
            let api_key = settings::resolve_faq_api_key(secrets);
            match (&config.faq.url, api_key) {
                (Some(url), Some(key)) => {
                    let mut source = DirectFaqSource::new(&config.base_url, url, key)
                        .with_table(&config.faq.table)
                        .with_limit(config.faq.limit);
                    if let Some(timeout) = timeout {
                        source = source.with_timeout(timeout);
                    }
                    Arc::new(source)
                }
                _ => {
                    tracing::warn!(
                        "direct FAQ source needs faq.url and an API key, asking through the service instead"
                    );
                    let mut source = BackendFaqSource::new(&config.base_url);
                    if let Some(timeout) = timeout {
                        source = source.with_timeout(timeout);
                    }
                    Arc::new(source)
                }
            }
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    println!("  /sessions          list your chat sessions");
    println!("  /switch <n|id>     open a session from the list");
    println!("  /new               start a new chat");
    println!("  /mode [name]       show or set the thinking mode");
    println!("  /faq               open or close the FAQ panel");
    println!("  quit               exit");
}

async fn handle_command(command: &str, chat: &Arc<ChatUseCase>, faq: &Arc<FaqUseCase>) {
    let (name, argument) = match command.split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "sessions" => {
            if let Err(e) = chat.refresh_directory().await {
                eprintln!("{}", format!("Could not refresh sessions: {}", e).red());
            }
            let active = chat.active_session().await;
            let directory = chat.directory().await;
            if directory.is_empty() {
                println!("{}", "No sessions yet.".bright_black());
                return;
            }
            for (index, session) in directory.iter().enumerate() {
                let title = if session.title.is_empty() {
                    session.session_id.as_str()
                } else {
                    session.title.as_str()
                };
                let line = format!("{:>3}. {}", index + 1, title);
                if active.as_deref() == Some(session.session_id.as_str()) {
                    println!("{}", format!("{} *", line).bright_yellow());
                } else {
                    println!("{line}");
                }
            }
        }
        "switch" => {
            if argument.is_empty() {
                println!("{}", "Usage: /switch <number|session id>".yellow());
                return;
            }
            let target = if let Ok(number) = argument.parse::<usize>() {
                let directory = chat.directory().await;
                match number.checked_sub(1).and_then(|i| directory.get(i)) {
                    Some(session) => session.session_id.clone(),
                    None => {
                        println!("{}", "No such session number; try '/sessions'.".yellow());
                        return;
                    }
                }
            } else {
                argument.to_string()
            };
            if let Err(e) = chat.select_session(&target).await {
                eprintln!("{}", format!("Could not load session: {}", e).red());
            }
        }
        "new" => {
            if chat.new_session().await.is_some() {
                println!("{}", "Started a new chat.".bright_green());
            }
        }
        "mode" => {
            if argument.is_empty() {
                let current = chat.thinking_mode().await;
                let available = ThinkingMode::iter()
                    .map(|mode| mode.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("Thinking mode: {current} (available: {available})");
            } else {
                match argument.parse::<ThinkingMode>() {
                    Ok(mode) => {
                        chat.set_thinking_mode(mode).await;
                        println!("{}", format!("Thinking mode set to {mode}.").bright_green());
                    }
                    Err(_) => println!("{}", "Unknown mode; try '/mode'.".yellow()),
                }
            }
        }
        "faq" => {
            if faq.toggle().await {
                println!(
                    "{}",
                    "FAQ — type a question, pick a number, or '/faq' to close.".bright_magenta()
                );
                for (index, entry) in faq.suggestions().await.iter().enumerate() {
                    println!("{}", format!("  {}. {}", index + 1, entry.question).cyan());
                }
            } else {
                println!("{}", "FAQ closed.".bright_black());
            }
        }
        "help" => print_help(),
        _ => println!("{}", "Unknown command".bright_black()),
    }
}

/// Routes a plain input line while the FAQ panel is open.
fn dispatch_faq_input(input: &str, faq: &Arc<FaqUseCase>) {
    if let Ok(number) = input.parse::<usize>() {
        let Some(index) = number.checked_sub(1) else {
            println!("{}", "No such suggestion; pick a listed number.".yellow());
            return;
        };
        let faq_task = Arc::clone(faq);
        tokio::spawn(async move {
            if faq_task.ask_suggestion(index).await.is_none() {
                println!("{}", "No such suggestion; pick a listed number.".yellow());
            }
        });
    } else {
        let faq_task = Arc::clone(faq);
        let question = input.to_string();
        tokio::spawn(async move {
            faq_task.ask(&question, FaqOrigin::Typed).await;
        });
    }
}

/// The main entry point for the HARUHI readline chat client.
///
/// This async function sets up a rustyline-based REPL that:
/// 1. Loads configuration and credentials, never compiling either in
/// 2. Assembles the service client, FAQ source, and persisted client state
/// 3. Restores the session the pointer selected last run
/// 4. Sends chat and FAQ questions in the background so typing never blocks
/// 5. Displays colored output for user, assistant, and FAQ messages
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // ===== Backend Initialization =====
    let config = settings::load_client_config()?;
    match HaruhiPaths::ensure_secret_file() {
        Ok(path) => tracing::debug!("secret file available at {}", path.display()),
        Err(e) => tracing::warn!("could not prepare the secret file: {}", e),
    }
    let secrets = settings::load_secret_config()?;

    let mut api = HaruhiApi::new(&config.base_url);
    if let Some(secs) = config.request_timeout_secs {
        api = api.with_timeout(Duration::from_secs(secs));
    }
    let faq_source = build_faq_source(&config, &secrets);
    let state_repository = Arc::new(StateRepositoryImpl::new().await?);

    let chat = Arc::new(ChatUseCase::new(Arc::new(api), state_repository));
    chat.attach_sink(Arc::new(ChatRenderer)).await;
    chat.set_thinking_mode(config.thinking_mode).await;

    let faq = Arc::new(FaqUseCase::new(faq_source));
    faq.attach_sink(Arc::new(FaqRenderer)).await;

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== HARUHI Chat ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    // ===== Session Restore =====
    if let Some(session_id) = chat.restore_last_session().await {
        let directory = chat.directory().await;
        let title = directory
            .iter()
            .find(|session| session.session_id == session_id)
            .map(|session| session.title.clone())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| session_id.clone());
        println!("{}", format!("Resumed: {}", title).bright_black());
        println!();
    }

    // ===== Main REPL Loop =====
    loop {
        let prompt = if faq.visible().await { "faq> " } else { ">> " };
        let readline = rl.readline(prompt);

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                // Handle quit command
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                // Skip empty lines
                if trimmed.is_empty() {
                    continue;
                }

                // Add to history
                let _ = rl.add_history_entry(&line);

                if let Some(command) = trimmed.strip_prefix('/') {
                    handle_command(command, &chat, &faq).await;
                } else if faq.visible().await {
                    dispatch_faq_input(trimmed, &faq);
                } else {
                    // Send in the background; the reply prints when it lands.
                    let chat_task = Arc::clone(&chat);
                    let input = trimmed.to_string();
                    tokio::spawn(async move {
                        chat_task.send(&input).await;
                    });
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
