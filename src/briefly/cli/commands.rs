//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve the data dir and config, build `BrieflyApi`
//! 3. **API Dispatch**: Call the appropriate `BrieflyApi` method
//! 4. **Output Formatting**: Convert `CmdResult` into terminal output
//! 5. **Error Handling**: List inline field errors; `main` prints the message
//!
//! ## Environment
//!
//! - `BRIEFLY_HOME`: data directory (config.json, session.json)
//! - `BRIEFLY_BASE_URL`: backend URL for this invocation only
//! - `BRIEFLY_LOG`: tracing filter directives, e.g. `briefly=debug`

use super::print::{
    print_analytics, print_config, print_error_details, print_messages, print_nav, print_notes,
    print_redirect, print_session, print_summaries, print_summary_text,
};
use super::setup::{Cli, Commands, HistoryAction, NotesAction};
use briefly::api::BrieflyApi;
use briefly::backend::http::HttpBackend;
use briefly::commands::config::ConfigAction;
use briefly::commands::CmdResult;
use briefly::config::ClientConfig;
use briefly::error::{BrieflyError, Result};
use briefly::model::{SubscriptionTier, SummaryLength, SummaryStyle};
use briefly::session::fs::FileSessionStore;
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

const HOME_ENV: &str = "BRIEFLY_HOME";
const BASE_URL_ENV: &str = "BRIEFLY_BASE_URL";
const LOG_ENV: &str = "BRIEFLY_LOG";

struct AppContext {
    api: BrieflyApi<FileSessionStore, HttpBackend>,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = init_context()?;
    let outcome = dispatch(&ctx, cli.command).await;
    if let Err(err) = &outcome {
        print_error_details(err);
    }
    outcome
}

async fn dispatch(ctx: &AppContext, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Register {
            username,
            email,
            password,
            confirm,
        }) => handle_register(ctx, &username, &email, &password, &confirm).await,
        Some(Commands::Login { username, password }) => {
            handle_login(ctx, &username, &password).await
        }
        Some(Commands::Logout) => handle_logout(ctx),
        Some(Commands::Refresh) => handle_refresh(ctx).await,
        Some(Commands::ForgotPassword { email }) => handle_forgot_password(ctx, &email).await,
        Some(Commands::ResetPassword {
            token,
            password,
            confirm,
        }) => handle_reset_password(ctx, &token, &password, &confirm).await,
        Some(Commands::Status { watch }) => handle_status(ctx, watch).await,
        Some(Commands::Notes { action }) => match action {
            Some(NotesAction::List { min, max }) => handle_notes_list(ctx, &min, &max).await,
            Some(NotesAction::Add { text }) => handle_notes_add(ctx, &text.join(" ")).await,
            None => handle_notes_list(ctx, "", "").await,
        },
        Some(Commands::History { action }) => match action {
            Some(HistoryAction::List) | None => handle_history_list(ctx).await,
            Some(HistoryAction::View { id }) => handle_history_view(ctx, id).await,
            Some(HistoryAction::Download { id, output }) => {
                handle_history_download(ctx, id, &output).await
            }
        },
        Some(Commands::Summarize {
            file,
            length,
            style,
        }) => handle_summarize(ctx, &file, length, style).await,
        Some(Commands::Admin) => handle_admin(ctx).await,
        Some(Commands::Subscribe { tier }) => handle_subscribe(ctx, tier).await,
        Some(Commands::Config { key, value }) => handle_config(ctx, key, value),
        None => handle_status(ctx, false).await,
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "briefly", "briefly")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BrieflyError::Config("Could not determine data directory".into()))
}

fn init_context() -> Result<AppContext> {
    let dir = data_dir()?;
    let mut config = ClientConfig::load(&dir)?;
    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if !url.trim().is_empty() {
            config.base_url = url.trim().to_string();
        }
    }
    tracing::debug!(data_dir = %dir.display(), base_url = %config.base_url, "context ready");

    let store = FileSessionStore::new(&dir);
    let backend = HttpBackend::new(&config.base_url)?;
    Ok(AppContext {
        api: BrieflyApi::new(store, backend, config, dir),
    })
}

/// Prints the parts of a result every flow shares.
fn finish(result: &CmdResult) {
    print_messages(&result.messages);
    if let Some(redirect) = &result.redirect {
        print_redirect(redirect);
    }
}

async fn handle_register(
    ctx: &AppContext,
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<()> {
    let result = ctx.api.register(username, email, password, confirm).await?;
    finish(&result);
    Ok(())
}

async fn handle_login(ctx: &AppContext, username: &str, password: &str) -> Result<()> {
    let result = ctx.api.login(username, password).await?;
    finish(&result);
    if let Some(nav) = &result.nav {
        print_nav(nav);
    }
    Ok(())
}

fn handle_logout(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.logout()?;
    finish(&result);
    Ok(())
}

async fn handle_refresh(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.refresh().await?;
    finish(&result);
    Ok(())
}

async fn handle_forgot_password(ctx: &AppContext, email: &str) -> Result<()> {
    let result = ctx.api.forgot_password(email).await?;
    finish(&result);
    Ok(())
}

async fn handle_reset_password(
    ctx: &AppContext,
    token: &str,
    password: &str,
    confirm: &str,
) -> Result<()> {
    let result = ctx.api.reset_password(token, password, confirm).await?;
    finish(&result);
    Ok(())
}

async fn handle_status(ctx: &AppContext, watch: bool) -> Result<()> {
    let result = ctx.api.status()?;
    if let (Some(session), Some(nav)) = (&result.session, &result.nav) {
        print_session(session, nav);
    }
    if !watch {
        return Ok(());
    }

    let mut watcher = ctx.api.watch_session();
    println!("{}", "Watching for session changes (Ctrl-C to stop)".dimmed());
    loop {
        tokio::select! {
            changed = watcher.changed() => match changed {
                Some(nav) => {
                    println!();
                    let session = ctx.api.status()?.session.unwrap_or_default();
                    print_session(&session, &nav);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

async fn handle_notes_list(ctx: &AppContext, min: &str, max: &str) -> Result<()> {
    let result = ctx.api.list_notes(Some(min), Some(max)).await?;
    print_notes(&result.listed_notes, result.total_notes.unwrap_or_default());
    print_messages(&result.messages);
    Ok(())
}

async fn handle_notes_add(ctx: &AppContext, text: &str) -> Result<()> {
    let result = ctx.api.add_note(text).await?;
    print_messages(&result.messages);
    Ok(())
}

async fn handle_history_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.history().await?;
    print_summaries(&result.summaries);
    print_messages(&result.messages);
    Ok(())
}

async fn handle_history_view(ctx: &AppContext, id: i64) -> Result<()> {
    let result = ctx.api.view_summary(id).await?;
    if let Some(text) = &result.summary_text {
        print_summary_text(text);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_history_download(ctx: &AppContext, id: i64, output: &Path) -> Result<()> {
    let result = ctx.api.download_summary(id, output).await?;
    print_messages(&result.messages);
    Ok(())
}

async fn handle_summarize(
    ctx: &AppContext,
    file: &Path,
    length: SummaryLength,
    style: SummaryStyle,
) -> Result<()> {
    let result = ctx.api.summarize(file, length, style).await?;
    print_messages(&result.messages);
    if let Some(text) = &result.summary_text {
        print_summary_text(text);
    }
    Ok(())
}

async fn handle_admin(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.admin_analytics().await?;
    if let Some(analytics) = &result.analytics {
        print_analytics(analytics);
    }
    print_messages(&result.messages);
    Ok(())
}

async fn handle_subscribe(ctx: &AppContext, tier: SubscriptionTier) -> Result<()> {
    let result = ctx.api.subscribe(tier).await?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config_action(action)?;
    if let (Some(config), true) = (&result.config, result.messages.is_empty()) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}
