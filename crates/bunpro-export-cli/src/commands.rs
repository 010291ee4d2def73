//! Command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use bunpro_export_core::csv_writer::{default_file_name, write_to_path};
use bunpro_export_core::token::{capture_from_sources, wait_for_token};
use bunpro_export_core::{
    ApiClient, AuthToken, ExportConfig, ExportSummary, Exporter, ProgressSink, TokenSources,
    TokenStore,
};

use crate::cli::{Cli, Command, ConfigAction, ExportArgs, TokenAction, TokenSourceArgs};

/// Dispatches a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Export(args) => {
            let (summary, path) = load_and_export(config_path, args)
                .await
                .context("Export failed")?;
            println!(
                "Exported {} items. CSV written to {}",
                summary.total(),
                path.display()
            );
            Ok(())
        }
        Command::Token { action } => {
            let config = ExportConfig::load(config_path)?;
            handle_token_command(&config, action)
        }
        Command::Config { action } => handle_config_command(config_path, action),
    }
}

// ============================================================================
// export
// ============================================================================

/// Reports progress on stderr, one line per message.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Applies command-line overrides on top of the loaded configuration.
pub fn apply_overrides(mut config: ExportConfig, args: &ExportArgs) -> Result<ExportConfig> {
    if !args.levels.is_empty() {
        config.levels = args.levels.clone();
    }
    if let Some(ms) = args.delay_ms {
        config.page_delay_ms = ms;
    }
    if let Some(secs) = args.wait_secs {
        config.token_wait_secs = secs;
    }
    if let Some(kind) = &args.reviewable_type {
        config.reviewable_type = kind.clone();
    }
    if let Some(url) = &args.api_base_url {
        config.api_base_url = url.clone();
    }
    if let Some(path) = &args.source.token_file {
        config.token_file = path.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Loads the configuration, then runs [`cmd_export`].
pub async fn load_and_export(
    config_path: Option<&str>,
    args: ExportArgs,
) -> Result<(ExportSummary, PathBuf)> {
    let config = ExportConfig::load(config_path)?;
    cmd_export(config, args).await
}

/// Runs an export and writes the CSV. Returns the summary and the file written.
pub async fn cmd_export(
    config: ExportConfig,
    args: ExportArgs,
) -> Result<(ExportSummary, PathBuf)> {
    let config = apply_overrides(config, &args)?;
    let store = TokenStore::new(&config.token_file);
    let token = resolve_token(&args.source, &store, &config).await?;

    tracing::info!(token = %token.redacted(), levels = config.levels.len(), "Starting export");

    let client = ApiClient::new(&config.api_base_url, token)?
        .with_reviewable_type(&config.reviewable_type);
    let exporter = Exporter::new(Arc::new(client))
        .with_levels(config.levels.clone())
        .with_page_delay(config.page_delay())
        .with_progress(Arc::new(ConsoleProgress));

    let summary = exporter.run().await?;
    for level in &summary.per_level {
        tracing::debug!(
            level = %level.level,
            pages = level.pages,
            added = level.added,
            "Level summary"
        );
    }

    let path = output_path(args.output.as_deref(), &config.output_dir);
    write_to_path(&summary.vocab, &path)?;
    Ok((summary, path))
}

/// Picks the CSV path: an explicit file, a timestamped file inside an
/// explicit directory, or a timestamped file in the configured directory.
pub fn output_path(explicit: Option<&Path>, output_dir: &Path) -> PathBuf {
    let file_name = default_file_name(chrono::Utc::now());
    match explicit {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => output_dir.join(file_name),
    }
}

// ============================================================================
// token
// ============================================================================

/// Captures a token from the explicit sources only (flag/env, HAR, headers).
///
/// Returns `Ok(None)` when no explicit source was given.
pub fn capture_token(
    source: &TokenSourceArgs,
) -> bunpro_export_core::Result<Option<AuthToken>> {
    capture_from_sources(&TokenSources {
        token: source.token.clone(),
        har: source.har.clone(),
        headers: source.headers.clone(),
    })
}

/// Resolves the token for an export.
///
/// Explicit sources win and are cached; otherwise the cache is polled for
/// up to the configured wait.
pub async fn resolve_token(
    source: &TokenSourceArgs,
    store: &TokenStore,
    config: &ExportConfig,
) -> Result<AuthToken> {
    if let Some(token) = capture_token(source)? {
        store.save(&token)?;
        return Ok(token);
    }

    if let Some(token) = store.load()? {
        return Ok(token);
    }

    tracing::info!(
        path = %store.path().display(),
        wait_secs = config.token_wait_secs,
        "No token cached yet; waiting for one to be captured"
    );
    let token = wait_for_token(|| store.load(), config.token_wait(), config.token_poll()).await?;
    Ok(token)
}

/// Handles `token` subcommands.
pub fn handle_token_command(config: &ExportConfig, action: TokenAction) -> Result<()> {
    let store_for = |path: Option<PathBuf>| {
        TokenStore::new(path.unwrap_or_else(|| config.token_file.clone()))
    };

    match action {
        TokenAction::Capture(source) => {
            let store = store_for(source.token_file.clone());
            let token = capture_token(&source)?
                .ok_or_else(|| anyhow!("give one of --token, --har or --headers"))?;
            store.save(&token)?;
            println!(
                "Captured token {} into {}",
                token.redacted(),
                store.path().display()
            );
        }
        TokenAction::Show { token_file, reveal } => {
            let store = store_for(token_file);
            match store.load()? {
                Some(token) if reveal => println!("{}", token.as_str()),
                Some(token) => println!("{}", token.redacted()),
                None => bail!("no token cached at {}", store.path().display()),
            }
        }
        TokenAction::Clear { token_file } => {
            let store = store_for(token_file);
            if store.clear()? {
                println!("Removed {}", store.path().display());
            } else {
                println!("No token cached at {}", store.path().display());
            }
        }
    }
    Ok(())
}

// ============================================================================
// config
// ============================================================================

/// Handles `config` subcommands.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let path = ExportConfig::resolve_config_path(config_path)
                .ok_or_else(|| anyhow!("could not determine config directory for this platform"))?;
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(file does not exist; run `bunpro-export config init` to create it)");
            }
        }
        ConfigAction::Show => {
            let config = ExportConfig::load(config_path)?;
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Get { key } => {
            let config = ExportConfig::load(config_path)?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Init { file, force } => {
            let path = cmd_config_init(file.as_deref().or(config_path), force)?;
            println!("Config file created at {}", path.display());
        }
    }
    Ok(())
}

/// Writes a default config file and returns where it went.
pub fn cmd_config_init(file: Option<&str>, force: bool) -> Result<PathBuf> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => ExportConfig::default_config_path()
            .ok_or_else(|| anyhow!("could not determine config directory"))?,
    };

    if path.exists() && !force {
        bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let toml_str = ExportConfig::default().to_toml_string()?;
    std::fs::write(&path, toml_str).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Returns whether `err` came from a problem the user can fix (token,
/// credentials or configuration).
pub fn is_user_actionable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<bunpro_export_core::Error>()
        .is_some_and(bunpro_export_core::Error::is_user_actionable)
}
