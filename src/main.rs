use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vinho::{
    build_prompt, ConcurrencyPolicy, Container, ContainerConfig, CredentialKey, DomainError,
    ImageReference, LookupRequest, LookupResult, SessionPolicy, WINE_PROMPT_TEMPLATE,
};

mod cli;

use cli::{join_words, Commands, SettingsCommand, TerminalPresenter};

#[derive(Parser)]
#[command(name = "vinho")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.vinho")]
    data_dir: String,

    /// Chat-completion endpoint base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(long, global = true)]
    model: Option<String>,

    /// Answer lookups offline instead of calling the chat service
    #[arg(long, global = true)]
    mock: bool,

    /// Refuse lookups that have neither a wine name nor an image
    #[arg(long, global = true)]
    require_input: bool,

    /// Refuse a new lookup while one is in flight instead of superseding it
    #[arg(long, global = true)]
    reject_while_busy: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let session_policy = SessionPolicy {
        require_input: cli.require_input,
        concurrency: if cli.reject_while_busy {
            ConcurrencyPolicy::RejectWhileBusy
        } else {
            ConcurrencyPolicy::Supersede
        },
    };

    let config = ContainerConfig {
        data_dir: expand_tilde(&cli.data_dir),
        base_url: cli.base_url.clone(),
        model: cli.model.clone(),
        mock: cli.mock,
        session_policy,
    };

    match cli.command {
        Commands::Prompt { wine_name } => {
            let name = join_words(&wine_name);
            println!("{}", build_prompt(WINE_PROMPT_TEMPLATE, name.as_deref()));
        }

        Commands::Lookup { wine_name, image } => {
            let container = Container::new(config)?;
            let mut request = LookupRequest::new();
            if let Some(name) = join_words(&wine_name) {
                request = request.with_wine_name(name);
            }
            if let Some(path) = image {
                request = request.with_image(acquire_image(path)?);
            }

            let credential = container
                .load_credential_use_case()
                .execute(CredentialKey::ChatApiKey)
                .await?;
            let session = container.lookup_session(Arc::new(TerminalPresenter::new()));

            match session.submit(&request, &credential).await {
                Ok(LookupResult::Success(_)) => return Ok(ExitCode::SUCCESS),
                Ok(_) => return Ok(ExitCode::FAILURE),
                Err(DomainError::InvalidInput(msg)) => {
                    eprintln!("Atenção: {}", msg);
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Shell => {
            let container = Container::new(config)?;
            run_shell(&container).await?;
        }

        Commands::Settings { command } => {
            let container = Container::new(config)?;
            let save = container.save_credential_use_case();
            match command {
                SettingsCommand::SetKey { key, vision } => {
                    save.execute(credential_key(vision), &key).await?;
                    println!("API Key saved!");
                }
                SettingsCommand::Show => {
                    let store = container.credential_store();
                    for key in CredentialKey::ALL {
                        let credential = vinho::Credential::from(store.get(key).await?);
                        println!("{:<14} {}", key.as_str(), credential.masked());
                    }
                }
                SettingsCommand::Clear { vision } => {
                    let key = credential_key(vision);
                    save.clear(key).await?;
                    println!("{} cleared.", key);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// One session for the whole loop; the credential is read once, up front.
async fn run_shell(container: &Container) -> Result<()> {
    let credential = container
        .load_credential_use_case()
        .execute(CredentialKey::ChatApiKey)
        .await?;
    if credential.is_empty() {
        warn!("No chat API key stored; run `vinho settings set-key <KEY>` first");
    }

    let session = container.lookup_session(Arc::new(TerminalPresenter::new()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\nNome do vinho> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line == ":quit" || line == ":q" {
            break;
        }

        let request = if line.is_empty() {
            LookupRequest::new()
        } else {
            LookupRequest::new().with_wine_name(line)
        };

        match session.submit(&request, &credential).await {
            Ok(_) => {}
            Err(DomainError::InvalidInput(msg)) => eprintln!("Atenção: {}", msg),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn acquire_image(path: PathBuf) -> Result<ImageReference> {
    if !path.is_file() {
        bail!("image not found: {}", path.display());
    }
    Ok(ImageReference::new(path))
}

fn credential_key(vision: bool) -> CredentialKey {
    if vision {
        CredentialKey::VisionApiKey
    } else {
        CredentialKey::ChatApiKey
    }
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
