use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mentions::config::{default_config_path, load_config, save_config, MentionsConfig};
use mentions::directory::OcsApiProviderFactory;
use mentions::errors::Result;
use mentions::executor::BlockingExecutor;
use mentions::render::{avatar_url, render_mentions};
use mentions::resolution::MentionResolver;
use mentions::scanner::find_potential_mentions;

/// Finds @mentions in text and resolves them to display names.
#[derive(Parser)]
#[command(name = "mentions", version, about = "Finds @mentions in text and resolves them to display names")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the usernames mentioned in a text
    Scan {
        /// Text to scan (default: read stdin)
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Replace mentions with display names fetched from the server
    Resolve {
        /// Text to resolve (default: read stdin)
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the username -> display name mapping as JSON
        #[arg(short, long)]
        json: bool,
        /// Also print avatar URLs of resolved users
        #[arg(short, long)]
        avatars: bool,
    },
    /// Show or initialize the configuration
    Config {
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write a default configuration if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan { text, file, json } => {
            let text = read_input(text, file)?;
            let mut usernames: Vec<String> = find_potential_mentions(text.as_str())
                .into_iter()
                .collect();
            usernames.sort();
            if json {
                println!("{}", serde_json::to_string_pretty(&usernames)?);
            } else if usernames.is_empty() {
                println!("No mentions found");
            } else {
                for username in &usernames {
                    println!("{}", username);
                }
            }
        }
        Commands::Resolve {
            text,
            file,
            config,
            json,
            avatars,
        } => {
            let text = read_input(text, file)?;
            let config = load_config(&config.unwrap_or_else(default_config_path))?;
            let account = config.account()?;

            let resolver = MentionResolver::new(
                Arc::new(OcsApiProviderFactory::new(config.timeout())),
                Arc::new(BlockingExecutor::current()?),
            )
            .with_base_path(&config.base_path);

            if json || avatars {
                let usernames = find_potential_mentions(text.as_str());
                let display_names: BTreeMap<String, String> = resolver
                    .fetch_display_names(&account, &usernames)
                    .await?
                    .into_iter()
                    .collect();
                if json {
                    println!("{}", serde_json::to_string_pretty(&display_names)?);
                } else {
                    for (username, display_name) in &display_names {
                        println!(
                            "{} ({}) - {}",
                            display_name,
                            username,
                            avatar_url(&account, username, config.avatar_size)
                        );
                    }
                }
            } else {
                println!("{}", render_mentions(&resolver, &account, &text).await?);
            }
        }
        Commands::Config { config, init } => {
            let path = config.unwrap_or_else(default_config_path);
            if init {
                if path.exists() {
                    println!("Configuration already exists at {}", path.display());
                } else {
                    save_config(&path, &MentionsConfig::default())?;
                    println!("Wrote default configuration to {}", path.display());
                }
                return Ok(());
            }

            let mut config = load_config(&path)?;
            if !config.token.is_empty() {
                config.token = "********".to_string();
            }
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

/// Returns the text to work on: the file if given, else the argument, else
/// stdin.
fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
