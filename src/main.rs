//! Collects YouTube videos matching a named query profile and prints their URLs.

mod backends;
mod config;
mod config_persistence;
mod credentials;
mod error;
mod item_filter;
mod query_profile;
mod quota_collector;
mod video_finder;
mod video_url;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use log::{debug, info};

use crate::backends::youtube::YouTubeDataAdapter;
use crate::config_persistence::{
    default_config_path, init_config_file, load_config, persist_api_key,
};
use crate::credentials::{CredentialProvider, EnvThenConfigCredentials};
use crate::error::{FindError, Result};
use crate::query_profile::ProfileRegistry;
use crate::video_finder::{FindOptions, VideoFinder};

#[derive(Parser)]
#[command(name = "vidfind")]
#[command(about = "Collect YouTube video URLs for a named search profile")]
#[command(version)]
struct Cli {
    /// Config file (defaults to vidfind.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and print one watch URL per collected video
    Find {
        /// Profile name, e.g. showroom-recent or apex-trending-ja
        find_type: String,

        /// Override the profile's required video count
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Stop requesting further pages after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print the URLs as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// List the available profiles
    Profiles,

    /// Manage the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a commented config template if none exists
    Init,

    /// Store the API key in the config file
    SetApiKey { api_key: String },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        clog.parse_filters(&filters);
    }
    clog.init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    debug!("config path={}", config_path.display());

    match cli.command {
        Commands::Find {
            find_type,
            count,
            timeout_secs,
            json,
        } => cmd_find(&config_path, &find_type, count, timeout_secs, json),
        Commands::Profiles => cmd_profiles(&config_path),
        Commands::Config(ConfigCommand::Init) => {
            if init_config_file(&config_path)? {
                println!("{}", config_path.display());
            } else {
                eprintln!("config file already exists: {}", config_path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config(ConfigCommand::SetApiKey { api_key }) => {
            persist_api_key(&config_path, &api_key)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_find(
    config_path: &std::path::Path,
    find_type: &str,
    count: Option<usize>,
    timeout_secs: Option<u64>,
    json: bool,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let api_key = EnvThenConfigCredentials::from_env(&config.youtube)
        .api_key()
        .ok_or(FindError::MissingCredential)?;
    let registry = ProfileRegistry::from_config(&config.profiles)?;
    let adapter = YouTubeDataAdapter::new(api_key, &config.youtube);
    let finder = VideoFinder::new(adapter, registry, config.youtube.page_size);

    let options = FindOptions {
        required_count: count,
        deadline: timeout_secs.map(|secs| Instant::now() + Duration::from_secs(secs)),
        ..FindOptions::default()
    };
    let urls = finder.find_video_urls(find_type, &options)?;
    if urls.is_empty() {
        eprintln!("no videos found for '{find_type}'");
        return Ok(ExitCode::from(FindError::NoResults.exit_code()));
    }

    info!("Printing {} urls", urls.len());
    if json {
        let rendered = serde_json::to_string_pretty(&urls)
            .map_err(|err| FindError::Config(format!("failed to render json: {err}")))?;
        println!("{rendered}");
    } else {
        for url in &urls {
            println!("{url}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_profiles(config_path: &std::path::Path) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let registry = ProfileRegistry::from_config(&config.profiles)?;
    for profile in registry.iter() {
        let filter = profile
            .audio_language
            .as_deref()
            .map(|language| format!(", audio language {language}"))
            .unwrap_or_default();
        println!(
            "{}\t\"{}\" by {}, {} videos{}",
            profile.name, profile.keyword, profile.order, profile.required_count, filter
        );
    }
    Ok(ExitCode::SUCCESS)
}
