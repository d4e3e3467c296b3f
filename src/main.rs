use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};
use serde_json::json;

use anirust::command::{self, Command};
use anirust::fetcher::HttpFetcher;
use anirust::render;
use anirust::resolver::{EpisodeRequest, EpisodeResolver};
use anirust::{info as title_info, site};

mod ui;

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

#[derive(Parser)]
#[command(name = "anirust", version, about = "Find streaming links for anime3rb episodes")]
struct Cli {
    /// Anime title, optionally followed by an episode number ("one piece 3")
    query: Vec<String>,

    /// Specify the episode number
    #[arg(short, long)]
    episode: Option<String>,

    /// Show the title page details instead of episode links
    #[arg(short, long, conflicts_with = "episode")]
    info: bool,

    /// Choose one source interactively and print only its URL
    #[arg(short, long)]
    pick: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Seconds to wait for each page
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Only print warnings and errors
    #[arg(short, long, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging, twice for trace
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,
}

// RUST_LOG wins unless -q or -v is given
fn init_logger(cli: &Cli) {
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    if cli.quiet || cli.verbose > 0 {
        let level = match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        logger.filter_module("anirust", level);
    }

    logger.init();
}

fn command_from_cli(cli: &Cli, query: &str) -> Result<Command> {
    if let Some(episode) = &cli.episode {
        let request = EpisodeRequest::new(command::normalize_slug(query), episode.as_str())?;
        return Ok(Command::Episode(request));
    }

    if cli.info {
        return Ok(Command::Info(command::normalize_slug(query)));
    }

    Ok(command::parse_command(query)?)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logger(&cli);

    // Get search query
    let query = if cli.query.is_empty() {
        ui::prompt_input("Anime (and episode)")?
    } else {
        cli.query.join(" ")
    };

    let command = command_from_cli(&cli, &query)?;
    debug!("query {query:?} -> {command:?}");

    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(cli.timeout))
        .context("Failed to build HTTP client")?;

    match command {
        Command::List => {
            println!("{}", render::help());
            Ok(ExitCode::SUCCESS)
        }
        Command::Info(slug) => show_info(&cli, &fetcher, &slug).await,
        Command::Episode(request) => show_episode(&cli, fetcher, &request).await,
    }
}

async fn show_info(cli: &Cli, fetcher: &HttpFetcher, slug: &str) -> Result<ExitCode> {
    match title_info::fetch_info(fetcher, site::BASE_URL, slug).await {
        Ok(info) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", render::anime_info(&info));
                println!("\n{}: {}", render::INFO_BUTTON_TITLE, info.url);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            info!("no info for {slug}: {e}");
            if cli.json {
                println!("{}", json!({ "error": "not_found", "slug": slug }));
            } else {
                eprintln!("{}", render::info_failure(slug, &e));
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn show_episode(
    cli: &Cli,
    fetcher: HttpFetcher,
    request: &EpisodeRequest,
) -> Result<ExitCode> {
    let resolver = EpisodeResolver::new(fetcher);

    // Ctrl-C drops the pipeline, aborting whatever fetch is in flight
    let result = tokio::select! {
        result = resolver.resolve(request) => result,
        _ = tokio::signal::ctrl_c() => return Err(anyhow!("Interrupted")),
    };

    let sources = match result {
        Ok(sources) => sources,
        Err(e) => {
            if cli.json {
                println!("{}", json!({ "error": e.kind() }));
            } else {
                eprintln!("{}", render::episode_failure(request, &e));
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
    } else if cli.pick {
        let labels: Vec<String> = sources.iter().map(|s| s.quality.clone()).collect();
        let selected = ui::select_from_list(&labels, "Select quality:")?;
        println!("{}", sources[selected].url);
    } else {
        println!("{}", render::episode_sources(request, &sources));
        println!(
            "{}: {}",
            render::EPISODE_BUTTON_TITLE,
            render::episode_page_url(request)
        );
    }

    Ok(ExitCode::SUCCESS)
}
