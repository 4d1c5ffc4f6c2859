use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use saathi::cli::{self, OutputFormat};
use saathi::config;

#[derive(Debug, Parser)]
#[command(name = "saathi")]
#[command(about = "Mood-aware supportive chat assistant")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Bind address (default from config: 127.0.0.1:8080)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Compose a reply locally and print it
    Assist {
        /// The message to answer
        #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
        text: Vec<String>,
        /// Language hint: auto, en-IN, hi-IN
        #[arg(long)]
        lang: Option<String>,
    },
    /// Chat with the service from the terminal
    Chat {
        /// Service base URL (default from config)
        #[arg(long)]
        url: Option<String>,
        /// Language hint sent with every message: auto, en-IN, hi-IN
        #[arg(long)]
        lang: Option<String>,
        /// Do not speak replies
        #[arg(long)]
        mute: bool,
    },
    /// Log today's mood and view the dashboard
    Mood {
        #[command(subcommand)]
        action: MoodAction,
    },
    /// Show assist request statistics
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Check system health: config, storage, speech engine, service
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum MoodAction {
    /// Choose today's mood: excellent, good, okay, bad, verybad
    Set { mood: String },
    /// Save today's mood
    Save,
    /// Show streak, the last 14 days and today's status
    Show {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default ~/.saathi/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `voice.enabled false`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn init_tracing() {
    let level = config::load().logging.level;
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("saathi={level}")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let app = App::parse();

    match app.command {
        Commands::Serve { addr } => cli::run_serve(addr.as_deref()),
        Commands::Assist { text, lang } => cli::run_assist(&text.join(" "), lang.as_deref()),
        Commands::Chat { url, lang, mute } => {
            cli::run_chat(url.as_deref(), lang.as_deref(), mute)
        }
        Commands::Mood { action } => match action {
            MoodAction::Set { mood } => cli::run_mood_set(&mood),
            MoodAction::Save => cli::run_mood_save(),
            MoodAction::Show { format } => {
                cli::run_mood_show(OutputFormat::from_str_opt(Some(&format)))
            }
        },
        Commands::Stats { format, days } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt, days)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
