//! CLI command implementations for saathi.
//!
//! Provides subcommand handlers for:
//! - `saathi serve` — run the HTTP service
//! - `saathi assist "text"` — compose a reply locally
//! - `saathi chat` — interactive terminal chat against the service
//! - `saathi mood set|save|show` — today's mood and the dashboard
//! - `saathi stats` — category and language distribution of assist requests
//! - `saathi health` — platform, config, storage, speech engine
//! - `saathi config show|init|set|reset` — configuration management

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::{ColoredString, Colorize};

use crate::analytics::logger;
use crate::analytics::reporter::{self, Stats};
use crate::assist::{self, LanguageHint};
use crate::client::{ChatWidget, HttpTransport, NullSynthesizer, Role, SpeechSynthesizer, voice};
use crate::config::{self, SaathiConfig};
use crate::dashboard::{
    self, DashboardSnapshot, EMERGENCY_CONTACTS, Mood, MoodTracker, streak_label,
};
use crate::storage::FileStore;
use crate::utils::process;
use crate::web::{self, ServerState};

/// Output format for analytics commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// saathi serve
// ---------------------------------------------------------------------------

/// Run the HTTP service until interrupted.
pub fn run_serve(addr: Option<&str>) -> Result<()> {
    let cfg = config::load();
    let addr = addr.unwrap_or(&cfg.server.addr).to_string();
    let state = ServerState::from_config(&cfg)?;

    println!(
        "{} saathi listening on {}",
        "✓".green().bold(),
        format!("http://{addr}").bold()
    );
    println!("  {}", "Press Ctrl+C to stop.".dimmed());

    web::serve(&addr, state)
}

// ---------------------------------------------------------------------------
// saathi assist
// ---------------------------------------------------------------------------

/// Compose a reply locally, without the service.
pub fn run_assist(text: &str, lang: Option<&str>) -> Result<()> {
    let hint = lang
        .map(LanguageHint::parse)
        .unwrap_or_else(|| config::load().assist.default_lang);
    let reply = assist::compose_reply(text, hint, &mut rand::thread_rng());

    println!("{}", reply.text);
    println!(
        "  {}",
        format!("[{} · {}]", colorize_category(reply.category.as_str()), reply.language).dimmed()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// saathi chat
// ---------------------------------------------------------------------------

/// Interactive chat loop against the assist service.
///
/// Lines starting with `/` are commands: `/quit`, `/listen`, `/camera`.
pub fn run_chat(url: Option<&str>, lang: Option<&str>, mute: bool) -> Result<()> {
    let cfg = config::load();
    let transport = HttpTransport::new(url.unwrap_or(&cfg.client.server_url));

    if !transport.is_reachable() {
        println!(
            "{} {} is not answering; replies will be local until it does.",
            "!".yellow().bold(),
            transport.base_url()
        );
    }

    let speech: Box<dyn SpeechSynthesizer> = if mute {
        Box::new(NullSynthesizer)
    } else {
        voice::synthesizer_from_config(&cfg.voice)
    };

    let mut widget = ChatWidget::new(Box::new(transport)).with_speech(speech);
    if let Some(lang) = lang {
        widget = widget.with_language(LanguageHint::parse(lang));
    }

    println!("{}", "Saathi Chat".bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {}",
        "Type a message and press Enter. /quit to leave.".dimmed()
    );
    println!();
    for message in widget.transcript() {
        print_message(message.role, &message.content);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", "you>".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match line.trim() {
            "/quit" | "/exit" => break,
            "/listen" => {
                widget.toggle_listening();
                if !widget.is_listening() {
                    println!("  {}", "Voice input is not available here.".dimmed());
                }
            }
            "/camera" => {
                widget.toggle_camera();
                let state = if widget.is_camera_on() { "on" } else { "off" };
                println!("  {}", format!("Camera {state}.").dimmed());
            }
            text => {
                if let Some(reply) = widget.submit(text) {
                    print_message(reply.role, &reply.content);
                }
            }
        }
    }

    println!("{}", "Take care. 💙".cyan());
    Ok(())
}

fn print_message(role: Role, content: &str) {
    match role {
        Role::Assistant => println!("{} {}", "saathi>".green().bold(), content),
        Role::User => println!("{} {}", "you>".bold(), content),
    }
}

// ---------------------------------------------------------------------------
// saathi mood set | save | show
// ---------------------------------------------------------------------------

fn open_tracker(cfg: &SaathiConfig) -> Result<MoodTracker<FileStore>> {
    MoodTracker::open(FileStore::from_config(&cfg.storage)?)
}

/// Choose today's mood (still changeable until saved).
pub fn run_mood_set(mood: &str) -> Result<()> {
    let mood: Mood = mood.parse()?;
    let mut tracker = open_tracker(&config::load())?;
    let today = dashboard::today();

    tracker.set_mood(today, mood)?;
    println!(
        "{} Today's mood: {} {}",
        "✓".green().bold(),
        mood.emoji(),
        mood.label().bold()
    );
    println!("  {}", "Run `saathi mood save` to lock it in.".dimmed());
    Ok(())
}

/// Save today's chosen mood.
pub fn run_mood_save() -> Result<()> {
    let mut tracker = open_tracker(&config::load())?;
    let today = dashboard::today();

    tracker.save(today)?;
    println!("{} Today's mood is saved.", "✓".green().bold());
    println!();
    print_dashboard(&tracker.snapshot(today));
    Ok(())
}

/// Render the dashboard.
pub fn run_mood_show(format: OutputFormat) -> Result<()> {
    let tracker = open_tracker(&config::load())?;
    let snapshot = tracker.snapshot(dashboard::today());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Csv => {
            println!("date,mood,saved");
            for day in &snapshot.recent {
                let entry = tracker.log().get(day.date);
                println!(
                    "{},{},{}",
                    day.date,
                    day.mood.map(|m| m.key()).unwrap_or(""),
                    entry.map(|e| e.saved).unwrap_or(false),
                );
            }
        }
        OutputFormat::Table => print_dashboard(&snapshot),
    }
    Ok(())
}

fn print_dashboard(snapshot: &DashboardSnapshot) {
    println!("{}", "Mood Dashboard".bold().cyan());
    println!("{}", "=".repeat(50));

    let today = match snapshot.today {
        Some(entry) => format!("{} {}", entry.mood.emoji(), entry.mood.label()),
        None => "—".to_string(),
    };
    println!("  {} {}", "Today: ".bold(), today);
    println!("  {} {}", "Status:".bold(), snapshot.status.dimmed());
    println!("  {} {}", "Streak:".bold(), streak_label(snapshot.streak));
    println!();

    println!("{}", format!("Last {} Days", snapshot.recent.len()).bold().cyan());
    let strip: Vec<String> = snapshot
        .recent
        .iter()
        .map(|day| strip_cell(day.mood).to_string())
        .collect();
    println!("  {}", strip.join(" "));
    if let (Some(first), Some(last)) = (snapshot.recent.first(), snapshot.recent.last()) {
        println!(
            "  {}",
            format!("{} … {}", first.date.format("%d %b"), last.date.format("%d %b")).dimmed()
        );
    }

    if snapshot.show_emergency {
        println!();
        println!(
            "{}",
            "You don't have to go through this alone.".red().bold()
        );
        for (name, number) in EMERGENCY_CONTACTS {
            println!("  {} {:<16} {}", "☎".red(), name, number.bold());
        }
    }
}

/// One colored block per day of the strip.
fn strip_cell(mood: Option<Mood>) -> ColoredString {
    match mood {
        Some(Mood::Excellent) => "■".bright_green(),
        Some(Mood::Good) => "■".green(),
        Some(Mood::Okay) => "■".yellow(),
        Some(Mood::Bad) => "■".bright_red(),
        Some(Mood::VeryBad) => "■".red(),
        None => "□".dimmed(),
    }
}

// ---------------------------------------------------------------------------
// saathi stats
// ---------------------------------------------------------------------------

/// Show the distribution of handled assist requests.
pub fn run_stats(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let stats = reporter::compute_stats(days);

    if stats.total_requests == 0 {
        println!(
            "{}",
            "No data yet. Assist requests handled by `saathi serve` show up here.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_stats_json(&stats)?,
        OutputFormat::Csv => print_stats_csv(&stats),
        OutputFormat::Table => print_stats_table(&stats),
    }

    Ok(())
}

fn print_stats_table(stats: &Stats) {
    println!("{}", "Saathi Assist Report".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    println!("  {} {}", "Total requests:".bold(), stats.total_requests);
    println!("  {} {}", "Fallbacks:     ".bold(), stats.fallback_count);
    println!(
        "  {} {:.1}ms",
        "Avg latency:   ".bold(),
        stats.avg_latency_ms
    );
    println!();

    let dist = &stats.categories;
    println!("{}", "Categories".bold().cyan());
    for (name, count) in [
        ("crisis", dist.crisis),
        ("negative", dist.negative),
        ("neutral", dist.neutral),
        ("positive", dist.positive),
    ] {
        println!(
            "  {:<10} {:>6} {:>7.1}%",
            colorize_category(name),
            count,
            dist.pct(count)
        );
    }
    println!();

    if !stats.languages.is_empty() {
        println!("{}", "Languages".bold().cyan());
        for (i, (language, count)) in stats.languages.iter().enumerate() {
            let line = format!("  {language:<10} {count:>6}");
            if i % 2 == 0 {
                println!("{line}");
            } else {
                println!("{}", line.dimmed());
            }
        }
    }
}

fn print_stats_json(stats: &Stats) -> Result<()> {
    let value = serde_json::json!({
        "total_requests": stats.total_requests,
        "fallback_count": stats.fallback_count,
        "avg_latency_ms": stats.avg_latency_ms,
        "categories": {
            "crisis": stats.categories.crisis,
            "negative": stats.categories.negative,
            "neutral": stats.categories.neutral,
            "positive": stats.categories.positive,
        },
        "languages": stats.languages,
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_stats_csv(stats: &Stats) {
    println!("kind,name,count");
    let dist = &stats.categories;
    for (name, count) in [
        ("crisis", dist.crisis),
        ("negative", dist.negative),
        ("neutral", dist.neutral),
        ("positive", dist.positive),
    ] {
        println!("category,{name},{count}");
    }
    for (language, count) in &stats.languages {
        println!("language,{language},{count}");
    }
    println!("fallback,fallback,{}", stats.fallback_count);
}

// ---------------------------------------------------------------------------
// saathi health
// ---------------------------------------------------------------------------

/// Check config, storage, log, speech engine and service reachability.
pub fn run_health() -> Result<()> {
    println!("{}", "Saathi Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    print_health_item("Platform", true, process::platform_name());

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.saathi/config.toml found"
        } else {
            "not found (run `saathi config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".saathi.toml found"
        } else {
            "none (optional)"
        },
    );

    // Mood store
    match FileStore::from_config(&cfg.storage) {
        Ok(store) => {
            let exists = store.path().exists();
            match MoodTracker::open(store) {
                Ok(tracker) if exists => print_health_item(
                    "Mood store",
                    true,
                    &format!("{} days logged", tracker.log().len()),
                ),
                Ok(_) => print_health_item("Mood store", true, "empty (created on first save)"),
                Err(e) => print_health_item("Mood store", false, &format!("{e:#}")),
            }
        }
        Err(e) => print_health_item("Mood store", false, &format!("{e:#}")),
    }

    // Assist log
    let log_exists = logger::assist_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let log_detail = if !cfg.logging.enabled {
        "disabled".to_string()
    } else if log_exists {
        format!("{} entries", logger::read_all_entries().len())
    } else {
        "no log file yet".to_string()
    };
    print_health_item("Assist log", log_exists || !cfg.logging.enabled, &log_detail);

    // Speech
    let engine = voice::resolve_engine(cfg.voice.engine);
    let speech_ok = cfg.voice.enabled && engine != config::schema::VoiceEngine::None;
    print_health_item(
        "Speech engine",
        speech_ok,
        &if !cfg.voice.enabled {
            "disabled".to_string()
        } else if speech_ok {
            engine.to_string()
        } else {
            "none found (install espeak)".to_string()
        },
    );

    // Service
    let transport = HttpTransport::new(&cfg.client.server_url);
    let reachable = transport.is_reachable();
    print_health_item(
        "Service",
        reachable,
        &if reachable {
            format!("reachable at {}", transport.base_url())
        } else {
            format!("not reachable at {} (run `saathi serve`)", transport.base_url())
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// saathi config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Saathi Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.saathi/config.toml");
    print_source(project_exists, ".saathi.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "SAATHI_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.saathi/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Colorize a mood category name.
fn colorize_category(category: &str) -> ColoredString {
    match category {
        "crisis" => category.red().bold(),
        "negative" => category.yellow(),
        "neutral" => category.normal(),
        "positive" => category.green(),
        _ => category.normal(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn empty_days_render_as_hollow_cells() {
        colored::control::set_override(false);
        assert_eq!(strip_cell(None).to_string(), "□");
        assert_eq!(strip_cell(Some(Mood::Bad)).to_string(), "■");
    }
}
