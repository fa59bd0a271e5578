// * TabFlow CLI
// * clip: capture a page, optionally enhance it, and save it to Notion.
// * models: list the models available for a provider.
// * config: inspect and edit the persisted settings.

use clap::{Parser, Subcommand};
use tabflow::config::{ModelProvider, Settings};
use tabflow::enrich::{EnhanceStyle, EnhancementResult, Enricher};
use tabflow::network::PageFetcher;
use tabflow::notion::RecordWriter;
use tabflow::ops::telemetry;
use tabflow::session::recovery::{RecoveryCache, SnapshotKind};
use tabflow::session::ClipSession;

#[derive(Parser)]
#[command(name = "tabflow", version, about = "Clip web pages into Notion")]
struct Cli {
    /// Human-readable log output instead of JSON
    #[arg(long, global = true)]
    pretty_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a page and save it to the configured Notion database
    Clip {
        /// Page URL to capture
        url: String,

        /// Enhance description and tags with the configured model
        #[arg(long, value_name = "STYLE")]
        enhance: Option<EnhanceStyle>,

        /// Extra tags to attach, comma-separated (repeatable)
        #[arg(long = "tag", value_name = "TAGS")]
        tags: Vec<String>,

        /// Trim the saved URL to the first N path segments (clamped to the
        /// URL's actual depth)
        #[arg(long, value_name = "N")]
        depth: Option<usize>,

        /// Print the record without writing to Notion
        #[arg(long)]
        dry_run: bool,
    },

    /// List models available for a provider
    Models {
        /// Provider to query (defaults to the configured one)
        provider: Option<ModelProvider>,
    },

    /// Inspect or edit settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings (API keys redacted)
    Show,
    /// Print the settings file path
    Path,
    /// Set a settings field and save
    Set { field: String, value: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.pretty_logs {
        telemetry::init_tracing_pretty();
    } else {
        telemetry::init_tracing();
    }

    let result = match cli.command {
        Command::Clip {
            url,
            enhance,
            tags,
            depth,
            dry_run,
        } => run_clip(&url, enhance, &tags, depth, dry_run).await,
        Command::Models { provider } => run_models(provider).await,
        Command::Config { action } => run_config(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run_clip(
    url: &str,
    enhance: Option<EnhanceStyle>,
    tags: &[String],
    depth: Option<usize>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let recovery = RecoveryCache::new();

    // * Surface an enhancement that finished in a previous interrupted run
    if let Some(previous) = recovery.take::<EnhancementResult>(SnapshotKind::LastEnhancement) {
        tracing::info!(
            description = %previous.description,
            "recovered enhancement result from a previous run"
        );
    }

    let fetcher = PageFetcher::new()?;
    let mut session = ClipSession::new(settings);
    session.load(&fetcher, url).await?;

    if let Some(depth) = depth {
        session.set_url_depth(depth.min(session.url_depth_options()))?;
    }
    for tag in tags {
        session.add_tags(tag)?;
    }

    if let Some(style) = enhance {
        let enricher = Enricher::new();
        let _ = recovery.store(SnapshotKind::EnhancementInProgress, &session.record());
        session.enhance(&enricher, style).await?;
        if let Some(result) = session.enhancement() {
            let _ = recovery.store(SnapshotKind::LastEnhancement, result);
        }
        recovery.clear(SnapshotKind::EnhancementInProgress);
    }

    let record = session.record();
    println!("{}", serde_json::to_string_pretty(&record)?);

    if dry_run {
        return Ok(());
    }

    let writer = RecordWriter::new();
    let id = session.save(&writer).await?;
    println!("saved: {}", id.0);
    Ok(())
}

async fn run_models(provider: Option<ModelProvider>) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load()?;
    let provider = provider.unwrap_or(settings.model_provider);

    let catalog = tabflow::catalog::ModelCatalog::new();
    let models = catalog
        .list_models(provider, settings.api_key_for(provider))
        .await;

    let selected = settings.model_for(provider).to_string();
    for model in &models {
        let marker = if model.id == selected { "*" } else { " " };
        println!("{marker} {:<40} {}", model.id, model.name);
    }

    // * Refresh the cached list used for offline model substitution
    settings.cache_models(provider, models.into_iter().map(|m| m.id).collect());
    settings.save()?;
    Ok(())
}

fn run_config(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let mut settings = Settings::load()?;
            for key in [
                &mut settings.notion_api_key,
                &mut settings.gemini_api_key,
                &mut settings.openai_api_key,
            ] {
                if !key.is_empty() {
                    *key = "<set>".to_string();
                }
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Path => {
            println!("{}", Settings::default_path().display());
        }
        ConfigAction::Set { field, value } => {
            let mut settings = Settings::load()?;
            settings.set_field(&field, &value)?;
            settings.save()?;
            println!("{field} updated");
        }
    }
    Ok(())
}
