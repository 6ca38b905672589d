//! Lookbook CLI entrypoint.
//!
//! Writes one JSON document to stdout; diagnostics go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use lookbook::catalog::{CatalogStore, InMemoryCatalog};
use lookbook::coherence::CoherenceChecker;
use lookbook::config::Config;
use lookbook::embedding::{ClipEncoder, ClipEncoderConfig};
use lookbook::index::{FlatL2Index, IdMap, VectorIndex};
use lookbook::outcome::StageOutcome;
use lookbook::payload::Payload;
use lookbook::search::{SearchEngine, SearchOptions};
use lookbook::validation::{FashionGate, GateOptions, RelevanceValidator, RotationFallback};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SearchType {
    Text,
    Image,
    Multimodal,
    Validate,
    Coherence,
}

#[derive(Debug, Parser)]
#[command(name = "lookbook", version, about = "Fashion search using CLIP")]
struct Cli {
    #[arg(long, value_enum, default_value_t = SearchType::Text)]
    search_type: SearchType,

    /// Text query (text, multimodal, coherence).
    #[arg(long)]
    query: Option<String>,

    /// Image file (image, multimodal, validate, coherence).
    #[arg(long)]
    image_path: Option<PathBuf>,

    /// Number of results; overrides LOOKBOOK_TOP_K.
    #[arg(long)]
    top_k: Option<usize>,

    /// Suppress all diagnostics.
    #[arg(long)]
    quiet: bool,

    /// Always report dominant colors on validate.
    #[arg(long)]
    color_detection: bool,

    /// Comma-separated colors to rank by, e.g. `red,navy`.
    #[arg(long, value_delimiter = ',')]
    dominant_colors: Vec<String>,

    /// Retry rotated variants when an image is rejected.
    #[arg(long)]
    rotation_check: bool,

    /// Dataset root; overrides LOOKBOOK_DATASET_PATH.
    #[arg(long)]
    dataset_path: Option<PathBuf>,
}

impl Cli {
    fn require_query(&self) -> anyhow::Result<&str> {
        match self.query.as_deref() {
            Some(query) if !query.trim().is_empty() => Ok(query),
            _ => bail!("--query is required for {:?} search", self.search_type),
        }
    }

    fn require_image(&self) -> anyhow::Result<&PathBuf> {
        self.image_path
            .as_ref()
            .with_context(|| format!("--image-path is required for {:?} search", self.search_type))
    }

    /// Input errors, reported before any asset is loaded.
    fn check_inputs(&self) -> anyhow::Result<()> {
        if self.top_k == Some(0) {
            bail!("--top-k must be at least 1");
        }
        match self.search_type {
            SearchType::Text => {
                self.require_query()?;
            }
            SearchType::Image | SearchType::Validate => {
                self.require_image()?;
            }
            SearchType::Multimodal | SearchType::Coherence => {
                self.require_query()?;
                self.require_image()?;
            }
        }
        Ok(())
    }

    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(root) = &self.dataset_path {
            config = config.with_dataset_root(root);
        }
        if let Some(top_k) = self.top_k {
            config = config.with_top_k(top_k);
        }
        Ok(config)
    }
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match run(&cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), "Lookbook failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    cli.check_inputs()?;
    let config = cli.config()?;

    match cli.search_type {
        SearchType::Validate | SearchType::Coherence => run_encoder_only(cli, &config),
        SearchType::Text | SearchType::Image | SearchType::Multimodal => run_search(cli, &config),
    }
}

fn load_encoder(config: &Config) -> anyhow::Result<ClipEncoder> {
    let encoder = ClipEncoder::load(ClipEncoderConfig::from_config(config))
        .context("failed to load CLIP encoder")?;
    Ok(encoder)
}

fn fallback(config: &Config) -> RotationFallback {
    RotationFallback::new().with_scratch_dir(config.scratch_dir.clone())
}

fn run_encoder_only(cli: &Cli, config: &Config) -> anyhow::Result<String> {
    config.validate_encoder_assets()?;
    let encoder = load_encoder(config)?;
    let image_path = cli.require_image()?;

    if cli.search_type == SearchType::Coherence {
        let checker = CoherenceChecker::new(&encoder);
        let outcome = checker.check_path(cli.require_query()?, image_path);
        log_outcome("coherence", &outcome);
        return Ok(Payload::Coherence(outcome.value()).to_json()?);
    }

    let gate = FashionGate::new(RelevanceValidator::new(&encoder), fallback(config));
    let options = GateOptions {
        rotation_check: cli.rotation_check,
        color_detection: cli.color_detection,
    };
    let outcome = gate.check(image_path, options);
    log_outcome("validate", &outcome);
    Ok(Payload::Validation(outcome.value()).to_json()?)
}

fn run_search(cli: &Cli, config: &Config) -> anyhow::Result<String> {
    config.validate()?;

    let index = FlatL2Index::open_faiss(&config.index_path)?;
    let ids = IdMap::from_json_path(&config.id_map_path)?;
    ids.check_covers(index.len())?;
    let catalog = InMemoryCatalog::from_csv_path(&config.metadata_file)?;
    let encoder = Arc::new(load_encoder(config)?);

    tracing::info!(
        vectors = index.len(),
        dimension = index.dimension(),
        products = catalog.len(),
        "Assets loaded"
    );

    let engine = SearchEngine::new(encoder, index, ids, catalog).with_fallback(fallback(config));
    let options = SearchOptions::default()
        .with_top_k(config.top_k)
        .with_colors(cli.dominant_colors.iter().cloned())
        .with_rotation_check(cli.rotation_check);

    let outcome = match cli.search_type {
        SearchType::Text => engine.search_text(cli.require_query()?, &options),
        SearchType::Image => engine.search_image(cli.require_image()?, &options),
        _ => engine.search_multimodal(cli.require_query()?, cli.require_image()?, &options),
    };
    log_outcome("search", &outcome);
    Ok(Payload::Results(outcome.value()).to_json()?)
}

fn log_outcome<T>(stage: &str, outcome: &StageOutcome<T>) {
    match outcome {
        StageOutcome::Complete(_) => tracing::debug!(stage, "Complete"),
        StageOutcome::Degraded { issues, .. } => {
            tracing::info!(stage, issues = issues.len(), "Completed with degraded items")
        }
        StageOutcome::Rejected { reason, .. } => tracing::warn!(stage, reason, "Rejected"),
        StageOutcome::Failed { error, .. } => {
            tracing::warn!(stage, error = %error, "Failed, returning safe default")
        }
    }
}
