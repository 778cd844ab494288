//! moviedb - TMDB movie catalog CLI.

/// Application configuration (TOML).
mod config;
/// Notification sinks.
mod notify;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use moviedb_api::catalog::CatalogClient;
use moviedb_api::configuration::{ConfigClient, RasterDecoder};
use moviedb_api::settings::{ImageBaseUrl, ImageUrlReader};
use moviedb_api::transport::HttpTransport;
use moviedb_core::{
    ConfigRefresher, ItemPresentation, MovieDetailModel, MovieItemViewModel, MoviesEngine,
    SignalBus,
};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{API_TOKEN_ENV, AppConfig, TomlSettingsStore, resolve_config_path};
use crate::notify::LogNotifier;

/// How long `movies poster` waits when no request timeout is configured.
const DEFAULT_POSTER_WAIT: Duration = Duration::from_secs(30);

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse, search and inspect movies.
    Movies(MoviesCommand),
    /// Inspect or refresh the configuration.
    Config(ConfigCommand),
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesCommand {
    /// Movies subcommand to run.
    #[command(subcommand)]
    command: MoviesSubcommands,
}

/// Available movies subcommands.
#[derive(Subcommand)]
enum MoviesSubcommands {
    /// List upcoming movies.
    Browse(BrowseArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// Show one movie's detail.
    Detail(DetailArgs),
    /// Download one movie's poster.
    Poster(PosterArgs),
}

/// Arguments for the `movies browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Number of pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,
}

/// Arguments for the `movies search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "The Matrix").
    #[arg(long, required = true)]
    query: String,
    /// Number of pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,
}

/// Arguments for the `movies detail` subcommand.
#[derive(clap::Args)]
struct DetailArgs {
    /// TMDB movie ID (e.g. "550").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `movies poster` subcommand.
#[derive(clap::Args)]
struct PosterArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: String,
    /// File to write the poster to.
    #[arg(long, required = true)]
    output: PathBuf,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Fetch the image base URL and store it in the config file.
    Refresh,
    /// Print the effective configuration.
    Show,
}

/// Builds an `HttpTransport` from the config and `TMDB_API_TOKEN`.
///
/// # Errors
///
/// Returns an error if no API token is available, `tmdb.base_url` is not a
/// valid URL, or the transport fails to build.
#[instrument(skip_all)]
fn build_transport(config: &AppConfig, image_base: ImageUrlReader) -> Result<HttpTransport> {
    let api_token = config.api_token(std::env::var(API_TOKEN_ENV).ok())?;

    let mut builder = HttpTransport::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .language(&config.tmdb.language)
        .image_base(image_base)
        .poster_size(&config.images.poster_size)
        .backdrop_size(&config.images.backdrop_size);
    if let Some(base_url) = &config.tmdb.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build TMDB transport")
}

/// Spawns an engine over a catalog client built from `config`.
///
/// # Errors
///
/// Returns an error if the transport fails to build.
fn spawn_engine(config: &AppConfig, image_base: ImageUrlReader) -> Result<MoviesEngine> {
    let catalog = CatalogClient::new(build_transport(config, image_base)?);
    Ok(MoviesEngine::spawn(Arc::new(catalog), SignalBus::new()))
}

/// Loading and error subscriptions taken before triggering the engine.
struct EngineWatch {
    loading: broadcast::Receiver<bool>,
    errors: broadcast::Receiver<String>,
}

impl EngineWatch {
    fn new(engine: &MoviesEngine) -> Self {
        Self {
            loading: engine.loading(),
            errors: engine.errors(),
        }
    }

    /// Waits until the loading flag drops, then fails with any published error.
    async fn settle(&mut self) -> Result<()> {
        loop {
            match self.loading.recv().await {
                Ok(false) => break,
                Ok(true) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => bail!("engine stopped"),
            }
        }
        if let Ok(message) = self.errors.try_recv() {
            bail!(message);
        }
        Ok(())
    }
}

/// Loads further pages until `pages` pages are loaded or none are left.
///
/// # Errors
///
/// Returns an error if a page fails to load.
async fn load_pages(engine: &MoviesEngine, watch: &mut EngineWatch, pages: u32) -> Result<()> {
    let progress = engine.progress();
    for _ in 1..pages {
        if !progress.borrow().has_more() {
            break;
        }
        engine.load_next_page();
        watch.settle().await?;
    }
    Ok(())
}

/// Logs a table of movies.
fn print_movies(movies: &[MovieDetailModel]) {
    tracing::info!("Total movies: {}", movies.len());
    tracing::info!("ID\tYear\tRating\tTitle\t\t\tGenres");
    for movie in movies {
        let shown = ItemPresentation::from_model(movie);
        tracing::info!(
            "{}\t{}\t{}\t{}\t\t{}",
            movie.id,
            shown.release_year.as_deref().unwrap_or("-"),
            shown.rating.as_deref().unwrap_or("-"),
            shown.title,
            shown.genres,
        );
    }
}

/// Runs the `movies browse` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or a page fails to load.
#[instrument(skip_all)]
async fn run_movies_browse(args: &BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let (_writer, reader) = ImageBaseUrl::new(config.images.base_url.clone());
    let engine = spawn_engine(&config, reader)?;
    let mut watch = EngineWatch::new(&engine);

    engine.refresh();
    watch.settle().await?;
    load_pages(&engine, &mut watch, args.pages).await?;

    print_movies(&engine.results().borrow());
    Ok(())
}

/// Runs the `movies search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is blank, the config cannot be loaded or a
/// page fails to load.
#[instrument(skip_all)]
async fn run_movies_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    if args.query.trim().is_empty() {
        bail!("--query must not be blank");
    }
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let (_writer, reader) = ImageBaseUrl::new(config.images.base_url.clone());
    let engine = spawn_engine(&config, reader)?;
    let mut watch = EngineWatch::new(&engine);
    let mut empty_state = engine.empty_state();

    engine.search(args.query.as_str());
    watch.settle().await?;
    if let Ok(message) = empty_state.try_recv() {
        tracing::info!("{}", message);
        return Ok(());
    }
    load_pages(&engine, &mut watch, args.pages).await?;

    print_movies(&engine.results().borrow());
    Ok(())
}

/// Looks up one movie through the engine.
///
/// # Errors
///
/// Returns the user-facing message published for a failed lookup.
async fn lookup_detail(engine: &MoviesEngine, id: &str) -> Result<MovieDetailModel> {
    let mut details = engine.details();
    let mut errors = engine.errors();
    engine.lookup_detail(id);

    tokio::select! {
        detail = details.recv() => detail.context("engine stopped"),
        message = errors.recv() => bail!(message.context("engine stopped")?),
    }
}

/// Runs the `movies detail` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the lookup fails.
#[instrument(skip_all)]
async fn run_movies_detail(args: &DetailArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let (_writer, reader) = ImageBaseUrl::new(config.images.base_url.clone());
    let engine = spawn_engine(&config, reader)?;

    let detail = lookup_detail(&engine, &args.id).await?;
    let shown = ItemPresentation::from_model(&detail);

    tracing::info!("ID:        {}", detail.id);
    tracing::info!("Title:     {}", shown.title);
    tracing::info!("Year:      {}", shown.release_year.as_deref().unwrap_or("-"));
    tracing::info!("Rating:    {}", shown.rating.as_deref().unwrap_or("-"));
    tracing::info!("Genres:    {}", shown.genres);
    tracing::info!(
        "Runtime:   {}",
        detail.runtime.map_or_else(|| String::from("-"), |m| format!("{m} min"))
    );
    tracing::info!(
        "Revenue:   {}",
        detail.revenue.map_or_else(|| String::from("-"), |r| r.to_string())
    );
    tracing::info!("Language:  {}", detail.language.as_deref().unwrap_or("-"));
    tracing::info!("Homepage:  {}", detail.homepage.as_deref().unwrap_or("-"));
    tracing::info!("Overview:  {}", detail.description.as_deref().unwrap_or("-"));
    Ok(())
}

/// Runs the `movies poster` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup fails, the movie has no poster, the
/// poster does not arrive in time, or the file cannot be written.
#[instrument(skip_all)]
async fn run_movies_poster(args: &PosterArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = AppConfig::load(&resolve_config_path(dir)?)?;
    let (writer, reader) = ImageBaseUrl::new(config.images.base_url.clone());
    let engine = spawn_engine(&config, reader.clone())?;
    let loader = ConfigClient::new(build_transport(&config, reader)?, RasterDecoder, writer);

    let detail = lookup_detail(&engine, &args.id).await?;
    if detail.poster_path.is_none() {
        bail!("movie {} has no poster", detail.id);
    }

    let mut item = MovieItemViewModel::new(Arc::new(loader));
    let mut poster = item.poster();
    item.set_data(detail);
    item.load_poster();

    let wait = config.request_timeout().unwrap_or(DEFAULT_POSTER_WAIT);
    tokio::time::timeout(wait, poster.wait_for(Option::is_some))
        .await
        .context("poster could not be loaded")?
        .context("poster channel closed")?;
    let image = poster.borrow().clone().context("poster could not be loaded")?;

    std::fs::write(&args.output, &image.bytes)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!(
        "Wrote {} ({:?} {}x{}, {} bytes)",
        args.output.display(),
        image.format,
        image.width,
        image.height,
        image.bytes.len()
    );
    Ok(())
}

/// Runs the `config refresh` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the fetch fails.
#[instrument(skip_all)]
async fn run_config_refresh(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    let (writer, reader) = ImageBaseUrl::new(config.images.base_url.clone());
    let writer = writer.with_store(TomlSettingsStore::new(path));
    let client = ConfigClient::new(build_transport(&config, reader)?, RasterDecoder, writer);

    let refresher = ConfigRefresher::new(client, LogNotifier);
    refresher
        .refresh()
        .await
        .context("configuration refresh failed")?;
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    let shown =
        toml::to_string_pretty(&config.redacted()).context("failed to serialize config")?;

    tracing::info!("# {}", path.display());
    for line in shown.lines() {
        tracing::info!("{}", line);
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Movies(movies) => match movies.command {
            MoviesSubcommands::Browse(args) => run_movies_browse(&args, cli.dir.as_ref()).await,
            MoviesSubcommands::Search(args) => run_movies_search(&args, cli.dir.as_ref()).await,
            MoviesSubcommands::Detail(args) => run_movies_detail(&args, cli.dir.as_ref()).await,
            MoviesSubcommands::Poster(args) => run_movies_poster(&args, cli.dir.as_ref()).await,
        },
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Refresh => run_config_refresh(cli.dir.as_ref()).await,
            ConfigSubcommands::Show => run_config_show(cli.dir.as_ref()),
        },
    }
}
