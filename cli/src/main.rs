use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use bot_api_typegen_extract::compile_document;
use bot_api_typegen_extract::emit::{EmitOptions, OutputFormat, format_output};
use bot_api_typegen_extract::report::SourceReport;
use bot_api_typegen_extract::source::SourceLoader;

mod config;

use config::GeneratorConfig;

#[derive(Debug, Parser)]
#[command(name = "bot-api-typegen", version)]
#[command(about = "Generate TypeScript declarations and a method registry from bot API documentation")]
struct Cli {
    /// Cache file for the documentation page. Fetched and written when missing.
    cache: Option<PathBuf>,
    /// Documentation URL fetched on a cache miss.
    #[arg(long)]
    url: Option<String>,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value = "typescript")]
    format: OutputFormat,
    /// Write output to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Column width for wrapped description comments.
    #[arg(long)]
    wrap_width: Option<usize>,
    /// Fetch timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,
    /// Name of the emitted registry type.
    #[arg(long)]
    registry_name: Option<String>,
    /// Print a JSON run report to stderr.
    #[arg(long)]
    report: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn resolve_config(cli: &Cli) -> Result<GeneratorConfig, String> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)
            .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(cache) = &cli.cache {
        config.cache_path = cache.clone();
    }
    if let Some(url) = &cli.url {
        config.source_url = url.clone();
    }
    if let Some(width) = cli.wrap_width {
        config.wrap_width = width;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(name) = &cli.registry_name {
        config.registry_name = name.clone();
    }

    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), String> {
    let config = resolve_config(&cli)?;

    let loader = SourceLoader::new(&config.source_url, &config.cache_path)
        .with_timeout(Duration::from_secs(config.timeout_secs));
    let loaded = loader.load().map_err(|err| err.to_string())?;
    info!(path = %loaded.path.display(), origin = ?loaded.origin, bytes = loaded.document.len(), "Loaded documentation");

    let options = EmitOptions {
        wrap_width: config.wrap_width,
        registry_name: config.registry_name.clone(),
        source: Some(config.source_url.clone()),
    };
    let mut compiled = compile_document(&loaded.document, &options).map_err(|err| err.to_string())?;
    compiled.report.source = Some(SourceReport {
        path: loaded.path.display().to_string(),
        origin: loaded.origin,
        bytes: loaded.document.len(),
    });

    let mut rendered = format_output(&compiled.entities, &compiled.emitted, cli.format)
        .map_err(|err| err.to_string())?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match &cli.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!("Failed to create '{}': {err}", parent.display())
                    })?;
                }
            }
            fs::write(path, &rendered)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            info!(path = %path.display(), "Wrote output");
        }
        None => print!("{rendered}"),
    }

    if cli.report {
        let json = serde_json::to_string_pretty(&compiled.report)
            .map_err(|err| format!("Failed to serialize report: {err}"))?;
        eprintln!("{json}");
    }

    Ok(())
}
