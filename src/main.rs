mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mq_core::config::Config;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

async fn start_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    root: Option<PathBuf>,
) -> Result<()> {
    // Command-line flags win over the config file.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(root) = root {
        config.library.root = root;
    }

    tracing::info!("Starting marquee");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    mq_server::start(config, CancellationToken::new()).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "marquee=trace,mq_server=trace,mq_media=trace,mq_core=debug,tower_http=debug".to_string()
        } else {
            "marquee=info,mq_server=info,mq_media=info,mq_core=info,tower_http=info".to_string()
        }
    });

    // stdout carries command output (catalog JSON, converted subtitles).
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port, root } => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(config, host, port, root))
        }
        Commands::Scan { root, json } => {
            let mut config = Config::load_or_default(cli.config.as_deref())?;
            if let Some(root) = root {
                config.library.root = root;
            }
            scan(&config, json)
        }
        Commands::Convert { input, output } => convert(&input, output.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("marquee {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn scan(config: &Config, json: bool) -> Result<()> {
    let assets = mq_server::scanner::scan_library(&config.library)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assets)?);
        return Ok(());
    }

    println!("Library: {}", config.library.root.display());
    println!("Assets: {}\n", assets.len());
    for asset in &assets {
        println!("{}", asset.display_title);
        println!("  video:    {}", asset.video_url());
        if let Some(subtitle) = asset.subtitle_url() {
            println!("  subtitle: {subtitle}");
        }
    }

    Ok(())
}

fn convert(input: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read subtitle file: {:?}", input))?;
    let webvtt = mq_media::srt_to_webvtt(&String::from_utf8_lossy(&bytes));

    match output {
        Some(path) => {
            std::fs::write(path, webvtt)
                .with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{webvtt}"),
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            Config::load(p).with_context(|| format!("Invalid config file: {:?}", p))?
        }
        None => {
            println!("No config file specified, searching default locations");
            Config::load_or_default(None)?
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        println!("Configuration loaded with warnings:");
        for warning in &warnings {
            println!("  ! {warning}");
        }
    }
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Library root: {}", config.library.root.display());
    println!("  Video extensions: {}", config.library.video_extensions.join(", "));
    println!(
        "  Subtitle extensions: {}",
        config.library.subtitle_extensions.join(", ")
    );
    println!("  Chunk size: {} bytes", config.streaming.effective_chunk_size());

    Ok(())
}
