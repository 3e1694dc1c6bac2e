use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use drawbox::board::{Board, BoardSettings, FileBackgroundLoader};
use drawbox::config::{BoardProfile, Config};
use drawbox::publish::{PublishDependencies, PublishManager, PublishOutcome, SUCCESS_MESSAGE};
use drawbox::script::Script;
use drawbox::util;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DRAWBOX_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "drawbox")]
#[command(version = VERSION, about = "Layered canvas annotation board with PNG export and upload")]
struct Cli {
    /// Board profile to open (see --list-boards)
    #[arg(long, short = 'b', value_name = "NAME")]
    board: Option<String>,

    /// Print the configured board profiles and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_boards: bool,

    /// Container width in pixels (overrides canvas.container_width)
    #[arg(long, short = 'w', value_name = "PIXELS")]
    width: Option<u32>,

    /// Background image to use instead of the profile's
    #[arg(long, value_name = "IMAGE")]
    background: Option<String>,

    /// JSON input script replayed onto the board
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Write the flattened PNG to this file
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Upload the board and record it for this participant
    #[arg(long, value_name = "ID")]
    subject: Option<String>,

    /// Configuration file (defaults to ~/.config/drawbox/config.toml)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if cli.list_boards {
        for (name, profile) in &config.boards {
            println!(
                "{}\tbackground={}\tbucket={}\ttable={}",
                name, profile.background, profile.bucket, profile.table
            );
        }
        return Ok(());
    }

    if cli.output.is_none() && cli.subject.is_none() {
        print_usage();
        return Ok(());
    }

    let name = cli
        .board
        .as_deref()
        .ok_or_else(|| anyhow!("No board selected; pass --board <NAME> (see --list-boards)"))?;
    let mut profile: BoardProfile = config
        .board(name)
        .cloned()
        .with_context(|| format!("Unknown board '{}'", name))?;
    if let Some(background) = &cli.background {
        profile.background = background.clone();
    }

    let mut settings = BoardSettings::from(&config);
    if let Some(width) = cli.width {
        settings.container_width = width.max(1);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(&cli, &config, Board::new(profile, settings)))
}

async fn run(cli: &Cli, config: &Config, mut board: Board) -> Result<()> {
    let loader = FileBackgroundLoader::new(util::expand_tilde(&config.canvas.asset_dir));
    let (width, height) = board
        .load_background(&loader)
        .await
        .context("Failed to load background")?;
    log::info!(
        "Board '{}' ready ({}x{} source)",
        board.profile().bucket,
        width,
        height
    );

    if let Some(path) = &cli.script {
        Script::load(path)?.apply(&mut board)?;
    }

    if let Some(path) = &cli.output {
        let png = board.export().await.context("Export failed")?;
        std::fs::write(path, &png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {} ({} bytes)", path.display(), png.len());
    }

    if let Some(subject) = &cli.subject {
        let publisher = PublishManager::with_dependencies(
            &tokio::runtime::Handle::current(),
            PublishDependencies::local(&config.storage),
        );
        let reply = board.save(&publisher, subject).await?;
        match reply.await.context("Publish worker stopped")? {
            PublishOutcome::Success(result) => {
                println!("{}: {}", SUCCESS_MESSAGE, result.image_url);
            }
            PublishOutcome::Failed(message) => bail!(message),
        }
    }

    Ok(())
}

fn print_usage() {
    println!("drawbox: Layered canvas annotation board");
    println!();
    println!("Usage:");
    println!("  drawbox --list-boards                          List board profiles");
    println!("  drawbox --board NAME --script FILE --output OUT.png");
    println!("                                                 Replay input and export");
    println!("  drawbox --board NAME --script FILE --subject ID");
    println!("                                                 Replay input and save for a participant");
    println!("  drawbox --help                                 Show help");
    println!();
    println!("Scripts are JSON: {{\"origin\": [0, 0], \"steps\": [{{\"op\": \"press\", \"x\": 10, \"y\": 10}}, ...]}}");
}
