use crate::cli::{Cli, Commands, KeepChoice};
use anyhow::{Context, Result};
use fitvid::config::Config;
use fitvid::engine::{self, CandidateLabel};
use std::path::PathBuf;
use std::process;

pub fn run(cli: Cli) {
    let result = match cli.command {
        Commands::Compress {
            input,
            output_dir,
            target_size_mb,
            keep,
        } => handle_compress(input, output_dir, target_size_mb, keep),
        Commands::Probe { file } => handle_probe(file),
        Commands::CheckFfmpeg => handle_check_ffmpeg(),
        Commands::InitConfig => handle_init_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn handle_compress(
    input: PathBuf,
    output_dir: PathBuf,
    target_size_mb: Option<f64>,
    keep: Option<KeepChoice>,
) -> Result<()> {
    let config = Config::load().context("failed to load config")?;
    let target = target_size_mb.unwrap_or(config.defaults.target_size_mb);

    let outcome = engine::compress_to_target_size(&input, &output_dir, Some(target))?;

    println!("360p version size: {:.2} MB", outcome.base().size_mb);
    match outcome.upgrade() {
        Some(upgrade) => println!("480p version size: {:.2} MB", upgrade.size_mb),
        None => println!("Only the 360p version is available."),
    }

    // Explicit flag wins, then the config preference, then the default-safe
    // 360p inside finalize_selection
    let choice: Option<CandidateLabel> = keep
        .map(CandidateLabel::from)
        .or_else(|| config.defaults.keep_label());

    let artifact = engine::finalize_selection(&outcome, choice)?;

    println!("Final compressed video saved as: {}", artifact.path.display());
    println!("Final size: {:.2} MB", artifact.size_mb);
    Ok(())
}

fn handle_probe(file: PathBuf) -> Result<()> {
    let info = engine::probe(&file)?;
    println!("File: {}", file.display());
    println!("Duration: {:.2}s", info.duration_s);
    println!("Resolution: {}x{}", info.width, info.height);
    Ok(())
}

fn handle_check_ffmpeg() -> Result<()> {
    let ffmpeg = engine::ffmpeg_version()?;
    println!("ffmpeg found: {}", ffmpeg);
    let ffprobe = engine::ffprobe_version()?;
    println!("ffprobe found: {}", ffprobe);
    Ok(())
}

fn handle_init_config() -> Result<()> {
    let path = Config::config_path()?;
    if Config::exists() {
        println!("Config file exists: {}", path.display());
    } else {
        Config::ensure_default().context("failed to create default config")?;
        println!("Created default config: {}", path.display());
    }
    Ok(())
}
