use clap::{Parser, Subcommand, ValueEnum};
use fitvid::engine::CandidateLabel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitvid")]
#[command(about = "Compress a video to fit under a target file size", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate size-fitted candidates and keep one
    Compress {
        /// Path to the input video file
        input: PathBuf,

        /// Directory for output files (created if absent)
        output_dir: PathBuf,

        /// Target output size in MB (default from config, else 10)
        #[arg(long)]
        target_size_mb: Option<f64>,

        /// Which candidate to keep when both 360p and 480p survive
        #[arg(long, value_enum)]
        keep: Option<KeepChoice>,
    },

    /// Probe a video file for duration and dimensions
    Probe {
        /// Path to the video file
        file: PathBuf,
    },

    /// Check if ffmpeg and ffprobe are installed
    CheckFfmpeg,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeepChoice {
    #[value(name = "360p")]
    P360,
    #[value(name = "480p")]
    P480,
}

impl From<KeepChoice> for CandidateLabel {
    fn from(choice: KeepChoice) -> Self {
        match choice {
            KeepChoice::P360 => CandidateLabel::P360,
            KeepChoice::P480 => CandidateLabel::P480,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
