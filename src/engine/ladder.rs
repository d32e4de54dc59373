// Candidate ladder: 360p always, 480p when the first rung leaves headroom

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use super::allocator::allocate;
use super::error::CompressError;
use super::probe::{self, MediaInfo};
use super::transcode::run_transcode;

/// Target size used when the caller does not specify one, in MB
pub const DEFAULT_TARGET_SIZE_MB: f64 = 10.0;

/// A 360p output below this size leaves room to try 480p.
///
/// Fixed headroom threshold, independent of the requested target size.
pub const STEP_UP_THRESHOLD_MB: f64 = 7.0;

const BYTES_PER_MB: f64 = 1_048_576.0;

const RES_360P: (u32, u32) = (640, 360);
const RES_480P: (u32, u32) = (854, 480);

/// Which rung of the ladder a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateLabel {
    P360,
    P480,
}

impl CandidateLabel {
    pub fn resolution(self) -> (u32, u32) {
        match self {
            Self::P360 => RES_360P,
            Self::P480 => RES_480P,
        }
    }

    /// Deterministic output file name for this rung
    pub fn file_name(self) -> &'static str {
        match self {
            Self::P360 => "output_360p.mp4",
            Self::P480 => "output_480p.mp4",
        }
    }
}

impl fmt::Display for CandidateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P360 => write!(f, "360p"),
            Self::P480 => write!(f, "480p"),
        }
    }
}

/// One produced encode, with its measured on-disk size.
///
/// size_mb is the real file size, not the allocator's estimate; encoders do
/// not hit the budget exactly, so every gate compares measured sizes.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub label: CandidateLabel,
    pub resolution: (u32, u32),
    pub output_path: PathBuf,
    pub size_mb: f64,
}

/// The surviving candidates of a run, 360p first
#[derive(Debug, Clone)]
pub struct LadderOutcome {
    candidates: Vec<Candidate>,
}

impl LadderOutcome {
    /// Assemble an outcome from already-measured candidates.
    ///
    /// The 360p candidate must come first, as `execute` produces it.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// The 360p candidate; every run produces one
    pub fn base(&self) -> &Candidate {
        &self.candidates[0]
    }

    /// The 480p candidate, when it was attempted and fit the target
    pub fn upgrade(&self) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.label == CandidateLabel::P480)
    }
}

/// One size-targeting compression request.
///
/// Immutable for its whole lifetime and threaded explicitly through each
/// call; the id only shows up in log output.
#[derive(Debug, Clone)]
pub struct CompressionRun {
    pub id: Uuid,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub target_size_mb: f64,
}

impl CompressionRun {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        target_size_mb: Option<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            target_size_mb: target_size_mb.unwrap_or(DEFAULT_TARGET_SIZE_MB),
        }
    }

    /// Run the ladder: probe, encode 360p, conditionally encode 480p.
    ///
    /// Fail-fast: any probe or transcode error aborts the whole run. A
    /// failed 480p attempt does not fall back to the finished 360p file.
    pub fn execute(&self) -> Result<LadderOutcome, CompressError> {
        if !self.input_path.exists() {
            return Err(CompressError::InputNotFound(self.input_path.clone()));
        }

        let media = probe::probe(&self.input_path)?;
        info!(
            run = %self.id,
            input = %self.input_path.display(),
            duration_s = media.duration_s,
            width = media.width,
            height = media.height,
            target_mb = self.target_size_mb,
            "starting compression run"
        );

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| CompressError::fs(&self.output_dir, e))?;

        let base = self.run_candidate(&media, CandidateLabel::P360)?;
        info!(run = %self.id, size_mb = base.size_mb, "360p candidate measured");

        let mut candidates = vec![base];

        if should_attempt_upgrade(candidates[0].size_mb) {
            let upgrade = self.run_candidate(&media, CandidateLabel::P480)?;
            info!(run = %self.id, size_mb = upgrade.size_mb, "480p candidate measured");

            if fits_target(upgrade.size_mb, self.target_size_mb) {
                candidates.push(upgrade);
            } else {
                warn!(
                    run = %self.id,
                    size_mb = upgrade.size_mb,
                    target_mb = self.target_size_mb,
                    "480p candidate over target, discarding"
                );
                remove_existing(&upgrade.output_path)?;
            }
        }

        Ok(LadderOutcome { candidates })
    }

    /// Encode one rung and measure the result.
    ///
    /// The allocation is recomputed per rung; it depends on target size and
    /// duration only, so both rungs get an identical budget.
    fn run_candidate(
        &self,
        media: &MediaInfo,
        label: CandidateLabel,
    ) -> Result<Candidate, CompressError> {
        let allocation = allocate(self.target_size_mb, media.duration_s)?;
        let output_path = self.output_dir.join(label.file_name());

        run_transcode(
            &self.input_path,
            &output_path,
            &allocation,
            Some(label.resolution()),
        )?;

        Ok(Candidate {
            label,
            resolution: label.resolution(),
            output_path: output_path.clone(),
            size_mb: file_size_mb(&output_path)?,
        })
    }
}

/// Generate candidates for an input under a target size (default 10 MB).
///
/// First half of the two-phase API; pass the outcome to
/// [`finalize_selection`](super::select::finalize_selection) to pick the
/// survivor and clean up.
pub fn compress_to_target_size(
    input_path: &Path,
    output_dir: &Path,
    target_size_mb: Option<f64>,
) -> Result<LadderOutcome, CompressError> {
    CompressionRun::new(input_path, output_dir, target_size_mb).execute()
}

/// A 360p result under the headroom threshold is worth a 480p attempt
pub fn should_attempt_upgrade(size_360_mb: f64) -> bool {
    size_360_mb < STEP_UP_THRESHOLD_MB
}

/// Measured size is acceptable when it does not exceed the target
pub fn fits_target(size_mb: f64, target_size_mb: f64) -> bool {
    size_mb <= target_size_mb
}

/// On-disk size in MB (bytes / 1,048,576)
pub fn file_size_mb(path: &Path) -> Result<f64, CompressError> {
    let metadata = fs::metadata(path).map_err(|e| CompressError::fs(path, e))?;
    Ok(metadata.len() as f64 / BYTES_PER_MB)
}

/// Delete a candidate file, tolerating one that is already gone.
///
/// Cleanup can be re-entered on a caller retry, so a missing file is not an
/// error.
pub fn remove_existing(path: &Path) -> Result<(), CompressError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CompressError::fs(path, e)),
    }
}
