// Final candidate selection and cleanup

use std::path::PathBuf;
use tracing::info;

use super::error::CompressError;
use super::ladder::{CandidateLabel, LadderOutcome, remove_existing};

/// The single file a finalized run leaves on disk
#[derive(Debug, Clone)]
pub struct FinalArtifact {
    pub path: PathBuf,
    pub size_mb: f64,
}

/// Pick the surviving candidate and delete the rest.
///
/// With a single candidate the choice is ignored; 360p is final
/// unconditionally. With two candidates the caller's choice wins, and an
/// absent choice defaults to keeping 360p. Deletion tolerates files that are
/// already gone, so re-running after a partial cleanup is safe.
pub fn finalize_selection(
    outcome: &LadderOutcome,
    choice: Option<CandidateLabel>,
) -> Result<FinalArtifact, CompressError> {
    let keep = if outcome.upgrade().is_some() {
        choice.unwrap_or(CandidateLabel::P360)
    } else {
        outcome.base().label
    };

    for candidate in outcome.candidates() {
        if candidate.label != keep {
            info!(
                path = %candidate.output_path.display(),
                "removing rejected candidate"
            );
            remove_existing(&candidate.output_path)?;
        }
    }

    let kept = outcome
        .candidates()
        .iter()
        .find(|c| c.label == keep)
        .unwrap_or_else(|| outcome.base());

    Ok(FinalArtifact {
        path: kept.output_path.clone(),
        size_mb: kept.size_mb,
    })
}
