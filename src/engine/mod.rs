// Size-targeting compression engine - independent of the CLI layer

pub mod allocator;
pub mod error;
pub mod ladder;
pub mod probe;
pub mod select;
pub mod transcode;

pub use allocator::{BitrateAllocation, allocate};
pub use error::CompressError;
pub use ladder::{
    Candidate, CandidateLabel, CompressionRun, DEFAULT_TARGET_SIZE_MB, LadderOutcome,
    STEP_UP_THRESHOLD_MB, compress_to_target_size,
};
pub use probe::{MediaInfo, ffprobe_version, probe};
pub use select::{FinalArtifact, finalize_selection};
pub use transcode::{build_transcode_cmd, ffmpeg_version};
