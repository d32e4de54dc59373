// Bitrate allocation from a size budget

use super::error::CompressError;

/// Bitrate budget for one encode, in kbps.
///
/// Derived deterministically from target size and duration; resolution never
/// enters the calculation, only the scale filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateAllocation {
    pub video_bitrate_kbps: u32,
    pub audio_bitrate_kbps: u32,
    pub maxrate_kbps: u32,
    pub bufsize_kbps: u32,
}

/// Spread a size budget uniformly over the stream duration.
///
/// 8192 = 1024 KB/MB x 8 bits/byte converts megabytes to kilobits. The total
/// is split 90/10 between video and audio, both floored so rounding never
/// over-allocates. maxrate/bufsize cap encoder burstiness at 2x/4x the video
/// average (VBR with cap, not CBR).
pub fn allocate(target_size_mb: f64, duration_s: f64) -> Result<BitrateAllocation, CompressError> {
    if duration_s <= 0.0 {
        return Err(CompressError::InvalidDuration(duration_s));
    }

    let total_kbps = (target_size_mb * 8192.0) / duration_s;
    let video_bitrate_kbps = (total_kbps * 0.9).floor() as u32;
    let audio_bitrate_kbps = (total_kbps * 0.1).floor() as u32;

    Ok(BitrateAllocation {
        video_bitrate_kbps,
        audio_bitrate_kbps,
        maxrate_kbps: video_bitrate_kbps * 2,
        bufsize_kbps: video_bitrate_kbps * 4,
    })
}
