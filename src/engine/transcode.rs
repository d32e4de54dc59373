// ffmpeg invocation for a single candidate encode

use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::allocator::BitrateAllocation;
use super::error::CompressError;

/// Build the encode command for one candidate.
///
/// Codec parameters are fixed: H.264 at CRF 23 with the medium preset and
/// AAC audio. CRF acts as a quality floor while -b:v/-maxrate/-bufsize cap
/// the size; both are enforced at once. A resolution, when present, becomes
/// a scale filter that forces exact output dimensions (no aspect-ratio
/// preservation). The output is always overwritten.
pub fn build_transcode_cmd(
    input_path: &Path,
    output_path: &Path,
    allocation: &BitrateAllocation,
    resolution: Option<(u32, u32)>,
) -> Command {
    let mut cmd = Command::new("ffmpeg");

    cmd.arg("-i").arg(input_path);

    cmd.arg("-c:v").arg("libx264");
    cmd.arg("-crf").arg("23");
    cmd.arg("-preset").arg("medium");

    cmd.arg("-b:v")
        .arg(format!("{}k", allocation.video_bitrate_kbps));
    cmd.arg("-maxrate").arg(format!("{}k", allocation.maxrate_kbps));
    cmd.arg("-bufsize").arg(format!("{}k", allocation.bufsize_kbps));

    cmd.arg("-c:a").arg("aac");
    cmd.arg("-b:a")
        .arg(format!("{}k", allocation.audio_bitrate_kbps));

    if let Some((width, height)) = resolution {
        cmd.arg("-vf").arg(format!("scale={width}:{height}"));
    }

    cmd.arg("-y");
    cmd.arg(output_path);

    cmd
}

/// Run one candidate encode to completion.
///
/// Blocks until ffmpeg exits. A non-zero exit (or a failure to launch
/// ffmpeg at all) aborts the candidate and, upstream, the whole run.
pub fn run_transcode(
    input_path: &Path,
    output_path: &Path,
    allocation: &BitrateAllocation,
    resolution: Option<(u32, u32)>,
) -> Result<(), CompressError> {
    let mut cmd = build_transcode_cmd(input_path, output_path, allocation, resolution);
    debug!(
        input = %input_path.display(),
        output = %output_path.display(),
        video_kbps = allocation.video_bitrate_kbps,
        audio_kbps = allocation.audio_bitrate_kbps,
        "spawning ffmpeg"
    );

    let output = cmd.output().map_err(|e| CompressError::Transcode {
        exit_code: None,
        stderr: format!("failed to execute ffmpeg (is it installed and in PATH?): {e}"),
    })?;

    if !output.status.success() {
        return Err(CompressError::Transcode {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(())
}

/// Check if ffmpeg is available and return its version line
pub fn ffmpeg_version() -> Result<String, CompressError> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|e| CompressError::Transcode {
            exit_code: None,
            stderr: format!("failed to execute ffmpeg (is it installed and in PATH?): {e}"),
        })?;

    if !output.status.success() {
        return Err(CompressError::Transcode {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let version_output = String::from_utf8_lossy(&output.stdout);
    Ok(version_output
        .lines()
        .next()
        .unwrap_or("unknown version")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::allocator::allocate;
    use std::path::PathBuf;

    fn cmd_args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_build_cmd_fixed_parameters() {
        let alloc = allocate(10.0, 120.0).unwrap();
        let cmd = build_transcode_cmd(
            &PathBuf::from("in.mp4"),
            &PathBuf::from("out.mp4"),
            &alloc,
            None,
        );

        assert_eq!(cmd.get_program(), "ffmpeg");
        let joined = cmd_args(&cmd).join(" ");
        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-crf 23"));
        assert!(joined.contains("-preset medium"));
        assert!(joined.contains("-c:a aac"));
        assert!(joined.contains("-y"));
        assert!(!joined.contains("-vf"), "no scale filter without a resolution");
    }

    #[test]
    fn test_build_cmd_bitrates_from_allocation() {
        let alloc = allocate(10.0, 120.0).unwrap();
        let cmd = build_transcode_cmd(
            &PathBuf::from("in.mp4"),
            &PathBuf::from("out.mp4"),
            &alloc,
            None,
        );

        let joined = cmd_args(&cmd).join(" ");
        assert!(joined.contains("-b:v 614k"));
        assert!(joined.contains("-maxrate 1228k"));
        assert!(joined.contains("-bufsize 2456k"));
        assert!(joined.contains("-b:a 68k"));
    }

    #[test]
    fn test_build_cmd_scale_filter_exact_dimensions() {
        let alloc = allocate(10.0, 60.0).unwrap();
        let cmd = build_transcode_cmd(
            &PathBuf::from("in.mp4"),
            &PathBuf::from("out.mp4"),
            &alloc,
            Some((854, 480)),
        );

        let args = cmd_args(&cmd);
        let vf_pos = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf_pos + 1], "scale=854:480");

        // The overwrite flag comes after the filter, just before the output
        let y_pos = args.iter().position(|a| a == "-y").unwrap();
        assert!(vf_pos < y_pos);
        assert_eq!(args.last().unwrap(), "out.mp4");
    }
}
