// Input probing using ffprobe

use serde::Deserialize;
use std::path::Path;
use std::process::Command;

use super::error::CompressError;

/// Duration and frame dimensions of an input file.
///
/// Derived once at the start of a compression run and shared by every
/// candidate in the ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaInfo {
    pub duration_s: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

/// Probe an input file for duration and video dimensions
pub fn probe(input_path: &Path) -> Result<MediaInfo, CompressError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(input_path)
        .output()
        .map_err(|e| CompressError::Probe(format!("failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(CompressError::Probe(format!(
            "ffprobe failed for {}: {}",
            input_path.display(),
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&json_str, input_path)
}

/// Parse ffprobe JSON into MediaInfo
///
/// Selects the first stream whose codec_type is "video". The container
/// duration lives at format level as a stringified float.
pub fn parse_probe_output(json: &str, input_path: &Path) -> Result<MediaInfo, CompressError> {
    let probe: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| CompressError::Probe(format!("failed to parse ffprobe JSON: {e}")))?;

    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CompressError::NoVideoStream(input_path.to_path_buf()))?;

    let width = video
        .width
        .ok_or_else(|| CompressError::Probe("video stream has no width".into()))?;
    let height = video
        .height
        .ok_or_else(|| CompressError::Probe("video stream has no height".into()))?;

    let duration_s = probe
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| CompressError::Probe("no duration in ffprobe output".into()))?
        .parse::<f64>()
        .map_err(|e| CompressError::Probe(format!("failed to parse duration: {e}")))?;

    Ok(MediaInfo {
        duration_s,
        width,
        height,
    })
}

/// Check if ffprobe is available and return its version line
pub fn ffprobe_version() -> Result<String, CompressError> {
    let output = Command::new("ffprobe")
        .arg("-version")
        .output()
        .map_err(|e| {
            CompressError::Probe(format!(
                "failed to execute ffprobe (is it installed and in PATH?): {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(CompressError::Probe(format!(
            "ffprobe -version exited with {}",
            output.status
        )));
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
    use std::path::PathBuf;

    fn input() -> PathBuf {
        PathBuf::from("clip.mp4")
    }

    #[test]
    fn test_parse_full_output() {
        let json = r#"{
            "streams": [
                {"codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080},
                {"codec_type": "audio", "codec_name": "aac"}
            ],
            "format": {"filename": "clip.mp4", "duration": "120.5"}
        }"#;

        let info = parse_probe_output(json, &input()).unwrap();
        assert_eq!(info.duration_s, 120.5);
        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
    }

    #[test]
    fn test_parse_integer_duration() {
        let json = r#"{
            "streams": [{"codec_type": "video", "width": 640, "height": 360}],
            "format": {"duration": "60"}
        }"#;

        let info = parse_probe_output(json, &input()).unwrap();
        assert_eq!(info.duration_s, 60.0);
    }

    #[test]
    fn test_parse_picks_first_video_stream() {
        // Audio listed first; dimensions must come from the first video stream
        let json = r#"{
            "streams": [
                {"codec_type": "audio"},
                {"codec_type": "video", "width": 640, "height": 360},
                {"codec_type": "video", "width": 1280, "height": 720}
            ],
            "format": {"duration": "30"}
        }"#;

        let info = parse_probe_output(json, &input()).unwrap();
        assert_eq!(info.width, 640);
        assert_eq!(info.height, 360);
        assert_eq!(info.duration_s, 30.0);
    }

    #[test]
    fn test_parse_no_video_stream() {
        let json = r#"{
            "streams": [{"codec_type": "audio"}],
            "format": {"duration": "30"}
        }"#;

        let err = parse_probe_output(json, &input()).unwrap_err();
        assert!(matches!(err, CompressError::NoVideoStream(_)));
    }

    #[test]
    fn test_parse_missing_duration() {
        let json = r#"{
            "streams": [{"codec_type": "video", "width": 640, "height": 360}],
            "format": {}
        }"#;

        let err = parse_probe_output(json, &input()).unwrap_err();
        assert!(matches!(err, CompressError::Probe(_)));
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_probe_output("not json", &input()).unwrap_err();
        assert!(matches!(err, CompressError::Probe(_)));
    }
}
