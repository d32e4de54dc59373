/// Assertions over the generated ffmpeg command lines
///
/// The encode parameters are a compatibility contract; these tests pin the
/// exact arguments and their order.
use fitvid::engine::{allocate, build_transcode_cmd};
use std::path::Path;
use std::process::Command;

/// Convert a Command to a string for assertions
fn cmd_to_string(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|arg| arg.to_string_lossy().to_string())
        .collect();

    format!("{} {}", program, args.join(" "))
}

#[test]
fn test_full_command_with_scale() {
    // Scenario: 120s input, 10 MB target
    let alloc = allocate(10.0, 120.0).unwrap();
    let cmd = build_transcode_cmd(
        Path::new("clip.mp4"),
        Path::new("out/output_360p.mp4"),
        &alloc,
        Some((640, 360)),
    );

    assert_eq!(
        cmd_to_string(&cmd),
        "ffmpeg -i clip.mp4 -c:v libx264 -crf 23 -preset medium \
         -b:v 614k -maxrate 1228k -bufsize 2456k -c:a aac -b:a 68k \
         -vf scale=640:360 -y out/output_360p.mp4"
    );
}

#[test]
fn test_full_command_without_scale() {
    let alloc = allocate(10.0, 120.0).unwrap();
    let cmd = build_transcode_cmd(
        Path::new("clip.mp4"),
        Path::new("out.mp4"),
        &alloc,
        None,
    );

    assert_eq!(
        cmd_to_string(&cmd),
        "ffmpeg -i clip.mp4 -c:v libx264 -crf 23 -preset medium \
         -b:v 614k -maxrate 1228k -bufsize 2456k -c:a aac -b:a 68k \
         -y out.mp4"
    );
}

#[test]
fn test_480p_rung_same_bitrates_different_scale() {
    let alloc = allocate(10.0, 120.0).unwrap();
    let cmd_360 = build_transcode_cmd(
        Path::new("clip.mp4"),
        Path::new("out/output_360p.mp4"),
        &alloc,
        Some((640, 360)),
    );
    let cmd_480 = build_transcode_cmd(
        Path::new("clip.mp4"),
        Path::new("out/output_480p.mp4"),
        &alloc,
        Some((854, 480)),
    );

    let s_360 = cmd_to_string(&cmd_360);
    let s_480 = cmd_to_string(&cmd_480);

    // Only the scale filter and output path differ between rungs
    assert!(s_360.contains("scale=640:360"));
    assert!(s_480.contains("scale=854:480"));
    for bitrate_arg in ["-b:v 614k", "-maxrate 1228k", "-bufsize 2456k", "-b:a 68k"] {
        assert!(s_360.contains(bitrate_arg));
        assert!(s_480.contains(bitrate_arg));
    }
}
